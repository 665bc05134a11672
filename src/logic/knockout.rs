//! Knockout stage: pick advancing teams, pad with byes, lay out the bracket.

use crate::logic::qualification::Qualification;
use crate::logic::tiebreak::check_group_stage_complete;
use crate::models::{GameMatch, RoundType, Team, Tournament, TournamentError, TournamentStage};
use rand::seq::SliceRandom;
use rand::Rng;

/// Largest bracket the engine lays out (quarterfinals).
pub const MAX_BRACKET_SIZE: usize = 8;

/// Generate the bracket with the thread-local RNG. See [`generate_knockout_stage_with_rng`].
pub fn generate_knockout_stage(tournament: &mut Tournament) -> Result<(), TournamentError> {
    generate_knockout_stage_with_rng(tournament, &mut rand::thread_rng())
}

/// Seed the knockout bracket from the group standings.
///
/// Takes the top teams of each group, shuffles them (independently of the group draw),
/// and lays out a final, semifinals or quarterfinals depending on how many advanced.
/// Replaces any earlier bracket. Does not check that the group stage is finished;
/// see [`finish_group_stage`] for the gated version.
pub fn generate_knockout_stage_with_rng(
    tournament: &mut Tournament,
    rng: &mut impl Rng,
) -> Result<(), TournamentError> {
    if !matches!(tournament.stage, TournamentStage::Groups | TournamentStage::Bracket) {
        return Err(TournamentError::InvalidState);
    }
    if tournament.groups.is_empty() {
        return Err(TournamentError::NoGroups);
    }

    let mut advancing = select_advancing_teams(tournament);
    if advancing.len() < 2 {
        return Err(TournamentError::NotEnoughTeams);
    }
    advancing.shuffle(rng);

    let team_count = advancing.len();
    tournament.knockout_matches = build_bracket(advancing);
    tournament.stage = TournamentStage::Bracket;
    tournament.touch();

    log::info!(
        "Knockout stage generated: {} team(s), {} match(es)",
        team_count,
        tournament.knockout_matches.len()
    );
    Ok(())
}

/// Leave the group stage: refuse while results or tiebreakers are missing or a cutoff
/// tie remains, otherwise generate the bracket.
pub fn finish_group_stage(tournament: &mut Tournament) -> Result<(), TournamentError> {
    finish_group_stage_with_rng(tournament, &mut rand::thread_rng())
}

pub fn finish_group_stage_with_rng(
    tournament: &mut Tournament,
    rng: &mut impl Rng,
) -> Result<(), TournamentError> {
    if tournament.stage != TournamentStage::Groups {
        return Err(TournamentError::InvalidState);
    }
    check_group_stage_complete(tournament)?;
    generate_knockout_stage_with_rng(tournament, rng)
}

/// Teams promoted from the groups, in group order then standings order.
///
/// Each group sends its top `per_group` (capped at its size). If that adds up to more than
/// [`MAX_BRACKET_SIZE`], every group sends its top `per_group - 1` and the remaining places go
/// to the best teams placed just below, by regular group wins and then cross-group tiebreaker
/// wins. Level teams keep group order here; [`finish_group_stage`] refuses to seed while such
/// a tie decides a place.
pub fn select_advancing_teams(tournament: &Tournament) -> Vec<Team> {
    Qualification::for_tournament(tournament).advancing_teams()
}

/// Lay out bracket matches for already-shuffled teams.
///
/// - 2 teams: one final.
/// - 3-4 teams: padded to 4 with byes, semifinals 0v3 and 1v2, final TBD.
/// - 5-8 teams: padded to 8 with byes, quarterfinals `i` v `7 - i`, semifinals and final TBD.
/// - fewer than 2: nothing.
///
/// Byes are appended after the real teams, so every bye faces a real team.
pub fn build_bracket(mut teams: Vec<Team>) -> Vec<GameMatch> {
    match teams.len() {
        0 | 1 => Vec::new(),
        2 => {
            let b = teams.remove(1);
            let a = teams.remove(0);
            vec![GameMatch::new(a, b, RoundType::Final)]
        }
        3 | 4 => {
            pad_with_byes(&mut teams, 4);
            let mut matches = pair_outside_in(&teams, RoundType::Semifinal);
            matches.push(GameMatch::pending(RoundType::Final));
            matches
        }
        _ => {
            teams.truncate(MAX_BRACKET_SIZE);
            pad_with_byes(&mut teams, MAX_BRACKET_SIZE);
            let mut matches = pair_outside_in(&teams, RoundType::Quarterfinal);
            matches.push(GameMatch::pending(RoundType::Semifinal));
            matches.push(GameMatch::pending(RoundType::Semifinal));
            matches.push(GameMatch::pending(RoundType::Final));
            matches
        }
    }
}

fn pad_with_byes(teams: &mut Vec<Team>, size: usize) {
    while teams.len() < size {
        teams.push(Team::bye());
    }
}

/// First against last, second against second-to-last, and so on.
fn pair_outside_in(teams: &[Team], round: RoundType) -> Vec<GameMatch> {
    let n = teams.len();
    (0..n / 2)
        .map(|i| GameMatch::new(teams[i].clone(), teams[n - 1 - i].clone(), round))
        .collect()
}
