//! Group stage: random group draw and round-robin fixtures.

use crate::models::{GameMatch, Group, Team, Tournament, TournamentError, TournamentStage};
use rand::seq::SliceRandom;
use rand::Rng;

/// Draw groups with the thread-local RNG. See [`generate_groups_with_rng`].
pub fn generate_groups(tournament: &mut Tournament) -> Result<(), TournamentError> {
    generate_groups_with_rng(tournament, &mut rand::thread_rng())
}

/// Draw teams into groups and create every round-robin fixture.
///
/// 1. Shuffle all teams.
/// 2. Cut into `number_of_groups` chunks of `ceil(teams / groups)`; trailing groups may be
///    short or empty.
/// 3. Stamp `group-<n>` onto copies of the teams in each chunk.
/// 4. One match per unordered pair of teams in the group.
///
/// Calling this again redraws from scratch, discarding all group results and tiebreakers.
pub fn generate_groups_with_rng(
    tournament: &mut Tournament,
    rng: &mut impl Rng,
) -> Result<(), TournamentError> {
    if matches!(tournament.stage, TournamentStage::Setup | TournamentStage::Completed) {
        return Err(TournamentError::InvalidState);
    }
    if tournament.teams.len() < 2 {
        return Err(TournamentError::NotEnoughTeams);
    }
    if tournament.number_of_groups == 0 {
        return Err(TournamentError::NoGroups);
    }

    let mut shuffled = tournament.teams.clone();
    shuffled.shuffle(rng);

    let group_count = tournament.number_of_groups as usize;
    let teams_per_group = shuffled.len().div_ceil(group_count);

    let groups: Vec<Group> = (0..group_count)
        .map(|i| {
            let start = (i * teams_per_group).min(shuffled.len());
            let end = (start + teams_per_group).min(shuffled.len());
            let group_id = Group::id_for(i);
            let teams: Vec<Team> = shuffled[start..end]
                .iter()
                .map(|t| t.in_group(&group_id))
                .collect();
            let matches = round_robin(&teams, &group_id);
            Group::new(i, teams, matches)
        })
        .collect();

    tournament.matches = groups.iter().flat_map(|g| g.matches.iter().cloned()).collect();
    tournament.groups = groups;
    tournament.knockout_matches.clear();
    tournament.stage = TournamentStage::Groups;
    tournament.touch();

    log::info!(
        "Drew {} team(s) into {} group(s), {} group match(es)",
        tournament.teams.len(),
        tournament.groups.len(),
        tournament.matches.len()
    );
    Ok(())
}

/// Every unordered pair of `teams` exactly once, in (j, k) order with j < k.
pub fn round_robin(teams: &[Team], group_id: &str) -> Vec<GameMatch> {
    let mut matches = Vec::with_capacity(teams.len() * teams.len().saturating_sub(1) / 2);
    for (j, a) in teams.iter().enumerate() {
        for b in &teams[j + 1..] {
            matches.push(GameMatch::group(a.clone(), b.clone(), group_id));
        }
    }
    matches
}
