//! Match results and bracket progression.

use crate::models::{GameMatch, MatchId, RoundType, Side, Team, TeamId, Tournament, TournamentError};

/// Set the winner of any match (group, tiebreaker or knockout), by team id.
///
/// Valid at any stage and any number of times; choosing another team corrects the result.
/// Clears any recorded score on the match. For a knockout match the winner moves into the
/// next round: position `p` among its round fills slot A of next-round match `p / 2` when
/// `p` is even, slot B when odd. A knockout match is only decided once both slots hold a team
/// or a BYE; a TBD slot gives [`TournamentError::UndecidedOpponent`].
pub fn update_match_winner(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner_id: &str,
) -> Result<(), TournamentError> {
    set_result(tournament, match_id, winner_id, None)
}

/// Record a score; the higher score wins. Equal scores are rejected.
pub fn record_match_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    score_a: u32,
    score_b: u32,
) -> Result<(), TournamentError> {
    let m = tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if score_a == score_b {
        return Err(TournamentError::DrawNotAllowed);
    }
    let winner_id = if score_a > score_b {
        m.team_a.id.clone()
    } else {
        m.team_b.id.clone()
    };
    set_result(tournament, match_id, &winner_id, Some((score_a, score_b)))
}

fn set_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner_id: &str,
    scores: Option<(u32, u32)>,
) -> Result<(), TournamentError> {
    let m = tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let side = m
        .side_of(winner_id)
        .ok_or_else(|| TournamentError::TeamNotInMatch(winner_id.to_string()))?;
    let winner = m.team(side).clone();
    if winner.is_placeholder() {
        return Err(TournamentError::PlaceholderWinner);
    }
    if m.team_a.is_tbd() || m.team_b.is_tbd() {
        return Err(TournamentError::UndecidedOpponent);
    }
    let round = m.round;

    let (score_a, score_b) = scores.unzip();
    tournament.for_each_match_copy(match_id, |m| {
        m.winner = Some(winner.clone());
        m.score_a = score_a;
        m.score_b = score_b;
    });
    log::debug!("Match {} ({:?}) won by {}", match_id, round, winner.name);

    if round.is_knockout() {
        advance_winner(&mut tournament.knockout_matches, match_id, round, winner);
    }
    tournament.touch();
    Ok(())
}

/// Move a knockout winner into its next-round slot.
fn advance_winner(knockout: &mut [GameMatch], match_id: MatchId, round: RoundType, winner: Team) {
    let Some(next_round) = round.next() else { return };
    let Some(position) = knockout
        .iter()
        .filter(|m| m.round == round)
        .position(|m| m.id == match_id)
    else {
        return;
    };
    fill_slot(knockout, next_round, position / 2, slot_for(position), winner);
}

fn slot_for(position: usize) -> Side {
    if position % 2 == 0 {
        Side::A
    } else {
        Side::B
    }
}

/// Put `team` into a slot. If the slot changes and the match already had a winner, that
/// result is stale: clear it and reset the slot it fed in the following round to TBD.
fn fill_slot(knockout: &mut [GameMatch], round: RoundType, index: usize, side: Side, team: Team) {
    let had_winner = {
        let Some(target) = knockout.iter_mut().filter(|m| m.round == round).nth(index) else {
            return;
        };
        if target.team(side).id == team.id {
            return;
        }
        *target.team_mut(side) = team;
        target.score_a = None;
        target.score_b = None;
        target.winner.take().is_some()
    };
    if had_winner {
        if let Some(following) = round.next() {
            fill_slot(knockout, following, index / 2, slot_for(index), Team::tbd());
        }
    }
}

/// Unplayed knockout matches against a BYE, with the team that wins them.
pub fn pending_bye_matches(tournament: &Tournament) -> Vec<(MatchId, TeamId)> {
    tournament
        .knockout_matches
        .iter()
        .filter(|m| !m.is_played())
        .filter_map(|m| m.bye_winner().map(|t| (m.id, t.id.clone())))
        .collect()
}

/// Award every BYE match to the real team and advance it. Returns how many were resolved.
pub fn resolve_byes(tournament: &mut Tournament) -> Result<usize, TournamentError> {
    let mut resolved = 0;
    loop {
        let pending = pending_bye_matches(tournament);
        if pending.is_empty() {
            break;
        }
        for (match_id, winner_id) in pending {
            update_match_winner(tournament, match_id, &winner_id)?;
            resolved += 1;
        }
    }
    if resolved > 0 {
        log::info!("Resolved {} bye match(es)", resolved);
    }
    Ok(resolved)
}

/// Winner of the final, once decided.
pub fn champion(tournament: &Tournament) -> Option<&Team> {
    tournament
        .knockout_matches
        .iter()
        .find(|m| m.round == RoundType::Final)
        .and_then(|m| m.winner.as_ref())
}
