//! Tie detection at the advancement cutoff and tiebreaker match creation.

use crate::logic::qualification::Qualification;
use crate::logic::standings::{compute_standings, TeamStanding};
use crate::models::{
    GameMatch, Group, MatchId, Team, TeamId, Tournament, TournamentError, TournamentStage,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// How many teams each group sends to the knockout stage.
///
/// Aims for an 8-team bracket (`ceil(8 / groups)`); if groups are too small for that,
/// aims for 4 (`ceil(4 / groups)`). Always at least 1.
pub fn teams_to_advance_per_group(total_teams: usize, number_of_groups: usize) -> usize {
    if number_of_groups == 0 {
        return 1;
    }
    let mut per_group = 8usize.div_ceil(number_of_groups);
    if per_group > total_teams / number_of_groups {
        per_group = 4usize.div_ceil(number_of_groups);
    }
    per_group.max(1)
}

/// Per-group target capped at the group's size.
pub fn advancing_count(group: &Group, per_group: usize) -> usize {
    per_group.min(group.teams.len())
}

/// Per-group target for the tournament's current draw.
pub fn tournament_advance_per_group(tournament: &Tournament) -> usize {
    teams_to_advance_per_group(tournament.teams.len(), tournament.groups.len())
}

/// Every cluster of teams level on points, keyed by the 1-based position of the
/// first team of the cluster. Expects `standings` sorted as [`compute_standings`] returns.
pub fn find_tied_positions(standings: &[TeamStanding]) -> BTreeMap<usize, Vec<TeamStanding>> {
    let mut tied = BTreeMap::new();
    let mut start = 0;
    while start < standings.len() {
        let points = standings[start].points;
        let end = standings[start..]
            .iter()
            .position(|s| s.points != points)
            .map_or(standings.len(), |offset| start + offset);
        if end - start > 1 {
            tied.insert(start + 1, standings[start..end].to_vec());
        }
        start = end;
    }
    tied
}

/// True if the last advancing team is level on points with the first eliminated one.
pub fn is_tie_at_cutoff(standings: &[TeamStanding], advancing: usize) -> bool {
    if advancing == 0 || advancing >= standings.len() {
        return false;
    }
    standings[advancing - 1].points == standings[advancing].points
}

/// Standings plus tie information for one group.
#[derive(Clone, Debug, Serialize)]
pub struct GroupSummary {
    pub group_id: String,
    pub group_name: String,
    pub advancing_count: usize,
    pub standings: Vec<TeamStanding>,
    pub tied_positions: BTreeMap<usize, Vec<TeamStanding>>,
    pub tie_at_cutoff: bool,
    pub unplayed_tiebreakers: usize,
}

pub fn group_summary(group: &Group, per_group: usize) -> GroupSummary {
    let standings = compute_standings(group);
    let advancing = advancing_count(group, per_group);
    GroupSummary {
        group_id: group.id.clone(),
        group_name: group.name.clone(),
        advancing_count: advancing,
        tied_positions: find_tied_positions(&standings),
        tie_at_cutoff: is_tie_at_cutoff(&standings, advancing),
        unplayed_tiebreakers: group.tiebreakers.iter().filter(|m| !m.is_played()).count(),
        standings,
    }
}

/// Append one tiebreaker between two teams of a group, to the group and the flat match list.
pub fn create_tiebreaker_match(
    tournament: &mut Tournament,
    group_id: &str,
    team_a: &str,
    team_b: &str,
    position: Option<u32>,
) -> Result<MatchId, TournamentError> {
    create_tiebreakers(tournament, group_id, &[(team_a, team_b)], position)?
        .into_iter()
        .next()
        .ok_or(TournamentError::NotEnoughTiedTeams)
}

/// Tiebreaker round robin for `N` tied teams: `N * (N - 1) / 2` matches.
pub fn create_tiebreakers_for_tie(
    tournament: &mut Tournament,
    group_id: &str,
    position: Option<u32>,
    team_ids: &[TeamId],
) -> Result<Vec<MatchId>, TournamentError> {
    let distinct = distinct_ids(team_ids)?;
    create_tiebreakers(tournament, group_id, &round_robin_pairs(&distinct), position)
}

/// Tiebreaker round robin among teams of different groups level for the last knockout places
/// (see [`TournamentError::TieAcrossGroups`]). The matches belong to no group: they rank the
/// contenders against each other and never change a group table.
pub fn create_cross_group_tiebreakers(
    tournament: &mut Tournament,
    team_ids: &[TeamId],
) -> Result<Vec<MatchId>, TournamentError> {
    if tournament.stage != TournamentStage::Groups {
        return Err(TournamentError::InvalidState);
    }
    let distinct = distinct_ids(team_ids)?;
    let teams = distinct
        .iter()
        .map(|&id| {
            tournament
                .groups
                .iter()
                .find_map(|g| g.team(id))
                .ok_or_else(|| TournamentError::TeamNotFound(id.to_string()))
        })
        .collect::<Result<Vec<&Team>, _>>()?;

    let mut created = Vec::new();
    for (i, a) in teams.iter().enumerate() {
        for b in &teams[i + 1..] {
            created.push(GameMatch::cross_group_tiebreaker((*a).clone(), (*b).clone(), None));
        }
    }

    let ids: Vec<MatchId> = created.iter().map(|m| m.id).collect();
    tournament.matches.extend(created);
    tournament.touch();

    log::info!("Created {} cross-group tiebreaker(s)", ids.len());
    Ok(ids)
}

fn distinct_ids(team_ids: &[TeamId]) -> Result<Vec<&str>, TournamentError> {
    let mut distinct: Vec<&str> = Vec::with_capacity(team_ids.len());
    for id in team_ids {
        if !distinct.contains(&id.as_str()) {
            distinct.push(id.as_str());
        }
    }
    if distinct.len() < 2 {
        return Err(TournamentError::NotEnoughTiedTeams);
    }
    Ok(distinct)
}

fn round_robin_pairs<'a>(ids: &[&'a str]) -> Vec<(&'a str, &'a str)> {
    let mut pairs = Vec::new();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            pairs.push((*a, *b));
        }
    }
    pairs
}

fn create_tiebreakers(
    tournament: &mut Tournament,
    group_id: &str,
    pairs: &[(&str, &str)],
    position: Option<u32>,
) -> Result<Vec<MatchId>, TournamentError> {
    if tournament.stage != TournamentStage::Groups {
        return Err(TournamentError::InvalidState);
    }
    let group = tournament
        .group(group_id)
        .ok_or_else(|| TournamentError::GroupNotFound(group_id.to_string()))?;

    let mut created = Vec::with_capacity(pairs.len());
    for &(a, b) in pairs {
        if a == b {
            return Err(TournamentError::NotEnoughTiedTeams);
        }
        let team_a = group
            .team(a)
            .ok_or_else(|| TournamentError::TeamNotFound(a.to_string()))?;
        let team_b = group
            .team(b)
            .ok_or_else(|| TournamentError::TeamNotFound(b.to_string()))?;
        created.push(GameMatch::tiebreaker(
            team_a.clone(),
            team_b.clone(),
            group_id,
            position,
        ));
    }

    let ids: Vec<MatchId> = created.iter().map(|m| m.id).collect();
    tournament.matches.extend(created.iter().cloned());
    if let Some(group) = tournament.group_mut(group_id) {
        group.tiebreakers.extend(created);
    }
    tournament.touch();

    log::info!(
        "Created {} tiebreaker(s) in {} for position {:?}",
        ids.len(),
        group_id,
        position
    );
    Ok(ids)
}

/// Gate for leaving the group stage.
///
/// Fails with the first blocking reason: an unplayed group match, an unplayed tiebreaker,
/// teams level on points at a group's cutoff (tiebreaker points included), or teams from
/// different groups level for the last knockout places.
///
/// When the groups would send more teams than the bracket holds, each group has two cutoffs:
/// below its direct places, and below the team it puts forward for the remaining places.
pub fn check_group_stage_complete(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.groups.is_empty() {
        return Err(TournamentError::NoGroups);
    }
    if tournament
        .groups
        .iter()
        .flat_map(|g| g.matches.iter())
        .any(|m| !m.is_played())
    {
        return Err(TournamentError::IncompleteResults);
    }
    let cross_group = tournament.matches.iter().filter(|m| m.is_cross_group_tiebreaker());
    if tournament
        .groups
        .iter()
        .flat_map(|g| g.tiebreakers.iter())
        .chain(cross_group)
        .any(|m| !m.is_played())
    {
        return Err(TournamentError::UnplayedTiebreakers);
    }

    let qualification = Qualification::for_tournament(tournament);
    let contested = qualification.open > 0;
    for (group, (direct, standings)) in tournament.groups.iter().zip(&qualification.tables) {
        if is_tie_at_cutoff(standings, *direct)
            || (contested && is_tie_at_cutoff(standings, direct + 1))
        {
            return Err(TournamentError::TieAtCutoff {
                group_id: group.id.clone(),
            });
        }
    }

    let tied = qualification.tied_at_cut();
    if !tied.is_empty() {
        return Err(TournamentError::TieAcrossGroups { team_ids: tied });
    }
    Ok(())
}
