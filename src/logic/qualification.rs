//! Who fills the knockout places for the current draw.
//!
//! Normally each group sends its top `per_group`. When that would overfill the bracket, each
//! group sends its top `per_group - 1` directly and the team ranked just below competes with
//! the other groups' for the places left.

use crate::logic::knockout::MAX_BRACKET_SIZE;
use crate::logic::standings::{compute_standings, TeamStanding};
use crate::logic::tiebreak::{advancing_count, tournament_advance_per_group};
use crate::models::{Team, TeamId, Tournament};
use std::collections::HashMap;

/// A team contesting the places left after the direct qualifiers.
pub(crate) struct Candidate<'a> {
    pub(crate) standing: &'a TeamStanding,
    /// Cross-group tiebreakers won.
    pub(crate) playoff_wins: u32,
}

impl Candidate<'_> {
    /// Regular group wins first, so in-group tiebreaker points never carry across groups.
    fn rank_key(&self) -> (u32, u32) {
        (self.standing.wins, self.playoff_wins)
    }
}

pub(crate) struct Qualification {
    /// Per group, in group order: places filled directly, and the ranked table.
    pub(crate) tables: Vec<(usize, Vec<TeamStanding>)>,
    /// Places decided across groups. Zero unless the groups would overfill the bracket.
    pub(crate) open: usize,
    playoff_wins: HashMap<TeamId, u32>,
}

impl Qualification {
    pub(crate) fn for_tournament(tournament: &Tournament) -> Self {
        let per_group = tournament_advance_per_group(tournament);
        let full: usize = tournament
            .groups
            .iter()
            .map(|g| advancing_count(g, per_group))
            .sum();
        let overfull = full > MAX_BRACKET_SIZE;
        let direct_per_group = if overfull { per_group - 1 } else { per_group };

        let tables: Vec<(usize, Vec<TeamStanding>)> = tournament
            .groups
            .iter()
            .map(|g| (advancing_count(g, direct_per_group), compute_standings(g)))
            .collect();
        let open = if overfull {
            let direct: usize = tables.iter().map(|(n, _)| n).sum();
            MAX_BRACKET_SIZE.saturating_sub(direct)
        } else {
            0
        };

        let mut playoff_wins = HashMap::new();
        for m in tournament.matches.iter().filter(|m| m.is_cross_group_tiebreaker()) {
            if let Some(winner) = &m.winner {
                *playoff_wins.entry(winner.id.clone()).or_insert(0) += 1;
            }
        }

        Self {
            tables,
            open,
            playoff_wins,
        }
    }

    /// The team just below each group's direct places, best first. Stable by group order.
    pub(crate) fn candidates(&self) -> Vec<Candidate<'_>> {
        if self.open == 0 {
            return Vec::new();
        }
        let mut candidates: Vec<Candidate<'_>> = self
            .tables
            .iter()
            .filter_map(|(direct, standings)| standings.get(*direct))
            .map(|standing| Candidate {
                standing,
                playoff_wins: self.playoff_wins.get(&standing.team.id).copied().unwrap_or(0),
            })
            .collect();
        candidates.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));
        candidates
    }

    /// Direct qualifiers group by group, then the admitted candidates.
    pub(crate) fn advancing_teams(&self) -> Vec<Team> {
        let mut teams: Vec<Team> = self
            .tables
            .iter()
            .flat_map(|(direct, standings)| standings.iter().take(*direct).map(|s| s.team.clone()))
            .collect();
        teams.extend(
            self.candidates()
                .into_iter()
                .take(self.open)
                .map(|c| c.standing.team.clone()),
        );
        teams
    }

    /// Candidates level with the last admitted one when that level also holds the first
    /// rejected one. Empty when the cut is clean.
    pub(crate) fn tied_at_cut(&self) -> Vec<TeamId> {
        let candidates = self.candidates();
        if self.open == 0 || self.open >= candidates.len() {
            return Vec::new();
        }
        let last_in = candidates[self.open - 1].rank_key();
        if last_in != candidates[self.open].rank_key() {
            return Vec::new();
        }
        candidates
            .iter()
            .filter(|c| c.rank_key() == last_in)
            .map(|c| c.standing.team.id.clone())
            .collect()
    }
}
