//! Group standings: played / wins / points per team, ranked by points.

use crate::models::{Group, Team};
use serde::Serialize;

/// One row of a group table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TeamStanding {
    pub team: Team,
    pub played: u32,
    pub wins: u32,
    pub points: u32,
}

impl TeamStanding {
    fn new(team: &Team) -> Self {
        Self {
            team: team.clone(),
            played: 0,
            wins: 0,
            points: 0,
        }
    }
}

/// Compute the ranked table for a group.
///
/// A played fixture gives both teams +1 played and the winner +1 win and +1 point.
/// A played tiebreaker gives the winner +1 point only. Teams not in the group
/// (placeholders included) never accrue anything. Sorted by points descending;
/// the sort is stable, so level teams keep group order.
pub fn compute_standings(group: &Group) -> Vec<TeamStanding> {
    let mut standings: Vec<TeamStanding> = group.teams.iter().map(TeamStanding::new).collect();

    let index_of = |standings: &[TeamStanding], id: &str| {
        standings.iter().position(|s| s.team.id == id)
    };

    for m in &group.matches {
        let Some(winner) = &m.winner else { continue };
        for id in [&m.team_a.id, &m.team_b.id] {
            if let Some(i) = index_of(&standings, id) {
                standings[i].played += 1;
            }
        }
        if let Some(i) = index_of(&standings, &winner.id) {
            standings[i].wins += 1;
            standings[i].points += 1;
        }
    }

    for m in &group.tiebreakers {
        let Some(winner) = &m.winner else { continue };
        if let Some(i) = index_of(&standings, &winner.id) {
            standings[i].points += 1;
        }
    }

    standings.sort_by(|a, b| b.points.cmp(&a.points));
    standings
}
