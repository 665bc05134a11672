//! Group: a round-robin pool of teams.

use crate::models::game::GameMatch;
use crate::models::team::Team;
use serde::{Deserialize, Serialize};

/// Identifier for a group, `"group-<n>"` (1-based).
pub type GroupId = String;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Display name: "Group A", "Group B", ...
    pub name: String,
    pub teams: Vec<Team>,
    /// Every unordered pair of `teams`, exactly once.
    pub matches: Vec<GameMatch>,
    /// Append-only list of matches created to break standings ties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiebreakers: Vec<GameMatch>,
}

impl Group {
    /// Group at 0-based draw index `index`.
    pub fn new(index: usize, teams: Vec<Team>, matches: Vec<GameMatch>) -> Self {
        Self {
            id: Self::id_for(index),
            name: Self::name_for(index),
            teams,
            matches,
            tiebreakers: Vec::new(),
        }
    }

    pub fn id_for(index: usize) -> GroupId {
        format!("group-{}", index + 1)
    }

    pub fn name_for(index: usize) -> String {
        let letter = (b'A' + (index % 26) as u8) as char;
        format!("Group {}", letter)
    }

    pub fn contains_team(&self, team_id: &str) -> bool {
        self.teams.iter().any(|t| t.id == team_id)
    }

    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    /// Regular fixtures followed by tiebreakers.
    pub fn all_matches(&self) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().chain(self.tiebreakers.iter())
    }
}
