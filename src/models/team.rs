//! Team: exactly two players, plus the TBD / BYE bracket placeholders.

use crate::models::group::GroupId;
use crate::models::player::Player;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a team. Placeholders use `"tbd"` or `"tbd-<uuid>"`.
pub type TeamId = String;

const PLACEHOLDER_ID: &str = "tbd";
const PLACEHOLDER_PREFIX: &str = "tbd-";
const BYE_NAME: &str = "BYE";

/// A two-player team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: [Player; 2],
    /// Set once when groups are drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

impl Team {
    /// Create a new team with fresh ids for the team and both players.
    pub fn new(name: impl Into<String>, player_names: [&str; 2]) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            players: [Player::new(player_names[0]), Player::new(player_names[1])],
            group_id: None,
        }
    }

    /// Slot waiting for the winner of an earlier bracket match.
    pub fn tbd() -> Self {
        Self {
            id: PLACEHOLDER_ID.to_string(),
            name: "TBD".to_string(),
            players: [Player::placeholder(), Player::placeholder()],
            group_id: None,
        }
    }

    /// Synthetic opponent used to pad the bracket. Always loses.
    pub fn bye() -> Self {
        Self {
            id: format!("{}{}", PLACEHOLDER_PREFIX, Uuid::new_v4()),
            name: BYE_NAME.to_string(),
            players: [Player::placeholder(), Player::placeholder()],
            group_id: None,
        }
    }

    /// True for TBD and BYE sentinels. These never accrue standings or win matches.
    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ID || self.id.starts_with(PLACEHOLDER_PREFIX)
    }

    /// Waiting on an earlier bracket match.
    pub fn is_tbd(&self) -> bool {
        self.id == PLACEHOLDER_ID
    }

    pub fn is_bye(&self) -> bool {
        self.is_placeholder() && self.name == BYE_NAME
    }

    /// Copy of this team stamped with its group.
    pub fn in_group(&self, group_id: &str) -> Self {
        Self {
            group_id: Some(group_id.to_string()),
            ..self.clone()
        }
    }
}
