//! Player data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a player. Real players get a UUID string; placeholders use `"tbd"`.
pub type PlayerId = String;

/// A player on a team. Immutable once created apart from renames during team setup.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a new player with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }

    /// Stand-in player carried by TBD and BYE teams.
    pub fn placeholder() -> Self {
        Self {
            id: "tbd".to_string(),
            name: "TBD".to_string(),
        }
    }
}
