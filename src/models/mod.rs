//! Data structures for the doubles tournament: players, teams, matches, groups, tournament state.

mod game;
mod group;
mod player;
mod team;
mod tournament;

pub use game::{GameMatch, MatchId, RoundType, Side};
pub use group::{Group, GroupId};
pub use player::{Player, PlayerId};
pub use team::{Team, TeamId};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentStage};
