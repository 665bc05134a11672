//! Tournament, TournamentStage, and TournamentError.

use crate::models::game::{GameMatch, MatchId};
use crate::models::group::{Group, GroupId};
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
///
/// Operations check their preconditions before mutating, so an error always
/// leaves the tournament unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Need at least 2 teams (to draw groups or to seed a bracket).
    NotEnoughTeams,
    /// Groups have not been generated.
    NoGroups,
    TeamNotFound(TeamId),
    GroupNotFound(GroupId),
    MatchNotFound(MatchId),
    /// The chosen winner is not one of the two teams in the match.
    TeamNotInMatch(TeamId),
    /// TBD and BYE placeholders cannot win.
    PlaceholderWinner,
    /// A knockout match cannot be decided while one slot still waits on an earlier round.
    UndecidedOpponent,
    /// Equal scores; every match needs a winner.
    DrawNotAllowed,
    /// Not all group matches have a winner.
    IncompleteResults,
    /// A tiebreaker match has been created but not played.
    UnplayedTiebreakers,
    /// Teams are level on points at the advancement cutoff of a group.
    TieAtCutoff { group_id: GroupId },
    /// Teams from different groups are level for the last knockout places.
    TieAcrossGroups { team_ids: Vec<TeamId> },
    /// A tie needs at least two distinct teams from the group.
    NotEnoughTiedTeams,
    /// A CSV team import row was rejected (1-based line number).
    InvalidImport { line: u64, reason: String },
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::NotEnoughTeams => write!(f, "You need at least 2 teams"),
            TournamentError::NoGroups => write!(f, "Groups have not been generated"),
            TournamentError::TeamNotFound(id) => write!(f, "Team {} not found", id),
            TournamentError::GroupNotFound(id) => write!(f, "Group {} not found", id),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::TeamNotInMatch(id) => {
                write!(f, "Team {} is not playing in this match", id)
            }
            TournamentError::PlaceholderWinner => write!(f, "A TBD or BYE slot cannot win a match"),
            TournamentError::UndecidedOpponent => {
                write!(f, "Both teams must be known before this match can be decided")
            }
            TournamentError::DrawNotAllowed => write!(f, "Draws are not allowed"),
            TournamentError::IncompleteResults => write!(
                f,
                "All matches must be completed before advancing to the knockout stage"
            ),
            TournamentError::UnplayedTiebreakers => {
                write!(f, "All tiebreaker matches must be completed first")
            }
            TournamentError::TieAtCutoff { group_id } => write!(
                f,
                "There is a tie at the cutoff position in {}; a tiebreaker is required",
                group_id
            ),
            TournamentError::TieAcrossGroups { team_ids } => write!(
                f,
                "Teams {} are level for the last knockout places; a cross-group tiebreaker is required",
                team_ids.join(", ")
            ),
            TournamentError::NotEnoughTiedTeams => {
                write!(f, "A tiebreaker needs at least two teams from the group")
            }
            TournamentError::InvalidImport { line, reason } => {
                write!(f, "Invalid team on line {}: {}", line, reason)
            }
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStage {
    Setup,
    /// Adding teams. New tournaments start here.
    #[default]
    Teams,
    /// Round-robin groups drawn; results being entered.
    Groups,
    /// Knockout bracket generated.
    Bracket,
    /// Terminal; not entered by any operation.
    Completed,
}

/// Full tournament snapshot. Plain data, serializable as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub number_of_teams: u32,
    pub number_of_groups: u32,
    pub teams: Vec<Team>,
    pub groups: Vec<Group>,
    /// Every group match and tiebreaker, flattened in group order. Cross-group
    /// tiebreakers are stored only here.
    pub matches: Vec<GameMatch>,
    /// Bracket matches only: quarterfinals, then semifinals, then the final.
    pub knockout_matches: Vec<GameMatch>,
    pub stage: TournamentStage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create an empty tournament, ready for teams.
    pub fn new(name: impl Into<String>, number_of_teams: u32, number_of_groups: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            number_of_teams,
            number_of_groups,
            teams: Vec::new(),
            groups: Vec::new(),
            matches: Vec::new(),
            knockout_matches: Vec::new(),
            stage: TournamentStage::Teams,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn ensure_team_setup(&self) -> Result<(), TournamentError> {
        use TournamentStage::*;
        if !matches!(self.stage, Setup | Teams) {
            return Err(TournamentError::InvalidState);
        }
        Ok(())
    }

    /// Add a team of two players (Setup or Teams only). Returns the new team's id.
    pub fn add_team(
        &mut self,
        name: impl Into<String>,
        player_names: [&str; 2],
    ) -> Result<TeamId, TournamentError> {
        self.ensure_team_setup()?;
        let team = Team::new(name, player_names);
        let id = team.id.clone();
        self.teams.push(team);
        self.touch();
        Ok(id)
    }

    /// Rename a team and its players, keeping every id (Setup or Teams only).
    pub fn update_team(
        &mut self,
        team_id: &str,
        name: impl Into<String>,
        player_names: [&str; 2],
    ) -> Result<(), TournamentError> {
        self.ensure_team_setup()?;
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or_else(|| TournamentError::TeamNotFound(team_id.to_string()))?;
        team.name = name.into();
        for (player, new_name) in team.players.iter_mut().zip(player_names) {
            player.name = new_name.to_string();
        }
        self.touch();
        Ok(())
    }

    /// Remove a team by id (Setup or Teams only).
    pub fn remove_team(&mut self, team_id: &str) -> Result<(), TournamentError> {
        self.ensure_team_setup()?;
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or_else(|| TournamentError::TeamNotFound(team_id.to_string()))?;
        self.teams.remove(idx);
        self.touch();
        Ok(())
    }

    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn group_mut(&mut self, group_id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    /// Look a match up anywhere: flat list, bracket, or a group's fixtures and tiebreakers.
    pub fn find_match(&self, match_id: MatchId) -> Option<&GameMatch> {
        self.matches
            .iter()
            .chain(self.knockout_matches.iter())
            .chain(self.groups.iter().flat_map(|g| g.all_matches()))
            .find(|m| m.id == match_id)
    }

    /// Apply `f` to every stored copy of a match. Returns how many copies were updated.
    pub(crate) fn for_each_match_copy(
        &mut self,
        match_id: MatchId,
        mut f: impl FnMut(&mut GameMatch),
    ) -> usize {
        let mut updated = 0;
        let groups = self
            .groups
            .iter_mut()
            .flat_map(|g| g.matches.iter_mut().chain(g.tiebreakers.iter_mut()));
        for m in self
            .matches
            .iter_mut()
            .chain(self.knockout_matches.iter_mut())
            .chain(groups)
        {
            if m.id == match_id {
                f(m);
                updated += 1;
            }
        }
        updated
    }
}
