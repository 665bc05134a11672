//! Input checks for the form / API layer. The engine itself assumes these already hold.

pub const MIN_TEAMS: u32 = 2;
pub const MAX_TEAMS: u32 = 64;
pub const MIN_GROUPS: u32 = 1;
pub const MAX_GROUPS: u32 = 16;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    MissingTournamentName,
    TeamCountOutOfRange(u32),
    GroupCountOutOfRange(u32),
    MissingTeamName,
    /// 1-based player slot with a blank name.
    MissingPlayerName(usize),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingTournamentName => write!(f, "Tournament name is required"),
            ValidationError::TeamCountOutOfRange(n) => write!(
                f,
                "Number of teams must be between {} and {} (got {})",
                MIN_TEAMS, MAX_TEAMS, n
            ),
            ValidationError::GroupCountOutOfRange(n) => write!(
                f,
                "Number of groups must be between {} and {} (got {})",
                MIN_GROUPS, MAX_GROUPS, n
            ),
            ValidationError::MissingTeamName => write!(f, "Team name is required"),
            ValidationError::MissingPlayerName(slot) => {
                write!(f, "Player {} name is required", slot)
            }
        }
    }
}

pub fn validate_tournament_settings(
    name: &str,
    number_of_teams: u32,
    number_of_groups: u32,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingTournamentName);
    }
    if !(MIN_TEAMS..=MAX_TEAMS).contains(&number_of_teams) {
        return Err(ValidationError::TeamCountOutOfRange(number_of_teams));
    }
    if !(MIN_GROUPS..=MAX_GROUPS).contains(&number_of_groups) {
        return Err(ValidationError::GroupCountOutOfRange(number_of_groups));
    }
    Ok(())
}

pub fn validate_team_entry(name: &str, players: &[String; 2]) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingTeamName);
    }
    if let Some(slot) = players.iter().position(|p| p.trim().is_empty()) {
        return Err(ValidationError::MissingPlayerName(slot + 1));
    }
    Ok(())
}
