//! Doubles tournament web app: library with models, business logic, reducer, snapshot store
//! and the shared live tournament.

pub mod command;
pub mod live;
pub mod logic;
pub mod models;
pub mod store;
pub mod validation;

pub use command::{apply_command, reduce, Command};
pub use live::LiveTournament;
pub use logic::{
    advancing_count, build_bracket, champion, check_group_stage_complete, compute_standings,
    create_cross_group_tiebreakers, create_tiebreaker_match, create_tiebreakers_for_tie,
    find_tied_positions, finish_group_stage, finish_group_stage_with_rng, generate_groups,
    generate_groups_with_rng, generate_knockout_stage, generate_knockout_stage_with_rng,
    group_summary, import_teams_csv, is_tie_at_cutoff, pending_bye_matches, record_match_score,
    resolve_byes, round_robin, select_advancing_teams, teams_to_advance_per_group,
    tournament_advance_per_group, update_match_winner, GroupSummary, TeamStanding,
    MAX_BRACKET_SIZE,
};
pub use models::{
    GameMatch, Group, GroupId, MatchId, Player, PlayerId, RoundType, Side, Team, TeamId,
    Tournament, TournamentError, TournamentId, TournamentStage,
};
pub use store::{JsonFileStore, StoreError};
pub use validation::{validate_team_entry, validate_tournament_settings, ValidationError};
