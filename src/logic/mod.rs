//! Tournament business logic: setup, group draw, standings, tiebreaks, knockout bracket.

mod group_play;
mod knockout;
mod progression;
mod qualification;
mod setup;
mod standings;
mod tiebreak;

pub use group_play::{generate_groups, generate_groups_with_rng, round_robin};
pub use knockout::{
    build_bracket, finish_group_stage, finish_group_stage_with_rng, generate_knockout_stage,
    generate_knockout_stage_with_rng, select_advancing_teams, MAX_BRACKET_SIZE,
};
pub use progression::{
    champion, pending_bye_matches, record_match_score, resolve_byes, update_match_winner,
};
pub use setup::import_teams_csv;
pub use standings::{compute_standings, TeamStanding};
pub use tiebreak::{
    advancing_count, check_group_stage_complete, create_cross_group_tiebreakers,
    create_tiebreaker_match, create_tiebreakers_for_tie, find_tied_positions, group_summary,
    is_tie_at_cutoff, teams_to_advance_per_group, tournament_advance_per_group, GroupSummary,
};
