//! Snapshot reducer: `(Option<Tournament>, Command) -> Option<Tournament>`.

use crate::logic::{
    create_cross_group_tiebreakers, create_tiebreaker_match, create_tiebreakers_for_tie,
    finish_group_stage_with_rng, generate_groups_with_rng, generate_knockout_stage_with_rng,
    import_teams_csv, record_match_score, resolve_byes, update_match_winner,
};
use crate::models::{GroupId, MatchId, TeamId, Tournament, TournamentError};
use rand::Rng;
use serde::Deserialize;

/// One user intent against the live tournament.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    CreateTournament {
        name: String,
        number_of_teams: u32,
        number_of_groups: u32,
    },
    AddTeam {
        name: String,
        players: [String; 2],
    },
    UpdateTeam {
        team_id: TeamId,
        name: String,
        players: [String; 2],
    },
    RemoveTeam {
        team_id: TeamId,
    },
    /// CSV text with header `team,player_1,player_2`.
    ImportTeams {
        csv: String,
    },
    GenerateGroups,
    SetMatchWinner {
        match_id: MatchId,
        team_id: TeamId,
    },
    RecordScore {
        match_id: MatchId,
        score_a: u32,
        score_b: u32,
    },
    CreateTiebreaker {
        group_id: GroupId,
        team_a: TeamId,
        team_b: TeamId,
        #[serde(default)]
        position: Option<u32>,
    },
    CreateTiebreakersForTie {
        group_id: GroupId,
        #[serde(default)]
        position: Option<u32>,
        team_ids: Vec<TeamId>,
    },
    /// Teams from different groups level for the last knockout places.
    CreateCrossGroupTiebreakers {
        team_ids: Vec<TeamId>,
    },
    /// Ungated bracket generation.
    GenerateKnockoutStage,
    /// Gated: refuses while results, tiebreakers or a cutoff tie are outstanding.
    FinishGroupStage,
    ResolveByes,
    Reset,
}

/// Apply a command in place. The snapshot is only replaced when the command succeeds.
pub fn apply_command(
    snapshot: &mut Option<Tournament>,
    command: Command,
    rng: &mut impl Rng,
) -> Result<(), TournamentError> {
    match command {
        Command::CreateTournament {
            name,
            number_of_teams,
            number_of_groups,
        } => {
            let t = Tournament::new(name, number_of_teams, number_of_groups);
            log::info!("Created tournament {} ({})", t.name, t.id);
            *snapshot = Some(t);
            Ok(())
        }
        Command::Reset => {
            log::info!("Tournament reset");
            *snapshot = None;
            Ok(())
        }
        command => {
            let mut tournament = snapshot.clone().ok_or(TournamentError::InvalidState)?;
            apply_to_tournament(&mut tournament, command, rng)?;
            *snapshot = Some(tournament);
            Ok(())
        }
    }
}

fn apply_to_tournament(
    tournament: &mut Tournament,
    command: Command,
    rng: &mut impl Rng,
) -> Result<(), TournamentError> {
    match command {
        Command::CreateTournament { .. } | Command::Reset => Err(TournamentError::InvalidState),
        Command::AddTeam { name, players } => tournament
            .add_team(name, [players[0].as_str(), players[1].as_str()])
            .map(|_| ()),
        Command::UpdateTeam {
            team_id,
            name,
            players,
        } => tournament.update_team(&team_id, name, [players[0].as_str(), players[1].as_str()]),
        Command::RemoveTeam { team_id } => tournament.remove_team(&team_id),
        Command::ImportTeams { csv } => import_teams_csv(tournament, csv.as_bytes()).map(|_| ()),
        Command::GenerateGroups => generate_groups_with_rng(tournament, rng),
        Command::SetMatchWinner { match_id, team_id } => {
            update_match_winner(tournament, match_id, &team_id)
        }
        Command::RecordScore {
            match_id,
            score_a,
            score_b,
        } => record_match_score(tournament, match_id, score_a, score_b),
        Command::CreateTiebreaker {
            group_id,
            team_a,
            team_b,
            position,
        } => create_tiebreaker_match(tournament, &group_id, &team_a, &team_b, position).map(|_| ()),
        Command::CreateTiebreakersForTie {
            group_id,
            position,
            team_ids,
        } => create_tiebreakers_for_tie(tournament, &group_id, position, &team_ids).map(|_| ()),
        Command::CreateCrossGroupTiebreakers { team_ids } => {
            create_cross_group_tiebreakers(tournament, &team_ids).map(|_| ())
        }
        Command::GenerateKnockoutStage => generate_knockout_stage_with_rng(tournament, rng),
        Command::FinishGroupStage => finish_group_stage_with_rng(tournament, rng),
        Command::ResolveByes => resolve_byes(tournament).map(|_| ()),
    }
}

/// Pure reducer. A rejected command logs a warning and returns the input unchanged.
pub fn reduce(
    snapshot: Option<Tournament>,
    command: Command,
    rng: &mut impl Rng,
) -> Option<Tournament> {
    let mut next = snapshot;
    if let Err(e) = apply_command(&mut next, command, rng) {
        log::warn!("Command rejected: {}", e);
    }
    next
}
