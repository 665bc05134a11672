//! Team setup: bulk import of teams from CSV.

use crate::models::{Team, TeamId, Tournament, TournamentError, TournamentStage};
use serde::Deserialize;
use std::io::Read;

/// One CSV row: `team,player_1,player_2`.
#[derive(Debug, Deserialize)]
struct TeamRow {
    team: String,
    player_1: String,
    player_2: String,
}

/// Add every team listed in a CSV document with header `team,player_1,player_2`.
///
/// All-or-nothing: a malformed row or a blank name rejects the whole import.
/// Returns the ids of the added teams in file order.
pub fn import_teams_csv<R: Read>(
    tournament: &mut Tournament,
    reader: R,
) -> Result<Vec<TeamId>, TournamentError> {
    if !matches!(tournament.stage, TournamentStage::Setup | TournamentStage::Teams) {
        return Err(TournamentError::InvalidState);
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers().map_err(import_error)?.clone();

    let mut teams = Vec::new();
    let mut record = csv::StringRecord::new();
    while csv_reader.read_record(&mut record).map_err(import_error)? {
        let line = record.position().map_or(0, |p| p.line());
        let row: TeamRow = record
            .deserialize(Some(&headers))
            .map_err(|e| TournamentError::InvalidImport {
                line,
                reason: e.to_string(),
            })?;
        if row.team.is_empty() || row.player_1.is_empty() || row.player_2.is_empty() {
            return Err(TournamentError::InvalidImport {
                line,
                reason: "team and both player names are required".to_string(),
            });
        }
        teams.push(Team::new(row.team, [row.player_1.as_str(), row.player_2.as_str()]));
    }

    let ids = teams.iter().map(|t| t.id.clone()).collect();
    log::info!("Imported {} team(s) into {}", teams.len(), tournament.name);
    tournament.teams.extend(teams);
    tournament.touch();
    Ok(ids)
}

/// Line of the offending record as the csv reader reports it (1-based, header included).
fn import_error(e: csv::Error) -> TournamentError {
    TournamentError::InvalidImport {
        line: e.position().map_or(0, |p| p.line()),
        reason: e.to_string(),
    }
}
