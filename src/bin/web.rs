//! Single binary web server: JSON API over the live tournament snapshot.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! The snapshot is persisted to STORE_PATH (default tournament.json) after every change.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use doubles_tournament_web::{
    group_summary, tournament_advance_per_group, validate_team_entry,
    validate_tournament_settings, Command, GroupId, JsonFileStore, LiveTournament, MatchId, TeamId,
};
use serde::Deserialize;

type State = Data<LiveTournament>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    number_of_teams: u32,
    number_of_groups: u32,
}

#[derive(Deserialize)]
struct TeamBody {
    name: String,
    players: [String; 2],
}

#[derive(Deserialize)]
struct SetMatchWinnerBody {
    match_id: MatchId,
    team_id: TeamId,
}

#[derive(Deserialize)]
struct ScoreBody {
    match_id: MatchId,
    score_a: u32,
    score_b: u32,
}

#[derive(Deserialize)]
struct TiebreakerBody {
    team_ids: Vec<TeamId>,
    #[serde(default)]
    position: Option<u32>,
}

#[derive(Deserialize)]
struct CrossGroupTiebreakerBody {
    team_ids: Vec<TeamId>,
}

#[derive(Deserialize)]
struct KnockoutQuery {
    /// Skip the group-stage completion check.
    #[serde(default)]
    force: bool,
}

/// Path segment: team id (e.g. /api/tournament/teams/{team_id})
#[derive(Deserialize)]
struct TeamPath {
    team_id: TeamId,
}

/// Path segment: group id (e.g. /api/tournament/groups/{group_id}/standings)
#[derive(Deserialize)]
struct GroupPath {
    group_id: GroupId,
}

fn bad_request(message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.to_string() }))
}

/// Apply a command (BYE matches are awarded and the snapshot saved) and return the snapshot.
async fn run_command(state: &LiveTournament, command: Command) -> HttpResponse {
    match state.apply(command).await {
        Ok(snapshot) => HttpResponse::Ok().json(&snapshot),
        Err(e) => {
            log::warn!("Command rejected: {}", e);
            bad_request(e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "doubles-tournament-web",
    })
}

/// Current tournament, or `null` if none has been created.
#[get("/api/tournament")]
async fn api_get_tournament(state: State) -> HttpResponse {
    state.read(|t| HttpResponse::Ok().json(t)).await
}

/// Create a new tournament, replacing any existing one.
#[post("/api/tournament")]
async fn api_create_tournament(state: State, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    if let Err(e) =
        validate_tournament_settings(&body.name, body.number_of_teams, body.number_of_groups)
    {
        return bad_request(e);
    }
    let command = Command::CreateTournament {
        name: body.name.trim().to_string(),
        number_of_teams: body.number_of_teams,
        number_of_groups: body.number_of_groups,
    };
    run_command(&state, command).await
}

/// Reset: drop the tournament.
#[delete("/api/tournament")]
async fn api_reset_tournament(state: State) -> HttpResponse {
    run_command(&state, Command::Reset).await
}

/// Add a team of two players (team setup only).
#[post("/api/tournament/teams")]
async fn api_add_team(state: State, body: Json<TeamBody>) -> HttpResponse {
    let body = body.into_inner();
    if let Err(e) = validate_team_entry(&body.name, &body.players) {
        return bad_request(e);
    }
    let command = Command::AddTeam {
        name: body.name.trim().to_string(),
        players: body.players.map(|p| p.trim().to_string()),
    };
    run_command(&state, command).await
}

/// Rename a team and its players (team setup only).
#[put("/api/tournament/teams/{team_id}")]
async fn api_update_team(state: State, path: Path<TeamPath>, body: Json<TeamBody>) -> HttpResponse {
    let body = body.into_inner();
    if let Err(e) = validate_team_entry(&body.name, &body.players) {
        return bad_request(e);
    }
    let command = Command::UpdateTeam {
        team_id: path.into_inner().team_id,
        name: body.name.trim().to_string(),
        players: body.players.map(|p| p.trim().to_string()),
    };
    run_command(&state, command).await
}

/// Remove a team (team setup only).
#[delete("/api/tournament/teams/{team_id}")]
async fn api_remove_team(state: State, path: Path<TeamPath>) -> HttpResponse {
    let command = Command::RemoveTeam {
        team_id: path.into_inner().team_id,
    };
    run_command(&state, command).await
}

/// Bulk add teams from a CSV body with header `team,player_1,player_2`.
#[post("/api/tournament/teams/import")]
async fn api_import_teams(state: State, body: String) -> HttpResponse {
    run_command(&state, Command::ImportTeams { csv: body }).await
}

/// Draw groups and round-robin fixtures. Calling again redraws from scratch.
#[post("/api/tournament/groups/generate")]
async fn api_generate_groups(state: State) -> HttpResponse {
    run_command(&state, Command::GenerateGroups).await
}

/// Standings, tied positions and cutoff status for one group.
#[get("/api/tournament/groups/{group_id}/standings")]
async fn api_group_standings(state: State, path: Path<GroupPath>) -> HttpResponse {
    let group_id = path.into_inner().group_id;
    state
        .read(|t| {
            let Some(t) = t else {
                return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }));
            };
            match t.group(&group_id) {
                Some(group) => {
                    HttpResponse::Ok().json(group_summary(group, tournament_advance_per_group(t)))
                }
                None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No such group" })),
            }
        })
        .await
}

/// Create tiebreakers among tied teams: one match per pair.
#[post("/api/tournament/groups/{group_id}/tiebreakers")]
async fn api_create_tiebreakers(
    state: State,
    path: Path<GroupPath>,
    body: Json<TiebreakerBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let command = Command::CreateTiebreakersForTie {
        group_id: path.into_inner().group_id,
        position: body.position,
        team_ids: body.team_ids,
    };
    run_command(&state, command).await
}

/// Create tiebreakers among teams of different groups level for the last knockout places.
#[post("/api/tournament/tiebreakers")]
async fn api_create_cross_group_tiebreakers(
    state: State,
    body: Json<CrossGroupTiebreakerBody>,
) -> HttpResponse {
    let command = Command::CreateCrossGroupTiebreakers {
        team_ids: body.into_inner().team_ids,
    };
    run_command(&state, command).await
}

/// Set (or change) the winner of any match.
#[put("/api/tournament/matches/winner")]
async fn api_set_match_winner(state: State, body: Json<SetMatchWinnerBody>) -> HttpResponse {
    let body = body.into_inner();
    let command = Command::SetMatchWinner {
        match_id: body.match_id,
        team_id: body.team_id,
    };
    run_command(&state, command).await
}

/// Record a score for any match; the higher score wins.
#[put("/api/tournament/matches/score")]
async fn api_record_score(state: State, body: Json<ScoreBody>) -> HttpResponse {
    let body = body.into_inner();
    let command = Command::RecordScore {
        match_id: body.match_id,
        score_a: body.score_a,
        score_b: body.score_b,
    };
    run_command(&state, command).await
}

/// Proceed to the knockout stage (`?force=true` skips the completion check).
#[post("/api/tournament/knockout")]
async fn api_generate_knockout(state: State, query: Query<KnockoutQuery>) -> HttpResponse {
    let command = if query.force {
        Command::GenerateKnockoutStage
    } else {
        Command::FinishGroupStage
    };
    run_command(&state, command).await
}

/// Settings read from the environment.
struct ServerConfig {
    host: String,
    port: u16,
    store_path: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            store_path: std::env::var("STORE_PATH").unwrap_or_else(|_| default_store_path()),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_store_path() -> String {
    "tournament.json".to_string()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = JsonFileStore::new(&config.store_path);
    let live = match LiveTournament::load(store.clone()) {
        Ok(live) => live,
        Err(e) => {
            log::error!("Ignoring unreadable snapshot {}: {}", store.path().display(), e);
            LiveTournament::new(None, store)
        }
    };
    if let Some(name) = live.read(|t| t.map(|t| t.name.clone())).await {
        log::info!("Loaded tournament {} from {}", name, live.store().path().display());
    }

    let state = Data::new(live);

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_get_tournament)
            .service(api_create_tournament)
            .service(api_reset_tournament)
            .service(api_import_teams)
            .service(api_add_team)
            .service(api_update_team)
            .service(api_remove_team)
            .service(api_generate_groups)
            .service(api_group_standings)
            .service(api_create_tiebreakers)
            .service(api_create_cross_group_tiebreakers)
            .service(api_set_match_winner)
            .service(api_record_score)
            .service(api_generate_knockout)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
