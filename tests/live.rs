//! Integration tests for the shared live tournament and its persistence.

use doubles_tournament_web::{Command, JsonFileStore, LiveTournament, RoundType, TournamentError};
use std::sync::Arc;

fn create(teams: u32, groups: u32) -> Command {
    Command::CreateTournament {
        name: "Club Cup".to_string(),
        number_of_teams: teams,
        number_of_groups: groups,
    }
}

fn add_team(i: usize) -> Command {
    Command::AddTeam {
        name: format!("Team {i}"),
        players: [format!("P{i}a"), format!("P{i}b")],
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_commands_leave_the_latest_snapshot_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tournament.json");
    let live = Arc::new(LiveTournament::new(None, JsonFileStore::new(&path)));
    live.apply(create(32, 4)).await.unwrap();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let live = Arc::clone(&live);
            tokio::spawn(async move { live.apply(add_team(i)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let in_memory = live.snapshot().await;
    assert_eq!(in_memory.as_ref().map(|t| t.teams.len()), Some(32));
    assert_eq!(JsonFileStore::new(&path).load().unwrap(), in_memory);
}

#[tokio::test]
async fn rejected_command_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tournament.json");
    let live = LiveTournament::new(None, JsonFileStore::new(&path));

    assert_eq!(
        live.apply(Command::GenerateGroups).await,
        Err(TournamentError::InvalidState)
    );
    assert!(!path.exists());
    assert!(live.snapshot().await.is_none());
}

#[tokio::test]
async fn bye_matches_are_awarded_after_each_command() {
    let dir = tempfile::tempdir().unwrap();
    let live = LiveTournament::new(None, JsonFileStore::new(dir.path().join("tournament.json")));
    live.apply(create(3, 1)).await.unwrap();
    for i in 0..3 {
        live.apply(add_team(i)).await.unwrap();
    }
    live.apply(Command::GenerateGroups).await.unwrap();
    let group_matches: Vec<_> = live
        .read(|t| {
            t.unwrap()
                .matches
                .iter()
                .map(|m| (m.id, m.team_a.id.clone()))
                .collect()
        })
        .await;
    for (match_id, team_id) in group_matches {
        live.apply(Command::SetMatchWinner { match_id, team_id })
            .await
            .unwrap();
    }

    // 3 advance: semifinals with one BYE, already decided.
    let t = live.apply(Command::FinishGroupStage).await.unwrap().unwrap();
    let semis: Vec<_> = t
        .knockout_matches
        .iter()
        .filter(|m| m.round == RoundType::Semifinal)
        .collect();
    let bye = semis.iter().find(|m| m.is_bye()).unwrap();
    assert!(bye.winner.as_ref().is_some_and(|w| !w.is_placeholder()));
    let reloaded = LiveTournament::load(live.store().clone()).unwrap();
    assert_eq!(reloaded.snapshot().await, Some(t));
}
