//! The single live tournament shared by request handlers, persisted after every change.

use crate::command::{apply_command, Command};
use crate::logic::pending_bye_matches;
use crate::models::{Tournament, TournamentError};
use crate::store::{JsonFileStore, StoreError};
use tokio::sync::RwLock;

/// Live snapshot plus the file it is saved to.
///
/// A writer keeps the lock until its snapshot is on disk, so saves land in command order.
pub struct LiveTournament {
    snapshot: RwLock<Option<Tournament>>,
    store: JsonFileStore,
}

impl LiveTournament {
    pub fn new(snapshot: Option<Tournament>, store: JsonFileStore) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            store,
        }
    }

    /// Start from whatever the store holds.
    pub fn load(store: JsonFileStore) -> Result<Self, StoreError> {
        let snapshot = store.load()?;
        Ok(Self::new(snapshot, store))
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    pub async fn snapshot(&self) -> Option<Tournament> {
        self.snapshot.read().await.clone()
    }

    /// Run `f` against the current snapshot without copying it.
    pub async fn read<R>(&self, f: impl FnOnce(Option<&Tournament>) -> R) -> R {
        let guard = self.snapshot.read().await;
        f(guard.as_ref())
    }

    /// Apply a command, award any BYE matches it exposed, then persist.
    ///
    /// A rejected command changes nothing and writes nothing. A failed save is logged; the
    /// in-memory snapshot stays authoritative.
    pub async fn apply(&self, command: Command) -> Result<Option<Tournament>, TournamentError> {
        let mut guard = self.snapshot.write().await;
        {
            let mut rng = rand::thread_rng();
            apply_command(&mut *guard, command, &mut rng)?;
            let has_byes = guard
                .as_ref()
                .is_some_and(|t| !pending_bye_matches(t).is_empty());
            if has_byes {
                if let Err(e) = apply_command(&mut *guard, Command::ResolveByes, &mut rng) {
                    log::error!("Could not resolve bye matches: {}", e);
                }
            }
        }

        let snapshot = guard.clone();
        let store = self.store.clone();
        let to_save = snapshot.clone();
        match tokio::task::spawn_blocking(move || store.save(&to_save)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::error!("Failed to persist tournament: {}", e),
            Err(e) => log::error!("Persist task failed: {}", e),
        }
        drop(guard);
        Ok(snapshot)
    }
}
