//! Local snapshot storage for the last known collection state.
//!
//! One JSON file per key in a data directory: `players`, `games`, and
//! `lastSyncTime`. The orchestrator writes these as a side effect of
//! syncing; presentation code reads them directly for fast offline display.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{Game, Player};

const PLAYERS_KEY: &str = "players";
const GAMES_KEY: &str = "games";
const LAST_SYNC_KEY: &str = "lastSyncTime";

/// File-backed key-value store for collection snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path for a snapshot key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    /// Last known Players collection; empty if never synced.
    pub fn load_players(&self) -> Result<Vec<Player>, SnapshotError> {
        self.read_or_default(PLAYERS_KEY)
    }

    pub fn save_players(&self, players: &[Player]) -> Result<(), SnapshotError> {
        self.write(PLAYERS_KEY, &players)
    }

    /// Last known Games collection; empty if never synced.
    pub fn load_games(&self) -> Result<Vec<Game>, SnapshotError> {
        self.read_or_default(GAMES_KEY)
    }

    pub fn save_games(&self, games: &[Game]) -> Result<(), SnapshotError> {
        self.write(GAMES_KEY, &games)
    }

    /// Epoch milliseconds of the last completed full sync.
    pub fn last_sync_time(&self) -> Result<Option<i64>, SnapshotError> {
        self.read_or_default(LAST_SYNC_KEY)
    }

    pub fn set_last_sync_time(&self, epoch_ms: i64) -> Result<(), SnapshotError> {
        self.write(LAST_SYNC_KEY, &epoch_ms)
    }

    /// Removes every persisted key. Missing files are not an error.
    pub fn clear(&self) -> Result<(), SnapshotError> {
        for key in [PLAYERS_KEY, GAMES_KEY, LAST_SYNC_KEY] {
            let path = self.path(key);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(SnapshotError::Io(path, e)),
            }
        }
        Ok(())
    }

    fn read_or_default<T>(&self, key: &str) -> Result<T, SnapshotError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(key);
        match fs::read(&path) {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Decode(path, e))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(SnapshotError::Io(path, e)),
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| SnapshotError::Io(self.data_dir.clone(), e))?;

        let path = self.path(key);
        let bytes =
            serde_json::to_vec(value).map_err(|e| SnapshotError::Encode(path.clone(), e))?;
        fs::write(&path, bytes).map_err(|e| SnapshotError::Io(path, e))?;
        Ok(())
    }
}

/// Errors reading or writing snapshot files.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error for {0}: {1}")]
    Io(PathBuf, io::Error),
    #[error("failed to decode snapshot {0}: {1}")]
    Decode(PathBuf, serde_json::Error),
    #[error("failed to encode snapshot {0}: {1}")]
    Encode(PathBuf, serde_json::Error),
}
