use thiserror::Error;
use uuid::Uuid;

use crate::remote::StoreError;
use crate::snapshot::SnapshotError;

/// Errors surfaced by the sync engine.
///
/// `DuplicateName` and `PlayerNotFound` are user-actionable validation
/// conditions, distinct from transport trouble. `PushFailed` names the
/// collection whose push failed when a multi-collection operation only
/// partially persisted.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync not configured; set api_key, players_bin and games_bin")]
    NotConfigured,
    #[error("a player named '{0}' already exists")]
    DuplicateName(String),
    #[error("player not found: {0}")]
    PlayerNotFound(Uuid),
    #[error("remote store error: {0}")]
    Store(#[from] StoreError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("push of the {collection} collection failed: {source}")]
    PushFailed {
        collection: &'static str,
        source: StoreError,
    },
}
