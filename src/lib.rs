//! PaddleScore Core Library
//!
//! Models and synchronization logic for the PaddleScore table-tennis score
//! tracker. Devices keep local snapshots of two collections, Players and
//! Games, and reconcile them through a shared jsonbin-style document store
//! that offers nothing beyond whole-document GET and PUT.
//!
//! The Games collection is an append-only log and the source of truth;
//! player aggregates are derived from it and can always be rebuilt. See
//! [`reconcile`] for the merge algorithms, [`sync::SyncEngine`] for the
//! orchestration, and [`stats`] for derived leaderboard views.

pub mod config;
pub mod models;
pub mod reconcile;
pub mod remote;
pub mod snapshot;
pub mod stats;
pub mod sync;

pub use config::{ConfigError, SyncConfig};
pub use models::{Game, GameSide, Player};
pub use remote::{JsonBinClient, RemoteStore, StoreError};
pub use snapshot::{SnapshotError, SnapshotStore};
pub use sync::{SyncEngine, SyncError, SyncOutcome, SyncReport};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
