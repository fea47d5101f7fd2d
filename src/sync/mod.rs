//! Sync orchestration against the shared document store.
//!
//! The engine decides when to talk to the remote store, sequences
//! fetch → merge → push for both collections, and exposes the mutation
//! operations that must themselves round-trip through the store.

mod engine;
mod error;

pub use engine::{SyncEngine, SyncOutcome, SyncReport};
pub use error::SyncError;
