//! Remote document-store access.
//!
//! The orchestrator only sees the [`RemoteStore`] trait, so tests (and any
//! future backend) can swap in a mock store. [`JsonBinClient`] is the real
//! HTTP implementation.

mod client;

pub use client::JsonBinClient;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// A named remote collection of JSON records.
///
/// `fetch` returns the whole collection; `push` replaces it wholesale (the
/// store has no partial updates), so callers must merge everything they want
/// preserved before pushing.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Fetches all records in a collection.
    ///
    /// An uninitialized collection decodes as empty; transport failures and
    /// non-200 responses are errors, never a silent empty result.
    async fn fetch<T: DeserializeOwned>(&self, bin: &str) -> Result<Vec<T>, StoreError>;

    /// Replaces the entire remote collection.
    async fn push<T: Serialize>(&self, bin: &str, records: &[T]) -> Result<(), StoreError>;

    /// Drops any cached reads so the next fetch hits the network.
    fn invalidate(&self);
}

/// Errors talking to the remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-200 response; the status code is kept for diagnostics.
    #[error("server returned status {0}")]
    Status(u16),
    #[error("unexpected response shape: {0}")]
    Decode(String),
}
