use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::SyncError;
use crate::config::SyncConfig;
use crate::models::{Game, Player};
use crate::reconcile;
use crate::remote::{JsonBinClient, RemoteStore};
use crate::snapshot::SnapshotStore;

/// What a full sync did to each collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub players_pushed: bool,
    pub games_pushed: bool,
}

/// Result of a sync request.
///
/// `Skipped` is not an error: a concurrent full sync was already running, or
/// a smart sync was still inside its interval. Callers that need fresh data
/// after a `Skipped` must re-check or retry later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    Skipped,
}

/// Clears the single-flight flag when the sync finishes, error paths
/// included.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates synchronization between the local snapshots and the remote
/// document store.
///
/// All operations take `&self`; the only mutual exclusion is the
/// single-flight guard on full syncs. The mutating operations
/// (`add_player`, `delete_player`, `record_game`) are read-modify-write
/// against a store with no conditional writes, so a concurrent writer on
/// another device can be overwritten; [`SyncEngine::recalculate_stats`] is
/// the repair path for player counters.
pub struct SyncEngine<S: RemoteStore> {
    store: S,
    snapshots: SnapshotStore,
    config: SyncConfig,
    sync_in_flight: AtomicBool,
}

impl SyncEngine<JsonBinClient> {
    /// Builds an engine over the real HTTP client.
    ///
    /// Returns [`SyncError::NotConfigured`] when the access key or either
    /// bin id is missing.
    pub fn from_config(config: SyncConfig) -> Result<Self, SyncError> {
        if !config.is_configured() {
            return Err(SyncError::NotConfigured);
        }
        let store = JsonBinClient::new(&config.api_base, &config.api_key, config.cache_expiry());
        let snapshots = SnapshotStore::new(config.data_dir.clone());
        Ok(Self::new(store, snapshots, config))
    }
}

impl<S: RemoteStore> SyncEngine<S> {
    pub fn new(store: S, snapshots: SnapshotStore, config: SyncConfig) -> Self {
        Self {
            store,
            snapshots,
            config,
            sync_in_flight: AtomicBool::new(false),
        }
    }

    /// Local snapshot store, for presentation code that wants fast,
    /// offline-tolerant reads.
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Reconciles both collections with the remote store.
    ///
    /// Per collection: fetch remote, merge with the local snapshot, persist
    /// the merged result locally, and push it back only when the remote copy
    /// differs. At most one full sync runs at a time; a concurrent call
    /// returns [`SyncOutcome::Skipped`] immediately.
    pub async fn full_sync(&self) -> Result<SyncOutcome, SyncError> {
        let Some(_guard) = InFlightGuard::acquire(&self.sync_in_flight) else {
            debug!("full sync already in flight");
            return Ok(SyncOutcome::Skipped);
        };

        let players_pushed = self.sync_players().await?;
        let games_pushed = self.sync_games().await?;
        self.snapshots
            .set_last_sync_time(Utc::now().timestamp_millis())?;

        info!(players_pushed, games_pushed, "full sync completed");
        Ok(SyncOutcome::Completed(SyncReport {
            players_pushed,
            games_pushed,
        }))
    }

    /// Runs a full sync only when the last one is older than the configured
    /// interval. Bounds the call rate against the remote store.
    pub async fn smart_sync(&self) -> Result<SyncOutcome, SyncError> {
        let last = self.snapshots.last_sync_time()?.unwrap_or(0);
        let elapsed_ms = Utc::now().timestamp_millis().saturating_sub(last);
        if elapsed_ms <= self.config.sync_interval().as_millis() as i64 {
            debug!(elapsed_ms, "smart sync skipped, within interval");
            return Ok(SyncOutcome::Skipped);
        }
        self.full_sync().await
    }

    /// Drops the read cache and syncs unconditionally.
    pub async fn force_sync(&self) -> Result<SyncOutcome, SyncError> {
        self.store.invalidate();
        self.full_sync().await
    }

    /// Fetches the Players collection straight from the remote store and
    /// overwrites the local snapshot with it, no merge. On transport failure
    /// the last local snapshot is returned instead, trading correctness for
    /// availability.
    pub async fn load_players_remote(&self) -> Result<Vec<Player>, SyncError> {
        match self.store.fetch::<Player>(&self.config.players_bin).await {
            Ok(players) => {
                self.snapshots.save_players(&players)?;
                Ok(players)
            }
            Err(e) => {
                warn!(error = %e, "remote players fetch failed, serving local snapshot");
                Ok(self.snapshots.load_players()?)
            }
        }
    }

    /// Remote-authoritative load of the Games collection; see
    /// [`SyncEngine::load_players_remote`].
    pub async fn load_games_remote(&self) -> Result<Vec<Game>, SyncError> {
        match self.store.fetch::<Game>(&self.config.games_bin).await {
            Ok(games) => {
                self.snapshots.save_games(&games)?;
                Ok(games)
            }
            Err(e) => {
                warn!(error = %e, "remote games fetch failed, serving local snapshot");
                Ok(self.snapshots.load_games()?)
            }
        }
    }

    /// Creates a player with a fresh id and zeroed counters.
    ///
    /// Names are the merge key, so duplicates are rejected against the
    /// current remote collection before pushing.
    pub async fn add_player(&self, name: &str) -> Result<Player, SyncError> {
        let mut players = self.store.fetch::<Player>(&self.config.players_bin).await?;
        if players.iter().any(|p| p.name == name) {
            return Err(SyncError::DuplicateName(name.to_string()));
        }

        let player = Player::new(name);
        players.push(player.clone());
        self.store.push(&self.config.players_bin, &players).await?;
        self.snapshots.save_players(&players)?;

        info!(name, "player added");
        Ok(player)
    }

    /// Removes a player by id. Historical games are left untouched.
    pub async fn delete_player(&self, id: Uuid) -> Result<(), SyncError> {
        let mut players = self.store.fetch::<Player>(&self.config.players_bin).await?;
        let before = players.len();
        players.retain(|p| p.id != id);
        if players.len() == before {
            return Err(SyncError::PlayerNotFound(id));
        }

        self.store.push(&self.config.players_bin, &players).await?;
        self.snapshots.save_players(&players)?;

        info!(%id, "player deleted");
        Ok(())
    }

    /// Records a game result and applies the incremental stats update.
    ///
    /// Both collections are fetched and pushed concurrently, and both pushes
    /// are always attempted. If either push fails the operation fails, even
    /// though the other half may have persisted; the collections stay
    /// inconsistent until the next sync or recalculation repairs them.
    pub async fn record_game(
        &self,
        name1: &str,
        score1: u32,
        name2: &str,
        score2: u32,
    ) -> Result<Game, SyncError> {
        let (games_fetch, players_fetch) = tokio::join!(
            self.store.fetch::<Game>(&self.config.games_bin),
            self.store.fetch::<Player>(&self.config.players_bin),
        );
        let mut games = games_fetch?;
        let mut players = players_fetch?;

        let game = Game::new(name1, score1, name2, score2);
        games.insert(0, game.clone());
        reconcile::apply_game(&mut players, &game);

        // Local snapshots advance regardless of push outcome; the next full
        // sync carries forward whatever the store did not take.
        self.snapshots.save_games(&games)?;
        self.snapshots.save_players(&players)?;

        let (games_push, players_push) = tokio::join!(
            self.store.push(&self.config.games_bin, &games),
            self.store.push(&self.config.players_bin, &players),
        );
        if let Err(source) = games_push {
            return Err(SyncError::PushFailed {
                collection: "games",
                source,
            });
        }
        if let Err(source) = players_push {
            return Err(SyncError::PushFailed {
                collection: "players",
                source,
            });
        }

        info!(id = %game.id, winner = ?game.winner, "game recorded");
        Ok(game)
    }

    /// Rebuilds every player's counters from the full Games log and pushes
    /// the corrected collection. Explicit repair action, O(all games), not
    /// part of the normal sync path.
    pub async fn recalculate_stats(&self) -> Result<Vec<Player>, SyncError> {
        let (games_fetch, players_fetch) = tokio::join!(
            self.store.fetch::<Game>(&self.config.games_bin),
            self.store.fetch::<Player>(&self.config.players_bin),
        );
        let games = games_fetch?;
        let players = players_fetch?;

        let rebuilt = reconcile::recompute_stats(&players, &games);
        self.store.push(&self.config.players_bin, &rebuilt).await?;
        self.snapshots.save_players(&rebuilt)?;

        info!(players = rebuilt.len(), games = games.len(), "stats recalculated");
        Ok(rebuilt)
    }

    async fn sync_players(&self) -> Result<bool, SyncError> {
        let local = self.snapshots.load_players()?;
        let remote = self.store.fetch::<Player>(&self.config.players_bin).await?;
        let merged = reconcile::merge_players(&local, &remote);

        if merged != local {
            self.snapshots.save_players(&merged)?;
        }
        if merged != remote {
            self.store.push(&self.config.players_bin, &merged).await?;
            return Ok(true);
        }
        Ok(false)
    }

    async fn sync_games(&self) -> Result<bool, SyncError> {
        let local = self.snapshots.load_games()?;
        let remote = self.store.fetch::<Game>(&self.config.games_bin).await?;
        let merged = reconcile::merge_games(&local, &remote);

        if merged != local {
            self.snapshots.save_games(&merged)?;
        }
        if merged != remote {
            self.store.push(&self.config.games_bin, &merged).await?;
            return Ok(true);
        }
        Ok(false)
    }
}
