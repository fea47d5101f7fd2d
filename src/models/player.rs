use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player and their aggregate record.
///
/// The `name` is the natural key used when merging divergent copies of the
/// Players collection; it is unique (case-sensitive) within a collection.
/// The counters are derived from the Games log and can always be rebuilt
/// from it, so `total_games == wins + losses` holds after every full
/// recomputation even if incremental updates let it drift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    /// Games played. Older records may omit the counters entirely, so all
    /// three deserialize as zero when missing.
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    pub create_time: DateTime<Utc>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            total_games: 0,
            wins: 0,
            losses: 0,
            create_time: Utc::now(),
        }
    }

    /// Win rate as a rounded integer percentage, 0 when no games played.
    pub fn win_rate(&self) -> u32 {
        if self.total_games == 0 {
            0
        } else {
            (self.wins * 100 + self.total_games / 2) / self.total_games
        }
    }
}
