use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One side of a game: a player referenced by name, and their score.
///
/// Games reference players by `name` rather than `id` on purpose: deleting
/// or renaming a player leaves historical games untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSide {
    pub name: String,
    pub score: u32,
}

/// A finished game. Games are created once and never modified or deleted;
/// the Games collection is an append-only log from which player aggregates
/// can always be rebuilt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Uuid,
    pub player1: GameSide,
    pub player2: GameSide,
    /// Name of the higher-scoring side, or `None` for a draw.
    pub winner: Option<String>,
    pub game_time: DateTime<Utc>,
}

impl Game {
    /// Creates a game record, deriving the winner from the scores.
    pub fn new(
        name1: impl Into<String>,
        score1: u32,
        name2: impl Into<String>,
        score2: u32,
    ) -> Self {
        let name1 = name1.into();
        let name2 = name2.into();
        let winner = match score1.cmp(&score2) {
            std::cmp::Ordering::Greater => Some(name1.clone()),
            std::cmp::Ordering::Less => Some(name2.clone()),
            std::cmp::Ordering::Equal => None,
        };
        Self {
            id: Uuid::new_v4(),
            player1: GameSide {
                name: name1,
                score: score1,
            },
            player2: GameSide {
                name: name2,
                score: score2,
            },
            winner,
            game_time: Utc::now(),
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// Name of the losing side, `None` for a draw.
    pub fn loser(&self) -> Option<&str> {
        let winner = self.winner.as_deref()?;
        if winner == self.player1.name {
            Some(&self.player2.name)
        } else {
            Some(&self.player1.name)
        }
    }
}
