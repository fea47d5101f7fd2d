mod game;
mod player;

pub use game::{Game, GameSide};
pub use player::Player;
