//! Derived statistics over the synced collections.
//!
//! Pure helpers for leaderboard-style views: ranking, recent history,
//! calendar filtering, and pairwise head-to-head records. All of these read
//! the snapshots the sync engine maintains; none of them touch I/O.

use chrono::NaiveDate;

use crate::models::{Game, Player};

/// Players sorted for the leaderboard: win rate descending, total games as
/// the tie-break.
pub fn rankings(players: &[Player]) -> Vec<Player> {
    let mut ranked = players.to_vec();
    ranked.sort_by(|a, b| {
        b.win_rate()
            .cmp(&a.win_rate())
            .then(b.total_games.cmp(&a.total_games))
    });
    ranked
}

/// The most recent games. Input is expected newest-first, the order merges
/// and snapshots maintain.
pub fn recent_games(games: &[Game], limit: usize) -> &[Game] {
    &games[..games.len().min(limit)]
}

/// Games played on a given calendar day (UTC).
pub fn games_on(games: &[Game], date: NaiveDate) -> Vec<&Game> {
    games
        .iter()
        .filter(|g| g.game_time.date_naive() == date)
        .collect()
}

/// Pairwise record between two players.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadToHead {
    pub played: u32,
    pub first_wins: u32,
    pub second_wins: u32,
    pub draws: u32,
}

/// Head-to-head record between `first` and `second`, in either seat.
pub fn head_to_head(games: &[Game], first: &str, second: &str) -> HeadToHead {
    let mut record = HeadToHead::default();
    for game in games {
        let names = (game.player1.name.as_str(), game.player2.name.as_str());
        if names != (first, second) && names != (second, first) {
            continue;
        }
        record.played += 1;
        match game.winner.as_deref() {
            Some(winner) if winner == first => record.first_wins += 1,
            Some(_) => record.second_wins += 1,
            None => record.draws += 1,
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn player(name: &str, total: u32, wins: u32) -> Player {
        let mut p = Player::new(name);
        p.total_games = total;
        p.wins = wins;
        p.losses = total - wins;
        p
    }

    #[test]
    fn test_rankings_by_win_rate_then_volume() {
        let players = vec![
            player("Alice", 4, 2),  // 50%
            player("Bob", 10, 9),   // 90%
            player("Carol", 20, 10), // 50%, more games than Alice
        ];
        let ranked = rankings(&players);
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Bob", "Carol", "Alice"]);
    }

    #[test]
    fn test_recent_games_limit() {
        let games = vec![
            Game::new("A", 11, "B", 9),
            Game::new("A", 9, "B", 11),
            Game::new("A", 11, "B", 7),
        ];
        assert_eq!(recent_games(&games, 2).len(), 2);
        assert_eq!(recent_games(&games, 50).len(), 3);
        assert_eq!(recent_games(&games, 2)[0].id, games[0].id);
    }

    #[test]
    fn test_games_on_day() {
        let today = Game::new("A", 11, "B", 9);
        let mut last_month = Game::new("A", 5, "B", 11);
        last_month.game_time -= Duration::days(30);

        let games = vec![today.clone(), last_month.clone()];
        let todays = games_on(&games, today.game_time.date_naive());
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].id, today.id);

        let old = games_on(&games, last_month.game_time.date_naive());
        assert_eq!(old.len(), 1);
        assert_eq!(old[0].id, last_month.id);
    }

    #[test]
    fn test_head_to_head_counts_either_seat() {
        let games = vec![
            Game::new("Alice", 11, "Bob", 9),
            Game::new("Bob", 11, "Alice", 8),
            Game::new("Bob", 7, "Alice", 11),
            Game::new("Alice", 6, "Bob", 6),
            Game::new("Alice", 11, "Carol", 2),
        ];
        let record = head_to_head(&games, "Alice", "Bob");
        assert_eq!(
            record,
            HeadToHead {
                played: 4,
                first_wins: 2,
                second_wins: 1,
                draws: 1,
            }
        );

        // Symmetric from Bob's point of view.
        let flipped = head_to_head(&games, "Bob", "Alice");
        assert_eq!(flipped.first_wins, 1);
        assert_eq!(flipped.second_wins, 2);
    }
}
