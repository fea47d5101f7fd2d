//! Pure reconciliation logic for divergent collection snapshots.
//!
//! No I/O lives here. Two independently evolved copies of a collection go
//! in, one merged copy comes out, and the result is deterministic:
//!
//! - Players merge by `name`, taking the pairwise maximum of each counter.
//!   Counters only ever grow on a single device, so the larger value is
//!   always at least as fresh, which makes the merge commutative,
//!   associative, and idempotent without clocks or version vectors. If two
//!   devices applied *different* games to the same base counters, max-merge
//!   can under-count; [`recompute_stats`] repairs that from the Games log.
//! - Games merge by `id`, first copy wins. Games are immutable after
//!   creation, so two copies of an id are identical and the union is all
//!   there is to compute.
//!
//! Merged output comes back in canonical order (players by name, games by
//! time descending) so that two snapshots with the same content are equal
//! byte-for-byte.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::{Game, Player};

/// Merges two Players snapshots keyed by name.
///
/// A player present in only one input is kept as-is. A player present in
/// both keeps the first-seen copy's identity fields while each counter
/// takes the maximum of the two inputs.
pub fn merge_players(local: &[Player], remote: &[Player]) -> Vec<Player> {
    let mut merged: Vec<Player> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for player in local.iter().chain(remote) {
        match by_name.get(player.name.as_str()) {
            Some(&i) => {
                let existing = &mut merged[i];
                existing.total_games = existing.total_games.max(player.total_games);
                existing.wins = existing.wins.max(player.wins);
                existing.losses = existing.losses.max(player.losses);
            }
            None => {
                by_name.insert(player.name.clone(), merged.len());
                merged.push(player.clone());
            }
        }
    }

    merged.sort_by(|a, b| a.name.cmp(&b.name));
    merged
}

/// Merges two Games snapshots keyed by id, first copy wins.
///
/// Output is sorted by game time descending (newest first), ties broken by
/// id so the order is total.
pub fn merge_games(local: &[Game], remote: &[Game]) -> Vec<Game> {
    let mut merged: Vec<Game> = Vec::new();
    let mut seen: HashSet<Uuid> = HashSet::new();

    for game in local.iter().chain(remote) {
        if seen.insert(game.id) {
            merged.push(game.clone());
        }
    }

    merged.sort_by(|a, b| b.game_time.cmp(&a.game_time).then(b.id.cmp(&a.id)));
    merged
}

/// Rebuilds every player's counters from the complete Games log.
///
/// All counters reset to zero, then each game increments both named
/// participants' `total_games`; a decided game also increments the winner's
/// `wins` and the loser's `losses`, a draw increments neither. Games that
/// name a player no longer in the collection count for nobody. This is the
/// authoritative repair path: it is a deterministic, idempotent function of
/// the log, and over decided games its output satisfies
/// `total_games == wins + losses` (each draw adds to `total_games` only).
pub fn recompute_stats(players: &[Player], games: &[Game]) -> Vec<Player> {
    let mut rebuilt: Vec<Player> = players
        .iter()
        .map(|p| Player {
            total_games: 0,
            wins: 0,
            losses: 0,
            ..p.clone()
        })
        .collect();
    let by_name: HashMap<String, usize> = rebuilt
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.clone(), i))
        .collect();

    for game in games {
        for side in [&game.player1, &game.player2] {
            if let Some(&i) = by_name.get(side.name.as_str()) {
                rebuilt[i].total_games += 1;
            }
        }
        if let Some(winner) = game.winner.as_deref() {
            if let Some(&i) = by_name.get(winner) {
                rebuilt[i].wins += 1;
            }
            if let Some(&i) = game.loser().and_then(|l| by_name.get(l)) {
                rebuilt[i].losses += 1;
            }
        }
    }

    rebuilt
}

/// Applies a single game to the counters, the incremental form used when
/// recording a result. Participants missing from the collection are skipped.
pub fn apply_game(players: &mut [Player], game: &Game) {
    for player in players.iter_mut() {
        if player.name == game.player1.name || player.name == game.player2.name {
            player.total_games += 1;
            match (game.winner.as_deref(), game.loser()) {
                (Some(winner), _) if winner == player.name => player.wins += 1,
                (_, Some(loser)) if loser == player.name => player.losses += 1,
                _ => {} // draw
            }
        }
    }
}
