//! Vote tallying and elimination.

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::info;

use crate::domain::state::{GameState, PlayerId};

/// Count targets of the votes that are valid for the current phase.
///
/// Keys are ordered, so the result does not depend on vote insertion order.
pub fn tally_votes(state: &GameState) -> BTreeMap<PlayerId, usize> {
    let mut tally = BTreeMap::new();
    for (_, vote) in state.valid_votes() {
        *tally.entry(vote.target.clone()).or_insert(0) += 1;
    }
    tally
}

/// Player to eliminate for the current voting phase.
///
/// A unique maximum is eliminated outright; a tie is broken uniformly at
/// random among the tied players using `rng`. Returns `None` when no vote is
/// valid for the current phase.
pub fn calculate_eliminated_player<R: Rng + ?Sized>(
    state: &GameState,
    rng: &mut R,
) -> Option<PlayerId> {
    let tally = tally_votes(state);
    let max_votes = tally.values().copied().max()?;
    let tied: Vec<&PlayerId> = tally
        .iter()
        .filter(|(_, count)| **count == max_votes)
        .map(|(player, _)| player)
        .collect();

    if let [only] = tied.as_slice() {
        return Some((*only).clone());
    }

    let eliminated = tied.choose(rng).map(|p| (*p).clone());
    info!(
        game_id = %state.game_id,
        round = state.current_round,
        ?tied,
        eliminated = ?eliminated,
        "Tie detected; eliminated at random"
    );
    eliminated
}
