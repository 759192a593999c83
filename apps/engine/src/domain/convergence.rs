//! Vote convergence gate.

use crate::domain::state::GameState;

/// True once every alive player holds a vote tagged with the current
/// `phase_id`.
///
/// Always evaluated against the live state: the alive set can shrink between
/// two voting phases, so a cached answer would be wrong.
pub fn votes_ready(state: &GameState) -> bool {
    state
        .players
        .iter()
        .filter(|p| !state.is_eliminated(p))
        .all(|p| state.has_valid_vote(p))
}

/// Alive players still owing a valid vote, in roster order.
pub fn pending_voters(state: &GameState) -> Vec<String> {
    state
        .players
        .iter()
        .filter(|p| !state.is_eliminated(p) && !state.has_valid_vote(p))
        .cloned()
        .collect()
}
