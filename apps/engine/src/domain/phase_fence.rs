//! Phase fencing tokens.
//!
//! A `phase_id` is minted on every phase or round transition. Writes tagged
//! with an older token are left out of every aggregation, which is what keeps
//! late or duplicated concurrent votes from counting.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::seed_derivation::{derive_phase_seed, rng_from_seed};
use crate::domain::state::{GameState, Phase};

/// Fencing token of the form `"{round}:{phase}:{nonce}"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseId(String);

impl PhaseId {
    /// Token of a state that has not been set up yet; never minted.
    pub fn unset() -> Self {
        Self(String::new())
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Round component, if the token is well formed.
    pub fn round(&self) -> Option<u32> {
        self.0.split(':').next()?.parse().ok()
    }

    /// Phase component, if the token is well formed.
    pub fn phase(&self) -> Option<Phase> {
        match self.0.split(':').nth(1)? {
            "setup" => Some(Phase::Setup),
            "speaking" => Some(Phase::Speaking),
            "voting" => Some(Phase::Voting),
            "result" => Some(Phase::Result),
            _ => None,
        }
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhaseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Mint the token for `(round, phase)` of the game seeded with `game_seed`.
///
/// A game visits each `(round, phase)` pair at most once, so tokens never
/// repeat within a game; the nonce keeps them distinct across games.
pub fn mint_phase_id(game_seed: u64, round: u32, phase: Phase) -> PhaseId {
    let mut rng = rng_from_seed(derive_phase_seed(game_seed, round, phase));
    let nonce: u32 = rng.random();
    PhaseId(format!("{round}:{phase}:{nonce:08x}"))
}

/// Token for the state's current round and phase.
pub fn generate_phase_id(state: &GameState) -> PhaseId {
    mint_phase_id(state.rng_seed, state.current_round, state.game_phase)
}
