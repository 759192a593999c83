//! RNG seed derivation utilities for deterministic game behavior.
//!
//! Every random decision in a game (spy sampling, phase nonces, tie-breaks,
//! scripted decisions) draws from its own stream derived from the game's base
//! seed. Nothing but the base seed has to survive a checkpoint for a resumed
//! game to replay identically.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::state::Phase;

/// Deterministic RNG type used throughout the engine.
pub type GameRng = ChaCha8Rng;

/// SplitMix64 finalizer; spreads nearby inputs across the full 64-bit range.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E3779B97F4A7C15);
    z ^= z >> 30;
    z = z.wrapping_mul(0xBF58476D1CE4E5B9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn phase_index(phase: Phase) -> u64 {
    match phase {
        Phase::Setup => 0,
        Phase::Speaking => 1,
        Phase::Voting => 2,
        Phase::Result => 3,
    }
}

/// Seed for role and word assignment at setup.
pub fn derive_role_seed(game_seed: u64) -> u64 {
    mix(game_seed.wrapping_add(1))
}

/// Seed for the fencing-token nonce of `(round, phase)`.
pub fn derive_phase_seed(game_seed: u64, round: u32, phase: Phase) -> u64 {
    mix(game_seed
        .wrapping_add((round as u64).wrapping_mul(10_000))
        .wrapping_add(phase_index(phase).wrapping_mul(100))
        .wrapping_add(2))
}

/// Seed for breaking an elimination tie in `round`.
pub fn derive_tiebreak_seed(game_seed: u64, round: u32) -> u64 {
    mix(game_seed
        .wrapping_add((round as u64).wrapping_mul(1_000_000))
        .wrapping_add(3))
}

/// Seed for the decisions of the player at roster position `seat` during
/// `(round, phase)`.
pub fn derive_player_seed(game_seed: u64, seat: usize, round: u32, phase: Phase) -> u64 {
    mix(game_seed
        .wrapping_add((seat as u64).wrapping_mul(100_000_000))
        .wrapping_add((round as u64).wrapping_mul(10_000))
        .wrapping_add(phase_index(phase).wrapping_mul(100))
        .wrapping_add(4))
}

pub fn rng_from_seed(seed: u64) -> GameRng {
    GameRng::seed_from_u64(seed)
}
