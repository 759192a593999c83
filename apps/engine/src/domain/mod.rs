//! Domain layer: pure game rules, state and reducer.

pub mod convergence;
pub mod elimination;
pub mod game_transition;
pub mod merge;
pub mod phase_controller;
pub mod phase_fence;
pub mod roles;
pub mod rules;
pub mod seed_derivation;
pub mod snapshot;
pub mod state;
pub mod win;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
pub(crate) mod test_state_helpers;
#[cfg(test)]
mod tests_props_merge;
#[cfg(test)]
mod tests_props_roles;
#[cfg(test)]
mod tests_props_votes;
#[cfg(test)]
mod tests_scenarios;

// Re-exports for ergonomics
pub use convergence::votes_ready;
pub use elimination::calculate_eliminated_player;
pub use game_transition::{derive_transitions, GameTransition};
pub use merge::{apply_delta, merge_probs, MindsetDelta, PlayerStateDelta, StateDelta};
pub use phase_fence::{generate_phase_id, PhaseId};
pub use roles::{assign_roles_and_words, RoleAssignment};
pub use rules::spy_count;
pub use seed_derivation::GameRng;
pub use state::{
    alive_players, GameState, HostPrivateState, Mindset, Phase, PlayerId, PlayerPrivateState,
    Role, SelfBelief, Speech, Suspicion, Suspicions, Vote, Winner, WordPair,
};
pub use win::determine_winner;
