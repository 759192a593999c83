//! Behavior modes: who decides what, behind which contract.
//!
//! - `HostBehavior` drives the phase machine
//! - `PlayerBehavior` produces speeches and votes as deltas
//! - `ModeRegistry` maps a mode name to one host and its player behaviors

mod agent;
pub mod fallback;
pub mod guards;
mod host;
pub mod registry;
mod trait_def;
pub mod vote_strategy;
mod workflow;

#[cfg(test)]
mod test_doubles;
#[cfg(test)]
mod tests_players;

pub use agent::{AgentPlayer, VOTE_STRATEGY_KEY};
pub use host::PhaseControllerHost;
pub use registry::{by_name, registered_modes, ModeBehaviors, ModeFactory, ModeRegistry};
pub use trait_def::{
    bounded, BehaviorError, Extras, HostBehavior, HostContext, PlayerBehavior, PlayerContext,
};
pub use vote_strategy::VoteStrategy;
pub use workflow::WorkflowPlayer;
