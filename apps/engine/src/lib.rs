#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod behavior;
pub mod collaborator;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod infra;
pub mod services;
pub mod telemetry;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use behavior::{HostBehavior, ModeBehaviors, ModeRegistry, PlayerBehavior};
pub use collaborator::{DecisionCollaborator, MetricsHub, MetricsSink, ScriptedDecider};
pub use config::GameConfig;
pub use domain::{GameState, Phase, Role, StateDelta, Winner};
pub use error::EngineError;
pub use errors::DomainError;
pub use infra::checkpoint::{Checkpointer, InMemoryCheckpointer, JsonFileCheckpointer};
pub use infra::deps::{build_deps, DepsBuilder, GameDeps};
pub use services::game_flow::{GameFlowService, GameOutcome, GameStatus, NewGame};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
