//! Game flow orchestration: drives one game from setup to result.
//!
//! Speaking is sequential in roster order; voting fans out one task per
//! alive player and fans the deltas back in over a channel. Every delta goes
//! through [`GameFlowService::apply`], which is the only place the state is
//! mutated.

mod mutation;
mod orchestration;
mod speaking;
mod voting;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::behavior::Extras;
use crate::domain::state::{GameState, PlayerId, WordPair};
use crate::infra::deps::GameDeps;

/// Parameters for a new game. Empty fields fall back to configuration.
#[derive(Debug, Clone, Default)]
pub struct NewGame {
    /// Generated (ULID) when absent.
    pub game_id: Option<String>,
    /// Empty means the configured default roster.
    pub players: Vec<PlayerId>,
    /// Drawn from the thread RNG when absent.
    pub seed: Option<u64>,
    pub behavior_mode: Option<String>,
    pub custom_words: Option<WordPair>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// A side won; the state is in `result`.
    Finished,
    /// Stopped before opening a round past `max_rounds`.
    RoundLimitReached,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOutcome {
    pub status: GameStatus,
    pub state: GameState,
}

impl GameOutcome {
    pub fn rounds_played(&self) -> u32 {
        self.state.current_round
    }
}

pub struct GameFlowService {
    deps: GameDeps,
    extras: Arc<Extras>,
}

impl GameFlowService {
    pub fn new(deps: GameDeps) -> Self {
        Self {
            deps,
            extras: Arc::new(Extras::new()),
        }
    }

    /// Extras handed to every player behavior call.
    pub fn with_extras(mut self, extras: Extras) -> Self {
        self.extras = Arc::new(extras);
        self
    }

    pub fn deps(&self) -> &GameDeps {
        &self.deps
    }
}
