//! In-memory game runner.
//!
//! Every game gets fresh dependencies: a scripted decider seeded from the
//! game seed and a recording metrics sink the report is built from.

use std::sync::Arc;

use spy_engine::behavior::{Extras, VOTE_STRATEGY_KEY};
use spy_engine::collaborator::{MetricsEvent, RecordingMetrics, ScriptedDecider};
use spy_engine::{build_deps, EngineError, GameConfig, GameFlowService, GameOutcome, NewGame};

/// Result of simulating a complete game.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub outcome: GameOutcome,
    /// Every metrics event emitted while the game ran, in order.
    pub events: Vec<MetricsEvent>,
}

pub struct Simulator {
    config: GameConfig,
    mode: &'static str,
    vote_strategy: &'static str,
}

impl Simulator {
    pub fn new(config: GameConfig, mode: &'static str, vote_strategy: &'static str) -> Self {
        Self {
            config,
            mode,
            vote_strategy,
        }
    }

    pub fn mode(&self) -> &'static str {
        self.mode
    }

    pub fn vote_strategy(&self) -> &'static str {
        self.vote_strategy
    }

    pub fn player_count(&self) -> usize {
        self.config.game.player_count
    }

    /// Play one game to the end. The decider shares the game seed and keys
    /// each decision by seat, round and phase, so a seed replays the same
    /// game however the voting tasks are scheduled.
    pub async fn simulate_game(&self, game_num: u32, seed: u64) -> Result<GameResult, EngineError> {
        let recorder = Arc::new(RecordingMetrics::new());
        let deps = build_deps()
            .with_config(self.config.clone())
            .with_decider(Arc::new(ScriptedDecider::new(Some(seed))))
            .with_metrics(Arc::clone(&recorder) as _)
            .build()?;

        let mut extras = Extras::new();
        extras.insert(VOTE_STRATEGY_KEY.to_string(), self.vote_strategy.into());
        let service = GameFlowService::new(deps).with_extras(extras);

        let outcome = service
            .play(NewGame {
                game_id: Some(format!("sim-{game_num:05}")),
                seed: Some(seed),
                behavior_mode: Some(self.mode.to_string()),
                ..NewGame::default()
            })
            .await?;

        Ok(GameResult {
            outcome,
            events: recorder.events(),
        })
    }
}
