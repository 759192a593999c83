//! Dependency bundle handed to every orchestrator entry point.

use std::sync::Arc;

use crate::behavior::ModeRegistry;
use crate::collaborator::{
    DecisionCollaborator, MetricsHub, MetricsSink, ScriptedDecider, TracingMetrics,
};
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::infra::checkpoint::Checkpointer;

#[derive(Clone)]
pub struct GameDeps {
    pub config: Arc<GameConfig>,
    pub metrics: MetricsHub,
    pub modes: Arc<ModeRegistry>,
    pub checkpointer: Option<Arc<dyn Checkpointer>>,
}

/// Builder for [`GameDeps`] (used in tests, the simulator and embedders).
pub struct DepsBuilder {
    config: GameConfig,
    decider: Option<Arc<dyn DecisionCollaborator>>,
    metrics: Option<Arc<dyn MetricsSink>>,
    modes: Option<ModeRegistry>,
    checkpointer: Option<Arc<dyn Checkpointer>>,
}

impl DepsBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            decider: None,
            metrics: None,
            modes: None,
            checkpointer: None,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Collaborator shared by the built-in modes. Ignored with `with_modes`.
    pub fn with_decider(mut self, decider: Arc<dyn DecisionCollaborator>) -> Self {
        self.decider = Some(decider);
        self
    }

    /// Attached sinks are used even when `metrics.enabled` is false.
    pub fn with_metrics(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    pub fn with_modes(mut self, modes: ModeRegistry) -> Self {
        self.modes = Some(modes);
        self
    }

    pub fn with_checkpointer(mut self, checkpointer: Arc<dyn Checkpointer>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    pub fn build(self) -> Result<GameDeps, EngineError> {
        self.config.validate()?;

        let modes = match self.modes {
            Some(modes) => modes,
            None => {
                let decider: Arc<dyn DecisionCollaborator> = match self.decider {
                    Some(decider) => decider,
                    None => Arc::new(ScriptedDecider::new(None)),
                };
                let default_mode = self.config.behavior.default_mode.clone();
                ModeRegistry::with_registered_modes(default_mode, decider)
            }
        };
        if !modes.contains(modes.default_mode()) {
            return Err(EngineError::unknown_mode(modes.default_mode()));
        }

        let metrics = match self.metrics {
            Some(sink) => MetricsHub::new(sink),
            None if self.config.metrics.enabled => MetricsHub::new(Arc::new(TracingMetrics)),
            None => MetricsHub::disabled(),
        };

        Ok(GameDeps {
            config: Arc::new(self.config),
            metrics,
            modes: Arc::new(modes),
            checkpointer: self.checkpointer,
        })
    }
}

impl Default for DepsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_deps() -> DepsBuilder {
    DepsBuilder::new()
}
