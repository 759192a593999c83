//! How to register a behavior mode
//!
//! 1) Implement `PlayerBehavior` (and `HostBehavior` if the phase machine
//!    needs different host logic) in its own module.
//! 2) Add a `ModeFactory` entry to the static list with a stable `name`.
//! 3) Keep ordering stable; constructors must not have side effects.
//!
//! At runtime a [`ModeRegistry`] holds the constructed behaviors. Modes can
//! be replaced and single players overridden without touching the phase
//! machine.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::behavior::agent::AgentPlayer;
use crate::behavior::host::PhaseControllerHost;
use crate::behavior::trait_def::{HostBehavior, PlayerBehavior};
use crate::behavior::workflow::WorkflowPlayer;
use crate::collaborator::DecisionCollaborator;
use crate::domain::state::{GameState, PlayerId};
use crate::error::EngineError;

/// Host plus player behaviors for one mode.
#[derive(Clone)]
pub struct ModeBehaviors {
    pub host: Arc<dyn HostBehavior>,
    pub player: Arc<dyn PlayerBehavior>,
    pub overrides: BTreeMap<PlayerId, Arc<dyn PlayerBehavior>>,
}

impl ModeBehaviors {
    pub fn new(host: Arc<dyn HostBehavior>, player: Arc<dyn PlayerBehavior>) -> Self {
        Self {
            host,
            player,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_player_override(
        mut self,
        player_id: impl Into<PlayerId>,
        behavior: Arc<dyn PlayerBehavior>,
    ) -> Self {
        self.overrides.insert(player_id.into(), behavior);
        self
    }

    pub fn player_for(&self, player_id: &str) -> Arc<dyn PlayerBehavior> {
        self.overrides
            .get(player_id)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.player))
    }
}

/// Factory definition for constructing a mode.
pub struct ModeFactory {
    pub name: &'static str,
    pub make: fn(decider: Arc<dyn DecisionCollaborator>) -> ModeBehaviors,
}

static MODE_FACTORIES: &[ModeFactory] = &[
    ModeFactory {
        name: WorkflowPlayer::MODE,
        make: make_workflow,
    },
    ModeFactory {
        name: AgentPlayer::MODE,
        make: make_agent,
    },
];

/// Returns the statically registered mode factories.
pub fn registered_modes() -> &'static [ModeFactory] {
    MODE_FACTORIES
}

/// Finds a registered mode factory by its name.
pub fn by_name(name: &str) -> Option<&'static ModeFactory> {
    registered_modes().iter().find(|factory| factory.name == name)
}

fn make_workflow(decider: Arc<dyn DecisionCollaborator>) -> ModeBehaviors {
    ModeBehaviors::new(
        Arc::new(PhaseControllerHost),
        Arc::new(WorkflowPlayer::new(decider)),
    )
}

fn make_agent(decider: Arc<dyn DecisionCollaborator>) -> ModeBehaviors {
    ModeBehaviors::new(
        Arc::new(PhaseControllerHost),
        Arc::new(AgentPlayer::new(decider)),
    )
}

/// Mode name -> behaviors, plus the mode used when a state names none.
#[derive(Clone)]
pub struct ModeRegistry {
    default_mode: String,
    modes: BTreeMap<String, ModeBehaviors>,
}

impl ModeRegistry {
    /// Empty registry.
    pub fn new(default_mode: impl Into<String>) -> Self {
        Self {
            default_mode: default_mode.into(),
            modes: BTreeMap::new(),
        }
    }

    /// Every statically registered mode, all sharing `decider`.
    pub fn with_registered_modes(
        default_mode: impl Into<String>,
        decider: Arc<dyn DecisionCollaborator>,
    ) -> Self {
        let mut registry = Self::new(default_mode);
        for factory in registered_modes() {
            registry.register(factory.name, (factory.make)(Arc::clone(&decider)));
        }
        registry
    }

    /// Add or replace a mode; returns the replaced behaviors.
    pub fn register(
        &mut self,
        mode: impl Into<String>,
        behaviors: ModeBehaviors,
    ) -> Option<ModeBehaviors> {
        self.modes.insert(mode.into(), behaviors)
    }

    /// Route one player of `mode` to `behavior`.
    pub fn override_player(
        &mut self,
        mode: &str,
        player_id: impl Into<PlayerId>,
        behavior: Arc<dyn PlayerBehavior>,
    ) -> Result<(), EngineError> {
        let behaviors = self
            .modes
            .get_mut(mode)
            .ok_or_else(|| EngineError::unknown_mode(mode))?;
        behaviors.overrides.insert(player_id.into(), behavior);
        Ok(())
    }

    pub fn default_mode(&self) -> &str {
        &self.default_mode
    }

    pub fn mode_names(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }

    pub fn contains(&self, mode: &str) -> bool {
        self.modes.contains_key(mode)
    }

    /// Mode named by the state, else the default.
    pub fn active_mode<'a>(&'a self, state: &'a GameState) -> &'a str {
        state
            .behavior_mode
            .as_deref()
            .unwrap_or(self.default_mode.as_str())
    }

    pub fn behaviors(&self, state: &GameState) -> Result<&ModeBehaviors, EngineError> {
        let mode = self.active_mode(state);
        self.modes
            .get(mode)
            .ok_or_else(|| EngineError::unknown_mode(mode))
    }

    pub fn host(&self, state: &GameState) -> Result<Arc<dyn HostBehavior>, EngineError> {
        Ok(Arc::clone(&self.behaviors(state)?.host))
    }

    pub fn player(
        &self,
        state: &GameState,
        player_id: &str,
    ) -> Result<Arc<dyn PlayerBehavior>, EngineError> {
        Ok(self.behaviors(state)?.player_for(player_id))
    }
}
