//! Host and player behavior contracts.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::collaborator::DecisionError;
use crate::config::GameConfig;
use crate::domain::merge::StateDelta;
use crate::domain::state::{GameState, PlayerId};
use crate::error::EngineError;
use crate::errors::domain::DomainError;

/// Free-form per-call parameters, e.g. `vote_strategy`.
pub type Extras = BTreeMap<String, serde_json::Value>;

/// Errors a player behavior may surface instead of a delta.
#[derive(Debug)]
pub enum BehaviorError {
    Decision(DecisionError),
    Internal(String),
}

impl fmt::Display for BehaviorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorError::Decision(err) => write!(f, "behavior decision failed: {err}"),
            BehaviorError::Internal(msg) => write!(f, "behavior internal error: {msg}"),
        }
    }
}

impl std::error::Error for BehaviorError {}

impl From<DecisionError> for BehaviorError {
    fn from(err: DecisionError) -> Self {
        BehaviorError::Decision(err)
    }
}

impl From<BehaviorError> for EngineError {
    fn from(err: BehaviorError) -> Self {
        EngineError::internal(err.to_string())
    }
}

pub struct HostContext<'a> {
    pub state: &'a GameState,
    pub config: &'a GameConfig,
}

/// Owned so it can move into a spawned vote task.
#[derive(Clone)]
pub struct PlayerContext {
    pub state: Arc<GameState>,
    pub player_id: PlayerId,
    pub config: Arc<GameConfig>,
    pub extras: Arc<Extras>,
}

impl PlayerContext {
    pub fn new(
        state: Arc<GameState>,
        player_id: impl Into<PlayerId>,
        config: Arc<GameConfig>,
    ) -> Self {
        Self {
            state,
            player_id: player_id.into(),
            config,
            extras: Arc::new(Extras::new()),
        }
    }

    pub fn with_extras(mut self, extras: Arc<Extras>) -> Self {
        self.extras = extras;
        self
    }

    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extras.get(key).and_then(|v| v.as_str())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.config.decision_timeout()
    }
}

/// Drives the phase machine. Synchronous and pure over its context.
pub trait HostBehavior: Send + Sync {
    fn setup(&self, ctx: &HostContext<'_>) -> Result<StateDelta, DomainError>;

    fn stage_switch(&self, ctx: &HostContext<'_>) -> Result<StateDelta, DomainError>;

    fn resolve_round(&self, ctx: &HostContext<'_>) -> Result<StateDelta, DomainError>;
}

/// Produces a player's speech and vote as deltas.
///
/// Returning an empty delta is how a behavior declines to act (wrong phase,
/// player not alive, already acted).
#[async_trait]
pub trait PlayerBehavior: Send + Sync {
    async fn decide_speech(&self, ctx: &PlayerContext) -> Result<StateDelta, BehaviorError>;

    async fn decide_vote(&self, ctx: &PlayerContext) -> Result<StateDelta, BehaviorError>;
}

/// Await `fut`, giving up with [`DecisionError::Timeout`] after `limit`.
pub async fn bounded<T, F>(limit: Option<Duration>, fut: F) -> Result<T, DecisionError>
where
    F: Future<Output = Result<T, DecisionError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| DecisionError::Timeout)?,
        None => fut.await,
    }
}
