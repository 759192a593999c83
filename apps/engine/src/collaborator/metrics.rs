//! Fire-and-forget metrics.
//!
//! Sinks report failures through [`MetricsError`], but the game only ever
//! talks to [`MetricsHub`], which logs and swallows them (panics included).

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::domain::state::{Mindset, PlayerId, Role, Speech, Winner};

#[derive(Debug, Clone, PartialEq)]
pub enum MetricsError {
    Unavailable(String),
    Rejected(String),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::Unavailable(msg) => write!(f, "metrics sink unavailable: {msg}"),
            MetricsError::Rejected(msg) => write!(f, "metrics event rejected: {msg}"),
        }
    }
}

impl std::error::Error for MetricsError {}

pub trait MetricsSink: Send + Sync {
    fn on_game_start(
        &self,
        game_id: &str,
        players: &[PlayerId],
        roles: &BTreeMap<PlayerId, Role>,
    ) -> Result<(), MetricsError>;

    fn on_player_mindset_update(
        &self,
        game_id: &str,
        round: u32,
        player_id: &str,
        mindset: &Mindset,
    ) -> Result<(), MetricsError>;

    fn on_speech(&self, game_id: &str, speech: &Speech) -> Result<(), MetricsError>;

    fn on_vote_cast(
        &self,
        game_id: &str,
        round: u32,
        voter: &str,
        target: &str,
    ) -> Result<(), MetricsError>;

    fn on_game_end(&self, game_id: &str, winner: Option<Winner>) -> Result<(), MetricsError>;
}

/// Non-failing front for an optional sink. Cheap to clone.
#[derive(Clone, Default)]
pub struct MetricsHub {
    sink: Option<Arc<dyn MetricsSink>>,
}

impl fmt::Debug for MetricsHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsHub")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl MetricsHub {
    pub fn new(sink: Arc<dyn MetricsSink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    fn emit(
        &self,
        event: &'static str,
        f: impl FnOnce(&dyn MetricsSink) -> Result<(), MetricsError>,
    ) {
        let Some(sink) = &self.sink else {
            return;
        };
        match catch_unwind(AssertUnwindSafe(|| f(sink.as_ref()))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(event, error = %err, "Metrics sink failed"),
            Err(_) => warn!(event, "Metrics sink panicked"),
        }
    }

    pub fn game_start(
        &self,
        game_id: &str,
        players: &[PlayerId],
        roles: &BTreeMap<PlayerId, Role>,
    ) {
        self.emit("game_start", |s| s.on_game_start(game_id, players, roles));
    }

    pub fn mindset_update(&self, game_id: &str, round: u32, player_id: &str, mindset: &Mindset) {
        self.emit("mindset_update", |s| {
            s.on_player_mindset_update(game_id, round, player_id, mindset)
        });
    }

    pub fn speech(&self, game_id: &str, speech: &Speech) {
        self.emit("speech", |s| s.on_speech(game_id, speech));
    }

    pub fn vote_cast(&self, game_id: &str, round: u32, voter: &str, target: &str) {
        self.emit("vote_cast", |s| s.on_vote_cast(game_id, round, voter, target));
    }

    pub fn game_end(&self, game_id: &str, winner: Option<Winner>) {
        self.emit("game_end", |s| s.on_game_end(game_id, winner));
    }
}

/// Writes every event as a structured `tracing` record.
#[derive(Debug, Default)]
pub struct TracingMetrics;

impl MetricsSink for TracingMetrics {
    fn on_game_start(
        &self,
        game_id: &str,
        players: &[PlayerId],
        roles: &BTreeMap<PlayerId, Role>,
    ) -> Result<(), MetricsError> {
        let spies = roles.values().filter(|r| **r == Role::Spy).count();
        info!(game_id, players = players.len(), spies, "metrics.game_start");
        Ok(())
    }

    fn on_player_mindset_update(
        &self,
        game_id: &str,
        round: u32,
        player_id: &str,
        mindset: &Mindset,
    ) -> Result<(), MetricsError> {
        info!(
            game_id,
            round,
            player_id,
            self_role = ?mindset.self_belief.role,
            self_confidence = mindset.self_belief.confidence,
            suspicions = mindset.suspicions.len(),
            "metrics.mindset_update"
        );
        Ok(())
    }

    fn on_speech(&self, game_id: &str, speech: &Speech) -> Result<(), MetricsError> {
        info!(
            game_id,
            round = speech.round,
            seq = speech.seq,
            player_id = %speech.player_id,
            "metrics.speech"
        );
        Ok(())
    }

    fn on_vote_cast(
        &self,
        game_id: &str,
        round: u32,
        voter: &str,
        target: &str,
    ) -> Result<(), MetricsError> {
        info!(game_id, round, voter, target, "metrics.vote_cast");
        Ok(())
    }

    fn on_game_end(&self, game_id: &str, winner: Option<Winner>) -> Result<(), MetricsError> {
        info!(game_id, winner = ?winner, "metrics.game_end");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricsEvent {
    GameStart {
        game_id: String,
        players: Vec<PlayerId>,
        spies: Vec<PlayerId>,
    },
    MindsetUpdate {
        game_id: String,
        round: u32,
        player_id: PlayerId,
    },
    Speech {
        game_id: String,
        round: u32,
        player_id: PlayerId,
    },
    VoteCast {
        game_id: String,
        round: u32,
        voter: PlayerId,
        target: PlayerId,
    },
    GameEnd {
        game_id: String,
        winner: Option<Winner>,
    },
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    events: Mutex<Vec<MetricsEvent>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MetricsEvent> {
        self.events.lock().clone()
    }

    fn push(&self, event: MetricsEvent) -> Result<(), MetricsError> {
        self.events.lock().push(event);
        Ok(())
    }
}

impl MetricsSink for RecordingMetrics {
    fn on_game_start(
        &self,
        game_id: &str,
        players: &[PlayerId],
        roles: &BTreeMap<PlayerId, Role>,
    ) -> Result<(), MetricsError> {
        self.push(MetricsEvent::GameStart {
            game_id: game_id.to_string(),
            players: players.to_vec(),
            spies: roles
                .iter()
                .filter(|(_, r)| **r == Role::Spy)
                .map(|(p, _)| p.clone())
                .collect(),
        })
    }

    fn on_player_mindset_update(
        &self,
        game_id: &str,
        round: u32,
        player_id: &str,
        _mindset: &Mindset,
    ) -> Result<(), MetricsError> {
        self.push(MetricsEvent::MindsetUpdate {
            game_id: game_id.to_string(),
            round,
            player_id: player_id.to_string(),
        })
    }

    fn on_speech(&self, game_id: &str, speech: &Speech) -> Result<(), MetricsError> {
        self.push(MetricsEvent::Speech {
            game_id: game_id.to_string(),
            round: speech.round,
            player_id: speech.player_id.clone(),
        })
    }

    fn on_vote_cast(
        &self,
        game_id: &str,
        round: u32,
        voter: &str,
        target: &str,
    ) -> Result<(), MetricsError> {
        self.push(MetricsEvent::VoteCast {
            game_id: game_id.to_string(),
            round,
            voter: voter.to_string(),
            target: target.to_string(),
        })
    }

    fn on_game_end(&self, game_id: &str, winner: Option<Winner>) -> Result<(), MetricsError> {
        self.push(MetricsEvent::GameEnd {
            game_id: game_id.to_string(),
            winner,
        })
    }
}
