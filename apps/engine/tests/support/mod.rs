#![allow(dead_code)]

//! Decision collaborators and roster helpers shared by the game flow tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use spy_engine::collaborator::{
    DecisionCollaborator, DecisionError, PlayerView, SpeechDecision, VoteDecision,
};
use spy_engine::domain::{MindsetDelta, Phase, PlayerId};

pub fn roster(names: &[&str]) -> Vec<PlayerId> {
    names.iter().map(|n| n.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionCall {
    pub round: u32,
    pub phase: Phase,
    pub player_id: PlayerId,
}

/// Speaks a fixed line and votes for the first other alive player,
/// remembering every call it served.
#[derive(Default)]
pub struct RecordingDecider {
    calls: Mutex<Vec<DecisionCall>>,
}

impl RecordingDecider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<DecisionCall> {
        self.calls.lock().clone()
    }

    pub fn calls_in(&self, round: u32, phase: Phase) -> Vec<PlayerId> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.round == round && c.phase == phase)
            .map(|c| c.player_id.clone())
            .collect()
    }

    fn record(&self, view: &PlayerView) {
        self.calls.lock().push(DecisionCall {
            round: view.current_round,
            phase: view.game_phase,
            player_id: view.player_id.clone(),
        });
    }
}

#[async_trait]
impl DecisionCollaborator for RecordingDecider {
    async fn decide_speech(&self, view: &PlayerView) -> Result<SpeechDecision, DecisionError> {
        self.record(view);
        Ok(SpeechDecision {
            content: format!("{} describes {}", view.player_id, view.word().len()),
            mindset: MindsetDelta::default(),
        })
    }

    async fn decide_vote(&self, view: &PlayerView) -> Result<VoteDecision, DecisionError> {
        self.record(view);
        let target = view
            .alive_others()
            .next()
            .cloned()
            .unwrap_or_else(|| view.player_id.clone());
        Ok(VoteDecision {
            target,
            mindset: MindsetDelta::default(),
        })
    }
}

/// Fails every decision.
pub struct BrokenDecider;

#[async_trait]
impl DecisionCollaborator for BrokenDecider {
    async fn decide_speech(&self, _view: &PlayerView) -> Result<SpeechDecision, DecisionError> {
        Err(DecisionError::Internal("model offline".into()))
    }

    async fn decide_vote(&self, _view: &PlayerView) -> Result<VoteDecision, DecisionError> {
        Err(DecisionError::Internal("model offline".into()))
    }
}

/// Never answers; only a decision timeout gets past it.
pub struct StalledDecider;

#[async_trait]
impl DecisionCollaborator for StalledDecider {
    async fn decide_speech(&self, _view: &PlayerView) -> Result<SpeechDecision, DecisionError> {
        std::future::pending().await
    }

    async fn decide_vote(&self, _view: &PlayerView) -> Result<VoteDecision, DecisionError> {
        std::future::pending().await
    }
}
