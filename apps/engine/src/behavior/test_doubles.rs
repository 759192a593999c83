//! Decision collaborators with canned answers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::collaborator::{
    DecisionCollaborator, DecisionError, PlayerView, SpeechDecision, VoteDecision,
};
use crate::domain::merge::MindsetDelta;

/// Answers every call with the same decision and counts calls.
pub struct FixedDecider {
    pub speech: Result<SpeechDecision, DecisionError>,
    pub vote: Result<VoteDecision, DecisionError>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl FixedDecider {
    pub fn voting_for(target: &str, mindset: MindsetDelta) -> Self {
        Self {
            speech: Ok(SpeechDecision {
                content: "it is round".into(),
                mindset: MindsetDelta::default(),
            }),
            vote: Ok(VoteDecision {
                target: target.into(),
                mindset,
            }),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            speech: Err(DecisionError::Internal("backend down".into())),
            vote: Err(DecisionError::Internal("backend down".into())),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecisionCollaborator for FixedDecider {
    async fn decide_speech(&self, _view: &PlayerView) -> Result<SpeechDecision, DecisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.speech.clone()
    }

    async fn decide_vote(&self, _view: &PlayerView) -> Result<VoteDecision, DecisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.vote.clone()
    }
}
