//! Decision collaborator contract.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::merge::MindsetDelta;
use crate::domain::phase_fence::PhaseId;
use crate::domain::state::{
    alive_players, GameState, Mindset, Phase, PlayerId, PlayerPrivateState, Speech, Vote,
};
use crate::error::EngineError;

/// Errors a decision collaborator can report.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionError {
    /// No decision within the configured deadline
    Timeout,
    /// Collaborator failed internally
    Internal(String),
    /// Collaborator answered with something unusable
    InvalidDecision(String),
}

impl fmt::Display for DecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionError::Timeout => write!(f, "decision timeout"),
            DecisionError::Internal(msg) => write!(f, "decision internal error: {msg}"),
            DecisionError::InvalidDecision(msg) => write!(f, "invalid decision: {msg}"),
        }
    }
}

impl std::error::Error for DecisionError {}

impl From<DecisionError> for EngineError {
    fn from(err: DecisionError) -> Self {
        EngineError::internal(format!("decision error: {err}"))
    }
}

/// What one player is allowed to see.
///
/// Host secrets are absent, only the player's own private state is included,
/// and votes from earlier phases are filtered out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub game_id: String,
    pub player_id: PlayerId,
    pub players: Vec<PlayerId>,
    pub alive_players: Vec<PlayerId>,
    pub eliminated_players: Vec<PlayerId>,
    pub current_round: u32,
    pub game_phase: Phase,
    pub phase_id: PhaseId,
    pub completed_speeches: Vec<Speech>,
    pub current_votes: BTreeMap<PlayerId, Vote>,
    pub private: PlayerPrivateState,
}

impl PlayerView {
    pub fn for_player(state: &GameState, player_id: &str) -> Self {
        let private = state
            .player_private_states
            .get(player_id)
            .cloned()
            .unwrap_or_else(|| PlayerPrivateState {
                assigned_word: String::new(),
                mindset: Mindset::default(),
            });
        Self {
            game_id: state.game_id.clone(),
            player_id: player_id.to_string(),
            players: state.players.clone(),
            alive_players: alive_players(state),
            eliminated_players: state.eliminated_players.clone(),
            current_round: state.current_round,
            game_phase: state.game_phase,
            phase_id: state.phase_id.clone(),
            completed_speeches: state.completed_speeches.clone(),
            current_votes: state
                .valid_votes()
                .map(|(voter, vote)| (voter.clone(), vote.clone()))
                .collect(),
            private,
        }
    }

    pub fn word(&self) -> &str {
        &self.private.assigned_word
    }

    pub fn mindset(&self) -> &Mindset {
        &self.private.mindset
    }

    /// Alive players other than the viewer, in roster order.
    pub fn alive_others(&self) -> impl Iterator<Item = &PlayerId> + '_ {
        self.alive_players
            .iter()
            .filter(move |p| **p != self.player_id)
    }

    pub fn speeches_this_round(&self) -> impl Iterator<Item = &Speech> + '_ {
        self.completed_speeches
            .iter()
            .filter(move |s| s.round == self.current_round)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechDecision {
    pub content: String,
    #[serde(default)]
    pub mindset: MindsetDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteDecision {
    pub target: PlayerId,
    #[serde(default)]
    pub mindset: MindsetDelta,
}

/// Produces the content of speeches and votes for one player.
///
/// Called at most once per player per phase. Implementations may be slow or
/// fail; player behaviors recover from any error.
#[async_trait]
pub trait DecisionCollaborator: Send + Sync {
    async fn decide_speech(&self, view: &PlayerView) -> Result<SpeechDecision, DecisionError>;

    async fn decide_vote(&self, view: &PlayerView) -> Result<VoteDecision, DecisionError>;
}
