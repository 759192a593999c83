//! Partial-state deltas and the reducer that folds them into [`GameState`].
//!
//! Behaviors never mutate the state directly. They return a [`StateDelta`]
//! and the orchestrator applies it here:
//!
//! - `completed_speeches` and `eliminated_players` only ever grow,
//! - `current_votes` and `player_private_states` are upserted per key,
//! - a player's suspicions are merged key-wise ([`merge_probs`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::phase_fence::PhaseId;
use crate::domain::state::{
    clamp_confidence, GameState, HostPrivateState, Mindset, Phase, PlayerId, PlayerPrivateState,
    SelfBelief, Speech, Suspicion, Suspicions, Vote, Winner,
};
use crate::errors::domain::DomainError;

/// Changes to a player's mindset. Absent parts keep their prior value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindsetDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_belief: Option<SelfBelief>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub suspicions: Suspicions,
}

impl MindsetDelta {
    pub fn is_empty(&self) -> bool {
        self.self_belief.is_none() && self.suspicions.is_empty()
    }

    /// Delta that rewrites `mindset` in full, as far as a merge can.
    pub fn replacing(mindset: &Mindset) -> Self {
        Self {
            self_belief: Some(mindset.self_belief),
            suspicions: mindset.suspicions.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStateDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_word: Option<String>,
    #[serde(default)]
    pub mindset: MindsetDelta,
}

/// Partial state returned by host and player behaviors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PlayerId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_round: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_phase: Option<Phase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<PhaseId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub completed_speeches: Vec<Speech>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub eliminated_players: Vec<PlayerId>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub current_votes: BTreeMap<PlayerId, Vote>,
    /// Drop every recorded vote before upserting `current_votes`.
    pub reset_votes: bool,
    /// Start from a blank history: speeches, eliminations, votes, private
    /// states and winner. Only setup emits this.
    pub clear_history: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_private_state: Option<HostPrivateState>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub player_private_states: BTreeMap<PlayerId, PlayerStateDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior_mode: Option<String>,
}

impl StateDelta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn speech(speech: Speech) -> Self {
        Self {
            completed_speeches: vec![speech],
            ..Self::default()
        }
    }

    pub fn vote(voter: impl Into<PlayerId>, vote: Vote) -> Self {
        let mut current_votes = BTreeMap::new();
        current_votes.insert(voter.into(), vote);
        Self {
            current_votes,
            ..Self::default()
        }
    }

    /// Attach a mindset change for `player_id`; empty changes are skipped.
    pub fn with_mindset(mut self, player_id: impl Into<PlayerId>, mindset: MindsetDelta) -> Self {
        if !mindset.is_empty() {
            self.player_private_states
                .entry(player_id.into())
                .or_default()
                .mindset = mindset;
        }
        self
    }
}

/// What the reducer left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub dropped_speeches: usize,
    pub dropped_votes: usize,
}

/// Key-wise suspicion merge: keys in `new` win, keys only in `old` survive.
pub fn merge_probs(old: &Suspicions, new: &Suspicions) -> Suspicions {
    let mut merged = old.clone();
    for (target, suspicion) in new {
        merged.insert(target.clone(), clamp_suspicion(suspicion));
    }
    merged
}

fn clamp_suspicion(suspicion: &Suspicion) -> Suspicion {
    Suspicion {
        role: suspicion.role,
        confidence: clamp_confidence(suspicion.confidence),
        reason: suspicion.reason.clone(),
    }
}

pub fn merge_mindset(old: &Mindset, delta: &MindsetDelta) -> Mindset {
    Mindset {
        self_belief: delta
            .self_belief
            .map(|b| SelfBelief::new(b.role, b.confidence))
            .unwrap_or(old.self_belief),
        suspicions: merge_probs(&old.suspicions, &delta.suspicions),
    }
}

/// Fold `delta` into `state`.
///
/// Stale writes are not errors. Speeches for another round or from a player
/// who already spoke are dropped. Votes are dropped when voter or target is
/// not alive, or when they carry an older `phase_id`. The returned
/// [`MergeOutcome`] counts what was left out. On error `state` is untouched.
pub fn apply_delta(state: &mut GameState, delta: &StateDelta) -> Result<MergeOutcome, DomainError> {
    if delta.is_empty() {
        return Ok(MergeOutcome::default());
    }
    if state.is_finished() {
        return Err(DomainError::GameFinished);
    }
    let roster = delta.players.as_ref().unwrap_or(&state.players);
    if let Some(unknown) = delta.eliminated_players.iter().find(|p| !roster.contains(p)) {
        return Err(DomainError::UnknownPlayer(unknown.clone()));
    }

    if delta.clear_history {
        state.completed_speeches.clear();
        state.eliminated_players.clear();
        state.current_votes.clear();
        state.player_private_states.clear();
        state.winner = None;
    }

    if let Some(game_id) = &delta.game_id {
        state.game_id = game_id.clone();
    }
    if let Some(players) = &delta.players {
        state.players = players.clone();
    }
    if let Some(mode) = &delta.behavior_mode {
        state.behavior_mode = Some(mode.clone());
    }
    if let Some(host) = &delta.host_private_state {
        state.host_private_state = host.clone();
    }
    if let Some(round) = delta.current_round {
        state.current_round = round;
    }
    if let Some(phase) = delta.game_phase {
        state.game_phase = phase;
    }
    if let Some(phase_id) = &delta.phase_id {
        state.phase_id = phase_id.clone();
    }
    if let Some(winner) = delta.winner {
        state.winner = Some(winner);
    }
    if delta.reset_votes {
        state.current_votes.clear();
    }

    for player in &delta.eliminated_players {
        if !state.is_eliminated(player) {
            state.eliminated_players.push(player.clone());
        }
    }

    let mut outcome = MergeOutcome::default();

    for speech in &delta.completed_speeches {
        if speech.round != state.current_round
            || !state.is_alive(&speech.player_id)
            || state.has_spoken_this_round(&speech.player_id)
        {
            debug!(
                game_id = %state.game_id,
                round = state.current_round,
                player_id = %speech.player_id,
                speech_round = speech.round,
                "Dropping stale speech"
            );
            outcome.dropped_speeches += 1;
            continue;
        }
        state.completed_speeches.push(speech.clone());
    }

    for (voter, vote) in &delta.current_votes {
        if !state.is_alive(voter) || !state.is_alive(&vote.target) {
            debug!(
                game_id = %state.game_id,
                round = state.current_round,
                player_id = %voter,
                target = %vote.target,
                "Dropping vote from or for a player who is not alive"
            );
            outcome.dropped_votes += 1;
            continue;
        }
        if vote.phase_id != state.phase_id {
            debug!(
                game_id = %state.game_id,
                player_id = %voter,
                vote_phase_id = %vote.phase_id,
                phase_id = %state.phase_id,
                "Dropping vote with stale phase id"
            );
            outcome.dropped_votes += 1;
            continue;
        }
        state.current_votes.insert(voter.clone(), vote.clone());
    }

    for (player, update) in &delta.player_private_states {
        let entry = state
            .player_private_states
            .entry(player.clone())
            .or_insert_with(|| PlayerPrivateState {
                assigned_word: String::new(),
                mindset: Mindset::default(),
            });
        if let Some(word) = &update.assigned_word {
            entry.assigned_word = word.clone();
        }
        entry.mindset = merge_mindset(&entry.mindset, &update.mindset);
    }

    Ok(outcome)
}
