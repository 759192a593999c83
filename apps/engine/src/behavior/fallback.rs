//! Deterministic stand-ins for decisions that could not be obtained.

use tracing::warn;

use crate::domain::merge::StateDelta;
use crate::domain::state::{
    default_vote_target, next_speech_seq, now_millis, GameState, Speech, Vote,
};

/// Empty speech that keeps the player's prior mindset.
///
/// Still counts as the player's turn, so the round can move on.
pub fn fallback_speech(state: &GameState, player_id: &str) -> StateDelta {
    warn!(
        game_id = %state.game_id,
        round = state.current_round,
        player_id,
        "Using fallback speech"
    );
    StateDelta::speech(Speech {
        round: state.current_round,
        seq: next_speech_seq(state),
        player_id: player_id.to_string(),
        content: String::new(),
        ts: now_millis(),
    })
}

/// Vote for the first other alive player in roster order (self when alone).
///
/// Empty when `player_id` is not alive.
pub fn fallback_vote(state: &GameState, player_id: &str) -> StateDelta {
    let Some(target) = default_vote_target(state, player_id) else {
        return StateDelta::default();
    };
    warn!(
        game_id = %state.game_id,
        round = state.current_round,
        player_id,
        target = %target,
        "Using fallback vote"
    );
    StateDelta::vote(
        player_id,
        Vote {
            target,
            ts: now_millis(),
            phase_id: state.phase_id.clone(),
        },
    )
}
