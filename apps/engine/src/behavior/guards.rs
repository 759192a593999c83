use crate::domain::state::{GameState, Phase};

/// Speaking phase, alive, and no speech yet this round.
pub fn may_speak(state: &GameState, player_id: &str) -> bool {
    state.game_phase == Phase::Speaking
        && state.is_alive(player_id)
        && !state.has_spoken_this_round(player_id)
}

pub fn may_vote(state: &GameState, player_id: &str) -> bool {
    state.game_phase == Phase::Voting && state.is_alive(player_id)
}

/// Targets must be alive; voting for yourself only when nobody else is.
pub fn is_valid_target(state: &GameState, voter: &str, target: &str) -> bool {
    if !state.is_alive(target) {
        return false;
    }
    target != voter
        || !state
            .players
            .iter()
            .any(|p| p != voter && state.is_alive(p))
}
