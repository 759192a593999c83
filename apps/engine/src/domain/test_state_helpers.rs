//! Test-only game state helpers for domain unit tests.

use crate::domain::phase_fence::generate_phase_id;
use crate::domain::state::{
    GameState, HostPrivateState, Phase, PlayerPrivateState, Role, Speech, Vote,
};

pub const TEST_SEED: u64 = 0x5eed_cafe;

/// Round 1, speaking phase, fresh token, no roles assigned.
pub fn state_with_players(players: &[&str]) -> GameState {
    let mut state = GameState::new(
        "test-game",
        players.iter().map(|p| p.to_string()).collect(),
        TEST_SEED,
    );
    state.current_round = 1;
    enter_phase(&mut state, Phase::Speaking);
    state
}

/// Move to `phase` within the current round and mint its token.
pub fn enter_phase(state: &mut GameState, phase: Phase) {
    state.game_phase = phase;
    state.phase_id = generate_phase_id(state);
}

/// Record a vote tagged with the state's current token.
pub fn cast(state: &mut GameState, voter: &str, target: &str) {
    state.current_votes.insert(
        voter.to_string(),
        Vote {
            target: target.to_string(),
            ts: 0,
            phase_id: state.phase_id.clone(),
        },
    );
}

pub fn speech(round: u32, seq: u32, player_id: &str) -> Speech {
    Speech {
        round,
        seq,
        player_id: player_id.to_string(),
        content: format!("{player_id} speaks in round {round}"),
        ts: 0,
    }
}

pub fn host_with_roles(roles: &[(&str, Role)]) -> HostPrivateState {
    HostPrivateState {
        player_roles: roles
            .iter()
            .map(|(p, r)| (p.to_string(), *r))
            .collect(),
        civilian_word: "apple".into(),
        spy_word: "banana".into(),
    }
}

/// Install roles and matching words on the state.
pub fn with_roles(state: &mut GameState, roles: &[(&str, Role)]) {
    let host = host_with_roles(roles);
    for (player, role) in roles {
        let word = match role {
            Role::Civilian => host.civilian_word.clone(),
            Role::Spy => host.spy_word.clone(),
        };
        state.player_private_states.insert(
            player.to_string(),
            PlayerPrivateState {
                assigned_word: word,
                mindset: Default::default(),
            },
        );
    }
    state.host_private_state = host;
}
