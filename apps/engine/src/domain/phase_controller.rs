//! Host-side phase state machine.
//!
//! `setup -> speaking -> voting -> (speaking | result)`. Each step reads the
//! current state and returns the [`StateDelta`] that performs the
//! transition; applying it is the caller's job.

use tracing::{debug, info};

use crate::domain::elimination::calculate_eliminated_player;
use crate::domain::merge::{MindsetDelta, PlayerStateDelta, StateDelta};
use crate::domain::phase_fence::mint_phase_id;
use crate::domain::roles::assign_roles_and_words;
use crate::domain::seed_derivation::{derive_role_seed, derive_tiebreak_seed, rng_from_seed};
use crate::domain::state::{alive_players, next_alive_player, GameState, Phase, PlayerId, WordPair};
use crate::domain::win::determine_winner;
use crate::errors::domain::DomainError;

/// Assign roles and words and open round 1.
///
/// The roster comes from `state.players`, or `default_roster` when the state
/// has none. Custom words already present in `state.host_private_state`
/// take precedence over `vocabulary`.
pub fn setup(
    state: &GameState,
    vocabulary: &[WordPair],
    default_roster: &[PlayerId],
) -> Result<StateDelta, DomainError> {
    let players: Vec<PlayerId> = if state.players.is_empty() {
        default_roster.to_vec()
    } else {
        state.players.clone()
    };

    let mut rng = rng_from_seed(derive_role_seed(state.rng_seed));
    let assignment = assign_roles_and_words(
        &players,
        vocabulary,
        Some(&state.host_private_state),
        &mut rng,
    )?;

    info!(
        game_id = %state.game_id,
        players = players.len(),
        spies = assignment.spies().len(),
        "Game set up"
    );

    let player_private_states = assignment
        .player_private_states
        .into_iter()
        .map(|(player, private)| {
            let update = PlayerStateDelta {
                assigned_word: Some(private.assigned_word),
                mindset: MindsetDelta::replacing(&private.mindset),
            };
            (player, update)
        })
        .collect();

    Ok(StateDelta {
        players: Some(players),
        current_round: Some(1),
        game_phase: Some(Phase::Speaking),
        phase_id: Some(mint_phase_id(state.rng_seed, 1, Phase::Speaking)),
        reset_votes: true,
        clear_history: true,
        host_private_state: Some(assignment.host_private_state),
        player_private_states,
        ..StateDelta::default()
    })
}

/// Open voting once every alive player has spoken this round.
///
/// Returns an empty delta while someone still has to speak, and outside the
/// speaking phase, so it is safe to call repeatedly.
pub fn stage_switch(state: &GameState) -> StateDelta {
    if state.game_phase != Phase::Speaking {
        return StateDelta::default();
    }
    if let Some(next) = next_alive_player(state) {
        debug!(
            game_id = %state.game_id,
            round = state.current_round,
            next = %next,
            "Waiting for speaker"
        );
        return StateDelta::default();
    }

    let phase_id = mint_phase_id(state.rng_seed, state.current_round, Phase::Voting);
    info!(
        game_id = %state.game_id,
        round = state.current_round,
        phase_id = %phase_id,
        "All alive players spoke; voting opens"
    );
    StateDelta {
        game_phase: Some(Phase::Voting),
        phase_id: Some(phase_id),
        reset_votes: true,
        ..StateDelta::default()
    }
}

/// Tally the converged vote, apply the elimination to a candidate state and
/// either finish the game or open the next round.
pub fn resolve_round(state: &GameState) -> Result<StateDelta, DomainError> {
    if state.game_phase != Phase::Voting {
        return Err(DomainError::phase_mismatch(Phase::Voting, state.game_phase));
    }
    if alive_players(state).is_empty() {
        return Err(DomainError::NoAliveVoters);
    }

    let mut rng = rng_from_seed(derive_tiebreak_seed(state.rng_seed, state.current_round));
    let eliminated = calculate_eliminated_player(state, &mut rng);

    let mut candidate = state.clone();
    if let Some(player) = &eliminated {
        if !candidate.is_eliminated(player) {
            candidate.eliminated_players.push(player.clone());
        }
    }
    let winner = determine_winner(&candidate, &state.host_private_state);

    info!(
        game_id = %state.game_id,
        round = state.current_round,
        eliminated = ?eliminated,
        winner = ?winner,
        "Round resolved"
    );

    let eliminated_players: Vec<PlayerId> = eliminated.into_iter().collect();
    let delta = match winner {
        Some(winner) => StateDelta {
            game_phase: Some(Phase::Result),
            phase_id: Some(mint_phase_id(state.rng_seed, state.current_round, Phase::Result)),
            winner: Some(winner),
            eliminated_players,
            ..StateDelta::default()
        },
        None => {
            let next_round = state.current_round + 1;
            StateDelta {
                current_round: Some(next_round),
                game_phase: Some(Phase::Speaking),
                phase_id: Some(mint_phase_id(state.rng_seed, next_round, Phase::Speaking)),
                reset_votes: true,
                eliminated_players,
                ..StateDelta::default()
            }
        }
    };
    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::merge::apply_delta;
    use crate::domain::state::{Role, Winner};
    use crate::domain::test_state_helpers::{
        cast, enter_phase, speech, state_with_players, with_roles,
    };

    fn vocabulary() -> Vec<WordPair> {
        vec![WordPair::new("apple", "banana"), WordPair::new("sun", "moon")]
    }

    #[test]
    fn setup_opens_round_one() {
        let state = GameState::new("g", Vec::new(), 11);
        let roster: Vec<PlayerId> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let delta = setup(&state, &vocabulary(), &roster).unwrap();

        let mut state = state;
        apply_delta(&mut state, &delta).unwrap();
        assert_eq!(state.players, roster);
        assert_eq!(state.current_round, 1);
        assert_eq!(state.game_phase, Phase::Speaking);
        assert_eq!(state.phase_id.round(), Some(1));
        assert_eq!(state.phase_id.phase(), Some(Phase::Speaking));
        assert_eq!(state.player_private_states.len(), 4);
        assert_ne!(
            state.host_private_state.civilian_word,
            state.host_private_state.spy_word
        );
        for private in state.player_private_states.values() {
            assert_eq!(private.mindset.self_belief.role, Role::Civilian);
            assert_eq!(private.mindset.self_belief.confidence, 0.5);
            assert!(private.mindset.suspicions.is_empty());
        }
    }

    #[test]
    fn setup_rejects_small_rosters() {
        let state = GameState::new("g", vec!["a".into(), "b".into()], 1);
        assert_eq!(
            setup(&state, &vocabulary(), &[]),
            Err(DomainError::InvalidPlayerCount { count: 2, min: 3 })
        );
    }

    #[test]
    fn setup_is_reproducible_for_a_seed() {
        let state = GameState::new("g", Vec::new(), 42);
        let roster: Vec<PlayerId> = (0..8).map(|i| format!("p{i}")).collect();
        assert_eq!(
            setup(&state, &vocabulary(), &roster).unwrap(),
            setup(&state, &vocabulary(), &roster).unwrap()
        );
    }

    #[test]
    fn stage_switch_waits_for_every_alive_speaker() {
        let mut state = state_with_players(&["a", "b", "c"]);
        state.eliminated_players.push("b".into());
        assert!(stage_switch(&state).is_empty());

        state.completed_speeches.push(speech(1, 0, "a"));
        assert!(stage_switch(&state).is_empty());

        state.completed_speeches.push(speech(1, 1, "c"));
        let before = state.phase_id.clone();
        let delta = stage_switch(&state);
        assert_eq!(delta.game_phase, Some(Phase::Voting));
        assert!(delta.reset_votes);
        assert_ne!(delta.phase_id, Some(before));
    }

    #[test]
    fn stage_switch_is_a_no_op_outside_speaking() {
        let mut state = state_with_players(&["a", "b", "c"]);
        enter_phase(&mut state, Phase::Voting);
        assert!(stage_switch(&state).is_empty());
    }

    #[test]
    fn resolve_requires_voting_phase() {
        let state = state_with_players(&["a", "b", "c"]);
        assert_eq!(
            resolve_round(&state),
            Err(DomainError::phase_mismatch(Phase::Voting, Phase::Speaking))
        );
    }

    #[test]
    fn resolve_without_alive_players_fails() {
        let mut state = state_with_players(&["a", "b", "c"]);
        state.eliminated_players = state.players.clone();
        enter_phase(&mut state, Phase::Voting);
        assert_eq!(resolve_round(&state), Err(DomainError::NoAliveVoters));
    }

    #[test]
    fn resolve_ends_game_when_last_spy_goes() {
        let mut state = state_with_players(&["a", "b", "c", "d"]);
        with_roles(
            &mut state,
            &[
                ("a", Role::Civilian),
                ("b", Role::Spy),
                ("c", Role::Civilian),
                ("d", Role::Civilian),
            ],
        );
        enter_phase(&mut state, Phase::Voting);
        cast(&mut state, "a", "b");
        cast(&mut state, "b", "a");
        cast(&mut state, "c", "b");
        cast(&mut state, "d", "b");

        let delta = resolve_round(&state).unwrap();
        apply_delta(&mut state, &delta).unwrap();
        assert_eq!(state.game_phase, Phase::Result);
        assert_eq!(state.winner, Some(Winner::Civilians));
        assert_eq!(state.eliminated_players, vec!["b"]);
    }

    #[test]
    fn resolve_without_votes_advances_round() {
        let mut state = state_with_players(&["a", "b", "c", "d"]);
        with_roles(
            &mut state,
            &[
                ("a", Role::Civilian),
                ("b", Role::Spy),
                ("c", Role::Civilian),
                ("d", Role::Civilian),
            ],
        );
        enter_phase(&mut state, Phase::Voting);
        let delta = resolve_round(&state).unwrap();
        apply_delta(&mut state, &delta).unwrap();
        assert_eq!(state.current_round, 2);
        assert_eq!(state.game_phase, Phase::Speaking);
        assert!(state.eliminated_players.is_empty());
    }
}
