//! Round resolution scenarios driven through the host state machine.

use crate::domain::convergence::votes_ready;
use crate::domain::merge::apply_delta;
use crate::domain::phase_controller::resolve_round;
use crate::domain::state::{Phase, Role, Winner};
use crate::domain::test_state_helpers::{cast, enter_phase, state_with_players, with_roles};

#[test]
fn majority_vote_eliminates_and_advances_round() {
    let mut state = state_with_players(&["a", "b", "c", "d", "e"]);
    with_roles(
        &mut state,
        &[
            ("a", Role::Civilian),
            ("b", Role::Spy),
            ("c", Role::Civilian),
            ("d", Role::Civilian),
            ("e", Role::Civilian),
        ],
    );
    enter_phase(&mut state, Phase::Voting);
    cast(&mut state, "b", "a");
    cast(&mut state, "c", "a");
    cast(&mut state, "d", "b");
    cast(&mut state, "e", "a");

    let delta = resolve_round(&state).unwrap();
    apply_delta(&mut state, &delta).unwrap();

    assert_eq!(state.eliminated_players, vec!["a"]);
    assert_eq!(state.current_round, 2);
    assert_eq!(state.game_phase, Phase::Speaking);
    assert!(state.current_votes.is_empty());
    assert_eq!(state.winner, None);
}

#[test]
fn elimination_reaching_parity_hands_spies_the_win() {
    let mut state = state_with_players(&["a", "b", "c"]);
    state.eliminated_players.push("d".into());
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
    cast(&mut state, "a", "c");
    assert!(!votes_ready(&state));

    let delta = resolve_round(&state).unwrap();
    apply_delta(&mut state, &delta).unwrap();

    assert!(state.is_eliminated("c"));
    assert_eq!(state.game_phase, Phase::Result);
    assert_eq!(state.winner, Some(Winner::Spies));
}

#[test]
fn tied_vote_eliminates_one_of_the_tied_reproducibly() {
    let build = || {
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
        cast(&mut state, "a", "c");
        cast(&mut state, "b", "d");
        cast(&mut state, "c", "c");
        cast(&mut state, "d", "d");
        state
    };

    let first = resolve_round(&build()).unwrap();
    let second = resolve_round(&build()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.eliminated_players.len(), 1);
    let eliminated = &first.eliminated_players[0];
    assert!(eliminated == "c" || eliminated == "d");
}
