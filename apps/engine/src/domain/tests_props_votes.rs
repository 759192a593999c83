//! Property tests for the convergence gate, elimination and phase fencing.
//!
//! Properties tested:
//! - `votes_ready` and the elimination outcome do not depend on vote order
//! - `votes_ready` holds exactly when every alive player voted this phase
//! - tie-breaks land inside the tied set
//! - `phase_id` never repeats within a game

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::domain::convergence::votes_ready;
use crate::domain::elimination::{calculate_eliminated_player, tally_votes};
use crate::domain::phase_fence::mint_phase_id;
use crate::domain::seed_derivation::rng_from_seed;
use crate::domain::state::{GameState, Phase};
use crate::domain::test_state_helpers::{cast, enter_phase, state_with_players};
use crate::domain::{test_gens, test_prelude};

fn voting_state(players: &[String]) -> GameState {
    let refs: Vec<&str> = players.iter().map(String::as_str).collect();
    let mut state = state_with_players(&refs);
    enter_phase(&mut state, Phase::Voting);
    state
}

type Ballots = (Vec<String>, Vec<(usize, usize)>, Vec<(usize, usize)>);

fn ballot_strategy() -> impl Strategy<Value = Ballots> {
    test_gens::roster_with_ballots().prop_flat_map(|(players, targets)| {
        let ballots: Vec<(usize, usize)> = targets.into_iter().enumerate().collect();
        let shuffled = Just(ballots.clone()).prop_shuffle();
        (Just(players), Just(ballots), shuffled)
    })
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: insertion order of votes is irrelevant
    #[test]
    fn prop_vote_order_is_irrelevant(
        (players, ballots, shuffled) in ballot_strategy(),
        voters_kept in 0usize..=10,
        seed in any::<u64>(),
    ) {
        let mut ordered = voting_state(&players);
        let mut reordered = voting_state(&players);
        for (voter, target) in ballots.iter().take(voters_kept) {
            cast(&mut ordered, &players[*voter], &players[*target]);
        }
        let kept: BTreeSet<usize> = ballots.iter().take(voters_kept).map(|(v, _)| *v).collect();
        for (voter, target) in shuffled.iter().filter(|(v, _)| kept.contains(v)) {
            cast(&mut reordered, &players[*voter], &players[*target]);
        }

        prop_assert_eq!(votes_ready(&ordered), votes_ready(&reordered));
        prop_assert_eq!(
            calculate_eliminated_player(&ordered, &mut rng_from_seed(seed)),
            calculate_eliminated_player(&reordered, &mut rng_from_seed(seed))
        );
    }

    /// Property: ready iff every alive player holds a current vote
    #[test]
    fn prop_ready_iff_all_alive_voted(
        (players, targets) in test_gens::roster_with_ballots(),
        voted_mask in prop::collection::vec(any::<bool>(), 10),
        dead_mask in prop::collection::vec(any::<bool>(), 10),
    ) {
        let mut state = voting_state(&players);
        for (i, player) in players.iter().enumerate() {
            if dead_mask[i] {
                state.eliminated_players.push(player.clone());
            }
        }
        for (i, player) in players.iter().enumerate() {
            if voted_mask[i] {
                cast(&mut state, player, &players[targets[i]]);
            }
        }
        let expected = players
            .iter()
            .enumerate()
            .all(|(i, _)| dead_mask[i] || voted_mask[i]);
        prop_assert_eq!(votes_ready(&state), expected);
    }

    /// Property: the eliminated player always carries the maximum tally
    #[test]
    fn prop_elimination_is_a_maximum(
        (players, targets) in test_gens::roster_with_ballots(),
        seed in any::<u64>(),
    ) {
        let mut state = voting_state(&players);
        for (voter, target) in players.iter().zip(&targets) {
            cast(&mut state, voter, &players[*target]);
        }
        let tally = tally_votes(&state);
        let max = tally.values().copied().max().unwrap();
        let eliminated = calculate_eliminated_player(&state, &mut rng_from_seed(seed)).unwrap();
        prop_assert_eq!(tally[&eliminated], max);
    }

    /// Property: tokens never repeat across the phases of one game
    #[test]
    fn prop_phase_ids_unique_within_game(seed in any::<u64>(), rounds in 1u32..30) {
        let mut seen = BTreeSet::new();
        for round in 1..=rounds {
            for phase in [Phase::Speaking, Phase::Voting, Phase::Result] {
                prop_assert!(seen.insert(mint_phase_id(seed, round, phase)));
            }
        }
    }
}
