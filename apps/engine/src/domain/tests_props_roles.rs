//! Property tests for role assignment and win detection.

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::domain::roles::assign_roles_and_words;
use crate::domain::rules::spy_count;
use crate::domain::seed_derivation::rng_from_seed;
use crate::domain::state::{alive_players, Role, Winner, WordPair};
use crate::domain::test_state_helpers::{host_with_roles, state_with_players};
use crate::domain::win::determine_winner;
use crate::domain::{test_gens, test_prelude};

fn vocabulary() -> Vec<WordPair> {
    vec![
        WordPair::new("apple", "banana"),
        WordPair::new("sun", "moon"),
        WordPair::new("cat", "dog"),
    ]
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: exact spy count, distinct words, a word for everybody
    #[test]
    fn prop_assignment_shape(players in test_gens::roster(3, 16), seed in any::<u64>()) {
        let mut rng = rng_from_seed(seed);
        let assignment = assign_roles_and_words(&players, &vocabulary(), None, &mut rng).unwrap();
        let host = &assignment.host_private_state;

        prop_assert_eq!(assignment.spies().len(), spy_count(players.len()));
        prop_assert_ne!(&host.civilian_word, &host.spy_word);
        prop_assert_eq!(host.player_roles.len(), players.len());
        for player in &players {
            let private = &assignment.player_private_states[player];
            let expected = match host.player_roles[player] {
                Role::Civilian => &host.civilian_word,
                Role::Spy => &host.spy_word,
            };
            prop_assert_eq!(&private.assigned_word, expected);
        }
    }

    /// Property: at most one winner, and the right one
    #[test]
    fn prop_winner_matches_alive_counts(
        roles in prop::collection::vec(test_gens::role(), 3..10),
        eliminated_mask in prop::collection::vec(any::<bool>(), 10),
    ) {
        let ids: Vec<String> = (0..roles.len()).map(|i| format!("p{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut state = state_with_players(&refs);
        let pairs: Vec<(&str, Role)> = refs.iter().copied().zip(roles.iter().copied()).collect();
        let host = host_with_roles(&pairs);
        for (id, dead) in ids.iter().zip(&eliminated_mask) {
            if *dead {
                state.eliminated_players.push(id.clone());
            }
        }

        let alive = alive_players(&state);
        let spies = alive.iter().filter(|p| host.role_of(p) == Some(Role::Spy)).count();
        let civilians = alive.len() - spies;

        let expected = if alive.is_empty() {
            None
        } else if spies == 0 {
            Some(Winner::Civilians)
        } else if spies >= civilians {
            Some(Winner::Spies)
        } else {
            None
        };
        prop_assert_eq!(determine_winner(&state, &host), expected);
    }
}

#[test]
fn assignment_is_uniform_enough_to_pick_everyone() {
    let players: Vec<String> = (0..5).map(|i| format!("p{i}")).collect();
    let mut ever_spy = BTreeSet::new();
    for seed in 0..200 {
        let mut rng = rng_from_seed(seed);
        let assignment = assign_roles_and_words(&players, &vocabulary(), None, &mut rng).unwrap();
        ever_spy.extend(assignment.spies().into_iter().cloned());
    }
    assert_eq!(ever_spy.len(), players.len());
}
