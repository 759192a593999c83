// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::state::{Role, Suspicion, Suspicions};

/// Roster of `min..=max` distinct ids: "p0", "p1", ...
pub fn roster(min: usize, max: usize) -> impl Strategy<Value = Vec<String>> {
    (min..=max).prop_map(|n| (0..n).map(|i| format!("p{i}")).collect())
}

pub fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Civilian), Just(Role::Spy)]
}

pub fn suspicion() -> impl Strategy<Value = Suspicion> {
    (role(), 0.0f64..=1.0, "[a-z ]{0,12}")
        .prop_map(|(role, confidence, reason)| Suspicion::new(role, confidence, reason))
}

/// Suspicion map over a small fixed id space so keys overlap between draws.
pub fn suspicions() -> impl Strategy<Value = Suspicions> {
    prop::collection::btree_map("p[0-5]", suspicion(), 0..6)
}

/// Roster plus one target per voter, given as roster indices.
pub fn roster_with_ballots() -> impl Strategy<Value = (Vec<String>, Vec<usize>)> {
    roster(3, 10).prop_flat_map(|players| {
        let n = players.len();
        (Just(players), prop::collection::vec(0..n, n))
    })
}
