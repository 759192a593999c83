//! Property tests for the suspicion merge.

use proptest::prelude::*;

use crate::domain::merge::merge_probs;
use crate::domain::{test_gens, test_prelude};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: absent keys survive, present keys are overwritten
    #[test]
    fn prop_merge_probs_overwrite_or_preserve(
        old in test_gens::suspicions(),
        new in test_gens::suspicions(),
    ) {
        let merged = merge_probs(&old, &new);

        for (key, value) in &old {
            if !new.contains_key(key) {
                prop_assert_eq!(&merged[key], value);
            }
        }
        for (key, value) in &new {
            prop_assert_eq!(&merged[key], value);
        }
        for key in merged.keys() {
            prop_assert!(old.contains_key(key) || new.contains_key(key));
        }
    }

    /// Property: merging with an empty update is the identity
    #[test]
    fn prop_merge_probs_empty_update(old in test_gens::suspicions()) {
        let merged = merge_probs(&old, &Default::default());
        prop_assert_eq!(merged, old);
    }
}
