//! Role and word assignment at game start.

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::domain::rules::{spy_count, MIN_PLAYERS};
use crate::domain::state::{
    HostPrivateState, Mindset, PlayerId, PlayerPrivateState, Role, WordPair,
};
use crate::errors::domain::DomainError;

/// Output of [`assign_roles_and_words`], ready to merge into the game state.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleAssignment {
    pub host_private_state: HostPrivateState,
    pub player_private_states: BTreeMap<PlayerId, PlayerPrivateState>,
}

impl RoleAssignment {
    pub fn spies(&self) -> Vec<&PlayerId> {
        self.host_private_state
            .player_roles
            .iter()
            .filter(|(_, role)| **role == Role::Spy)
            .map(|(player, _)| player)
            .collect()
    }
}

/// Sample spies uniformly and hand out words.
///
/// Custom words in `host_override` win over the vocabulary when both halves
/// are present. Every mindset starts as "civilian, 50% sure" with no
/// suspicions.
pub fn assign_roles_and_words<R: Rng + ?Sized>(
    players: &[PlayerId],
    vocabulary: &[WordPair],
    host_override: Option<&HostPrivateState>,
    rng: &mut R,
) -> Result<RoleAssignment, DomainError> {
    if players.len() < MIN_PLAYERS {
        return Err(DomainError::InvalidPlayerCount {
            count: players.len(),
            min: MIN_PLAYERS,
        });
    }
    let distinct: BTreeSet<&PlayerId> = players.iter().collect();
    if distinct.len() != players.len() {
        return Err(DomainError::configuration("player ids must be unique"));
    }

    let words = match host_override.and_then(HostPrivateState::custom_words) {
        Some(custom) => {
            debug!(civilian = %custom.civilian, spy = %custom.spy, "Using custom words");
            custom
        }
        None => vocabulary
            .choose(rng)
            .cloned()
            .ok_or_else(|| DomainError::configuration("vocabulary is empty"))?,
    };
    if words.civilian == words.spy {
        return Err(DomainError::configuration(format!(
            "civilian and spy words must differ (both '{}')",
            words.civilian
        )));
    }

    let spies: BTreeSet<&PlayerId> = players
        .choose_multiple(rng, spy_count(players.len()))
        .collect();

    let mut player_roles = BTreeMap::new();
    let mut player_private_states = BTreeMap::new();
    for player in players {
        let (role, word) = if spies.contains(player) {
            (Role::Spy, &words.spy)
        } else {
            (Role::Civilian, &words.civilian)
        };
        player_roles.insert(player.clone(), role);
        player_private_states.insert(
            player.clone(),
            PlayerPrivateState {
                assigned_word: word.clone(),
                mindset: Mindset::default(),
            },
        );
    }

    Ok(RoleAssignment {
        host_private_state: HostPrivateState {
            player_roles,
            civilian_word: words.civilian,
            spy_word: words.spy,
        },
        player_private_states,
    })
}
