//! Vote target strategies used by the `agent` mode.

use std::collections::BTreeMap;

use crate::domain::state::{alive_players, GameState, Mindset, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteStrategy {
    /// Vote for the player whose suspected role is furthest from our own.
    EliminatePrime,
    /// Join the current majority unless it targets us.
    Consensus,
    /// Vote against whoever is voting for us.
    Defensive,
}

impl VoteStrategy {
    pub const ALL: [VoteStrategy; 3] = [
        VoteStrategy::EliminatePrime,
        VoteStrategy::Consensus,
        VoteStrategy::Defensive,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            VoteStrategy::EliminatePrime => "eliminate-prime",
            VoteStrategy::Consensus => "consensus",
            VoteStrategy::Defensive => "defensive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Target for `voter`, or `None` when nobody is alive.
    pub fn choose_target(
        self,
        state: &GameState,
        voter: &str,
        mindset: &Mindset,
    ) -> Option<PlayerId> {
        match self {
            VoteStrategy::EliminatePrime => eliminate_prime(state, voter, mindset),
            VoteStrategy::Consensus => {
                consensus(state, voter).or_else(|| eliminate_prime(state, voter, mindset))
            }
            VoteStrategy::Defensive => defensive(state, voter, mindset),
        }
    }
}

/// Trust score per alive opponent: `+confidence` when the suspected role
/// matches ours, `-confidence` otherwise, `0` without a suspicion. The lowest
/// score is voted; roster order breaks ties.
///
/// A self-belief below 50% confidence is read as the opposite role.
fn eliminate_prime(state: &GameState, voter: &str, mindset: &Mindset) -> Option<PlayerId> {
    let belief = mindset.self_belief;
    let my_role = if belief.confidence < 0.5 {
        belief.role.opposite()
    } else {
        belief.role
    };

    let mut best: Option<(&PlayerId, f64)> = None;
    for other in state.players.iter().filter(|p| state.is_alive(p) && p.as_str() != voter) {
        let score = match mindset.suspicions.get(other) {
            Some(s) if s.role == my_role => s.confidence,
            Some(s) => -s.confidence,
            None => 0.0,
        };
        match best {
            Some((_, lowest)) if score >= lowest => {}
            _ => best = Some((other, score)),
        }
    }

    best.map(|(p, _)| p.clone())
        .or_else(|| state.is_alive(voter).then(|| voter.to_string()))
}

/// Majority of the current valid votes; ties go to the highest id.
fn consensus(state: &GameState, voter: &str) -> Option<PlayerId> {
    let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, vote) in state.valid_votes() {
        *tally.entry(vote.target.as_str()).or_insert(0) += 1;
    }
    let (top, _) = tally
        .into_iter()
        .max_by(|(a_id, a_n), (b_id, b_n)| a_n.cmp(b_n).then(a_id.cmp(b_id)))?;
    (top != voter && state.is_alive(top)).then(|| top.to_string())
}

fn defensive(state: &GameState, voter: &str, mindset: &Mindset) -> Option<PlayerId> {
    let attacker = state.players.iter().find(|p| {
        p.as_str() != voter
            && state.is_alive(p)
            && state
                .current_votes
                .get(p.as_str())
                .is_some_and(|v| v.phase_id == state.phase_id && v.target == voter)
    });
    if let Some(attacker) = attacker {
        return Some(attacker.clone());
    }

    match eliminate_prime(state, voter, mindset) {
        Some(target) if target == voter => alive_players(state)
            .into_iter()
            .find(|p| p != voter)
            .or(Some(target)),
        other => other,
    }
}
