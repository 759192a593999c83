//! Seeded scripted decision maker.
//!
//! Used by the simulator and by tests in place of a generative backend.
//! Speeches are template sentences; suspicions and vote targets are drawn
//! at random among the alive opponents. Every decision draws from a stream
//! keyed by seat, round and phase, so the outcome does not depend on the
//! order in which concurrent voters are scheduled.

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;

use super::decision::{
    DecisionCollaborator, DecisionError, PlayerView, SpeechDecision, VoteDecision,
};
use crate::domain::merge::MindsetDelta;
use crate::domain::seed_derivation::{derive_player_seed, rng_from_seed, GameRng};
use crate::domain::state::{Role, SelfBelief, Suspicion, Suspicions};

const TEMPLATES: &[&str] = &[
    "It is something most people have seen today.",
    "You can usually find it close to home.",
    "I would not call it rare, but it is not everywhere either.",
    "Some people love it, some people ignore it.",
    "It comes in more than one shape or colour.",
];

pub struct ScriptedDecider {
    seed: u64,
}

impl ScriptedDecider {
    pub const NAME: &'static str = "scripted";

    /// `None` seeds from the thread RNG.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self { seed }
    }

    fn rng_for(&self, view: &PlayerView) -> GameRng {
        let seat = view
            .players
            .iter()
            .position(|p| *p == view.player_id)
            .unwrap_or(view.players.len());
        rng_from_seed(derive_player_seed(
            self.seed,
            seat,
            view.current_round,
            view.game_phase,
        ))
    }

    fn fresh_suspicions(view: &PlayerView, rng: &mut GameRng) -> Suspicions {
        view.alive_others()
            .map(|other| {
                let role = if rng.random_bool(0.3) {
                    Role::Spy
                } else {
                    Role::Civilian
                };
                let confidence = rng.random_range(0.3..=0.9);
                (
                    other.clone(),
                    Suspicion::new(role, confidence, "scripted hunch"),
                )
            })
            .collect()
    }
}

#[async_trait]
impl DecisionCollaborator for ScriptedDecider {
    async fn decide_speech(&self, view: &PlayerView) -> Result<SpeechDecision, DecisionError> {
        if view.word().is_empty() {
            return Err(DecisionError::InvalidDecision(format!(
                "player {} has no assigned word",
                view.player_id
            )));
        }
        let mut rng = self.rng_for(view);
        let template = TEMPLATES.choose(&mut rng).copied().unwrap_or(TEMPLATES[0]);
        let confidence = rng.random_range(0.4..=0.9);
        Ok(SpeechDecision {
            content: template.to_string(),
            mindset: MindsetDelta {
                self_belief: Some(SelfBelief::new(view.mindset().self_belief.role, confidence)),
                suspicions: Self::fresh_suspicions(view, &mut rng),
            },
        })
    }

    async fn decide_vote(&self, view: &PlayerView) -> Result<VoteDecision, DecisionError> {
        let others: Vec<_> = view.alive_others().cloned().collect();
        let mut rng = self.rng_for(view);
        let suspicions = Self::fresh_suspicions(view, &mut rng);
        let target = others
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| view.player_id.clone());
        Ok(VoteDecision {
            target,
            mindset: MindsetDelta {
                self_belief: None,
                suspicions,
            },
        })
    }
}
