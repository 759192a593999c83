//! `agent` mode: the collaborator updates the mindset, a named vote strategy
//! turns the updated mindset into a target.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::behavior::fallback::fallback_vote;
use crate::behavior::guards::may_vote;
use crate::behavior::trait_def::{bounded, BehaviorError, PlayerBehavior, PlayerContext};
use crate::behavior::vote_strategy::VoteStrategy;
use crate::behavior::workflow::{speak_with, vote_delta};
use crate::collaborator::{DecisionCollaborator, PlayerView};
use crate::domain::merge::{merge_mindset, StateDelta};

/// Context extras key naming the vote strategy.
pub const VOTE_STRATEGY_KEY: &str = "vote_strategy";

pub struct AgentPlayer {
    decider: Arc<dyn DecisionCollaborator>,
}

impl AgentPlayer {
    pub const MODE: &'static str = "agent";

    pub fn new(decider: Arc<dyn DecisionCollaborator>) -> Self {
        Self { decider }
    }

    fn strategy(ctx: &PlayerContext) -> VoteStrategy {
        let name = ctx
            .extra_str(VOTE_STRATEGY_KEY)
            .unwrap_or(ctx.config.behavior.vote_strategy.as_str());
        VoteStrategy::from_name(name).unwrap_or_else(|| {
            warn!(strategy = name, "Unknown vote strategy; using eliminate-prime");
            VoteStrategy::EliminatePrime
        })
    }
}

#[async_trait]
impl PlayerBehavior for AgentPlayer {
    async fn decide_speech(&self, ctx: &PlayerContext) -> Result<StateDelta, BehaviorError> {
        Ok(speak_with(self.decider.as_ref(), ctx).await)
    }

    async fn decide_vote(&self, ctx: &PlayerContext) -> Result<StateDelta, BehaviorError> {
        let state = ctx.state.as_ref();
        let player_id = ctx.player_id.as_str();
        if !may_vote(state, player_id) {
            return Ok(StateDelta::default());
        }

        let view = PlayerView::for_player(state, player_id);
        let mindset_delta = match bounded(ctx.timeout(), self.decider.decide_vote(&view)).await {
            Ok(decision) => decision.mindset,
            Err(err) => {
                warn!(
                    game_id = %state.game_id,
                    round = state.current_round,
                    player_id,
                    error = %err,
                    "Mindset update failed; keeping prior mindset"
                );
                return Ok(fallback_vote(state, player_id));
            }
        };

        let prior = view.mindset();
        let updated = merge_mindset(prior, &mindset_delta);
        let strategy = Self::strategy(ctx);
        let Some(target) = strategy.choose_target(state, player_id, &updated) else {
            return Ok(StateDelta::default());
        };
        debug!(
            game_id = %state.game_id,
            player_id,
            strategy = strategy.name(),
            target = %target,
            "Agent vote"
        );

        Ok(vote_delta(state, player_id, target).with_mindset(player_id, mindset_delta))
    }
}
