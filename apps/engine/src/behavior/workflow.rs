//! `workflow` mode: every decision comes from the collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::behavior::fallback::{fallback_speech, fallback_vote};
use crate::behavior::guards::{is_valid_target, may_speak, may_vote};
use crate::behavior::trait_def::{bounded, BehaviorError, PlayerBehavior, PlayerContext};
use crate::collaborator::{DecisionCollaborator, PlayerView};
use crate::domain::merge::StateDelta;
use crate::domain::state::{
    default_vote_target, next_speech_seq, now_millis, GameState, PlayerId, Speech, Vote,
};

pub struct WorkflowPlayer {
    decider: Arc<dyn DecisionCollaborator>,
}

impl WorkflowPlayer {
    pub const MODE: &'static str = "workflow";

    pub fn new(decider: Arc<dyn DecisionCollaborator>) -> Self {
        Self { decider }
    }
}

/// Ask `decider` for a speech; fall back to an empty one on failure.
pub(crate) async fn speak_with(
    decider: &dyn DecisionCollaborator,
    ctx: &PlayerContext,
) -> StateDelta {
    let state = ctx.state.as_ref();
    let player_id = ctx.player_id.as_str();
    if !may_speak(state, player_id) {
        return StateDelta::default();
    }

    let view = PlayerView::for_player(state, player_id);
    match bounded(ctx.timeout(), decider.decide_speech(&view)).await {
        Ok(decision) => StateDelta::speech(Speech {
            round: state.current_round,
            seq: next_speech_seq(state),
            player_id: player_id.to_string(),
            content: decision.content,
            ts: now_millis(),
        })
        .with_mindset(player_id, decision.mindset),
        Err(err) => {
            warn!(
                game_id = %state.game_id,
                round = state.current_round,
                player_id,
                error = %err,
                "Speech decision failed"
            );
            fallback_speech(state, player_id)
        }
    }
}

pub(crate) fn vote_delta(state: &GameState, voter: &str, target: PlayerId) -> StateDelta {
    StateDelta::vote(
        voter,
        Vote {
            target,
            ts: now_millis(),
            phase_id: state.phase_id.clone(),
        },
    )
}

#[async_trait]
impl PlayerBehavior for WorkflowPlayer {
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
        let decision = match bounded(ctx.timeout(), self.decider.decide_vote(&view)).await {
            Ok(decision) => decision,
            Err(err) => {
                warn!(
                    game_id = %state.game_id,
                    round = state.current_round,
                    player_id,
                    error = %err,
                    "Vote decision failed"
                );
                return Ok(fallback_vote(state, player_id));
            }
        };

        let target = if is_valid_target(state, player_id, &decision.target) {
            decision.target
        } else {
            debug!(
                game_id = %state.game_id,
                player_id,
                target = %decision.target,
                "Collaborator picked an invalid target; using default"
            );
            match default_vote_target(state, player_id) {
                Some(target) => target,
                None => return Ok(StateDelta::default()),
            }
        };

        Ok(vote_delta(state, player_id, target).with_mindset(player_id, decision.mindset))
    }
}
