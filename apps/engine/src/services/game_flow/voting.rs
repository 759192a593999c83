use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use super::GameFlowService;
use crate::behavior::fallback::fallback_vote;
use crate::behavior::{BehaviorError, PlayerContext};
use crate::domain::convergence::{pending_voters, votes_ready};
use crate::domain::merge::StateDelta;
use crate::domain::state::{GameState, Phase, PlayerId};
use crate::error::EngineError;

type VoteResult = (PlayerId, Result<StateDelta, BehaviorError>);

impl GameFlowService {
    /// Collect a vote from every alive player who does not yet hold one.
    ///
    /// All pending voters decide concurrently against the same snapshot.
    /// Deltas are applied in arrival order. A voter still without a valid
    /// vote once the channel closes gets the fallback vote.
    pub(super) async fn run_voting(&self, state: &mut GameState) -> Result<(), EngineError> {
        if state.game_phase != Phase::Voting || votes_ready(state) {
            return Ok(());
        }

        let voters = pending_voters(state);
        let snapshot = Arc::new(state.clone());
        let (tx, mut rx) = mpsc::channel::<VoteResult>(voters.len().max(1));
        let mut tasks = JoinSet::new();

        for voter in &voters {
            let behavior = self.deps.modes.player(state, voter)?;
            let ctx = PlayerContext::new(
                Arc::clone(&snapshot),
                voter.clone(),
                Arc::clone(&self.deps.config),
            )
            .with_extras(Arc::clone(&self.extras));
            let tx = tx.clone();
            tasks.spawn(async move {
                let result = behavior.decide_vote(&ctx).await;
                // Receiver gone means the phase was already closed.
                let _ = tx.send((ctx.player_id, result)).await;
            });
        }
        drop(tx);

        debug!(
            game_id = %state.game_id,
            round = state.current_round,
            voters = voters.len(),
            "Collecting votes"
        );

        while let Some((voter, result)) = rx.recv().await {
            let delta = match result {
                Ok(delta) => delta,
                Err(err) => {
                    warn!(
                        game_id = %state.game_id,
                        player_id = %voter,
                        error = %err,
                        "Vote behavior failed"
                    );
                    fallback_vote(state, &voter)
                }
            };
            self.apply(state, &delta)?;
            if votes_ready(state) {
                break;
            }
        }
        drop(rx);

        while let Some(joined) = tasks.join_next().await {
            if let Err(join_err) = joined {
                error!(game_id = %state.game_id, error = %join_err, "Vote task aborted");
            }
        }

        for voter in pending_voters(state) {
            let fallback = fallback_vote(state, &voter);
            self.apply(state, &fallback)?;
        }
        Ok(())
    }
}
