use tracing::{debug, info};

use super::GameFlowService;
use crate::domain::game_transition::{derive_transitions, GameTransition};
use crate::domain::merge::{apply_delta, MergeOutcome, StateDelta};
use crate::domain::state::GameState;
use crate::error::EngineError;

impl GameFlowService {
    /// Merge `delta`, then log transitions, report metrics and checkpoint.
    pub(super) fn apply(
        &self,
        state: &mut GameState,
        delta: &StateDelta,
    ) -> Result<MergeOutcome, EngineError> {
        if delta.is_empty() {
            return Ok(MergeOutcome::default());
        }

        let before = state.clone();
        let outcome = apply_delta(state, delta)?;
        if outcome.dropped_speeches > 0 || outcome.dropped_votes > 0 {
            debug!(
                game_id = %state.game_id,
                dropped_speeches = outcome.dropped_speeches,
                dropped_votes = outcome.dropped_votes,
                "Stale writes dropped"
            );
        }

        self.report(&before, state, delta);

        for transition in derive_transitions(&before, state) {
            match &transition {
                GameTransition::VotingOpened { round } => {
                    info!(
                        game_id = %state.game_id,
                        round,
                        phase_id = %state.phase_id,
                        "Voting opened"
                    );
                }
                GameTransition::RoundAdvanced { round } => {
                    info!(
                        game_id = %state.game_id,
                        round,
                        phase_id = %state.phase_id,
                        "Round started"
                    );
                }
                GameTransition::PlayerEliminated { player_id } => {
                    info!(
                        game_id = %state.game_id,
                        round = before.current_round,
                        player_id = %player_id,
                        "Player eliminated"
                    );
                }
                GameTransition::GameEnded { winner } => {
                    info!(game_id = %state.game_id, winner = ?winner, "Game ended");
                    self.deps.metrics.game_end(&state.game_id, *winner);
                }
            }
        }

        if let Some(checkpointer) = &self.deps.checkpointer {
            checkpointer.save(state)?;
        }
        Ok(outcome)
    }

    fn report(&self, before: &GameState, after: &GameState, delta: &StateDelta) {
        let metrics = &self.deps.metrics;
        if !metrics.is_enabled() {
            return;
        }

        if !delta.clear_history {
            let new_speeches = after
                .completed_speeches
                .iter()
                .skip(before.completed_speeches.len());
            for speech in new_speeches {
                metrics.speech(&after.game_id, speech);
            }
        }
        for (voter, vote) in &delta.current_votes {
            if after.current_votes.get(voter) == Some(vote) {
                metrics.vote_cast(&after.game_id, after.current_round, voter, &vote.target);
            }
        }
        for (player, update) in &delta.player_private_states {
            if update.mindset.is_empty() || delta.clear_history {
                continue;
            }
            if let Some(private) = after.player_private_states.get(player) {
                metrics.mindset_update(
                    &after.game_id,
                    after.current_round,
                    player,
                    &private.mindset,
                );
            }
        }
    }
}
