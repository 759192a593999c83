use std::sync::Arc;

use tracing::{debug, error, warn};

use super::GameFlowService;
use crate::behavior::fallback::fallback_speech;
use crate::behavior::{HostContext, PlayerContext};
use crate::domain::merge::StateDelta;
use crate::domain::state::{next_alive_player, GameState, Phase, PlayerId};
use crate::error::EngineError;

impl GameFlowService {
    /// One speaking phase: alive players in roster order. After every
    /// speech the host gets a chance to open voting.
    pub(super) async fn run_speaking(&self, state: &mut GameState) -> Result<(), EngineError> {
        while state.game_phase == Phase::Speaking {
            if let Some(speaker) = next_alive_player(state) {
                let delta = self.request_speech(state, &speaker).await?;
                self.apply(state, &delta)?;

                if !state.has_spoken_this_round(&speaker) {
                    let fallback = fallback_speech(state, &speaker);
                    self.apply(state, &fallback)?;
                }
                if !state.has_spoken_this_round(&speaker) {
                    return Err(EngineError::internal(format!(
                        "speaking made no progress for {speaker} in round {}",
                        state.current_round
                    )));
                }
            }

            let host = self.deps.modes.host(state)?;
            let switch = host.stage_switch(&HostContext {
                state: &*state,
                config: self.deps.config.as_ref(),
            })?;
            if switch.is_empty() && next_alive_player(state).is_none() {
                return Err(EngineError::internal(format!(
                    "host did not open voting for round {}",
                    state.current_round
                )));
            }
            self.apply(state, &switch)?;
        }
        Ok(())
    }

    /// Run the player's behavior on its own task so a panic stays contained.
    async fn request_speech(
        &self,
        state: &GameState,
        speaker: &PlayerId,
    ) -> Result<StateDelta, EngineError> {
        let behavior = self.deps.modes.player(state, speaker)?;
        let ctx = PlayerContext::new(
            Arc::new(state.clone()),
            speaker.clone(),
            Arc::clone(&self.deps.config),
        )
        .with_extras(Arc::clone(&self.extras));

        debug!(
            game_id = %state.game_id,
            round = state.current_round,
            player_id = %speaker,
            "Requesting speech"
        );
        let handle = tokio::spawn(async move { behavior.decide_speech(&ctx).await });

        let delta = match handle.await {
            Ok(Ok(delta)) => delta,
            Ok(Err(err)) => {
                warn!(
                    game_id = %state.game_id,
                    player_id = %speaker,
                    error = %err,
                    "Speech behavior failed"
                );
                fallback_speech(state, speaker)
            }
            Err(join_err) => {
                error!(
                    game_id = %state.game_id,
                    player_id = %speaker,
                    error = %join_err,
                    "Speech task aborted"
                );
                fallback_speech(state, speaker)
            }
        };
        Ok(delta)
    }
}
