use rand::Rng;
use tracing::info;
use ulid::Ulid;

use super::{GameFlowService, GameOutcome, GameStatus, NewGame};
use crate::behavior::HostContext;
use crate::domain::state::{GameState, HostPrivateState, Phase};
use crate::error::EngineError;
use crate::errors::domain::DomainError;

impl GameFlowService {
    /// Build the initial state through the active mode's host setup.
    pub fn start_game(&self, new_game: NewGame) -> Result<GameState, EngineError> {
        let config = self.deps.config.as_ref();
        let settings = &config.game.settings;
        let requested = new_game.players.len();
        if requested > 0 && !(settings.min_players..=settings.max_players).contains(&requested) {
            return Err(DomainError::configuration(format!(
                "{requested} players requested, between {} and {} allowed",
                settings.min_players, settings.max_players
            ))
            .into());
        }

        let game_id = new_game
            .game_id
            .unwrap_or_else(|| Ulid::new().to_string());
        let seed = new_game.seed.unwrap_or_else(|| rand::rng().random());

        let mut state = GameState::new(game_id, new_game.players, seed);
        state.behavior_mode = new_game.behavior_mode;
        if let Some(words) = new_game.custom_words {
            state.host_private_state =
                HostPrivateState::with_custom_words(words.civilian, words.spy);
        }

        let host = self.deps.modes.host(&state)?;
        let delta = host.setup(&HostContext {
            state: &state,
            config,
        })?;
        self.apply(&mut state, &delta)?;

        info!(
            game_id = %state.game_id,
            mode = self.deps.modes.active_mode(&state),
            players = state.players.len(),
            seed = state.rng_seed,
            "Game started"
        );
        self.deps.metrics.game_start(
            &state.game_id,
            &state.players,
            &state.host_private_state.player_roles,
        );
        Ok(state)
    }

    /// Drive `state` until a side wins or the round limit stops it.
    ///
    /// Accepts a state in any phase after setup, including one restored from a
    /// checkpoint mid-voting.
    pub async fn run_game(&self, mut state: GameState) -> Result<GameOutcome, EngineError> {
        loop {
            match state.game_phase {
                Phase::Setup => {
                    return Err(DomainError::phase_mismatch(Phase::Speaking, Phase::Setup).into());
                }
                Phase::Result => {
                    return Ok(GameOutcome {
                        status: GameStatus::Finished,
                        state,
                    });
                }
                Phase::Speaking => self.run_speaking(&mut state).await?,
                Phase::Voting => {
                    self.run_voting(&mut state).await?;
                    if !self.resolve(&mut state)? {
                        return Ok(GameOutcome {
                            status: GameStatus::RoundLimitReached,
                            state,
                        });
                    }
                }
            }
        }
    }

    /// Start a game and run it to the end.
    pub async fn play(&self, new_game: NewGame) -> Result<GameOutcome, EngineError> {
        let state = self.start_game(new_game)?;
        self.run_game(state).await
    }

    /// Continue a game from its latest checkpoint.
    pub async fn resume_game(&self, game_id: &str) -> Result<GameOutcome, EngineError> {
        let checkpointer = self
            .deps
            .checkpointer
            .as_ref()
            .ok_or_else(|| EngineError::config("no checkpointer configured"))?;
        let state = checkpointer
            .load(game_id)?
            .ok_or_else(|| DomainError::validation(format!("no checkpoint for game {game_id}")))?;
        info!(
            game_id,
            round = state.current_round,
            phase = %state.game_phase,
            "Resuming game from checkpoint"
        );
        self.run_game(state).await
    }

    /// Resolve the converged vote. Returns `false` when the resulting round
    /// would exceed `max_rounds`; the delta is then not applied.
    fn resolve(&self, state: &mut GameState) -> Result<bool, EngineError> {
        let host = self.deps.modes.host(state)?;
        let delta = host.resolve_round(&HostContext {
            state: &*state,
            config: self.deps.config.as_ref(),
        })?;

        let max_rounds = self.deps.config.max_rounds();
        if let (Some(Phase::Speaking), Some(next_round)) = (delta.game_phase, delta.current_round) {
            if next_round > max_rounds {
                info!(
                    game_id = %state.game_id,
                    round = state.current_round,
                    max_rounds,
                    "Round limit reached; stopping"
                );
                return Ok(false);
            }
        }

        self.apply(state, &delta)?;
        Ok(true)
    }
}
