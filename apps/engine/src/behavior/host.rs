use crate::behavior::trait_def::{HostBehavior, HostContext};
use crate::domain::merge::StateDelta;
use crate::domain::phase_controller;
use crate::errors::domain::DomainError;

/// Host shared by the built-in modes: the phase state machine with the
/// vocabulary and default roster taken from configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhaseControllerHost;

impl HostBehavior for PhaseControllerHost {
    fn setup(&self, ctx: &HostContext<'_>) -> Result<StateDelta, DomainError> {
        phase_controller::setup(
            ctx.state,
            &ctx.config.vocabulary(),
            &ctx.config.generate_player_names(),
        )
    }

    fn stage_switch(&self, ctx: &HostContext<'_>) -> Result<StateDelta, DomainError> {
        Ok(phase_controller::stage_switch(ctx.state))
    }

    fn resolve_round(&self, ctx: &HostContext<'_>) -> Result<StateDelta, DomainError> {
        phase_controller::resolve_round(ctx.state)
    }
}
