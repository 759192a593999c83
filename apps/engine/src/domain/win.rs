use crate::domain::state::{alive_players, GameState, HostPrivateState, Role, Winner};

/// Decide whether either side has won.
///
/// Civilians win once no spy is alive; spies win once they are at least as
/// many as the alive civilians. The civilian check runs first.
pub fn determine_winner(
    state: &GameState,
    host_private_state: &HostPrivateState,
) -> Option<Winner> {
    let alive = alive_players(state);
    if alive.is_empty() {
        return None;
    }

    let count_role = |role: Role| {
        alive
            .iter()
            .filter(|p| host_private_state.role_of(p) == Some(role))
            .count()
    };
    let alive_spies = count_role(Role::Spy);
    let alive_civilians = count_role(Role::Civilian);

    if alive_spies == 0 {
        return Some(Winner::Civilians);
    }
    if alive_spies >= alive_civilians {
        return Some(Winner::Spies);
    }
    None
}
