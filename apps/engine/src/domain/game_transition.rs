use crate::domain::state::{GameState, Phase, PlayerId, Winner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameTransition {
    /// Edge-triggered: speaking -> voting within a round.
    VotingOpened { round: u32 },

    /// Edge-triggered: the round counter moved forward.
    RoundAdvanced { round: u32 },

    /// Explicit: a player joined `eliminated_players`.
    PlayerEliminated { player_id: PlayerId },

    /// Edge-triggered: game moved into `result`.
    GameEnded { winner: Option<Winner> },
}

/// Derive transitions from a before/after pair of states.
pub fn derive_transitions(before: &GameState, after: &GameState) -> Vec<GameTransition> {
    let mut transitions = Vec::new();

    // 1. Voting opened
    if before.game_phase != Phase::Voting && after.game_phase == Phase::Voting {
        transitions.push(GameTransition::VotingOpened {
            round: after.current_round,
        });
    }

    // 2. Eliminations, in the order they were appended
    for player_id in after
        .eliminated_players
        .iter()
        .filter(|p| !before.is_eliminated(p))
    {
        transitions.push(GameTransition::PlayerEliminated {
            player_id: player_id.clone(),
        });
    }

    // 3. Round advance (setup's 0 -> 1 counts too)
    if after.current_round > before.current_round {
        transitions.push(GameTransition::RoundAdvanced {
            round: after.current_round,
        });
    }

    // 4. Game end
    if before.game_phase != Phase::Result && after.game_phase == Phase::Result {
        transitions.push(GameTransition::GameEnded {
            winner: after.winner,
        });
    }

    transitions
}
