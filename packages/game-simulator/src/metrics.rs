//! Per-game report built from the final state and the recorded events.

use std::collections::BTreeMap;

use serde::Serialize;
use spy_engine::collaborator::MetricsEvent;
use spy_engine::domain::{GameState, Role};
use spy_engine::GameStatus;

use crate::simulator::GameResult;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_num: u32,
    pub game_id: String,
    pub seed: u64,
    pub timestamp: String,
    pub config: SimulationConfig,
    pub result: GameResultMetrics,
    pub eliminations: Vec<EliminationMetrics>,
    pub player_metrics: Vec<PlayerMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationConfig {
    pub mode: String,
    pub vote_strategy: String,
    pub players: usize,
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub status: GameStatus,
    pub winner: Option<String>,
    pub rounds_played: u32,
    pub spies: usize,
    pub civilian_word: String,
    pub spy_word: String,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EliminationMetrics {
    /// One elimination per resolved round, so this is also the round.
    pub order: u32,
    pub player_id: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub player_id: String,
    pub role: Option<Role>,
    pub survived: bool,
    pub speeches: u32,
    pub votes_cast: u32,
    /// Votes whose target was actually a spy.
    pub votes_on_spies: u32,
    pub final_self_confidence: f64,
    /// Share of final suspicions whose role guess was right.
    pub suspicion_accuracy: Option<f64>,
}

/// Build metrics from a finished simulation.
pub fn build_game_metrics(
    game_num: u32,
    seed: u64,
    config: SimulationConfig,
    result: &GameResult,
    duration_ms: f64,
) -> GameMetrics {
    let state = &result.outcome.state;
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let roles = &state.host_private_state.player_roles;
    let eliminations = state
        .eliminated_players
        .iter()
        .enumerate()
        .map(|(i, player_id)| EliminationMetrics {
            order: i as u32 + 1,
            player_id: player_id.clone(),
            role: roles.get(player_id).copied(),
        })
        .collect();

    let tallies = tally_events(state, &result.events);
    let player_metrics = state
        .players
        .iter()
        .map(|player_id| build_player_metrics(state, player_id, tallies.get(player_id)))
        .collect();

    GameMetrics {
        game_num,
        game_id: state.game_id.clone(),
        seed,
        timestamp,
        config,
        result: GameResultMetrics {
            status: result.outcome.status,
            winner: state.winner.map(|w| w.to_string()),
            rounds_played: result.outcome.rounds_played(),
            spies: roles.values().filter(|r| **r == Role::Spy).count(),
            civilian_word: state.host_private_state.civilian_word.clone(),
            spy_word: state.host_private_state.spy_word.clone(),
            duration_ms,
        },
        eliminations,
        player_metrics,
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct EventTally {
    speeches: u32,
    votes_cast: u32,
    votes_on_spies: u32,
}

fn tally_events(state: &GameState, events: &[MetricsEvent]) -> BTreeMap<String, EventTally> {
    let roles = &state.host_private_state.player_roles;
    let mut tallies: BTreeMap<String, EventTally> = BTreeMap::new();
    for event in events {
        match event {
            MetricsEvent::Speech { player_id, .. } => {
                tallies.entry(player_id.clone()).or_default().speeches += 1;
            }
            MetricsEvent::VoteCast { voter, target, .. } => {
                let tally = tallies.entry(voter.clone()).or_default();
                tally.votes_cast += 1;
                if roles.get(target) == Some(&Role::Spy) {
                    tally.votes_on_spies += 1;
                }
            }
            _ => {}
        }
    }
    tallies
}

fn build_player_metrics(
    state: &GameState,
    player_id: &str,
    tally: Option<&EventTally>,
) -> PlayerMetrics {
    let tally = tally.copied().unwrap_or_default();
    let roles = &state.host_private_state.player_roles;
    let mindset = state.player_private_states.get(player_id).map(|p| &p.mindset);

    let suspicion_accuracy = mindset.and_then(|m| {
        if m.suspicions.is_empty() {
            return None;
        }
        let correct = m
            .suspicions
            .iter()
            .filter(|(other, s)| roles.get(*other) == Some(&s.role))
            .count();
        Some(correct as f64 / m.suspicions.len() as f64)
    });

    PlayerMetrics {
        player_id: player_id.to_string(),
        role: roles.get(player_id).copied(),
        survived: !state.is_eliminated(player_id),
        speeches: tally.speeches,
        votes_cast: tally.votes_cast,
        votes_on_spies: tally.votes_on_spies,
        final_self_confidence: mindset.map(|m| m.self_belief.confidence).unwrap_or(0.0),
        suspicion_accuracy,
    }
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_num: u32,
    pub game_id: String,
    pub seed: u64,
    pub status: GameStatus,
    pub winner: String,
    pub rounds_played: u32,
    pub spies: usize,
    pub spies_eliminated: usize,
    pub mode: String,
    pub vote_strategy: String,
    pub duration_ms: f64,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        CsvSummaryRow {
            game_num: metrics.game_num,
            game_id: metrics.game_id.clone(),
            seed: metrics.seed,
            status: metrics.result.status,
            winner: metrics.result.winner.clone().unwrap_or_default(),
            rounds_played: metrics.result.rounds_played,
            spies: metrics.result.spies,
            spies_eliminated: metrics
                .eliminations
                .iter()
                .filter(|e| e.role == Some(Role::Spy))
                .count(),
            mode: metrics.config.mode.clone(),
            vote_strategy: metrics.config.vote_strategy.clone(),
            duration_ms: metrics.result.duration_ms,
        }
    }
}
