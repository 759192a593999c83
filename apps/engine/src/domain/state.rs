use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::phase_fence::PhaseId;

pub type PlayerId = String;

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Roles not yet assigned.
    Setup,
    /// Alive players speak one at a time in roster order.
    Speaking,
    /// Alive players vote concurrently.
    Voting,
    /// Game over; the state no longer changes.
    Result,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Speaking => "speaking",
            Phase::Voting => "voting",
            Phase::Result => "result",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hidden role of a player.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Civilian,
    Spy,
}

impl Role {
    pub const fn opposite(self) -> Self {
        match self {
            Role::Civilian => Role::Spy,
            Role::Spy => Role::Civilian,
        }
    }
}

/// Winning side.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Civilians,
    Spies,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Civilians => f.write_str("civilians"),
            Winner::Spies => f.write_str("spies"),
        }
    }
}

/// One spoken description, appended to the public log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speech {
    pub round: u32,
    /// Position within the round, strictly increasing.
    pub seq: u32,
    pub player_id: PlayerId,
    pub content: String,
    /// Unix epoch milliseconds.
    pub ts: i64,
}

/// A ballot. Only counts while `phase_id` matches the state's fencing token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub target: PlayerId,
    pub ts: i64,
    pub phase_id: PhaseId,
}

/// Civilian/spy word pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub civilian: String,
    pub spy: String,
}

impl WordPair {
    pub fn new(civilian: impl Into<String>, spy: impl Into<String>) -> Self {
        Self {
            civilian: civilian.into(),
            spy: spy.into(),
        }
    }
}

/// Secrets only host-side logic may read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostPrivateState {
    pub player_roles: BTreeMap<PlayerId, Role>,
    pub civilian_word: String,
    pub spy_word: String,
}

impl HostPrivateState {
    /// Seed state carrying custom words for setup.
    pub fn with_custom_words(
        civilian_word: impl Into<String>,
        spy_word: impl Into<String>,
    ) -> Self {
        Self {
            player_roles: BTreeMap::new(),
            civilian_word: civilian_word.into(),
            spy_word: spy_word.into(),
        }
    }

    /// Both words present means the host wants them instead of the vocabulary.
    pub fn custom_words(&self) -> Option<WordPair> {
        if self.civilian_word.is_empty() || self.spy_word.is_empty() {
            return None;
        }
        Some(WordPair::new(&self.civilian_word, &self.spy_word))
    }

    pub fn role_of(&self, player_id: &str) -> Option<Role> {
        self.player_roles.get(player_id).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelfBelief {
    pub role: Role,
    pub confidence: f64,
}

impl SelfBelief {
    pub fn new(role: Role, confidence: f64) -> Self {
        Self {
            role,
            confidence: clamp_confidence(confidence),
        }
    }
}

impl Default for SelfBelief {
    fn default() -> Self {
        Self::new(Role::Civilian, 0.5)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suspicion {
    pub role: Role,
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

impl Suspicion {
    pub fn new(role: Role, confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            role,
            confidence: clamp_confidence(confidence),
            reason: reason.into(),
        }
    }
}

pub type Suspicions = BTreeMap<PlayerId, Suspicion>;

/// What a player believes about itself and everyone else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mindset {
    pub self_belief: SelfBelief,
    #[serde(default)]
    pub suspicions: Suspicions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPrivateState {
    pub assigned_word: String,
    #[serde(default)]
    pub mindset: Mindset,
}

/// The single shared document a game operates on.
///
/// Plain scalars, ordered lists and maps only, so a checkpoint can snapshot
/// and resume it mid-phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: String,
    /// Turn order; fixed at setup.
    pub players: Vec<PlayerId>,
    /// 1-based once the game is set up.
    pub current_round: u32,
    pub game_phase: Phase,
    pub phase_id: PhaseId,
    #[serde(default)]
    pub completed_speeches: Vec<Speech>,
    #[serde(default)]
    pub eliminated_players: Vec<PlayerId>,
    #[serde(default)]
    pub current_votes: BTreeMap<PlayerId, Vote>,
    #[serde(default)]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub host_private_state: HostPrivateState,
    #[serde(default)]
    pub player_private_states: BTreeMap<PlayerId, PlayerPrivateState>,
    /// Behavior mode used for dispatch; `None` falls back to the configured default.
    #[serde(default)]
    pub behavior_mode: Option<String>,
    /// Base seed every random decision of this game derives from.
    pub rng_seed: u64,
}

impl GameState {
    /// Pre-setup state. Setup fills in roles, words, round and phase.
    pub fn new(game_id: impl Into<String>, players: Vec<PlayerId>, rng_seed: u64) -> Self {
        Self {
            game_id: game_id.into(),
            players,
            current_round: 0,
            game_phase: Phase::Setup,
            phase_id: PhaseId::unset(),
            completed_speeches: Vec::new(),
            eliminated_players: Vec::new(),
            current_votes: BTreeMap::new(),
            winner: None,
            host_private_state: HostPrivateState::default(),
            player_private_states: BTreeMap::new(),
            behavior_mode: None,
            rng_seed,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.game_phase == Phase::Result
    }

    pub fn is_eliminated(&self, player_id: &str) -> bool {
        self.eliminated_players.iter().any(|p| p == player_id)
    }

    pub fn is_alive(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p == player_id) && !self.is_eliminated(player_id)
    }

    pub fn has_spoken_this_round(&self, player_id: &str) -> bool {
        self.completed_speeches
            .iter()
            .any(|s| s.round == self.current_round && s.player_id == player_id)
    }

    /// Votes that still count for the current phase.
    pub fn valid_votes(&self) -> impl Iterator<Item = (&PlayerId, &Vote)> + '_ {
        self.current_votes
            .iter()
            .filter(move |(_, vote)| vote.phase_id == self.phase_id)
    }

    pub fn has_valid_vote(&self, player_id: &str) -> bool {
        self.current_votes
            .get(player_id)
            .is_some_and(|vote| vote.phase_id == self.phase_id)
    }
}

/// Alive players in roster order.
pub fn alive_players(state: &GameState) -> Vec<PlayerId> {
    state
        .players
        .iter()
        .filter(|p| !state.is_eliminated(p))
        .cloned()
        .collect()
}

/// Next alive player (roster order) who has not spoken in the current round.
///
/// Pure: derived entirely from `completed_speeches`.
pub fn next_alive_player(state: &GameState) -> Option<PlayerId> {
    state
        .players
        .iter()
        .filter(|p| !state.is_eliminated(p))
        .find(|p| !state.has_spoken_this_round(p))
        .cloned()
}

/// Deterministic vote used when a decision cannot be obtained: the first other
/// alive player in roster order, or the voter itself when nobody else is left.
pub fn default_vote_target(state: &GameState, voter: &str) -> Option<PlayerId> {
    state
        .players
        .iter()
        .filter(|p| !state.is_eliminated(p))
        .find(|p| p.as_str() != voter)
        .cloned()
        .or_else(|| state.is_alive(voter).then(|| voter.to_string()))
}

/// `seq` for the next speech of the current round.
pub fn next_speech_seq(state: &GameState) -> u32 {
    state
        .completed_speeches
        .iter()
        .filter(|s| s.round == state.current_round)
        .map(|s| s.seq + 1)
        .max()
        .unwrap_or(0)
}

pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
