//! Game configuration.
//!
//! Precedence, lowest first:
//! 1. built-in defaults ([`GameConfig::default`]),
//! 2. an optional YAML file, deep-merged over the defaults (mappings merge
//!    key by key, anything else replaces, `null` keeps the default),
//! 3. validation of the merged result.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::domain::rules::MIN_PLAYERS;
use crate::domain::state::{PlayerId, WordPair};
use crate::error::EngineError;

/// Environment variable naming the YAML file read by [`GameConfig::from_env`].
pub const CONFIG_PATH_ENV: &str = "SPY_GAME_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub game: GameSection,
    pub behavior: BehaviorSettings,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSection {
    pub player_count: usize,
    /// `[civilian, spy]` pairs.
    pub vocabulary: Vec<(String, String)>,
    pub player_names: Vec<String>,
    pub settings: GameSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub min_players: usize,
    pub max_players: usize,
    pub max_rounds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorSettings {
    pub default_mode: String,
    /// Vote strategy for the `agent` mode when the context names none.
    pub vote_strategy: String,
    /// Per-decision deadline; `None` waits indefinitely.
    #[serde(default)]
    pub decision_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
}

const DEFAULT_VOCABULARY: &[(&str, &str)] = &[
    ("apple", "banana"),
    ("sun", "moon"),
    ("cat", "dog"),
    ("coffee", "tea"),
    ("laptop", "book"),
];

const DEFAULT_PLAYER_NAMES: &[&str] = &[
    "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Grace", "Henry", "Ivy", "Jack",
    "Katherine", "Leo", "Mia", "Noah", "Olivia", "Peter", "Quinn", "Rachel", "Sam", "Tina",
];

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game: GameSection {
                player_count: 4,
                vocabulary: DEFAULT_VOCABULARY
                    .iter()
                    .map(|(c, s)| (c.to_string(), s.to_string()))
                    .collect(),
                player_names: DEFAULT_PLAYER_NAMES.iter().map(|n| n.to_string()).collect(),
                settings: GameSettings {
                    min_players: MIN_PLAYERS,
                    max_players: 8,
                    max_rounds: 5,
                },
            },
            behavior: BehaviorSettings {
                default_mode: "workflow".to_string(),
                vote_strategy: "eliminate-prime".to_string(),
                decision_timeout_ms: None,
            },
            metrics: MetricsSettings::default(),
        }
    }
}

impl GameConfig {
    /// Defaults merged with the YAML at `path`, validated.
    ///
    /// A path that does not exist is not an error: the defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let overrides = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    EngineError::config(format!("failed to read {}: {e}", path.display()))
                })?;
                debug!(path = %path.display(), "Loading game config");
                Some(parse_overrides(&content, &path.display().to_string())?)
            }
            Some(path) => {
                warn!(path = %path.display(), "Config file not found; using defaults");
                None
            }
            None => None,
        };
        Self::from_overrides(overrides)
    }

    /// Defaults merged with YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EngineError> {
        Self::from_overrides(Some(parse_overrides(yaml, "inline yaml")?))
    }

    /// Reads the path from `SPY_GAME_CONFIG`; defaults when unset.
    pub fn from_env() -> Result<Self, EngineError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(Some(Path::new(path.trim()))),
            _ => Self::load(None),
        }
    }

    fn from_overrides(overrides: Option<Value>) -> Result<Self, EngineError> {
        let config = match overrides {
            Some(overrides) => {
                let base = serde_yaml::to_value(Self::default())?;
                let merged = deep_merge(base, overrides);
                serde_yaml::from_value(merged)
                    .map_err(|e| EngineError::config(format!("invalid configuration: {e}")))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let game = &self.game;
        let settings = &game.settings;

        if game.vocabulary.is_empty() {
            return Err(EngineError::config("vocabulary list cannot be empty"));
        }
        for (civilian, spy) in &game.vocabulary {
            if civilian.trim().is_empty() || spy.trim().is_empty() {
                return Err(EngineError::config(
                    "each vocabulary pair must contain two non-empty words",
                ));
            }
            if civilian == spy {
                return Err(EngineError::config(format!(
                    "vocabulary pair uses '{civilian}' for both sides"
                )));
            }
        }

        let mut names: Vec<&String> = game.player_names.iter().collect();
        names.sort();
        names.dedup();
        if names.len() != game.player_names.len() {
            return Err(EngineError::config("player names must be unique"));
        }
        if game.player_names.len() < game.player_count {
            return Err(EngineError::config(
                "player name pool is smaller than the configured player count",
            ));
        }

        if settings.min_players < MIN_PLAYERS {
            return Err(EngineError::config(format!(
                "min_players must be at least {MIN_PLAYERS}"
            )));
        }
        if settings.min_players > settings.max_players {
            return Err(EngineError::config("min_players cannot exceed max_players"));
        }
        if !(settings.min_players..=settings.max_players).contains(&game.player_count) {
            return Err(EngineError::config(
                "player_count must be between min_players and max_players (inclusive)",
            ));
        }
        if settings.max_rounds == 0 {
            return Err(EngineError::config("max_rounds must be at least 1"));
        }
        if self.behavior.default_mode.trim().is_empty() {
            return Err(EngineError::config("behavior.default_mode cannot be empty"));
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> Vec<WordPair> {
        self.game
            .vocabulary
            .iter()
            .map(|(civilian, spy)| WordPair::new(civilian, spy))
            .collect()
    }

    /// Default roster: the first `player_count` names of the pool.
    pub fn generate_player_names(&self) -> Vec<PlayerId> {
        self.game
            .player_names
            .iter()
            .take(self.game.player_count)
            .cloned()
            .collect()
    }

    pub fn max_rounds(&self) -> u32 {
        self.game.settings.max_rounds
    }

    pub fn decision_timeout(&self) -> Option<Duration> {
        self.behavior.decision_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_overrides(yaml: &str, origin: &str) -> Result<Value, EngineError> {
    let value: Value = serde_yaml::from_str(yaml)
        .map_err(|e| EngineError::config(format!("failed to parse {origin}: {e}")))?;
    match value {
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        Value::Mapping(_) => Ok(value),
        _ => Err(EngineError::config(format!(
            "{origin} must contain a top-level mapping"
        ))),
    }
}

/// Mappings merge recursively; any other non-null override replaces.
fn deep_merge(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Mapping(mut base), Value::Mapping(overrides)) => {
            for (key, override_value) in overrides {
                let merged = match base.remove(&key) {
                    Some(base_value) => deep_merge(base_value, override_value),
                    None => override_value,
                };
                base.insert(key, merged);
            }
            Value::Mapping(base)
        }
        (base, Value::Null) => base,
        (_, overrides) => overrides,
    }
}
