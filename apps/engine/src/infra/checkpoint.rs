//! Checkpoint sinks for mid-game snapshots.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::snapshot;
use crate::domain::state::GameState;
use crate::error::EngineError;

/// Persists the state after every applied delta.
pub trait Checkpointer: Send + Sync {
    fn save(&self, state: &GameState) -> Result<(), EngineError>;

    fn load(&self, game_id: &str) -> Result<Option<GameState>, EngineError>;
}

/// Latest snapshot per game, kept as JSON in memory.
#[derive(Debug, Default)]
pub struct InMemoryCheckpointer {
    snapshots: Mutex<BTreeMap<String, String>>,
    saves: Mutex<usize>,
}

impl InMemoryCheckpointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saves so far, across all games.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl Checkpointer for InMemoryCheckpointer {
    fn save(&self, state: &GameState) -> Result<(), EngineError> {
        let json = snapshot::to_json(state)?;
        self.snapshots.lock().insert(state.game_id.clone(), json);
        *self.saves.lock() += 1;
        Ok(())
    }

    fn load(&self, game_id: &str) -> Result<Option<GameState>, EngineError> {
        let guard = self.snapshots.lock();
        match guard.get(game_id) {
            Some(json) => Ok(Some(snapshot::from_json(json)?)),
            None => Ok(None),
        }
    }
}

/// One `<game_id>.json` file per game under a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash never leaves a half-written snapshot behind.
#[derive(Debug, Clone)]
pub struct JsonFileCheckpointer {
    dir: PathBuf,
}

impl JsonFileCheckpointer {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// ASCII letters, digits and `-` pass through; every other byte becomes
    /// `_XX` (hex), so distinct ids never share a file.
    pub fn path_for(&self, game_id: &str) -> PathBuf {
        let mut safe = String::with_capacity(game_id.len());
        for byte in game_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                safe.push(char::from(byte));
            } else {
                safe.push_str(&format!("_{byte:02X}"));
            }
        }
        self.dir.join(format!("{safe}.json"))
    }
}

impl Checkpointer for JsonFileCheckpointer {
    fn save(&self, state: &GameState) -> Result<(), EngineError> {
        let path = self.path_for(&state.game_id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, snapshot::to_json(state)?)?;
        fs::rename(&tmp, &path)?;
        debug!(game_id = %state.game_id, path = %path.display(), "Checkpoint written");
        Ok(())
    }

    fn load(&self, game_id: &str) -> Result<Option<GameState>, EngineError> {
        let path = self.path_for(game_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        Ok(Some(snapshot::from_json(&json)?))
    }
}
