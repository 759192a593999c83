//! JSON snapshots of a whole [`GameState`], used for checkpoint and resume.

use crate::domain::state::GameState;

pub fn to_json(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(state)
}

pub fn from_json(json: &str) -> Result<GameState, serde_json::Error> {
    serde_json::from_str(json)
}
