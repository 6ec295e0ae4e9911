//! JSON API
//!
//! One call plays a whole game: a `GameRequest` document in, the
//! serialized `SimulationResult` out. Games are reproducible whenever the
//! request carries a `seed`.

use crate::config::EngineConfig;
use crate::engine::{GameSession, GameSetup};
use crate::error::{Result, SimError};
use crate::models::SimulationResult;
use serde::{Deserialize, Serialize};

pub const REQUEST_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRequest {
    pub schema_version: u8,
    #[serde(flatten)]
    pub setup: GameSetup,
    /// Engine tuning; defaults to `EngineConfig::default()`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,
}

/// Run a full game for an already-parsed request.
pub fn simulate_game(request: &GameRequest) -> Result<SimulationResult> {
    if request.schema_version != REQUEST_SCHEMA_VERSION {
        return Err(SimError::UnsupportedSchema(request.schema_version));
    }
    let config = request.config.clone().unwrap_or_default();
    GameSession::new(&request.setup, config)?.run_to_end()
}

/// Main entry point for the JSON API.
pub fn simulate_game_json(request_json: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request_json)?;
    let result = simulate_game(&request)?;
    Ok(serde_json::to_string(&result)?)
}
