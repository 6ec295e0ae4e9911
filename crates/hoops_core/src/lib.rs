//! # hoops_core - Possession-by-Possession Basketball Simulation Engine
//!
//! Plays a full game between two rosters one possession at a time and
//! returns a box score, play-by-play, shot chart and rotation history.
//!
//! ## Features
//! - Deterministic simulation (same seed = same game)
//! - Minute-based rotation plan with fatigue, foul trouble and injuries
//! - Step-wise sessions for live front-ends, one-shot JSON API for batch use

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

// Re-export main API
pub use api::{simulate_game, simulate_game_json, GameRequest};
pub use config::EngineConfig;
pub use engine::{GameSession, GameSetup};
pub use error::{Result, SimError};
pub use models::SimulationResult;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_json(seed: u64) -> String {
        json!({
            "schema_version": 1,
            "seed": seed,
            "home": api::demo_team("home", "Test Home", 1),
            "away": api::demo_team("away", "Test Away", 2),
        })
        .to_string()
    }

    #[test]
    fn test_basic_simulation() {
        let result = simulate_game_json(&request_json(42));
        assert!(result.is_ok(), "Simulation should succeed");

        let parsed: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        assert!(parsed["home_score"].is_number());
        assert!(parsed["away_score"].is_number());
        assert!(parsed["winner_team_id"].is_string());
        assert_eq!(parsed["home"]["players"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn test_determinism() {
        let request = request_json(999);
        let first = simulate_game_json(&request).unwrap();
        let second = simulate_game_json(&request).unwrap();
        assert_eq!(first, second, "Same seed should produce same result");
    }

    #[test]
    fn test_malformed_request_is_an_error() {
        assert!(matches!(simulate_game_json("{not json"), Err(SimError::Serialization(_))));
        let missing_away = json!({ "schema_version": 1, "home": api::demo_team("home", "H", 1) });
        assert!(simulate_game_json(&missing_away.to_string()).is_err());
    }
}
