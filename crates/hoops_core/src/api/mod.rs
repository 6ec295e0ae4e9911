pub mod json_api;
pub mod sample;

pub use json_api::{simulate_game, simulate_game_json, GameRequest, REQUEST_SCHEMA_VERSION};
pub use sample::{demo_request, demo_setup, demo_team};
