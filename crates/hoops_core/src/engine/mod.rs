//! # Possession Engine
//!
//! Everything that turns a `GameSetup` into a played game lives here.
//! `state` holds the aggregate, `possession` resolves one trip down the
//! floor, `game_loop` applies it, and `rotation` keeps five on the floor.

pub mod archetypes;
pub mod box_score;
pub mod defense;
pub mod fatigue;
pub mod game_loop;
pub mod momentum;
pub mod possession;
pub mod rng;
pub mod rotation;
pub mod session;
pub mod shot_model;
pub mod state;

#[cfg(test)]
pub mod test_fixtures;

pub use box_score::{extract_sim_result, RESULT_SCHEMA_VERSION};
pub use game_loop::{apply_result, step_possession, StepOutcome};
pub use momentum::MomentumState;
pub use possession::{resolve_possession, PossessionOutcome, PossessionResult};
pub use rng::SimRng;
pub use rotation::{apply_manual_substitution, check_and_apply_rotation, MinuteSet, RotationMap, RotationOverride};
pub use session::GameSession;
pub use state::{create_game_state, BenchReason, GameSetup, GameState, LivePlayer, TeamState};
