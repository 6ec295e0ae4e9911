//! Test Fixtures Module
//!
//! Shared builders for engine unit tests.
//!
//! ## Usage
//! ```rust,ignore
//! use crate::engine::test_fixtures::*;
//! ```

use super::state::{create_game_state, GameSetup, GameState};
use crate::config::EngineConfig;
use crate::models::{GameTactics, HealthStatus, Player, PlayerAttributes, Position, Team};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const TEST_SEED: u64 = 20_240_601;

// =============================================================================
// Player / Team Creation Helpers
// =============================================================================

pub fn default_height(position: Position) -> u16 {
    match position {
        Position::PG => 188,
        Position::SG => 196,
        Position::SF => 203,
        Position::PF => 206,
        Position::C => 211,
    }
}

/// Player with every attribute equal to `ovr`.
pub fn create_test_player(id: &str, position: Position, ovr: u8) -> Player {
    Player {
        id: id.to_string(),
        name: format!("Player {}", id),
        position,
        height_cm: default_height(position),
        ovr,
        health: HealthStatus::Healthy,
        condition: 100.0,
        attributes: PlayerAttributes::uniform(ovr),
        tendencies: None,
    }
}

/// 12-man roster: two per position plus a third PG and C.
///
/// Ids are `{prefix}_{pos}{rank}` (e.g. `h_pg1`); starters rate 75, backups 68, thirds 60.
pub fn create_test_team(prefix: &str) -> Team {
    let mut players = Vec::with_capacity(12);
    for pos in Position::ALL {
        let code = pos.code().to_lowercase();
        players.push(create_test_player(&format!("{prefix}_{code}1"), pos, 75));
        players.push(create_test_player(&format!("{prefix}_{code}2"), pos, 68));
    }
    players.push(create_test_player(&format!("{prefix}_pg3"), Position::PG, 60));
    players.push(create_test_player(&format!("{prefix}_c3"), Position::C, 60));

    Team { id: format!("{prefix}_team"), name: format!("{} Team", prefix.to_uppercase()), players }
}

pub fn create_test_setup() -> GameSetup {
    GameSetup {
        home: create_test_team("h"),
        away: create_test_team("a"),
        home_tactics: GameTactics::default(),
        away_tactics: GameTactics::default(),
        user_team_id: None,
        home_back_to_back: false,
        away_back_to_back: false,
        seed: Some(TEST_SEED),
    }
}

pub fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(TEST_SEED)
}

pub fn create_test_state() -> GameState {
    create_test_state_with(&create_test_setup(), EngineConfig::default())
}

pub fn create_test_state_with(setup: &GameSetup, config: EngineConfig) -> GameState {
    create_game_state(setup, config, &mut test_rng()).expect("fixture setup is valid")
}

/// Index of `id` on either roster, panicking if absent.
pub fn idx(state: &GameState, id: &str) -> usize {
    state
        .home
        .index_of(id)
        .or_else(|| state.away.index_of(id))
        .unwrap_or_else(|| panic!("no player {id}"))
}
