//! Synthetic rosters for demos, the CLI and the batch statistics runner.

use super::json_api::{GameRequest, REQUEST_SCHEMA_VERSION};
use crate::engine::GameSetup;
use crate::models::{GameTactics, Player, PlayerAttributes, Position, Team};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FIRST_NAMES: [&str; 12] =
    ["Marcus", "Devin", "Andre", "Tyrese", "Jalen", "Nikola", "Luka", "Malik", "Darius", "Kobe", "Jamal", "Isaiah"];
const LAST_NAMES: [&str; 12] =
    ["Hart", "Vance", "Okafor", "Brooks", "Reyes", "Petrov", "Sato", "Mensah", "Cole", "Ingram", "Ward", "Lowe"];

/// Ratings per depth slot: starters, second unit, end of bench.
const SLOT_OVR: [u8; 3] = [76, 68, 60];

fn shade(value: u8, delta: i16) -> u8 {
    (value as i16 + delta).clamp(25, 99) as u8
}

/// Position-shaped rating sheet around `ovr` with a little per-player noise.
fn attributes_for(position: Position, ovr: u8, rng: &mut ChaCha8Rng) -> PlayerAttributes {
    let mut a = PlayerAttributes::uniform(ovr);
    let (guard, big) = match position {
        Position::PG => (10, -12),
        Position::SG => (7, -8),
        Position::SF => (2, -2),
        Position::PF => (-6, 6),
        Position::C => (-10, 10),
    };
    for v in [&mut a.three_point, &mut a.ball_handle, &mut a.pass_accuracy, &mut a.pass_vision, &mut a.speed_with_ball] {
        *v = shade(*v, guard);
    }
    for v in [&mut a.post_play, &mut a.block, &mut a.interior_defense, &mut a.offensive_rebound, &mut a.defensive_rebound, &mut a.strength] {
        *v = shade(*v, big);
    }
    for v in [&mut a.mid_range, &mut a.free_throw, &mut a.stamina, &mut a.steal, &mut a.perimeter_defense] {
        *v = shade(*v, rng.gen_range(-6..=6));
    }
    a
}

fn height_for(position: Position, rng: &mut ChaCha8Rng) -> u16 {
    let base = [188, 196, 203, 206, 211][position.index()];
    base + rng.gen_range(0..6)
}

/// Twelve-man roster: two per position plus a third guard and a third big.
pub fn demo_team(id: &str, name: &str, seed: u64) -> Team {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut slots: Vec<(Position, usize)> = Position::ALL.iter().flat_map(|&p| [(p, 0), (p, 1)]).collect();
    slots.push((Position::PG, 2));
    slots.push((Position::C, 2));

    let players = slots
        .into_iter()
        .enumerate()
        .map(|(n, (position, slot))| {
            let ovr = shade(SLOT_OVR[slot], rng.gen_range(-3..=3));
            Player {
                id: format!("{id}_{}", n + 1),
                name: format!("{} {}", FIRST_NAMES[rng.gen_range(0..12)], LAST_NAMES[rng.gen_range(0..12)]),
                position,
                height_cm: height_for(position, &mut rng),
                ovr,
                health: Default::default(),
                condition: 100.0,
                attributes: attributes_for(position, ovr, &mut rng),
                tendencies: None,
            }
        })
        .collect();

    Team { id: id.to_string(), name: name.to_string(), players }
}

pub fn demo_setup(seed: u64) -> GameSetup {
    GameSetup {
        home: demo_team("home", "Harbor City Herons", seed.wrapping_mul(2)),
        away: demo_team("away", "Ridgeview Rockets", seed.wrapping_mul(2).wrapping_add(1)),
        home_tactics: GameTactics::default(),
        away_tactics: GameTactics::default(),
        user_team_id: None,
        home_back_to_back: false,
        away_back_to_back: false,
        seed: Some(seed),
    }
}

/// Complete JSON-API request for a demo game.
pub fn demo_request(seed: u64) -> GameRequest {
    GameRequest { schema_version: REQUEST_SCHEMA_VERSION, setup: demo_setup(seed), config: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_team_is_valid() {
        let team = demo_team("t", "Test", 7);
        assert_eq!(team.players.len(), 12);
        team.validate().unwrap();
        let guards = team.players.iter().filter(|p| p.position.is_guard()).count();
        assert_eq!(guards, 5);
    }

    #[test]
    fn test_demo_rosters_are_seeded() {
        assert_eq!(demo_team("t", "Test", 3), demo_team("t", "Test", 3));
        assert_ne!(demo_team("t", "Test", 3), demo_team("t", "Test", 4));
    }

    #[test]
    fn test_positions_shape_ratings() {
        let team = demo_team("t", "Test", 11);
        let pg = team.players.iter().find(|p| p.position == Position::PG).unwrap();
        let c = team.players.iter().find(|p| p.position == Position::C).unwrap();
        assert!(pg.attributes.ball_handle > c.attributes.ball_handle);
        assert!(c.attributes.block > pg.attributes.block);
    }
}
