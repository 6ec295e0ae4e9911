//! # Defense / Rebound Model
//!
//! - `OpponentDefensiveMetrics`: minute-weighted aggregate of the five
//!   defenders, shifted by zone usage.
//! - Rebounds resolve in two steps: team ORB% from power ratios, then an
//!   attribute-weighted draw for the individual rebounder.
//! - Block chance on a missed attempt, with a help-block fallback.

use super::rng::SimRng;
use super::state::{LivePlayer, TeamState};
use crate::models::{Position, Zone};

/// ORB% band.
pub const MIN_ORB: f64 = 0.15;
pub const MAX_ORB: f64 = 0.40;
/// Defensive rebounding is weighted this much heavier than offensive.
const DEFENSE_POWER_WEIGHT: f64 = 2.5;
/// Shooter's weight when chasing their own miss.
const SHOOTER_REBOUND_PENALTY: f64 = 0.3;

/// Team defensive profile on a 0-1 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpponentDefensiveMetrics {
    pub interior: f64,
    pub perimeter: f64,
    pub block: f64,
    pub pressure: f64,
    pub help_iq: f64,
}

impl OpponentDefensiveMetrics {
    pub fn neutral() -> Self {
        Self { interior: 0.5, perimeter: 0.5, block: 0.5, pressure: 0.5, help_iq: 0.5 }
    }

    /// Aggregate the on-court defenders of `team`.
    ///
    /// Each defender is weighted by minutes played (floored at one minute) so
    /// a fresh sub does not swing the profile as hard as a 30-minute starter.
    pub fn from_team(team: &TeamState) -> Self {
        let mut acc = [0.0f64; 5];
        let mut total_weight = 0.0;
        for p in team.on_court_players() {
            let w = (p.stats.seconds_played as f64 / 60.0).max(1.0);
            let a = &p.attributes;
            acc[0] += w * a.interior_defense as f64;
            acc[1] += w * a.perimeter_defense as f64;
            acc[2] += w * a.block as f64;
            acc[3] += w * (a.steal as f64 * 0.5 + a.pass_perception as f64 * 0.5);
            acc[4] += w * a.help_defense_iq as f64;
            total_weight += w;
        }
        if total_weight <= 0.0 {
            return Self::neutral();
        }
        let avg = acc.map(|v| v / total_weight / 100.0);

        // Zone packs the paint at the expense of the perimeter.
        let z = team.sliders().zone_usage.saturating_sub(1) as f64;
        Self {
            interior: (avg[0] * (1.0 + z * 0.02)).min(1.0),
            perimeter: avg[1] * (1.0 - z * 0.015),
            block: avg[2],
            pressure: avg[3],
            help_iq: avg[4],
        }
    }
}

/// Rebounding power of the five on the floor.
fn rebound_power(team: &TeamState, offensive: bool) -> f64 {
    team.on_court_players()
        .map(|p| {
            let a = &p.attributes;
            let board = if offensive { a.offensive_rebound } else { a.defensive_rebound } as f64;
            (board * 0.6 + a.vertical as f64 * 0.2 + a.hustle as f64 * 0.2) / 100.0
                + ((p.height_cm as f64 - 198.0) / 100.0).max(-0.1)
        })
        .sum()
}

/// Probability that `offense` recovers its own miss.
pub fn orb_probability(offense: &TeamState, defense: &TeamState) -> f64 {
    let off = rebound_power(offense, true).max(0.01);
    let def = rebound_power(defense, false).max(0.01);
    let base = off / (off + DEFENSE_POWER_WEIGHT * def);
    let crash = 1.0 + (offense.sliders().off_reb as f64 - 5.0) * 0.04;
    // Switching everything leaves bigs on the perimeter.
    let box_out = 1.0 + (defense.sliders().switch_freq as f64 - 5.0) * 0.005;
    (base * crash * box_out).clamp(MIN_ORB, MAX_ORB)
}

fn position_bonus(position: Position) -> f64 {
    match position {
        Position::C => 15.0,
        Position::PF => 10.0,
        Position::SF => 4.0,
        _ => 0.0,
    }
}

pub fn rebound_weight(p: &LivePlayer, offensive: bool) -> f64 {
    let a = &p.attributes;
    let board = if offensive { a.offensive_rebound } else { a.defensive_rebound } as f64;
    let height = ((p.height_cm as f64 - 190.0) / 2.0).max(0.0);
    (board + a.vertical as f64 * 0.3 + height + position_bonus(p.position)).max(1.0)
}

/// Pick the rebounder on `team`; `shooter` is down-weighted on offensive boards.
pub fn select_rebounder<R: SimRng + ?Sized>(
    team: &TeamState,
    offensive: bool,
    shooter: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    let weights: Vec<f64> = team
        .on_court
        .iter()
        .map(|&i| {
            let w = rebound_weight(&team.players[i], offensive);
            if offensive && Some(i) == shooter { w * SHOOTER_REBOUND_PENALTY } else { w }
        })
        .collect();
    rng.weighted_index(&weights).map(|k| team.on_court[k])
}

fn zone_block_base(zone: Zone) -> f64 {
    match zone {
        Zone::Rim => 0.12,
        Zone::Paint => 0.09,
        Zone::Mid => 0.04,
        Zone::Three => 0.015,
    }
}

/// Chance that `defender` blocks a missed attempt from `zone`.
pub fn block_chance(defender: &LivePlayer, zone: Zone) -> f64 {
    let attr = (defender.attributes.block as f64 - 50.0) / 100.0 * 0.10;
    let archetype = (defender.archetypes.rim_protector - 50.0) / 100.0 * if zone.is_inside() { 0.08 } else { 0.02 };
    (zone_block_base(zone) + attr + archetype).clamp(0.0, 0.35)
}

/// Roll the block; the primary defender first, then the best help shot-blocker.
pub fn resolve_block<R: SimRng + ?Sized>(
    defense: &TeamState,
    defender: usize,
    zone: Zone,
    metrics: &OpponentDefensiveMetrics,
    rng: &mut R,
) -> Option<usize> {
    if rng.chance(block_chance(&defense.players[defender], zone)) {
        return Some(defender);
    }
    if !zone.is_inside() {
        return None;
    }
    let helper = defense
        .on_court
        .iter()
        .copied()
        .filter(|&i| i != defender)
        .max_by(|&a, &b| {
            defense.players[a]
                .archetypes
                .rim_protector
                .total_cmp(&defense.players[b].archetypes.rim_protector)
        })?;
    let help = metrics.block * 0.03 + metrics.help_iq * 0.02;
    rng.chance(help).then_some(helper)
}
