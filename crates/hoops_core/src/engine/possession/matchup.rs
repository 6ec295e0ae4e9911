//! Actor and defender selection.

use crate::engine::rng::SimRng;
use crate::engine::shot_model;
use crate::engine::state::{LivePlayer, TeamState};
use crate::error::{Result, SimError};
use crate::models::{PlayType, Position, Zone};
use serde::{Deserialize, Serialize};

/// Help-defense credit share on steals.
const HELP_STEAL_SHARE: f64 = 0.2;

/// Defensive situation of one possession.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupFlags {
    pub is_switch: bool,
    /// Switch miscommunication leaving the shooter open.
    pub is_botched_switch: bool,
    pub is_mismatch: bool,
    pub is_zone: bool,
    pub is_ace_target: bool,
}

/// Usage weight for the primary actor.
pub fn actor_weight(p: &LivePlayer, play: PlayType) -> f64 {
    let fit = p.archetypes.play_fit(play) / 100.0;
    let ovr = p.ovr as f64 / 100.0;
    let w = fit * fit * 3.0 + ovr * ovr;
    if p.condition < 50.0 { w * 0.7 } else { w }
}

pub fn select_actor<R: SimRng + ?Sized>(team: &TeamState, play: PlayType, rng: &mut R) -> Result<usize> {
    if team.on_court.is_empty() {
        return Err(SimError::EmptyLineup { team: team.side });
    }
    let weights: Vec<f64> = team.on_court_players().map(|p| actor_weight(p, play)).collect();
    let pick = rng.weighted_index(&weights).unwrap_or(0);
    Ok(team.on_court[pick])
}

/// Screener or passer; `None` when the actor is alone on the floor.
pub fn select_secondary<R: SimRng + ?Sized>(
    team: &TeamState,
    play: PlayType,
    actor: usize,
    rng: &mut R,
) -> Option<usize> {
    let candidates: Vec<usize> = team.on_court.iter().copied().filter(|&i| i != actor).collect();
    let weights: Vec<f64> = candidates
        .iter()
        .map(|&i| {
            let fit = team.players[i].archetypes.support_fit(play) / 100.0;
            fit * fit + 0.05
        })
        .collect();
    rng.weighted_index(&weights).map(|k| candidates[k])
}

/// Defender at the same position, else the closest one on the spectrum.
fn positional_defender(defense: &TeamState, position: Position) -> Option<usize> {
    defense
        .on_court
        .iter()
        .copied()
        .min_by_key(|&i| defense.players[i].position.distance(position))
}

/// Interior anchor of a zone: center, else power forward, else the tallest.
fn zone_anchor(defense: &TeamState) -> Option<usize> {
    let find = |pos: Position| defense.on_court.iter().copied().find(|&i| defense.players[i].position == pos);
    find(Position::C)
        .or_else(|| find(Position::PF))
        .or_else(|| defense.on_court.iter().copied().max_by_key(|&i| defense.players[i].height_cm))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefensiveAssignment {
    pub defender: usize,
    pub flags: MatchupFlags,
}

/// Who guards the actor on this possession.
///
/// 1. Zone (`zone_usage * 0.08`): inside shots go to the interior anchor.
/// 2. Designated stopper on the opposing ace.
/// 3. Positional defender, with a switch check on screen plays.
pub fn select_defender<R: SimRng + ?Sized>(
    offense: &TeamState,
    defense: &TeamState,
    actor: usize,
    screener: Option<usize>,
    play: PlayType,
    zone: Zone,
    rng: &mut R,
) -> Result<DefensiveAssignment> {
    let empty = || SimError::EmptyLineup { team: defense.side };
    if defense.on_court.is_empty() {
        return Err(empty());
    }
    let shooter = &offense.players[actor];
    let sliders = defense.sliders();
    let mut flags = MatchupFlags::default();

    let defender = if rng.chance(sliders.zone_usage as f64 * 0.08) {
        flags.is_zone = true;
        if zone.is_inside() {
            zone_anchor(defense)
        } else {
            positional_defender(defense, shooter.position)
        }
    } else if let Some(stopper) = defense
        .stopper_on_court()
        .filter(|_| offense.ace == Some(actor))
    {
        Some(stopper)
    } else {
        let mut defender = positional_defender(defense, shooter.position);
        if let Some(screener) = screener.filter(|_| play.is_screen_play()) {
            if rng.chance(sliders.switch_freq as f64 * 0.05) {
                let switched = positional_defender(defense, offense.players[screener].position);
                if switched.is_some() && switched != defender {
                    flags.is_switch = true;
                    flags.is_botched_switch = rng.chance((10.0 - sliders.help_def as f64) * 0.02);
                    defender = switched;
                }
            }
        }
        defender
    };

    let defender = defender.ok_or_else(empty)?;
    flags.is_mismatch = shot_model::is_mismatch(shooter, &defense.players[defender]);
    Ok(DefensiveAssignment { defender, flags })
}

/// Steal credit: usually the on-ball defender, sometimes a help defender.
pub fn select_stealer<R: SimRng + ?Sized>(defense: &TeamState, defender: usize, rng: &mut R) -> usize {
    if !rng.chance(HELP_STEAL_SHARE) {
        return defender;
    }
    let helpers: Vec<usize> = defense.on_court.iter().copied().filter(|&i| i != defender).collect();
    let weights: Vec<f64> =
        helpers.iter().map(|&i| defense.players[i].archetypes.pickpocket.max(1.0)).collect();
    rng.weighted_index(&weights).map(|k| helpers[k]).unwrap_or(defender)
}
