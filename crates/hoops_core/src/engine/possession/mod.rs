//! # Possession Resolver
//!
//! Resolves one possession against a read-only `GameState` and returns a
//! `PossessionResult`. Nothing here touches score, stats or momentum; the
//! game loop applies the result afterwards.
//!
//! ## Pipeline
//! 1. Play type (putback / fast break short-circuits, then weighted draw)
//! 2. Primary and secondary actor
//! 3. Shot sub-zone, then the defender for that zone
//! 4. Foul check (shooting, bonus, or dead-ball)
//! 5. Turnover / steal check (skipped on putbacks)
//! 6. Shot: make (assist, and-one) or miss (block, rebound)

pub mod free_throws;
pub mod matchup;
pub mod play_selection;
pub mod probability_validator;

pub use free_throws::{free_throw_pct, shoot_free_throws, FreeThrowTrip};
pub use matchup::{DefensiveAssignment, MatchupFlags};
pub use play_selection::{select_play, Clutch, PlayContext};
pub use probability_validator::{ProbabilityValidator, WeightError};

use super::defense::{self, OpponentDefensiveMetrics};
use super::rng::SimRng;
use super::shot_model::{self, AceMatchup, ShotContext};
use super::state::{GameState, LivePlayer, TeamState, BONUS_TEAM_FOULS};
use crate::error::{Result, SimError};
use crate::models::{PlayType, SubZone, TacticSliders, TeamSide, Zone};
use serde::{Deserialize, Serialize};

/// Turnover probability bounds.
pub const MIN_TURNOVER: f64 = 0.02;
pub const MAX_TURNOVER: f64 = 0.25;
/// Ceiling on the per-possession foul roll.
const MAX_FOUL: f64 = 0.18;

// ========== Result types ==========

/// One field-goal attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotAttempt {
    pub shooter: String,
    pub defender: String,
    pub sub_zone: SubZone,
    pub x: f32,
    pub y: f32,
    pub hit_rate: f64,
    pub matchup_effect: f64,
}

impl ShotAttempt {
    pub fn points(&self) -> u8 {
        self.sub_zone.zone().points()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rebound {
    pub rebounder: String,
    pub offensive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndOne {
    pub fouler: String,
    pub trip: FreeThrowTrip,
}

/// How the possession ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PossessionOutcome {
    Score {
        shot: ShotAttempt,
        assist: Option<String>,
        and_one: Option<AndOne>,
    },
    Miss {
        shot: ShotAttempt,
        blocked_by: Option<String>,
        /// `None` only when nobody could be credited.
        rebound: Option<Rebound>,
    },
    Turnover {
        ball_handler: String,
        stolen_by: Option<String>,
    },
    /// Non-shooting foul outside the bonus; the offense inbounds.
    Foul {
        fouler: String,
        fouled: String,
    },
    FreeThrow {
        fouler: String,
        trip: FreeThrowTrip,
        /// Set when the last attempt missed.
        rebound: Option<Rebound>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossessionResult {
    pub offense: TeamSide,
    pub play_type: PlayType,
    pub flags: MatchupFlags,
    /// Clock seconds the possession used.
    pub elapsed_sec: u16,
    pub outcome: PossessionOutcome,
}

impl PossessionResult {
    /// Points the offense scored on this possession.
    pub fn points(&self) -> u8 {
        match &self.outcome {
            PossessionOutcome::Score { shot, and_one, .. } => {
                shot.points() + and_one.as_ref().map_or(0, |a| a.trip.made)
            }
            PossessionOutcome::FreeThrow { trip, .. } => trip.made,
            _ => 0,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(&self.outcome, PossessionOutcome::Miss { blocked_by: Some(_), .. })
    }

    pub fn is_steal(&self) -> bool {
        matches!(&self.outcome, PossessionOutcome::Turnover { stolen_by: Some(_), .. })
    }

    pub fn is_and_one(&self) -> bool {
        matches!(&self.outcome, PossessionOutcome::Score { and_one: Some(_), .. })
    }

    /// Offensive rebound or dead-ball foul: the same side keeps the ball.
    pub fn keeps_possession(&self) -> bool {
        match &self.outcome {
            PossessionOutcome::Miss { rebound, .. } | PossessionOutcome::FreeThrow { rebound, .. } => {
                rebound.as_ref().map_or(false, |r| r.offensive)
            }
            PossessionOutcome::Foul { .. } => true,
            _ => false,
        }
    }
}

// ========== Probabilities ==========

fn foul_trouble_multiplier(personal_fouls: u8) -> f64 {
    match personal_fouls {
        0..=2 => 1.0,
        3 => 0.85,
        4 => 0.60,
        _ => 0.30,
    }
}

/// Chance the defender commits a foul this possession.
pub fn foul_chance(defense: &TacticSliders, defender: &LivePlayer) -> f64 {
    let base = (0.08 + defense.def_intensity as f64 * 0.015).min(MAX_FOUL);
    base * foul_trouble_multiplier(defender.stats.pf)
}

/// Given a foul, the chance it came on a shot.
pub fn shooting_foul_chance(zone: Zone, defense: &TacticSliders, actor: &LivePlayer) -> f64 {
    let base = match zone {
        Zone::Rim => 0.55,
        Zone::Paint => 0.45,
        Zone::Mid => 0.20,
        Zone::Three => 0.06,
    };
    let draw = (actor.attributes.draw_foul as f64 - 50.0) / 100.0 * 0.2;
    (base + defense.def_intensity as f64 * 0.01 + draw).clamp(0.0, 0.95)
}

fn play_turnover_risk(play: PlayType) -> f64 {
    match play {
        PlayType::Transition => 0.02,
        PlayType::Isolation | PlayType::PostUp => 0.01,
        PlayType::PnrHandler => 0.005,
        _ => 0.0,
    }
}

pub fn turnover_chance(
    offense: &TacticSliders,
    defense: &TacticSliders,
    actor: &LivePlayer,
    metrics: &OpponentDefensiveMetrics,
    play: PlayType,
) -> f64 {
    let security = (actor.attributes.ball_handle as f64 + actor.attributes.pass_iq as f64) / 200.0;
    let p = 0.08 + (offense.ball_movement as f64 - 5.0) * 0.004
        + (defense.def_intensity as f64 - 5.0) * 0.006
        + defense.full_court_press.saturating_sub(1) as f64 * 0.004
        + (metrics.pressure - 0.5) * 0.04
        - (security - 0.5) * 0.08
        + play_turnover_risk(play);
    p.clamp(MIN_TURNOVER, MAX_TURNOVER)
}

/// Given a turnover, the chance it was a steal.
pub fn steal_chance(defense: &TacticSliders, defender: &LivePlayer) -> f64 {
    let p = 0.45
        + (defender.attributes.steal as f64 - 50.0) / 100.0 * 0.3
        + (defender.archetypes.pickpocket - 50.0) / 100.0 * 0.2
        + defense.full_court_press.saturating_sub(1) as f64 * 0.01;
    p.clamp(0.2, 0.75)
}

pub fn and_one_chance(defense: &TacticSliders) -> f64 {
    0.03 + defense.def_intensity as f64 * 0.004
}

/// Clock seconds the possession consumes, capped by both clocks.
pub fn possession_duration<R: SimRng + ?Sized>(
    state: &GameState,
    play: PlayType,
    clutch: Option<Clutch>,
    rng: &mut R,
) -> u16 {
    let pace = state.team(state.possession).sliders().pace as f64;
    let mut secs = match play {
        PlayType::Transition => rng.range(4.0, 8.0),
        PlayType::Putback => rng.range(2.0, 4.0),
        _ => (18.0 - pace * 0.8) * (0.6 + 0.8 * rng.next_f64()),
    };
    // Leading late: milk the clock.
    if clutch == Some(Clutch::Leading) {
        secs += 4.0;
    }
    let cap = (state.shot_clock as u16).min(state.game_clock).max(1);
    (secs.round() as u16).clamp(1, cap)
}

// ========== Resolver ==========

/// Everything decided before the foul / turnover / shot branches.
struct Setup<'a> {
    offense: &'a TeamState,
    defense: &'a TeamState,
    play: PlayType,
    actor: usize,
    secondary: Option<usize>,
    sub_zone: SubZone,
    assignment: DefensiveAssignment,
    metrics: OpponentDefensiveMetrics,
}

impl Setup<'_> {
    fn actor(&self) -> &LivePlayer {
        &self.offense.players[self.actor]
    }

    fn defender(&self) -> &LivePlayer {
        &self.defense.players[self.assignment.defender]
    }
}

pub fn resolve_possession<R: SimRng + ?Sized>(state: &GameState, rng: &mut R) -> Result<PossessionResult> {
    let side = state.possession;
    let offense = state.team(side);
    let defense = state.team(side.opponent());
    for team in [offense, defense] {
        if team.on_court.is_empty() {
            return Err(SimError::EmptyLineup { team: team.side });
        }
    }

    let ctx = PlayContext::from_state(state, side);
    let play = select_play(&ctx, rng);
    let actor = matchup::select_actor(offense, play, rng)?;
    let secondary = matchup::select_secondary(offense, play, actor, rng);
    let sub_zone = shot_model::select_sub_zone(&offense.players[actor], play, offense.sliders(), rng);
    let assignment =
        matchup::select_defender(offense, defense, actor, secondary, play, sub_zone.zone(), rng)?;
    let elapsed_sec = possession_duration(state, play, ctx.clutch, rng);

    let setup = Setup {
        offense,
        defense,
        play,
        actor,
        secondary,
        sub_zone,
        assignment,
        metrics: OpponentDefensiveMetrics::from_team(defense),
    };

    let mut flags = assignment.flags;
    let outcome = match resolve_foul(&setup, rng) {
        Some(outcome) => outcome,
        None => match resolve_turnover(&setup, rng) {
            Some(outcome) => outcome,
            None => {
                let (outcome, shot_flags) = resolve_shot(state, &setup, rng);
                flags = shot_flags;
                outcome
            }
        },
    };

    Ok(PossessionResult { offense: side, play_type: play, flags, elapsed_sec, outcome })
}

fn resolve_foul<R: SimRng + ?Sized>(s: &Setup<'_>, rng: &mut R) -> Option<PossessionOutcome> {
    let sliders = s.defense.sliders();
    if !rng.chance(foul_chance(sliders, s.defender())) {
        return None;
    }
    let fouler = s.defender().id.clone();
    let shooting = rng.chance(shooting_foul_chance(s.sub_zone.zone(), sliders, s.actor()));
    let in_bonus = s.defense.team_fouls + 1 >= BONUS_TEAM_FOULS;
    if !shooting && !in_bonus {
        return Some(PossessionOutcome::Foul { fouler, fouled: s.actor().id.clone() });
    }

    let trip = shoot_free_throws(s.actor(), 2, rng);
    let rebound = if trip.last_made { None } else { free_throw_rebound(s, rng) };
    Some(PossessionOutcome::FreeThrow { fouler, trip, rebound })
}

/// Rebound off a missed last free throw, at half the usual offensive share.
fn free_throw_rebound<R: SimRng + ?Sized>(s: &Setup<'_>, rng: &mut R) -> Option<Rebound> {
    let offensive = rng.chance(defense::orb_probability(s.offense, s.defense) / 2.0);
    let team = if offensive { s.offense } else { s.defense };
    defense::select_rebounder(team, offensive, None, rng)
        .map(|i| Rebound { rebounder: team.players[i].id.clone(), offensive })
}

fn resolve_turnover<R: SimRng + ?Sized>(s: &Setup<'_>, rng: &mut R) -> Option<PossessionOutcome> {
    if s.play == PlayType::Putback {
        return None;
    }
    let p = turnover_chance(s.offense.sliders(), s.defense.sliders(), s.actor(), &s.metrics, s.play);
    if !rng.chance(p) {
        return None;
    }
    let stolen_by = rng
        .chance(steal_chance(s.defense.sliders(), s.defender()))
        .then(|| matchup::select_stealer(s.defense, s.assignment.defender, rng))
        .map(|i| s.defense.players[i].id.clone());
    Some(PossessionOutcome::Turnover { ball_handler: s.actor().id.clone(), stolen_by })
}

/// Ace-stopper exposure when the shooter is the offense's ace.
fn ace_matchup(offense: &TeamState, defense: &TeamState, actor: usize, defender: usize) -> Option<AceMatchup> {
    if offense.ace != Some(actor) {
        return None;
    }
    let stopper = defense.stopper?;
    let ace = &offense.players[actor];
    Some(AceMatchup::from_exposure(
        defense.players[stopper].archetypes.perimeter_stopper,
        ace.stopper_guarded_sec,
        ace.stopper_free_sec,
        defender == stopper,
        defense.is_on_court(stopper),
    ))
}

fn resolve_shot<R: SimRng + ?Sized>(
    state: &GameState,
    s: &Setup<'_>,
    rng: &mut R,
) -> (PossessionOutcome, MatchupFlags) {
    let side = s.offense.side;
    let ctx = ShotContext {
        sub_zone: s.sub_zone,
        play: s.play,
        offense: s.offense.sliders(),
        defense: s.defense.sliders(),
        is_home: side.is_home(),
        momentum: state.momentum.shooting_modifier(side),
        flags: s.assignment.flags,
        ace: ace_matchup(s.offense, s.defense, s.actor, s.assignment.defender),
        tie_break: state.is_tie_break(),
    };
    let hit = shot_model::calculate_hit_rate(s.actor(), s.defender(), &s.metrics, &ctx, &state.config);
    let mut flags = s.assignment.flags;
    flags.is_mismatch = hit.is_mismatch;
    flags.is_ace_target = hit.is_ace_target;

    let (x, y) = shot_model::shot_location(s.sub_zone, rng);
    let shot = ShotAttempt {
        shooter: s.actor().id.clone(),
        defender: s.defender().id.clone(),
        sub_zone: s.sub_zone,
        x,
        y,
        hit_rate: hit.rate,
        matchup_effect: hit.matchup_effect,
    };
    let zone = s.sub_zone.zone();

    if rng.chance(hit.rate) {
        let assist = s
            .secondary
            .filter(|_| rng.chance(s.play.assist_rate()))
            .map(|i| s.offense.players[i].id.clone());
        let and_one = (zone.is_inside() && rng.chance(and_one_chance(s.defense.sliders()))).then(|| AndOne {
            fouler: s.defender().id.clone(),
            trip: shoot_free_throws(s.actor(), 1, rng),
        });
        return (PossessionOutcome::Score { shot, assist, and_one }, flags);
    }

    let blocked_by = defense::resolve_block(s.defense, s.assignment.defender, zone, &s.metrics, rng)
        .map(|i| s.defense.players[i].id.clone());
    let offensive = rng.chance(defense::orb_probability(s.offense, s.defense));
    let team = if offensive { s.offense } else { s.defense };
    let rebound = defense::select_rebounder(team, offensive, offensive.then_some(s.actor), rng)
        .map(|i| Rebound { rebounder: team.players[i].id.clone(), offensive });
    (PossessionOutcome::Miss { shot, blocked_by, rebound }, flags)
}
