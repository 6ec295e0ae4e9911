//! # Shot Model
//!
//! Two questions per field-goal attempt:
//! 1. **Where** the shot goes up: a 10-bucket sub-zone distribution from the
//!    shooter's real tendencies (or an archetype fallback), skewed by play
//!    type and team sliders.
//! 2. **How likely** it goes in: `calculate_hit_rate`, combining raw ability,
//!    defender and team defense, tactics, home court, haste, momentum,
//!    matchup flags and the ace-stopper adjustment.

use super::defense::OpponentDefensiveMetrics;
use super::possession::MatchupFlags;
use super::rng::SimRng;
use super::state::LivePlayer;
use crate::config::EngineConfig;
use crate::models::{LateralBias, PlayType, SubZone, TacticSliders, Zone};

/// Outer hit-rate bounds; the tie-break floor may lift a rate past its range band.
pub const MIN_HIT_RATE: f64 = 0.05;
pub const MAX_HIT_RATE: f64 = 0.95;
/// Matchup effect bounds for the ace-stopper adjustment.
pub const MIN_MATCHUP_EFFECT: f64 = -0.25;
pub const MAX_MATCHUP_EFFECT: f64 = 0.10;
/// Guarded share below which the stopper has no measurable effect.
const MEANINGFUL_GUARD_SHARE: f64 = 0.25;

// ========== Zone selection ==========

/// Stable pseudo-random lateral bias for players without tendency data.
fn hashed_bias(player_id: &str) -> LateralBias {
    let h = player_id.bytes().fold(0x811c_9dc5u32, |acc, b| (acc ^ b as u32).wrapping_mul(0x0100_0193));
    match h % 3 {
        0 => LateralBias::Left,
        1 => LateralBias::Balanced,
        _ => LateralBias::Right,
    }
}

/// Six-bucket preferences: rim, paint, mid, corner three, wing three, top three.
fn bucket_weights(player: &LivePlayer) -> ([f64; 6], LateralBias) {
    if let Some(t) = &player.tendencies {
        let total = t.total();
        if total > 0.0 {
            let b = [t.rim, t.paint, t.mid, t.corner_three, t.wing_three, t.top_three]
                .map(|v| v.max(0.0) / total);
            return (b, t.lateral_bias);
        }
    }

    let a = &player.archetypes;
    let spacer = a.spacer / 100.0;
    let handler = a.playmaker / 100.0;
    let three_total = 0.05 + spacer * 0.45;
    let lean = if spacer + handler > 0.0 { spacer / (spacer + handler) } else { 0.5 };
    let corner = three_total * (0.2 + 0.25 * lean);
    let top = three_total * (0.15 + 0.25 * (1.0 - lean));
    let wing = (three_total - corner - top).max(0.0);
    let buckets = [
        0.10 + a.driver / 100.0 * 0.25 + a.roll_man / 100.0 * 0.10,
        0.05 + a.post_scorer / 100.0 * 0.25,
        0.12 + player.attributes.mid_range as f64 / 100.0 * 0.15,
        corner,
        wing,
        top,
    ];
    (buckets, hashed_bias(&player.id))
}

/// Base sub-zone distribution for `player`, normalized to sum 1.
pub fn zone_weights(player: &LivePlayer) -> [f64; 10] {
    let (b, bias) = bucket_weights(player);
    let left = bias.left_share();
    let right = 1.0 - left;
    let mut w = [0.0; 10];
    w[SubZone::Rim.index()] = b[0];
    w[SubZone::Paint.index()] = b[1];
    w[SubZone::MidCenter.index()] = b[2] * 0.4;
    w[SubZone::MidLeft.index()] = b[2] * 0.6 * left;
    w[SubZone::MidRight.index()] = b[2] * 0.6 * right;
    w[SubZone::CornerLeft.index()] = b[3] * left;
    w[SubZone::CornerRight.index()] = b[3] * right;
    w[SubZone::WingLeft.index()] = b[4] * left;
    w[SubZone::WingRight.index()] = b[4] * right;
    w[SubZone::TopOfKey.index()] = b[5];

    let total: f64 = w.iter().sum();
    if total > 0.0 {
        for v in &mut w {
            *v /= total;
        }
    }
    w
}

/// Rim / paint / mid / three multipliers by play type.
fn play_zone_multipliers(play: PlayType) -> [f64; 4] {
    match play {
        PlayType::Isolation => [1.0, 1.0, 1.3, 1.0],
        PlayType::PnrHandler => [1.2, 1.0, 1.3, 1.0],
        PlayType::PnrRoll => [2.5, 1.5, 0.3, 0.1],
        PlayType::PnrPop => [0.2, 0.4, 1.5, 2.0],
        PlayType::PostUp => [1.4, 2.5, 0.8, 0.2],
        PlayType::CatchShoot => [0.3, 0.4, 0.8, 2.2],
        PlayType::Cut => [3.0, 1.5, 0.2, 0.05],
        PlayType::Handoff => [0.8, 0.8, 1.2, 1.4],
        PlayType::Transition => [2.0, 0.8, 0.5, 1.3],
        PlayType::Putback => [4.0, 1.5, 0.0, 0.0],
    }
}

fn zone_slot(zone: Zone) -> usize {
    match zone {
        Zone::Rim => 0,
        Zone::Paint => 1,
        Zone::Mid => 2,
        Zone::Three => 3,
    }
}

/// Sub-zone distribution for one attempt.
pub fn attempt_distribution(player: &LivePlayer, play: PlayType, sliders: &TacticSliders) -> [f64; 10] {
    let base = zone_weights(player);
    let play_mult = play_zone_multipliers(play);
    let three_focus = (0.6 + sliders.three_point_focus as f64 * 0.08) * (1.0 + (sliders.pace as f64 - 5.0) * 0.03);
    let inside_focus = 0.6 + sliders.inside_focus as f64 * 0.08;

    let mut out = [0.0; 10];
    for sz in SubZone::ALL {
        let zone = sz.zone();
        let slider = match zone {
            Zone::Rim | Zone::Paint => inside_focus,
            Zone::Three => three_focus,
            Zone::Mid => 1.0,
        };
        out[sz.index()] = base[sz.index()] * play_mult[zone_slot(zone)] * slider;
    }
    out
}

pub fn select_sub_zone<R: SimRng + ?Sized>(
    player: &LivePlayer,
    play: PlayType,
    sliders: &TacticSliders,
    rng: &mut R,
) -> SubZone {
    let weights = attempt_distribution(player, play, sliders);
    rng.weighted_index(&weights).map(|i| SubZone::ALL[i]).unwrap_or(SubZone::Rim)
}

/// Court coordinates (feet) jittered around the sub-zone anchor.
pub fn shot_location<R: SimRng + ?Sized>(sub_zone: SubZone, rng: &mut R) -> (f32, f32) {
    let (ax, ay) = sub_zone.anchor();
    let angle = rng.range(0.0, std::f64::consts::TAU);
    let radius = rng.next_f64().sqrt() * sub_zone.spread() as f64;
    let x = (ax as f64 + radius * angle.cos()).clamp(0.0, 50.0);
    let y = (ay as f64 + radius * angle.sin()).clamp(0.0, 47.0);
    (x as f32, y as f32)
}

// ========== Hit rate ==========

/// Ace-stopper exposure for the shooter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AceMatchup {
    /// Stopper's perimeter-stopper rating (0-100).
    pub stopper_rating: f64,
    /// Share of the ace's minutes spent with the stopper on the floor.
    pub guarded_share: f64,
    pub stopper_guarding: bool,
    pub stopper_on_court: bool,
}

impl AceMatchup {
    pub fn from_exposure(stopper_rating: f64, guarded_sec: u32, free_sec: u32, guarding: bool, on_court: bool) -> Self {
        let total = guarded_sec + free_sec;
        let guarded_share = if total == 0 {
            if on_court { 1.0 } else { 0.0 }
        } else {
            guarded_sec as f64 / total as f64
        };
        Self { stopper_rating, guarded_share, stopper_guarding: guarding, stopper_on_court: on_court }
    }

    /// Bounded multiplicative effect on the ace's hit rate.
    pub fn effect(&self) -> f64 {
        let effect = if self.stopper_guarding {
            if self.guarded_share < MEANINGFUL_GUARD_SHARE {
                0.0
            } else {
                let suppression = ((self.stopper_rating - 50.0) / 100.0 * 0.5).clamp(0.0, 0.25);
                -suppression * self.guarded_share
            }
        } else if !self.stopper_on_court {
            0.10 * (1.0 - self.guarded_share)
        } else {
            0.0
        };
        effect.clamp(MIN_MATCHUP_EFFECT, MAX_MATCHUP_EFFECT)
    }
}

pub struct ShotContext<'a> {
    pub sub_zone: SubZone,
    pub play: PlayType,
    pub offense: &'a TacticSliders,
    pub defense: &'a TacticSliders,
    pub is_home: bool,
    /// Additive momentum term for the offense.
    pub momentum: f64,
    pub flags: MatchupFlags,
    /// Present when the shooter is the offense's ace and the defense fields a stopper.
    pub ace: Option<AceMatchup>,
    pub tie_break: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRate {
    pub rate: f64,
    pub matchup_effect: f64,
    pub is_ace_target: bool,
    pub is_mismatch: bool,
}

/// Shooter's raw ability at `zone` (0-1).
fn raw_ability(p: &LivePlayer, zone: Zone) -> f64 {
    let a = &p.attributes;
    let r = |v: u8| v as f64;
    let raw = match zone {
        Zone::Rim => r(a.layup) * 0.4 + r(a.dunk) * 0.25 + r(a.close_shot) * 0.35,
        Zone::Paint => r(a.close_shot) * 0.5 + r(a.post_play) * 0.3 + r(a.layup) * 0.2,
        Zone::Mid => r(a.mid_range) * 0.8 + r(a.shot_iq) * 0.2,
        Zone::Three => r(a.three_point) * 0.85 + r(a.shot_iq) * 0.15,
    };
    raw / 100.0
}

/// Realistic make-rate band per range.
pub fn zone_bounds(zone: Zone) -> (f64, f64) {
    match zone {
        Zone::Rim => (0.30, 0.85),
        Zone::Paint => (0.25, 0.70),
        Zone::Mid => (0.25, 0.60),
        Zone::Three => (0.20, 0.50),
    }
}

fn base_rate(zone: Zone, raw: f64) -> f64 {
    let d = raw - 0.65;
    let rate = match zone {
        Zone::Rim => 0.62 + d * 0.8,
        Zone::Paint => 0.42 + d * 0.7,
        Zone::Mid => 0.40 + d * 0.6,
        Zone::Three => 0.35 + d * 0.5,
    };
    let (lo, hi) = zone_bounds(zone);
    rate.clamp(lo, hi)
}

/// Size or positional gap that the offense can exploit.
pub fn is_mismatch(actor: &LivePlayer, defender: &LivePlayer) -> bool {
    actor.height_cm.abs_diff(defender.height_cm) >= 10 || actor.position.distance(defender.position) >= 2
}

pub fn calculate_hit_rate(
    actor: &LivePlayer,
    defender: &LivePlayer,
    metrics: &OpponentDefensiveMetrics,
    ctx: &ShotContext<'_>,
    config: &EngineConfig,
) -> HitRate {
    let zone = ctx.sub_zone.zone();
    let mut rate = base_rate(zone, raw_ability(actor, zone));

    // Defender and team defense.
    let (individual, team) = if zone.is_inside() {
        (defender.attributes.interior_defense as f64 / 100.0, metrics.interior)
    } else {
        (defender.attributes.perimeter_defense as f64 / 100.0, metrics.perimeter)
    };
    let pressure = individual * 0.6 + team * 0.4;
    rate -= (pressure - 0.6) * 0.25;
    rate -= (ctx.defense.def_intensity as f64 - 5.0) * 0.004;

    // Defender in foul trouble plays soft.
    if defender.stats.pf >= 3 {
        rate += (defender.stats.pf - 2) as f64 * 0.015;
    }

    if ctx.is_home {
        rate += config.home_court_bonus;
    }
    rate += config.shooting_bonus;

    let haste = (ctx.offense.pace as f64 - 5.0).max(0.0) * 0.008 * (1.0 - actor.attributes.composure());
    rate -= haste;

    rate -= (1.0 - actor.condition / 100.0) * 0.08;
    rate += ctx.momentum;

    let mismatch = ctx.flags.is_mismatch || is_mismatch(actor, defender);
    if mismatch {
        rate += if zone.is_inside() && actor.height_cm > defender.height_cm { 0.04 } else { 0.02 };
    }
    if ctx.flags.is_botched_switch {
        rate += 0.08;
    } else if ctx.flags.is_switch {
        rate += 0.01;
    }
    if ctx.flags.is_zone {
        rate += if zone.is_inside() { -0.02 } else { 0.01 };
    }
    if ctx.sub_zone.is_corner_three() {
        rate += 0.015;
    }

    let mut matchup_effect = 0.0;
    let mut is_ace_target = false;
    if let Some(ace) = ctx.ace {
        matchup_effect = ace.effect();
        is_ace_target = ace.stopper_guarding;
        rate *= 1.0 + matchup_effect;
    }

    let (lo, hi) = zone_bounds(zone);
    rate = rate.clamp(lo, hi);
    if ctx.tie_break {
        rate = rate.max(config.tie_break_min_hit_rate);
    }

    HitRate {
        rate: rate.clamp(MIN_HIT_RATE, MAX_HIT_RATE),
        matchup_effect,
        is_ace_target,
        is_mismatch: mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::LivePlayer;
    use crate::engine::test_fixtures::create_test_player;
    use crate::models::{Position, ShotTendencies};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn live(id: &str, position: Position, ovr: u8) -> LivePlayer {
        LivePlayer::from_player(&create_test_player(id, position, ovr))
    }

    fn ctx<'a>(sz: SubZone, off: &'a TacticSliders, def: &'a TacticSliders) -> ShotContext<'a> {
        ShotContext {
            sub_zone: sz,
            play: PlayType::Isolation,
            offense: off,
            defense: def,
            is_home: false,
            momentum: 0.0,
            flags: MatchupFlags::default(),
            ace: None,
            tie_break: false,
        }
    }

    #[test]
    fn test_zone_weights_normalized() {
        let p = live("x", Position::SF, 70);
        let w = zone_weights(&p);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(w.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_tendencies_override_archetypes() {
        let mut p = live("x", Position::C, 70);
        p.tendencies = Some(ShotTendencies {
            rim: 0.0,
            paint: 0.0,
            mid: 0.0,
            corner_three: 2.0,
            wing_three: 0.0,
            top_three: 0.0,
            lateral_bias: LateralBias::Left,
        });
        let w = zone_weights(&p);
        assert!((w[SubZone::CornerLeft.index()] - 0.62).abs() < 1e-9);
        assert!((w[SubZone::CornerRight.index()] - 0.38).abs() < 1e-9);
        assert_eq!(w[SubZone::Rim.index()], 0.0);
    }

    #[test]
    fn test_putback_never_leaves_paint() {
        let p = live("x", Position::PF, 70);
        let d = attempt_distribution(&p, PlayType::Putback, &TacticSliders::default());
        for sz in SubZone::ALL {
            if !sz.zone().is_inside() {
                assert_eq!(d[sz.index()], 0.0, "{sz:?}");
            }
        }
    }

    #[test]
    fn test_three_focus_raises_three_share() {
        let p = live("x", Position::SG, 70);
        let low = TacticSliders { three_point_focus: 1, ..Default::default() };
        let high = TacticSliders { three_point_focus: 10, ..Default::default() };
        let share = |s: &TacticSliders| {
            let d = attempt_distribution(&p, PlayType::Isolation, s);
            let total: f64 = d.iter().sum();
            SubZone::ALL.iter().filter(|z| z.zone() == Zone::Three).map(|z| d[z.index()]).sum::<f64>() / total
        };
        assert!(share(&high) > share(&low) + 0.1);
    }

    #[test]
    fn test_shot_location_within_court() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for sz in SubZone::ALL {
            for _ in 0..50 {
                let (x, y) = shot_location(sz, &mut rng);
                assert!((0.0..=50.0).contains(&x) && (0.0..=47.0).contains(&y));
            }
        }
    }

    #[test]
    fn test_better_shooter_higher_rate() {
        let s = TacticSliders::default();
        let m = OpponentDefensiveMetrics::neutral();
        let cfg = EngineConfig::default();
        let d = live("d", Position::SG, 70);
        let good = live("g", Position::SG, 90);
        let bad = live("b", Position::SG, 50);
        let c = ctx(SubZone::TopOfKey, &s, &s);
        let g = calculate_hit_rate(&good, &d, &m, &c, &cfg).rate;
        let b = calculate_hit_rate(&bad, &d, &m, &c, &cfg).rate;
        assert!(g > b);
        assert!(g <= 0.50 + cfg.home_court_bonus + 0.05);
    }

    #[test]
    fn test_rates_bounded() {
        let s = TacticSliders { pace: 10, ..Default::default() };
        let m = OpponentDefensiveMetrics::neutral();
        let cfg = EngineConfig::high_scoring();
        let d = live("d", Position::PG, 20);
        let a = live("a", Position::C, 99);
        let mut c = ctx(SubZone::Rim, &s, &s);
        c.flags.is_botched_switch = true;
        c.momentum = 0.025;
        let hr = calculate_hit_rate(&a, &d, &m, &c, &cfg);
        assert!(hr.rate <= MAX_HIT_RATE);
        assert!(hr.is_mismatch);

        let weak = live("w", Position::PG, 1);
        let wall = live("wall", Position::C, 99);
        let hr = calculate_hit_rate(&weak, &wall, &m, &ctx(SubZone::CornerLeft, &s, &s), &cfg);
        assert!(hr.rate >= MIN_HIT_RATE);
    }

    #[test]
    fn test_stacked_modifiers_stay_in_range_band() {
        let m = OpponentDefensiveMetrics::neutral();
        let cfg = EngineConfig::default();

        // Everything in the shooter's favour at the rim.
        let soft = TacticSliders { def_intensity: 1, ..Default::default() };
        let calm = TacticSliders::default();
        let big = live("big", Position::C, 99);
        let mut weak = live("weak", Position::PG, 20);
        weak.stats.pf = 5;
        let mut c = ctx(SubZone::Rim, &calm, &soft);
        c.is_home = true;
        c.momentum = 0.03;
        c.flags.is_botched_switch = true;
        c.ace = Some(AceMatchup::from_exposure(99.0, 0, 600, false, false));
        let hr = calculate_hit_rate(&big, &weak, &m, &c, &cfg);
        assert!(hr.rate <= zone_bounds(Zone::Rim).1, "rim rate {}", hr.rate);

        // Everything against a tired, hurried shooter from deep.
        let rushed = TacticSliders { pace: 10, ..Default::default() };
        let swarm = TacticSliders { def_intensity: 10, ..Default::default() };
        let mut shooter = live("s", Position::SG, 1);
        shooter.condition = 5.0;
        let wall = live("wall", Position::SG, 99);
        let mut c = ctx(SubZone::TopOfKey, &rushed, &swarm);
        c.momentum = -0.03;
        c.ace = Some(AceMatchup::from_exposure(99.0, 600, 0, true, true));
        let hr = calculate_hit_rate(&shooter, &wall, &m, &c, &cfg);
        assert!(hr.rate >= zone_bounds(Zone::Three).0, "three rate {}", hr.rate);
    }

    #[test]
    fn test_tie_break_floor() {
        let s = TacticSliders::default();
        let m = OpponentDefensiveMetrics::neutral();
        let cfg = EngineConfig::default();
        let a = live("a", Position::SG, 40);
        let d = live("d", Position::SG, 90);
        let mut c = ctx(SubZone::TopOfKey, &s, &s);
        c.tie_break = true;
        let hr = calculate_hit_rate(&a, &d, &m, &c, &cfg);
        assert!(hr.rate >= cfg.tie_break_min_hit_rate);
        assert!(hr.rate > zone_bounds(Zone::Three).1);
    }

    #[test]
    fn test_ace_matchup_effect_bounds() {
        let guarded = AceMatchup::from_exposure(99.0, 600, 0, true, true);
        assert!(guarded.effect() < 0.0);
        assert!(guarded.effect() >= MIN_MATCHUP_EFFECT);

        let barely = AceMatchup::from_exposure(99.0, 10, 600, true, true);
        assert_eq!(barely.effect(), 0.0);

        let free = AceMatchup::from_exposure(99.0, 0, 600, false, false);
        assert!((free.effect() - MAX_MATCHUP_EFFECT).abs() < 1e-9);
    }

    #[test]
    fn test_hashed_bias_stable() {
        assert_eq!(hashed_bias("player-7"), hashed_bias("player-7"));
    }
}
