//! # Fatigue & Condition Model
//!
//! Condition runs 0-100. On-court players drain each time slice; bench
//! players recover. Everyone recovers a little between quarters and more at
//! halftime. The optional injury roll lives here too and is only consulted
//! when `InjuryModel::Enabled`.

use super::rng::SimRng;
use super::state::LivePlayer;
use crate::config::{FatigueConfig, InjuryModel};
use crate::models::{HealthStatus, TacticSliders};

/// Team-level drain context for one player.
#[derive(Debug, Clone, Copy)]
pub struct DrainContext<'a> {
    pub sliders: &'a TacticSliders,
    pub back_to_back: bool,
    /// Designated stopper while the opposing ace is on the floor.
    pub chasing_ace: bool,
}

/// Pace multiplier: exponential above neutral, linear relief below.
fn pace_multiplier(pace: u8, cfg: &FatigueConfig) -> f64 {
    let steps = pace as f64 - 5.0;
    if steps >= 0.0 {
        cfg.pace_exponent_base.powf(steps)
    } else {
        1.0 + steps * cfg.slow_pace_relief
    }
}

/// Condition points lost per on-court minute.
pub fn drain_per_minute(player: &LivePlayer, ctx: &DrainContext<'_>, cfg: &FatigueConfig) -> f64 {
    let s = ctx.sliders;
    let stamina = (cfg.stamina_offset - player.attributes.stamina as f64 / 100.0).max(0.1);
    let intensity = 1.0 + (s.def_intensity as f64 - 5.0) * cfg.intensity_step;
    let press = 1.0 + s.full_court_press.saturating_sub(1) as f64 * cfg.press_step;

    let mut drain = cfg.base_drain_per_min * stamina * pace_multiplier(s.pace, cfg) * intensity * press;
    if ctx.back_to_back {
        drain *= cfg.back_to_back_mult;
    }
    if ctx.chasing_ace {
        drain *= cfg.stopper_mult;
    }
    if s.pace >= 8 && s.zone_usage <= 3 {
        drain *= cfg.pace_man_combo_mult;
    }
    if player.condition < cfg.spiral_threshold {
        drain *= 1.0 + (cfg.spiral_threshold - player.condition) * cfg.spiral_slope;
    }
    drain
}

pub fn apply_court_drain(player: &mut LivePlayer, minutes: f64, ctx: &DrainContext<'_>, cfg: &FatigueConfig) {
    let drain = drain_per_minute(player, ctx, cfg) * minutes;
    player.condition = (player.condition - drain).max(0.0);
}

pub fn apply_bench_recovery(player: &mut LivePlayer, minutes: f64, cfg: &FatigueConfig) {
    let rate = cfg.bench_recovery_per_min + player.attributes.stamina as f64 / 100.0 * cfg.bench_stamina_bonus;
    player.condition = (player.condition + rate * minutes).min(100.0);
}

/// Between-quarter recovery; `halftime` uses the larger amount.
pub fn apply_break_recovery(player: &mut LivePlayer, halftime: bool, cfg: &FatigueConfig) {
    let amount = if halftime { cfg.halftime_recovery } else { cfg.quarter_break_recovery };
    player.condition = (player.condition + amount).min(100.0);
}

/// Condition at or below the shutdown floor.
pub fn needs_shutdown(player: &LivePlayer, cfg: &FatigueConfig) -> bool {
    player.condition <= cfg.shutdown
}

pub fn in_red_zone(player: &LivePlayer, cfg: &FatigueConfig) -> bool {
    player.condition < cfg.red_zone
}

/// Shut-down players come back only past the return threshold.
pub fn cleared_shutdown(player: &LivePlayer, cfg: &FatigueConfig) -> bool {
    player.condition > cfg.shutdown_return
}

pub fn cleared_red_zone(player: &LivePlayer, cfg: &FatigueConfig) -> bool {
    player.condition >= cfg.red_zone_return
}

/// Injury roll for `minutes` of court time; `None` when disabled or unhurt.
pub fn roll_injury<R: SimRng + ?Sized>(
    player: &LivePlayer,
    minutes: f64,
    model: &InjuryModel,
    rng: &mut R,
) -> Option<HealthStatus> {
    let InjuryModel::Enabled(params) = model else {
        return None;
    };
    let durability = 1.5 - player.attributes.durability as f64 / 100.0;
    let low = (params.low_condition - player.condition).max(0.0) * params.low_condition_slope;
    let p = params.base_rate_per_min * (1.0 + low) * durability * minutes;
    if !rng.chance(p) {
        return None;
    }
    Some(if rng.chance(params.day_to_day_share) { HealthStatus::DayToDay } else { HealthStatus::Injured })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InjuryParams;
    use crate::engine::rng::ScriptedRng;
    use crate::engine::test_fixtures::create_test_player;
    use crate::models::Position;

    fn player(stamina: u8) -> LivePlayer {
        let mut p = LivePlayer::from_player(&create_test_player("p", Position::SF, 70));
        p.attributes.stamina = stamina;
        p
    }

    fn ctx(sliders: &TacticSliders) -> DrainContext<'_> {
        DrainContext { sliders, back_to_back: false, chasing_ace: false }
    }

    #[test]
    fn test_pace_drains_faster() {
        let cfg = FatigueConfig::default();
        let p = player(70);
        let slow = TacticSliders { pace: 1, ..Default::default() };
        let fast = TacticSliders { pace: 10, ..Default::default() };
        assert!(drain_per_minute(&p, &ctx(&fast), &cfg) > drain_per_minute(&p, &ctx(&slow), &cfg) * 1.4);
    }

    #[test]
    fn test_stamina_reduces_drain() {
        let cfg = FatigueConfig::default();
        let s = TacticSliders::default();
        assert!(drain_per_minute(&player(95), &ctx(&s), &cfg) < drain_per_minute(&player(40), &ctx(&s), &cfg));
    }

    #[test]
    fn test_multipliers_stack() {
        let cfg = FatigueConfig::default();
        let s = TacticSliders::default();
        let p = player(70);
        let base = drain_per_minute(&p, &ctx(&s), &cfg);
        let tired = DrainContext { sliders: &s, back_to_back: true, chasing_ace: true };
        let expected = base * cfg.back_to_back_mult * cfg.stopper_mult;
        assert!((drain_per_minute(&p, &tired, &cfg) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_spiral_accelerates() {
        let cfg = FatigueConfig::default();
        let s = TacticSliders::default();
        let mut p = player(70);
        let fresh = drain_per_minute(&p, &ctx(&s), &cfg);
        p.condition = 30.0;
        assert!(drain_per_minute(&p, &ctx(&s), &cfg) > fresh * 1.25);
    }

    #[test]
    fn test_condition_bounds() {
        let cfg = FatigueConfig::default();
        let s = TacticSliders::default();
        let mut p = player(50);
        apply_court_drain(&mut p, 500.0, &ctx(&s), &cfg);
        assert_eq!(p.condition, 0.0);
        apply_bench_recovery(&mut p, 500.0, &cfg);
        assert_eq!(p.condition, 100.0);
    }

    #[test]
    fn test_thresholds() {
        let cfg = FatigueConfig::default();
        let mut p = player(70);
        p.condition = 20.0;
        assert!(needs_shutdown(&p, &cfg));
        p.condition = 70.0;
        assert!(!cleared_shutdown(&p, &cfg));
        p.condition = 70.5;
        assert!(cleared_shutdown(&p, &cfg));
        p.condition = 29.9;
        assert!(in_red_zone(&p, &cfg));
        p.condition = 65.0;
        assert!(cleared_red_zone(&p, &cfg));
    }

    #[test]
    fn test_injury_disabled_never_rolls() {
        let p = player(70);
        let mut rng = ScriptedRng::constant(0.0);
        assert_eq!(roll_injury(&p, 48.0, &InjuryModel::Disabled, &mut rng), None);
    }

    #[test]
    fn test_injury_enabled_rolls() {
        let p = player(70);
        let model = InjuryModel::Enabled(InjuryParams::default());
        let mut rng = ScriptedRng::new(vec![0.0, 0.0]);
        assert_eq!(roll_injury(&p, 1.0, &model, &mut rng), Some(HealthStatus::DayToDay));
        let mut rng = ScriptedRng::new(vec![0.0, 0.99]);
        assert_eq!(roll_injury(&p, 1.0, &model, &mut rng), Some(HealthStatus::Injured));
        let mut rng = ScriptedRng::constant(0.5);
        assert_eq!(roll_injury(&p, 1.0, &model, &mut rng), None);
    }
}
