//! Fatigue Configuration

use serde::{Deserialize, Serialize};

/// Condition drain / recovery parameters (condition runs 0-100).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueConfig {
    // === Drain ===
    /// Condition points lost per on-court minute before multipliers (default: 1.3)
    pub base_drain_per_min: f64,
    /// Stamina impact: factor = stamina_offset - stamina/100 (default: 1.6)
    pub stamina_offset: f64,
    /// Pace multiplier base, raised to (pace - 5) above neutral (default: 1.08)
    pub pace_exponent_base: f64,
    /// Drain relief per pace step below neutral (default: 0.03)
    pub slow_pace_relief: f64,
    /// Per defensive-intensity step above/below 5 (default: 0.03)
    pub intensity_step: f64,
    /// Per full-court-press step above 1 (default: 0.02)
    pub press_step: f64,
    /// Back-to-back game multiplier (default: 1.15)
    pub back_to_back_mult: f64,
    /// Designated stopper chasing the opposing ace (default: 1.10)
    pub stopper_mult: f64,
    /// Fast pace (>= 8) with man defense (zone_usage <= 3) (default: 1.10)
    pub pace_man_combo_mult: f64,
    /// Below this condition drain accelerates (default: 60.0)
    pub spiral_threshold: f64,
    /// Extra drain per condition point below the spiral threshold (default: 0.01)
    pub spiral_slope: f64,

    // === Recovery ===
    /// Flat bench recovery per minute (default: 2.5)
    pub bench_recovery_per_min: f64,
    /// Extra bench recovery per minute at stamina 100 (default: 1.5)
    pub bench_stamina_bonus: f64,
    /// Recovery for everyone between quarters (default: 3.0)
    pub quarter_break_recovery: f64,
    /// Recovery for everyone at halftime (default: 8.0)
    pub halftime_recovery: f64,

    // === Thresholds ===
    /// Below this a player prefers to sit (default: 30.0)
    pub red_zone: f64,
    /// Red-zone sub-outs return at or above this (default: 65.0)
    pub red_zone_return: f64,
    /// At or below this a player is shut down (default: 20.0)
    pub shutdown: f64,
    /// Shut-down players become eligible above this (default: 70.0)
    pub shutdown_return: f64,
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            base_drain_per_min: 1.3,
            stamina_offset: 1.6,
            pace_exponent_base: 1.08,
            slow_pace_relief: 0.03,
            intensity_step: 0.03,
            press_step: 0.02,
            back_to_back_mult: 1.15,
            stopper_mult: 1.10,
            pace_man_combo_mult: 1.10,
            spiral_threshold: 60.0,
            spiral_slope: 0.01,

            bench_recovery_per_min: 2.5,
            bench_stamina_bonus: 1.5,
            quarter_break_recovery: 3.0,
            halftime_recovery: 8.0,

            red_zone: 30.0,
            red_zone_return: 65.0,
            shutdown: 20.0,
            shutdown_return: 70.0,
        }
    }
}
