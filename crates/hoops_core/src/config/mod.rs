//! # Engine Configuration
//!
//! Tuning constants for the possession engine, grouped by subsystem.
//!
//! ## Usage
//! ```rust
//! use hoops_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let arcade = EngineConfig::high_scoring();
//! assert!(arcade.shooting_bonus > config.shooting_bonus);
//! ```

mod fatigue_config;
mod injury_config;
mod rotation_config;

pub use fatigue_config::FatigueConfig;
pub use injury_config::{InjuryModel, InjuryParams};
pub use rotation_config::RotationConfig;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fatigue: FatigueConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub injury: InjuryModel,
    /// Floor applied to the hit rate of the tie-break possession (default: 0.60)
    pub tie_break_min_hit_rate: f64,
    /// Added to the home side's field-goal rate (default: 0.01)
    pub home_court_bonus: f64,
    /// Added to every field-goal rate (default: 0.0)
    pub shooting_bonus: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fatigue: FatigueConfig::default(),
            rotation: RotationConfig::default(),
            injury: InjuryModel::Disabled,
            tie_break_min_hit_rate: 0.60,
            home_court_bonus: 0.01,
            shooting_bonus: 0.0,
        }
    }
}

impl EngineConfig {
    /// Default tuning.
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Hotter shooting, slower fatigue.
    pub fn high_scoring() -> Self {
        let mut cfg = Self::default();
        cfg.shooting_bonus = 0.04;
        cfg.fatigue.base_drain_per_min = 1.1;
        cfg
    }

    /// Default tuning with the injury roll switched on.
    pub fn with_injuries() -> Self {
        let mut cfg = Self::default();
        cfg.injury = InjuryModel::Enabled(InjuryParams::default());
        cfg
    }
}

// ========== Tests ==========
