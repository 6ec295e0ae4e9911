//! Injury Model Configuration

use serde::{Deserialize, Serialize};

/// In-game injury rolls. Shipped disabled; `Enabled` turns the roll on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InjuryModel {
    #[default]
    Disabled,
    Enabled(InjuryParams),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjuryParams {
    /// Injury chance per on-court minute at full condition (default: 0.0004)
    pub base_rate_per_min: f64,
    /// Below this condition the rate scales up (default: 40.0)
    pub low_condition: f64,
    /// Extra rate per condition point under `low_condition` (default: 0.1)
    pub low_condition_slope: f64,
    /// Share of injuries that are day-to-day rather than serious (default: 0.7)
    pub day_to_day_share: f64,
}

impl Default for InjuryParams {
    fn default() -> Self {
        Self {
            base_rate_per_min: 0.0004,
            low_condition: 40.0,
            low_condition_slope: 0.1,
            day_to_day_share: 0.7,
        }
    }
}

impl InjuryModel {
    pub fn is_enabled(&self) -> bool {
        matches!(self, InjuryModel::Enabled(_))
    }
}
