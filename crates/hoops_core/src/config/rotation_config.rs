//! Rotation Configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Personal fouls that bench a player in quarters 1-4 (default: 2/3/4/5)
    pub foul_trouble_thresholds: [u8; 4],
    /// A Q4 foul-trouble benching returns at this game minute (default: 42)
    pub q4_foul_trouble_return_minute: u8,
    /// Opponent run size that triggers an automatic timeout (default: 10)
    pub auto_timeout_run: u16,
    /// Timeouts per team per game (default: 7)
    pub timeouts_per_game: u8,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            foul_trouble_thresholds: [2, 3, 4, 5],
            q4_foul_trouble_return_minute: 42,
            auto_timeout_run: 10,
            timeouts_per_game: 7,
        }
    }
}

impl RotationConfig {
    /// Foul count that means foul trouble in `quarter`; `None` past regulation.
    pub fn foul_trouble_threshold(&self, quarter: u8) -> Option<u8> {
        match quarter {
            1..=4 => Some(self.foul_trouble_thresholds[(quarter - 1) as usize]),
            _ => None,
        }
    }
}
