//! Scoring-Run Momentum
//!
//! Tracks points scored by each side since the last momentum reset (an
//! "epoch") and the current unanswered run. The run feeds a small hit-rate
//! modifier and the automatic timeout trigger.
//!
//! Epochs reset on timeouts and quarter boundaries.

use crate::models::TeamSide;
use serde::{Deserialize, Serialize};

/// Unanswered points needed before a run is "active".
pub const RUN_THRESHOLD: u16 = 6;
/// Hit-rate bonus per run point for the side on the run.
const RUN_BONUS_PER_POINT: f64 = 0.002;
/// Cap on the run bonus.
const MAX_RUN_BONUS: f64 = 0.025;
/// Hit-rate penalty for the side being run on.
const RUN_PENALTY: f64 = 0.01;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringRun {
    pub side: TeamSide,
    pub points: u16,
    /// Game seconds elapsed when the run started.
    pub since_sec: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MomentumState {
    pub home_epoch_pts: u16,
    pub away_epoch_pts: u16,
    pub epoch_start_total_sec: u32,
    /// Unanswered points by the last scoring side, whether or not it is active yet.
    streak: Option<ScoringRun>,
    pub active_run: Option<ScoringRun>,
}

impl MomentumState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch_points(&self, side: TeamSide) -> u16 {
        match side {
            TeamSide::Home => self.home_epoch_pts,
            TeamSide::Away => self.away_epoch_pts,
        }
    }

    /// Record a scoring play at `elapsed_sec` game seconds.
    pub fn record_score(&mut self, side: TeamSide, points: u16, elapsed_sec: u32) {
        if points == 0 {
            return;
        }
        match side {
            TeamSide::Home => self.home_epoch_pts += points,
            TeamSide::Away => self.away_epoch_pts += points,
        }

        let streak = match self.streak {
            Some(mut run) if run.side == side => {
                run.points += points;
                run
            }
            _ => ScoringRun { side, points, since_sec: elapsed_sec },
        };
        self.streak = Some(streak);
        self.active_run = (streak.points >= RUN_THRESHOLD).then_some(streak);
    }

    /// Start a new epoch (timeout or quarter boundary).
    pub fn reset(&mut self, elapsed_sec: u32) {
        *self = Self { epoch_start_total_sec: elapsed_sec, ..Self::default() };
    }

    /// Additive hit-rate modifier for `offense`.
    pub fn shooting_modifier(&self, offense: TeamSide) -> f64 {
        match self.active_run {
            Some(run) if run.side == offense => {
                (run.points as f64 * RUN_BONUS_PER_POINT).min(MAX_RUN_BONUS)
            }
            Some(_) => -RUN_PENALTY,
            None => 0.0,
        }
    }

    /// Size of the run `side` is currently suffering.
    pub fn run_against(&self, side: TeamSide) -> u16 {
        match self.active_run {
            Some(run) if run.side != side => run.points,
            _ => 0,
        }
    }
}
