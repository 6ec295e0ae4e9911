//! Free-throw trips.

use crate::engine::rng::SimRng;
use crate::engine::state::LivePlayer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeThrowTrip {
    pub shooter: String,
    pub attempted: u8,
    pub made: u8,
    /// Whether the final attempt went in (a miss is live for a rebound).
    pub last_made: bool,
}

/// Shooter's free-throw percentage.
pub fn free_throw_pct(p: &LivePlayer) -> f64 {
    (0.35 + p.attributes.free_throw as f64 / 100.0 * 0.55).clamp(0.40, 0.95)
}

/// One independent roll per attempt.
pub fn shoot_free_throws<R: SimRng + ?Sized>(shooter: &LivePlayer, attempts: u8, rng: &mut R) -> FreeThrowTrip {
    let pct = free_throw_pct(shooter);
    let mut made = 0;
    let mut last_made = false;
    for _ in 0..attempts {
        last_made = rng.chance(pct);
        if last_made {
            made += 1;
        }
    }
    FreeThrowTrip { shooter: shooter.id.clone(), attempted: attempts, made, last_made }
}
