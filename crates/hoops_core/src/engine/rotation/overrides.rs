//! Temporary bench records.
//!
//! A foul-trouble, fatigue or shutdown benching hands the player's minutes
//! inside the bench window to a filler. The out player's whole schedule is
//! snapshotted so the return restores it verbatim, and only the minutes the
//! filler did not already own are taken back from them.

use super::schedule::{MinuteSet, RotationMap, GAME_MINUTES};
use crate::engine::state::BenchReason;
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationOverride {
    pub out_player: String,
    /// `None` when nobody could cover the window.
    pub filler: Option<String>,
    pub reason: BenchReason,
    pub from_minute: u8,
    /// Exclusive; 48 means "until recovered".
    pub to_minute: u8,
    pub original_out: MinuteSet,
    /// Minutes the filler holds only because of this override.
    pub inherited: MinuteSet,
    pub active: bool,
}

impl RotationOverride {
    /// Bench `out` for `window`, handing those minutes to `filler`.
    pub fn open(
        rotation: &mut RotationMap,
        out: &str,
        filler: Option<&str>,
        reason: BenchReason,
        window: Range<u8>,
    ) -> Self {
        let original_out = rotation.get(out).cloned().unwrap_or_default();
        let inherited = match filler {
            Some(filler) => rotation.transfer(out, filler, window.clone()),
            None => {
                rotation.entry(out).remove(window.clone());
                MinuteSet::new()
            }
        };
        Self {
            out_player: out.to_string(),
            filler: filler.map(str::to_string),
            reason,
            from_minute: window.start,
            to_minute: window.end,
            original_out,
            inherited,
            active: true,
        }
    }

    /// Put the out player's schedule back and strip the filler's borrowed minutes.
    pub fn restore(&mut self, rotation: &mut RotationMap) {
        rotation.set(&self.out_player, self.original_out.clone());
        if let Some(filler) = &self.filler {
            rotation.entry(filler).subtract(&self.inherited);
        }
        self.active = false;
    }

    /// The out player left for good; the filler keeps what they inherited.
    pub fn close(&mut self) {
        self.active = false;
    }

    /// The filler left for good: move the not-yet-played inherited minutes
    /// from `minute` on to `replacement`, or drop them when there is none.
    pub fn hand_over(&mut self, rotation: &mut RotationMap, replacement: Option<&str>, minute: u8) {
        let Some(previous) = self.filler.take() else {
            return;
        };
        let pending = self.inherited.intersect_range(minute..GAME_MINUTES);
        let mut inherited = MinuteSet::new();
        for range in pending.ranges() {
            match replacement {
                Some(next) => inherited.union(&rotation.transfer(&previous, next, range)),
                None => rotation.entry(&previous).remove(range),
            }
        }
        self.inherited = inherited;
        self.filler = replacement.map(str::to_string);
    }
}
