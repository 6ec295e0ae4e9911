//! Rotation schedules as minute intervals.
//!
//! A player's 48-minute on/off intent is kept as sorted, disjoint,
//! non-adjacent half-open ranges `[start, end)` instead of a dense bool
//! array. Transfers and restores become interval splices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

pub const GAME_MINUTES: u8 = 48;

/// Normalized set of game minutes (0..48).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MinuteSet {
    ranges: Vec<(u8, u8)>,
}

impl MinuteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_range(range: Range<u8>) -> Self {
        let mut set = Self::new();
        set.insert(range);
        set
    }

    /// From a 48-entry on/off list; entries past minute 48 are ignored.
    pub fn from_bools(minutes: &[bool]) -> Self {
        let mut set = Self::new();
        let mut start: Option<u8> = None;
        for (m, on) in minutes.iter().take(GAME_MINUTES as usize).enumerate() {
            let m = m as u8;
            match (on, start) {
                (true, None) => start = Some(m),
                (false, Some(s)) => {
                    set.ranges.push((s, m));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            let end = minutes.len().min(GAME_MINUTES as usize) as u8;
            set.ranges.push((s, end));
        }
        set
    }

    pub fn to_bools(&self) -> Vec<bool> {
        let mut out = vec![false; GAME_MINUTES as usize];
        for &(s, e) in &self.ranges {
            for slot in &mut out[s as usize..e as usize] {
                *slot = true;
            }
        }
        out
    }

    pub fn ranges(&self) -> impl Iterator<Item = Range<u8>> + '_ {
        self.ranges.iter().map(|&(s, e)| s..e)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, minute: u8) -> bool {
        self.ranges.iter().any(|&(s, e)| s <= minute && minute < e)
    }

    pub fn total_minutes(&self) -> u32 {
        self.ranges.iter().map(|&(s, e)| (e - s) as u32).sum()
    }

    pub fn insert(&mut self, range: Range<u8>) {
        let start = range.start.min(GAME_MINUTES);
        let end = range.end.min(GAME_MINUTES);
        if start >= end {
            return;
        }
        let mut merged = (start, end);
        let mut out = Vec::with_capacity(self.ranges.len() + 1);
        for &(s, e) in &self.ranges {
            if e < merged.0 || s > merged.1 {
                out.push((s, e));
            } else {
                merged = (merged.0.min(s), merged.1.max(e));
            }
        }
        out.push(merged);
        out.sort_unstable();
        self.ranges = out;
    }

    pub fn remove(&mut self, range: Range<u8>) {
        if range.start >= range.end {
            return;
        }
        let mut out = Vec::with_capacity(self.ranges.len() + 1);
        for &(s, e) in &self.ranges {
            if e <= range.start || s >= range.end {
                out.push((s, e));
                continue;
            }
            if s < range.start {
                out.push((s, range.start));
            }
            if e > range.end {
                out.push((range.end, e));
            }
        }
        self.ranges = out;
    }

    pub fn union(&mut self, other: &MinuteSet) {
        for r in other.ranges() {
            self.insert(r);
        }
    }

    pub fn subtract(&mut self, other: &MinuteSet) {
        for r in other.ranges() {
            self.remove(r);
        }
    }

    /// Minutes inside `window`.
    pub fn intersect_range(&self, window: Range<u8>) -> MinuteSet {
        let ranges = self
            .ranges
            .iter()
            .filter_map(|&(s, e)| {
                let s = s.max(window.start);
                let e = e.min(window.end);
                (s < e).then_some((s, e))
            })
            .collect();
        MinuteSet { ranges }
    }

    /// Remove and return the minutes inside `window`.
    pub fn take_range(&mut self, window: Range<u8>) -> MinuteSet {
        let taken = self.intersect_range(window.clone());
        self.remove(window);
        taken
    }

    /// Minutes in `self` that are not in `other`.
    pub fn difference(&self, other: &MinuteSet) -> MinuteSet {
        let mut out = self.clone();
        out.subtract(other);
        out
    }
}

/// Per-player schedules for one team.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationMap {
    schedules: BTreeMap<String, MinuteSet>,
}

impl RotationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bool_map(map: &BTreeMap<String, Vec<bool>>) -> Self {
        let schedules =
            map.iter().map(|(id, mins)| (id.clone(), MinuteSet::from_bools(mins))).collect();
        Self { schedules }
    }

    pub fn to_bool_map(&self) -> BTreeMap<String, Vec<bool>> {
        self.schedules.iter().map(|(id, set)| (id.clone(), set.to_bools())).collect()
    }

    pub fn get(&self, player_id: &str) -> Option<&MinuteSet> {
        self.schedules.get(player_id)
    }

    pub fn entry(&mut self, player_id: &str) -> &mut MinuteSet {
        self.schedules.entry(player_id.to_string()).or_default()
    }

    pub fn set(&mut self, player_id: &str, schedule: MinuteSet) {
        self.schedules.insert(player_id.to_string(), schedule);
    }

    pub fn is_scheduled(&self, player_id: &str, minute: u8) -> bool {
        self.schedules.get(player_id).map_or(false, |s| s.contains(minute))
    }

    /// Players scheduled at `minute`, in id order.
    pub fn scheduled_at(&self, minute: u8) -> Vec<&str> {
        self.schedules
            .iter()
            .filter(|(_, s)| s.contains(minute))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn players(&self) -> impl Iterator<Item = (&String, &MinuteSet)> {
        self.schedules.iter()
    }

    /// Move `from`'s minutes inside `window` to `to`. Both entries change
    /// together; returns the minutes `to` did not already own.
    pub fn transfer(&mut self, from: &str, to: &str, window: Range<u8>) -> MinuteSet {
        let moved = self.entry(from).take_range(window);
        let target = self.entry(to);
        let fresh = moved.difference(target);
        target.union(&moved);
        fresh
    }
}
