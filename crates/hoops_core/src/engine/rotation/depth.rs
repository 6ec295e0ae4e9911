//! Depth chart → rotation schedule generation.

use super::schedule::{MinuteSet, RotationMap};
use crate::models::{DepthChart, Position};
use std::collections::BTreeMap;

/// Starter stints: opening 9 of Q1, last 9 of Q2 through 9 into Q3, closing 9 of Q4.
const STARTER_STINTS: [(u8, u8); 3] = [(0, 9), (15, 33), (39, 48)];
/// Primary backup covers the gaps.
const BACKUP_STINTS: [(u8, u8); 2] = [(9, 15), (33, 39)];
/// Order in which a capped player's minutes are handed down the chart.
const TRIM_ORDER: [(u8, u8); 4] = [(15, 24), (39, 48), (24, 33), (0, 9)];

/// Build the per-minute schedule for a team from its depth chart.
///
/// Every position column is covered every minute as long as it holds at
/// least one player; minute limits push minutes to the next rank down.
pub fn build_rotation_map(chart: &DepthChart, minutes_limits: &BTreeMap<String, u8>) -> RotationMap {
    let mut map = RotationMap::new();

    for pos in Position::ALL {
        let column = chart.column(pos);
        let Some(starter) = column.first() else {
            continue;
        };

        let mut starter_set = MinuteSet::new();
        for (s, e) in STARTER_STINTS {
            starter_set.insert(s..e);
        }
        match column.get(1) {
            Some(backup) => {
                let mut backup_set = MinuteSet::new();
                for (s, e) in BACKUP_STINTS {
                    backup_set.insert(s..e);
                }
                map.entry(backup).union(&backup_set);
            }
            None => {
                for (s, e) in BACKUP_STINTS {
                    starter_set.insert(s..e);
                }
            }
        }
        map.entry(starter).union(&starter_set);

        for id in column.iter().skip(2) {
            map.entry(id);
        }

        for rank in 0..column.len().saturating_sub(1) {
            let id = &column[rank];
            if let Some(limit) = minutes_limits.get(id) {
                trim_to_limit(&mut map, id, &column[rank + 1], *limit);
            }
        }
    }

    map
}

fn trim_to_limit(map: &mut RotationMap, id: &str, next: &str, limit: u8) {
    for (s, e) in TRIM_ORDER {
        for minute in s..e {
            let Some(current) = map.get(id) else {
                return;
            };
            if current.total_minutes() <= limit as u32 {
                return;
            }
            if current.contains(minute) {
                map.transfer(id, next, minute..minute + 1);
            }
        }
    }
}
