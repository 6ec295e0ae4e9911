//! Depth-chart succession when a player leaves the game for good.
//!
//! - Starter out: the first backup takes the starter's remaining minutes and
//!   the next one down takes the backup's old minutes.
//! - Anyone else: the next eligible player in the column takes over.
//! - Empty column below: best available by positional proximity, then rating.

use super::schedule::GAME_MINUTES;
use crate::engine::state::{BenchReason, TeamState};
use crate::models::Position;

/// Best available stand-in for `position`, skipping `skip`. Bench players first.
pub fn best_available(team: &TeamState, position: Position, skip: &[usize]) -> Option<usize> {
    team.players
        .iter()
        .enumerate()
        .filter(|(i, p)| !skip.contains(i) && p.is_available())
        .min_by(|(ia, a), (ib, b)| {
            team.is_on_court(*ia)
                .cmp(&team.is_on_court(*ib))
                .then(a.position.distance(position).cmp(&b.position.distance(position)))
                .then(b.ovr.cmp(&a.ovr))
                .then(b.condition.total_cmp(&a.condition))
        })
        .map(|(i, _)| i)
}

/// Rewire schedules, overrides and the depth chart after `out` is disqualified.
pub fn handle_permanent_exit(team: &mut TeamState, out: usize, minute: u8, reason: BenchReason) {
    let out_id = team.players[out].id.clone();
    let position = team.players[out].position;
    let window = minute..GAME_MINUTES;

    for k in 0..team.overrides.len() {
        if !team.overrides[k].active {
            continue;
        }
        if team.overrides[k].out_player == out_id {
            team.overrides[k].close();
            continue;
        }
        if team.overrides[k].filler.as_deref() != Some(out_id.as_str()) {
            continue;
        }
        let covered = team.index_of(&team.overrides[k].out_player);
        let covered_pos = covered.map_or(position, |i| team.players[i].position);
        let mut skip = vec![out];
        skip.extend(covered);
        let replacement = best_available(team, covered_pos, &skip).map(|i| team.players[i].id.clone());
        tracing::debug!(
            team = %team.id,
            covering = %team.overrides[k].out_player,
            replacement = ?replacement,
            "filler left the game, override re-resolved"
        );
        team.overrides[k].hand_over(&mut team.rotation, replacement.as_deref(), minute);
    }

    let charted = team.depth_chart.rank_of(&out_id);
    let behind: Vec<String> = match charted {
        Some((pos, rank)) => team
            .depth_chart
            .column(pos)
            .iter()
            .skip(rank + 1)
            .filter(|id| {
                team.index_of(id).map_or(false, |i| {
                    let p = &team.players[i];
                    p.is_eligible() && !p.is_shutdown
                })
            })
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    match behind.first() {
        Some(next) => {
            let prior = team.rotation.get(next).map(|s| s.intersect_range(window.clone())).unwrap_or_default();
            let own = team.rotation.get(&out_id).map(|s| s.intersect_range(window.clone())).unwrap_or_default();
            team.rotation.transfer(&out_id, next, window.clone());
            let starter_out = matches!(charted, Some((_, 0)));
            if let Some(third) = behind.get(1).filter(|_| starter_out) {
                for range in prior.difference(&own).ranges() {
                    team.rotation.transfer(next, third, range);
                }
            }
            tracing::debug!(team = %team.id, player = %out_id, successor = %next, "depth chart succession");
        }
        None => match best_available(team, position, &[out]) {
            Some(stand_in) => {
                let stand_in_id = team.players[stand_in].id.clone();
                team.rotation.transfer(&out_id, &stand_in_id, window.clone());
                tracing::debug!(team = %team.id, player = %out_id, successor = %stand_in_id, "best-available succession");
            }
            None => {
                tracing::warn!(team = %team.id, player = %out_id, "no replacement available, minutes dropped");
                team.rotation.entry(&out_id).remove(window.clone());
            }
        },
    }

    if let Some((pos, _)) = charted {
        if let Some(column) = team.depth_chart.slots.get_mut(&pos) {
            column.retain(|id| *id != out_id);
        }
    }

    let p = &mut team.players[out];
    p.bench_reason = Some(reason);
    p.scheduled_return_minute = None;
    p.is_shutdown = false;
}
