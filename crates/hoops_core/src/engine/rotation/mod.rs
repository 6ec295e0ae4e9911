//! # Rotation & Substitution Manager
//!
//! Keeps five players on the floor for each side while honouring the
//! per-minute schedule. One check runs after every possession:
//!
//! 1. Permanent exits (six fouls, injury) go through depth-chart succession.
//! 2. Temporary benchings whose return condition is met are restored.
//! 3. New temporary benchings: shutdown, foul trouble, fatigue red zone.
//! 4. The desired lineup for the current minute is applied as a diff.
//!
//! ## Lineup fallback
//! When fewer than five scheduled players are available the lineup is
//! topped up from, in order: unscheduled available players, temporarily
//! benched players, shut-down players, and finally disqualified players.

mod depth;
mod manual;
mod overrides;
mod schedule;
mod succession;

pub use depth::build_rotation_map;
pub use manual::apply_manual_substitution;
pub use overrides::RotationOverride;
pub use schedule::{MinuteSet, RotationMap, GAME_MINUTES};
pub use succession::{best_available, handle_permanent_exit};

use super::fatigue;
use super::state::{BenchReason, GameState, LivePlayer, TeamState, FOUL_OUT_LIMIT};
use crate::config::{FatigueConfig, RotationConfig};
use crate::models::{LogType, TeamSide};
use std::ops::Range;

pub const LINEUP_SIZE: usize = 5;

// ========== Lineup ==========

/// Fallback tier when the schedule alone cannot field five.
fn fallback_tier(p: &LivePlayer) -> u8 {
    if !p.is_eligible() {
        3
    } else if p.is_shutdown {
        2
    } else if p.is_available() {
        0
    } else {
        1
    }
}

/// The five `team` should field at `minute`, as roster indices.
pub fn desired_lineup(team: &TeamState, minute: u8) -> Vec<usize> {
    let on = |i: usize| team.is_on_court(i);
    let rank = |i: usize| team.depth_chart.rank_of(&team.players[i].id).map_or(usize::MAX, |(_, r)| r);

    let mut lineup: Vec<usize> = (0..team.players.len())
        .filter(|&i| team.players[i].is_available() && team.rotation.is_scheduled(&team.players[i].id, minute))
        .collect();
    lineup.sort_by(|&a, &b| {
        on(b).cmp(&on(a))
            .then(rank(a).cmp(&rank(b)))
            .then(team.players[b].ovr.cmp(&team.players[a].ovr))
    });
    lineup.truncate(LINEUP_SIZE);

    for tier in 0..=3 {
        if lineup.len() == LINEUP_SIZE {
            break;
        }
        let mut pool: Vec<usize> = (0..team.players.len())
            .filter(|i| !lineup.contains(i) && fallback_tier(&team.players[*i]) == tier)
            .collect();
        pool.sort_by(|&a, &b| {
            let (pa, pb) = (&team.players[a], &team.players[b]);
            on(b).cmp(&on(a))
                .then(pb.ovr.cmp(&pa.ovr))
                .then(pb.condition.total_cmp(&pa.condition))
        });
        if tier >= 2 && !pool.is_empty() {
            tracing::warn!(team = %team.id, minute, tier, "short-handed, fielding unavailable players");
        }
        let missing = LINEUP_SIZE - lineup.len();
        lineup.extend(pool.into_iter().take(missing));
    }
    lineup
}

// ========== Rotation check ==========

/// Game minute a foul-trouble benching ends, if `p` is in foul trouble now.
fn foul_trouble_return(p: &LivePlayer, quarter: u8, minute: u8, cfg: &RotationConfig) -> Option<u8> {
    let threshold = cfg.foul_trouble_threshold(quarter)?;
    if p.stats.pf < threshold || p.stats.pf >= FOUL_OUT_LIMIT {
        return None;
    }
    let back = if quarter >= 4 { cfg.q4_foul_trouble_return_minute } else { quarter * 12 };
    (minute < back).then_some(back)
}

/// Bench player for a temporary window: not on court, available, out of
/// the red zone and not already due in at `minute`.
fn pick_filler(team: &TeamState, out: usize, minute: u8, cfg: &FatigueConfig) -> Option<usize> {
    let position = team.players[out].position;
    team.bench
        .iter()
        .copied()
        .filter(|&i| {
            let p = &team.players[i];
            p.is_available() && !fatigue::in_red_zone(p, cfg) && !team.rotation.is_scheduled(&p.id, minute)
        })
        .min_by(|&a, &b| {
            let (pa, pb) = (&team.players[a], &team.players[b]);
            pa.position
                .distance(position)
                .cmp(&pb.position.distance(position))
                .then(pb.ovr.cmp(&pa.ovr))
                .then(pb.condition.total_cmp(&pa.condition))
        })
}

fn bench_temporarily(team: &mut TeamState, out: usize, filler: Option<usize>, reason: BenchReason, window: Range<u8>) {
    let out_id = team.players[out].id.clone();
    let filler_id = filler.map(|f| team.players[f].id.clone());
    let ov = RotationOverride::open(&mut team.rotation, &out_id, filler_id.as_deref(), reason, window.clone());
    team.overrides.push(ov);

    let p = &mut team.players[out];
    p.bench_reason = Some(reason);
    p.is_shutdown |= reason == BenchReason::Shutdown;
    p.scheduled_return_minute = (reason == BenchReason::FoulTrouble).then_some(window.end);
    tracing::debug!(
        team = %team.id,
        player = %out_id,
        filler = ?filler_id,
        ?reason,
        from = window.start,
        to = window.end,
        "temporary benching"
    );
}

fn resolve_permanent_exits(team: &mut TeamState, minute: u8) {
    let exits: Vec<(usize, BenchReason)> = team
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            !p.is_eligible() && !matches!(p.bench_reason, Some(BenchReason::FouledOut | BenchReason::Injury))
        })
        .map(|(i, p)| (i, if p.fouled_out { BenchReason::FouledOut } else { BenchReason::Injury }))
        .collect();
    for (i, reason) in exits {
        handle_permanent_exit(team, i, minute, reason);
    }
}

fn resolve_returns(team: &mut TeamState, minute: u8, cfg: &FatigueConfig) {
    for k in 0..team.overrides.len() {
        let ov = &team.overrides[k];
        if !ov.active {
            continue;
        }
        let Some(i) = team.index_of(&ov.out_player) else {
            continue;
        };
        let p = &team.players[i];
        let ready = match ov.reason {
            BenchReason::FoulTrouble => minute >= ov.to_minute,
            BenchReason::Fatigue => fatigue::cleared_red_zone(p, cfg),
            BenchReason::Shutdown => fatigue::cleared_shutdown(p, cfg),
            _ => false,
        };
        if !ready || !p.is_eligible() {
            continue;
        }
        team.overrides[k].restore(&mut team.rotation);
        let p = &mut team.players[i];
        p.bench_reason = None;
        p.is_shutdown = false;
        p.scheduled_return_minute = None;
        tracing::debug!(team = %team.id, player = %p.id, minute, "temporary benching over");
    }
}

fn resolve_temporary_benchings(
    team: &mut TeamState,
    minute: u8,
    quarter: u8,
    fatigue_cfg: &FatigueConfig,
    rotation_cfg: &RotationConfig,
) {
    for i in team.on_court.clone() {
        let p = &team.players[i];
        if !p.is_eligible() {
            continue;
        }

        // Already benched but fielded as a fallback: only escalate to shutdown.
        if let Some(k) = team.overrides.iter().position(|o| o.active && o.out_player == p.id) {
            if fatigue::needs_shutdown(p, fatigue_cfg) && !p.is_shutdown {
                let ov = &mut team.overrides[k];
                ov.reason = BenchReason::Shutdown;
                ov.to_minute = GAME_MINUTES;
                let p = &mut team.players[i];
                p.is_shutdown = true;
                p.bench_reason = Some(BenchReason::Shutdown);
                p.scheduled_return_minute = None;
            }
            continue;
        }

        let user_call = p.manual_until.is_some_and(|until| minute < until);
        let trigger = if fatigue::needs_shutdown(p, fatigue_cfg) {
            Some((BenchReason::Shutdown, GAME_MINUTES))
        } else if user_call {
            None
        } else if let Some(back) = foul_trouble_return(p, quarter, minute, rotation_cfg) {
            Some((BenchReason::FoulTrouble, back))
        } else if fatigue::in_red_zone(p, fatigue_cfg) {
            Some((BenchReason::Fatigue, GAME_MINUTES))
        } else {
            None
        };
        let Some((reason, back)) = trigger else {
            continue;
        };

        let filler = pick_filler(team, i, minute, fatigue_cfg);
        if reason == BenchReason::Fatigue && filler.is_none() {
            continue;
        }
        bench_temporarily(team, i, filler, reason, minute..back);
    }
}

/// Physical swap with stint bookkeeping and a play-by-play line.
pub(crate) fn substitute(state: &mut GameState, side: TeamSide, out: usize, incoming: usize, reason: BenchReason) {
    let now = state.elapsed_sec();
    let team = state.team_mut(side);
    if !team.swap(out, incoming) {
        return;
    }

    let out_p = &mut team.players[out];
    if out_p.bench_reason.is_none() {
        out_p.bench_reason = Some(reason);
    }
    out_p.last_sub_in_sec = None;
    let (out_id, out_name) = (out_p.id.clone(), out_p.name.clone());

    let in_p = &mut team.players[incoming];
    if matches!(in_p.bench_reason, Some(BenchReason::Scheduled | BenchReason::Manual)) {
        in_p.bench_reason = None;
    }
    in_p.last_sub_in_sec = Some(now);
    in_p.condition_at_sub_in = in_p.condition;
    let (in_id, in_name) = (in_p.id.clone(), in_p.name.clone());

    state.close_stint(&out_id);
    state.open_stint(&in_id);
    state.log(side, LogType::Substitution, format!("{in_name} checks in for {out_name}"), None);
    tracing::debug!(?side, out = %out_id, incoming = %in_id, ?reason, "substitution");
}

fn apply_lineup(state: &mut GameState, side: TeamSide, lineup: &[usize]) -> usize {
    let team = state.team(side);
    let outs: Vec<usize> = team.on_court.iter().copied().filter(|i| !lineup.contains(i)).collect();
    let ins: Vec<usize> = lineup.iter().copied().filter(|&i| !team.is_on_court(i)).collect();

    let swaps = outs.len().min(ins.len());
    for (&out, &incoming) in outs.iter().zip(&ins) {
        substitute(state, side, out, incoming, BenchReason::Scheduled);
    }

    // Short lineup topped up without a matching exit.
    for &incoming in ins.iter().skip(swaps) {
        let team = state.team_mut(side);
        team.bench.retain(|&i| i != incoming);
        team.on_court.push(incoming);
        let now = state.elapsed_sec();
        let p = &mut state.team_mut(side).players[incoming];
        p.last_sub_in_sec = Some(now);
        p.condition_at_sub_in = p.condition;
        let id = p.id.clone();
        state.open_stint(&id);
    }
    swaps
}

/// Reconcile `side`'s lineup with its schedule and eligibility; returns the swap count.
pub fn check_and_apply_rotation(state: &mut GameState, side: TeamSide) -> usize {
    let minute = state.current_minute();
    let quarter = state.quarter;
    let fatigue_cfg = state.config.fatigue.clone();
    let rotation_cfg = state.config.rotation.clone();

    let team = state.team_mut(side);
    resolve_permanent_exits(team, minute);
    resolve_returns(team, minute, &fatigue_cfg);
    resolve_temporary_benchings(team, minute, quarter, &fatigue_cfg, &rotation_cfg);

    let lineup = desired_lineup(state.team(side), minute);
    apply_lineup(state, side, &lineup)
}
