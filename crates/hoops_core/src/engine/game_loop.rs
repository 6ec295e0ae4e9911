//! # Game Loop
//!
//! [`step_possession`] is the only transition a caller drives. One call:
//!
//! 1. opens the next period if the previous one ran out of clock,
//! 2. resolves exactly one possession against the current state,
//! 3. applies it (score, box score, play-by-play, shot chart, fatigue,
//!    injuries, rotation, momentum, timeouts, next possession),
//! 4. closes the period or the game when the clock hits zero.
//!
//! ## Tie-break
//! A tie after regulation is settled by a single possession with a raised
//! hit-rate floor. If that possession does not break the tie the defending
//! side is credited one point without a narrated extra possession.

use super::fatigue::{self, DrainContext};
use super::possession::{
    resolve_possession, FreeThrowTrip, PossessionOutcome, PossessionResult, Rebound, ShotAttempt,
};
use super::rng::SimRng;
use super::rotation::check_and_apply_rotation;
use super::state::{
    GameState, LivePlayer, NextPossession, FOUL_OUT_LIMIT, FULL_SHOT_CLOCK, QUARTER_SECONDS,
    REGULATION_QUARTERS, RESET_SHOT_CLOCK,
};
use crate::error::{Result, SimError};
use crate::models::{format_clock, InjuryRecord, LogType, PbpLog, ShotEvent, SubZone, TeamSide, Zone};
use uuid::Uuid;

const SIDES: [TeamSide; 2] = [TeamSide::Home, TeamSide::Away];

/// What one call to [`step_possession`] produced.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub result: PossessionResult,
    /// The possession ran the period clock out.
    pub is_quarter_end: bool,
    pub is_game_end: bool,
    /// Play-by-play lines written during this call, in order.
    pub new_logs: Vec<PbpLog>,
}

pub fn step_possession<R: SimRng + ?Sized>(state: &mut GameState, rng: &mut R) -> Result<StepOutcome> {
    if state.is_game_over {
        return Err(SimError::GameOver);
    }
    let first_log = state.logs.len();

    if state.game_clock == 0 {
        start_next_period(state, rng);
    }

    let result = resolve_possession(state, rng)?;
    apply_result(state, &result, rng);

    let mut is_quarter_end = false;
    if state.is_tie_break() {
        settle_tie_break(state, result.offense);
        is_quarter_end = true;
    } else if state.game_clock == 0 {
        end_quarter(state);
        is_quarter_end = true;
    }

    Ok(StepOutcome {
        result,
        is_quarter_end,
        is_game_end: state.is_game_over,
        new_logs: state.logs[first_log..].to_vec(),
    })
}

// ========== Period boundaries ==========

fn start_next_period<R: SimRng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let halftime = state.quarter == 2;
    state.quarter += 1;
    state.game_clock = QUARTER_SECONDS;
    state.shot_clock = FULL_SHOT_CLOCK;
    state.next = NextPossession::default();

    let cfg = state.config.fatigue.clone();
    for side in SIDES {
        let team = state.team_mut(side);
        team.team_fouls = 0;
        team.quarter_scores.push(0);
        for p in &mut team.players {
            fatigue::apply_break_recovery(p, halftime, &cfg);
        }
    }
    let elapsed = state.elapsed_sec();
    state.momentum.reset(elapsed);

    state.possession = match state.quarter {
        2 | 3 => state.tip_winner.opponent(),
        4 => state.tip_winner,
        _ if rng.chance(0.5) => TeamSide::Home,
        _ => TeamSide::Away,
    };

    let name = state.team(state.possession).name.clone();
    let text = if state.is_tie_break() {
        format!("Tie-break possession. {name} has the ball.")
    } else {
        format!("Start of Q{}. {name} has the ball.", state.quarter)
    };
    state.log(state.possession, LogType::QuarterStart, text, None);
    tracing::debug!(quarter = state.quarter, possession = ?state.possession, "period start");

    for side in SIDES {
        check_and_apply_rotation(state, side);
    }
}

fn end_quarter(state: &mut GameState) {
    let quarter = state.quarter;
    state.log(state.possession, LogType::QuarterEnd, format!("End of Q{quarter}"), None);
    if quarter < REGULATION_QUARTERS {
        return;
    }
    if state.home.score == state.away.score {
        state.went_to_tie_break = true;
        tracing::debug!(score = state.home.score, "tied after regulation");
    } else {
        finish_game(state);
    }
}

/// Close the tie-break: the defense takes the ghost point if the tie survived.
fn settle_tie_break(state: &mut GameState, offense: TeamSide) {
    if state.home.score == state.away.score {
        let defense = offense.opponent();
        state.team_mut(defense).add_points(1);
        let name = state.team(defense).name.clone();
        state.log(defense, LogType::Score, format!("{name} wins the tie-break"), Some(1));
        tracing::debug!(?defense, "tie-break ghost point");
    }
    finish_game(state);
}

fn finish_game(state: &mut GameState) {
    state.is_game_over = true;
    for side in SIDES {
        let ids: Vec<String> = state.team(side).on_court_players().map(|p| p.id.clone()).collect();
        for id in ids {
            state.close_stint(&id);
        }
    }

    let winner = if state.home.score > state.away.score { TeamSide::Home } else { TeamSide::Away };
    let text = format!(
        "Final: {} {}, {} {}",
        state.home.name, state.home.score, state.away.name, state.away.score
    );
    state.log(winner, LogType::GameEnd, text, None);
    tracing::info!(
        home = %state.home.id,
        away = %state.away.id,
        home_score = state.home.score,
        away_score = state.away.score,
        tie_break = state.went_to_tie_break,
        "game over"
    );
}

// ========== Apply ==========

/// Apply a resolved possession to `state`. The clock moves first so every
/// line and shot event is stamped with the time the play ended.
pub fn apply_result<R: SimRng + ?Sized>(state: &mut GameState, result: &PossessionResult, rng: &mut R) {
    let offense = result.offense;
    let defense = offense.opponent();
    state.game_clock -= result.elapsed_sec.min(state.game_clock);

    match &result.outcome {
        PossessionOutcome::Score { shot, assist, and_one } => {
            record_shot(state, result, shot, true, assist.as_deref(), rng);
            add_score(state, offense, shot.points());
            let shooter = name_of(state, offense, &shot.shooter);
            let text = match assist {
                Some(a) => format!(
                    "{shooter} makes a {} ({}), assisted by {}",
                    shot_phrase(shot.sub_zone),
                    result.play_type.label(),
                    name_of(state, offense, a)
                ),
                None => format!("{shooter} makes a {} ({})", shot_phrase(shot.sub_zone), result.play_type.label()),
            };
            state.log(offense, LogType::Score, text, Some(shot.points()));
            if let Some(and_one) = and_one {
                charge_foul(state, defense, &and_one.fouler);
                shoot_trip(state, offense, &and_one.trip);
            }
        }
        PossessionOutcome::Miss { shot, blocked_by, rebound } => {
            record_shot(state, result, shot, false, None, rng);
            let shooter = name_of(state, offense, &shot.shooter);
            match blocked_by {
                Some(blocker) => {
                    if let Some(p) = player_mut(state, defense, blocker) {
                        p.stats.blk += 1;
                    }
                    let text = format!("{} blocks {shooter}", name_of(state, defense, blocker));
                    state.log(defense, LogType::Block, text, None);
                }
                None => {
                    let text = format!("{shooter} misses a {}", shot_phrase(shot.sub_zone));
                    state.log(offense, LogType::Miss, text, None);
                }
            }
            credit_rebound(state, offense, rebound.as_ref());
        }
        PossessionOutcome::Turnover { ball_handler, stolen_by } => {
            if let Some(p) = player_mut(state, offense, ball_handler) {
                p.stats.tov += 1;
            }
            let handler = name_of(state, offense, ball_handler);
            let text = match stolen_by {
                Some(thief) => {
                    if let Some(p) = player_mut(state, defense, thief) {
                        p.stats.stl += 1;
                    }
                    format!("{} steals the ball from {handler}", name_of(state, defense, thief))
                }
                None => format!("Turnover by {handler}"),
            };
            state.log(offense, LogType::Turnover, text, None);
        }
        PossessionOutcome::Foul { fouler, .. } => {
            charge_foul(state, defense, fouler);
        }
        PossessionOutcome::FreeThrow { fouler, trip, rebound } => {
            charge_foul(state, defense, fouler);
            shoot_trip(state, offense, trip);
            credit_rebound(state, offense, rebound.as_ref());
        }
    }

    advance_time(state, result.elapsed_sec, rng);
    for side in SIDES {
        check_and_apply_rotation(state, side);
    }
    call_auto_timeout(state);

    let offensive_rebound = matches!(
        &result.outcome,
        PossessionOutcome::Miss { rebound: Some(r), .. } | PossessionOutcome::FreeThrow { rebound: Some(r), .. }
            if r.offensive
    );
    state.next = NextPossession { offensive_rebound, live_ball_turnover: result.is_steal() };
    if result.keeps_possession() {
        state.shot_clock = RESET_SHOT_CLOCK;
    } else {
        state.possession = defense;
        state.shot_clock = FULL_SHOT_CLOCK;
    }
}

fn player_mut<'a>(state: &'a mut GameState, side: TeamSide, id: &str) -> Option<&'a mut LivePlayer> {
    let team = state.team_mut(side);
    let i = team.index_of(id)?;
    Some(&mut team.players[i])
}

fn name_of(state: &GameState, side: TeamSide, id: &str) -> String {
    let team = state.team(side);
    team.index_of(id).map_or_else(|| id.to_string(), |i| team.players[i].name.clone())
}

fn shot_phrase(sub_zone: SubZone) -> &'static str {
    match sub_zone.zone() {
        Zone::Rim => "layup",
        Zone::Paint => "floater",
        Zone::Mid => "jumper",
        Zone::Three => "three",
    }
}

/// Uuid v4 from the game RNG, so seeded games reproduce their shot ids.
fn shot_id<R: SimRng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    for chunk in bytes.chunks_mut(8) {
        let bits = (rng.next_f64() * (1u64 << 53) as f64) as u64;
        chunk.copy_from_slice(&bits.to_le_bytes());
    }
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

fn record_shot<R: SimRng + ?Sized>(
    state: &mut GameState,
    result: &PossessionResult,
    shot: &ShotAttempt,
    made: bool,
    assist: Option<&str>,
    rng: &mut R,
) {
    let offense = result.offense;
    if let Some(p) = player_mut(state, offense, &shot.shooter) {
        p.stats.record_field_goal(shot.sub_zone, made);
    }
    if let Some(p) = assist.and_then(|a| player_mut(state, offense, a)) {
        p.stats.ast += 1;
    }
    let event = ShotEvent {
        id: shot_id(rng),
        quarter: state.quarter,
        game_clock: state.game_clock,
        team_id: state.team(offense).id.clone(),
        player_id: shot.shooter.clone(),
        x: shot.x,
        y: shot.y,
        zone: shot.sub_zone,
        is_make: made,
        play_type: result.play_type,
        assist_player_id: assist.map(str::to_string),
    };
    state.shot_events.push(event);
}

/// Team score, linescore, momentum and plus/minus for both floors.
fn add_score(state: &mut GameState, side: TeamSide, points: u8) {
    if points == 0 {
        return;
    }
    let elapsed = state.elapsed_sec();
    state.momentum.record_score(side, points as u16, elapsed);
    let (scorers, conceders) = state.split_mut(side);
    scorers.add_points(points as u16);
    for &i in &scorers.on_court {
        scorers.players[i].stats.plus_minus += points as i32;
    }
    for &i in &conceders.on_court {
        conceders.players[i].stats.plus_minus -= points as i32;
    }
}

fn charge_foul(state: &mut GameState, side: TeamSide, fouler: &str) {
    let team = state.team_mut(side);
    team.team_fouls = team.team_fouls.saturating_add(1);
    let Some(i) = team.index_of(fouler) else {
        return;
    };
    let p = &mut team.players[i];
    p.stats.pf += 1;
    let fouls_out = p.stats.pf >= FOUL_OUT_LIMIT && !p.fouled_out;
    if fouls_out {
        p.fouled_out = true;
    }
    let (name, pf) = (p.name.clone(), p.stats.pf);

    state.log(side, LogType::Foul, format!("Foul on {name} ({pf} PF)"), None);
    if fouls_out {
        state.log(side, LogType::FoulOut, format!("{name} has fouled out"), None);
        tracing::debug!(?side, player = %fouler, "fouled out");
    }
}

fn shoot_trip(state: &mut GameState, side: TeamSide, trip: &FreeThrowTrip) {
    if let Some(p) = player_mut(state, side, &trip.shooter) {
        p.stats.record_free_throws(trip.attempted, trip.made);
    }
    add_score(state, side, trip.made);
    let text = format!("{} makes {} of {} free throws", name_of(state, side, &trip.shooter), trip.made, trip.attempted);
    state.log(side, LogType::FreeThrow, text, Some(trip.made));
}

fn credit_rebound(state: &mut GameState, offense: TeamSide, rebound: Option<&Rebound>) {
    let Some(r) = rebound else {
        return;
    };
    let side = if r.offensive { offense } else { offense.opponent() };
    if let Some(p) = player_mut(state, side, &r.rebounder) {
        p.stats.reb += 1;
        if r.offensive {
            p.stats.oreb += 1;
        } else {
            p.stats.dreb += 1;
        }
    }
    let kind = if r.offensive { "offensive" } else { "defensive" };
    let text = format!("{} grabs the {kind} rebound", name_of(state, side, &r.rebounder));
    state.log(side, LogType::Rebound, text, None);
}

/// Fatigue, minutes, ace-stopper exposure and the optional injury roll for one slice.
fn advance_time<R: SimRng + ?Sized>(state: &mut GameState, secs: u16, rng: &mut R) {
    let minutes = secs as f64 / 60.0;
    let fatigue_cfg = state.config.fatigue.clone();
    let injury_model = state.config.injury.clone();
    let mut injuries = Vec::new();

    for side in SIDES {
        let opponent = state.team(side.opponent());
        let opp_has_stopper = opponent.stopper.is_some();
        let opp_stopper_on = opponent.stopper_on_court().is_some();
        let opp_ace_on = opponent.ace.map_or(false, |a| opponent.is_on_court(a));

        let team = state.team_mut(side);
        let sliders = team.sliders().clone();
        let (back_to_back, stopper, ace) = (team.back_to_back, team.stopper, team.ace);
        for i in 0..team.players.len() {
            let on_court = team.on_court.contains(&i);
            let p = &mut team.players[i];
            if !on_court {
                fatigue::apply_bench_recovery(p, minutes, &fatigue_cfg);
                continue;
            }
            let ctx = DrainContext { sliders: &sliders, back_to_back, chasing_ace: stopper == Some(i) && opp_ace_on };
            fatigue::apply_court_drain(p, minutes, &ctx, &fatigue_cfg);
            p.stats.seconds_played += secs as u32;
            if ace == Some(i) && opp_has_stopper {
                if opp_stopper_on {
                    p.stopper_guarded_sec += secs as u32;
                } else {
                    p.stopper_free_sec += secs as u32;
                }
            }
        }

        if !injury_model.is_enabled() {
            continue;
        }
        for i in team.on_court.clone() {
            let p = &mut team.players[i];
            if let Some(health) = fatigue::roll_injury(p, minutes, &injury_model, rng) {
                p.health = health;
                injuries.push((side, p.id.clone(), p.name.clone(), health));
            }
        }
    }

    for (side, player_id, name, health) in injuries {
        state.injuries.push(InjuryRecord {
            player_id: player_id.clone(),
            team_id: state.team(side).id.clone(),
            quarter: state.quarter,
            time_remaining: format_clock(state.game_clock),
            health,
        });
        state.log(side, LogType::Injury, format!("{name} leaves the game injured"), None);
        tracing::debug!(?side, player = %player_id, ?health, "injury");
    }
}

/// The side on the wrong end of a big run stops play, if it has a timeout left.
fn call_auto_timeout(state: &mut GameState) {
    if state.game_clock == 0 {
        return;
    }
    let threshold = state.config.rotation.auto_timeout_run;
    for side in SIDES {
        let run = state.momentum.run_against(side);
        if run < threshold || state.team(side).timeouts == 0 {
            continue;
        }
        let team = state.team_mut(side);
        team.timeouts -= 1;
        let text = format!("{} calls timeout ({} left)", team.name, team.timeouts);
        let elapsed = state.elapsed_sec();
        state.momentum.reset(elapsed);
        state.log(side, LogType::Timeout, text, None);
        tracing::debug!(?side, run, "auto timeout");
        break;
    }
}
