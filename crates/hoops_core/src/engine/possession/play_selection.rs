//! Play-type selection.
//!
//! Order of checks:
//! 1. Putback after an offensive rebound (`0.15 + off_reb * 0.02`).
//! 2. Fast break (`0.03 + pace * 0.012`, boosted after a live-ball turnover).
//! 3. Weighted draw over the half-court plays.

use super::probability_validator::ProbabilityValidator;
use crate::engine::rng::SimRng;
use crate::engine::state::{GameState, REGULATION_QUARTERS};
use crate::models::{PlayType, TacticSliders, TeamSide};

/// Late-game window: final two minutes of the fourth quarter or later.
const CLUTCH_SECONDS: u16 = 120;
const CLUTCH_MARGIN: i32 = 8;
/// Fast-break multiplier after a steal.
const LIVE_BALL_BOOST: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clutch {
    Trailing,
    Leading,
}

/// Clutch situation for `offense`, if any.
pub fn clutch_context(state: &GameState, offense: TeamSide) -> Option<Clutch> {
    if state.quarter < REGULATION_QUARTERS || state.game_clock > CLUTCH_SECONDS {
        return None;
    }
    let margin = state.score_margin(offense);
    if margin.abs() > CLUTCH_MARGIN {
        return None;
    }
    match margin {
        m if m < 0 => Some(Clutch::Trailing),
        m if m > 0 => Some(Clutch::Leading),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlayContext<'a> {
    pub sliders: &'a TacticSliders,
    /// Best rating among the five on the floor.
    pub star_rating: u8,
    pub star_is_big: bool,
    pub clutch: Option<Clutch>,
    pub offensive_rebound: bool,
    pub live_ball: bool,
}

impl<'a> PlayContext<'a> {
    pub fn from_state(state: &'a GameState, offense: TeamSide) -> Self {
        let team = state.team(offense);
        let star = team.top_on_court().map(|i| &team.players[i]);
        Self {
            sliders: team.sliders(),
            star_rating: star.map_or(0, |p| p.ovr),
            star_is_big: star.map_or(false, |p| p.position.is_big()),
            clutch: clutch_context(state, offense),
            offensive_rebound: state.next.offensive_rebound,
            live_ball: state.next.live_ball_turnover,
        }
    }
}

/// Weights over `PlayType::HALF_COURT`, in that order.
pub fn play_weights(ctx: &PlayContext<'_>) -> [f64; 9] {
    let s = ctx.sliders;
    let bm = s.ball_movement as f64;
    let three = s.three_point_focus as f64;
    let inside = s.inside_focus as f64;
    let pace = s.pace as f64;

    let mut w = [
        8.0 + (10.0 - bm) * 1.5,      // isolation
        12.0 + bm * 0.8,              // pnr handler
        6.0 + inside * 0.8,           // pnr roll
        4.0 + three * 0.8,            // pnr pop
        4.0 + inside * 1.2,           // post-up
        8.0 + three * 1.5 + bm * 0.5, // catch-and-shoot
        4.0 + bm * 0.8,               // cut
        4.0 + bm * 0.6,               // handoff
        2.0 + pace * 1.2,             // transition
    ];

    // Star gravity: the best player gets the ball in their spots.
    let star = (ctx.star_rating as f64 - 60.0).max(0.0);
    w[0] += star * 0.4;
    w[1] += star * 0.3;
    if ctx.star_is_big {
        w[4] += star * 0.15;
    }

    match ctx.clutch {
        Some(Clutch::Trailing) => {
            w[5] *= 1.5;
            w[3] *= 1.4;
            w[8] *= 1.1;
        }
        Some(Clutch::Leading) => {
            w[0] *= 1.3;
            w[4] *= 1.3;
            w[8] *= 0.3;
            w[5] *= 0.8;
        }
        None => {}
    }
    w
}

pub fn fast_break_chance(ctx: &PlayContext<'_>) -> f64 {
    let mut p = 0.03 + ctx.sliders.pace as f64 * 0.012;
    if ctx.live_ball {
        p *= LIVE_BALL_BOOST;
    }
    if ctx.clutch == Some(Clutch::Leading) {
        p *= 0.3;
    }
    p.min(0.6)
}

pub fn putback_chance(sliders: &TacticSliders) -> f64 {
    0.15 + sliders.off_reb as f64 * 0.02
}

pub fn select_play<R: SimRng + ?Sized>(ctx: &PlayContext<'_>, rng: &mut R) -> PlayType {
    if ctx.offensive_rebound && rng.chance(putback_chance(ctx.sliders)) {
        return PlayType::Putback;
    }
    if rng.chance(fast_break_chance(ctx)) {
        return PlayType::Transition;
    }

    let weights = play_weights(ctx);
    let probs = match ProbabilityValidator::new().normalize_weights(&weights) {
        Ok(p) => p,
        Err(reason) => {
            tracing::warn!(%reason, "play weights invalid, falling back to uniform");
            vec![1.0; weights.len()]
        }
    };
    rng.weighted_index(&probs)
        .map(|i| PlayType::HALF_COURT[i])
        .unwrap_or(PlayType::PnrHandler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedRng;
    use crate::engine::test_fixtures::*;

    fn ctx(sliders: &TacticSliders) -> PlayContext<'_> {
        PlayContext {
            sliders,
            star_rating: 60,
            star_is_big: false,
            clutch: None,
            offensive_rebound: false,
            live_ball: false,
        }
    }

    fn share(weights: &[f64; 9], i: usize) -> f64 {
        weights[i] / weights.iter().sum::<f64>()
    }

    #[test]
    fn test_weights_positive_for_all_slider_extremes() {
        for v in [1u8, 10] {
            let s = TacticSliders {
                pace: v,
                ball_movement: v,
                three_point_focus: v,
                inside_focus: v,
                ..Default::default()
            };
            assert!(play_weights(&ctx(&s)).iter().all(|w| *w > 0.0));
        }
    }

    #[test]
    fn test_ball_movement_trades_isolation_for_cuts() {
        let low = TacticSliders { ball_movement: 1, ..Default::default() };
        let high = TacticSliders { ball_movement: 10, ..Default::default() };
        let (wl, wh) = (play_weights(&ctx(&low)), play_weights(&ctx(&high)));
        assert!(share(&wl, 0) > share(&wh, 0));
        assert!(share(&wh, 6) > share(&wl, 6));
    }

    #[test]
    fn test_star_gravity_boosts_isolation() {
        let s = TacticSliders::default();
        let plain = play_weights(&ctx(&s));
        let star = play_weights(&PlayContext { star_rating: 95, ..ctx(&s) });
        assert!(share(&star, 0) > share(&plain, 0));
    }

    #[test]
    fn test_clutch_skews() {
        let s = TacticSliders::default();
        let neutral = play_weights(&ctx(&s));
        let trailing = play_weights(&PlayContext { clutch: Some(Clutch::Trailing), ..ctx(&s) });
        let leading = play_weights(&PlayContext { clutch: Some(Clutch::Leading), ..ctx(&s) });
        assert!(share(&trailing, 5) > share(&neutral, 5));
        assert!(share(&leading, 8) < share(&neutral, 8));
        assert!(share(&leading, 0) > share(&neutral, 0));
    }

    #[test]
    fn test_putback_short_circuits() {
        let s = TacticSliders::default();
        let c = PlayContext { offensive_rebound: true, ..ctx(&s) };
        assert_eq!(select_play(&c, &mut ScriptedRng::constant(0.0)), PlayType::Putback);
        // Without the offensive board the first roll is the fast-break check.
        assert_eq!(select_play(&ctx(&s), &mut ScriptedRng::constant(0.0)), PlayType::Transition);
    }

    #[test]
    fn test_pace_raises_fast_breaks() {
        let slow = TacticSliders { pace: 1, ..Default::default() };
        let fast = TacticSliders { pace: 10, ..Default::default() };
        assert!(fast_break_chance(&ctx(&fast)) > 2.0 * fast_break_chance(&ctx(&slow)));
        let stolen = PlayContext { live_ball: true, ..ctx(&slow) };
        assert!(fast_break_chance(&stolen) > fast_break_chance(&ctx(&slow)));
    }

    #[test]
    fn test_clutch_context_window() {
        let mut state = create_test_state();
        assert_eq!(clutch_context(&state, TeamSide::Home), None);
        state.quarter = 4;
        state.game_clock = 90;
        state.home.score = 100;
        state.away.score = 95;
        assert_eq!(clutch_context(&state, TeamSide::Home), Some(Clutch::Leading));
        assert_eq!(clutch_context(&state, TeamSide::Away), Some(Clutch::Trailing));
        state.away.score = 80;
        assert_eq!(clutch_context(&state, TeamSide::Away), None);
    }
}
