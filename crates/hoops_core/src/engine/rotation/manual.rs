//! User-issued substitutions.

use super::schedule::GAME_MINUTES;
use super::substitute;
use crate::engine::state::{BenchReason, GameState};
use crate::error::{Result, SimError};

/// Swap `out_id` for `in_id` and hand the outgoing player's minutes for the
/// rest of the quarter to the incoming one.
pub fn apply_manual_substitution(state: &mut GameState, team_id: &str, out_id: &str, in_id: &str) -> Result<()> {
    if state.is_game_over {
        return Err(SimError::GameOver);
    }
    let side = state
        .side_of(team_id)
        .ok_or_else(|| SimError::InvalidSubstitution(format!("unknown team {team_id}")))?;
    let minute = state.current_minute();
    let quarter_end = (state.quarter as u16 * 12).min(GAME_MINUTES as u16) as u8;
    let window = minute..quarter_end.max(minute + 1);

    let team = state.team_mut(side);
    let unknown = |player: &str| SimError::UnknownPlayer { team: team_id.to_string(), player: player.to_string() };
    let out = team.index_of(out_id).ok_or_else(|| unknown(out_id))?;
    let incoming = team.index_of(in_id).ok_or_else(|| unknown(in_id))?;

    if !team.is_on_court(out) {
        return Err(SimError::InvalidSubstitution(format!("{out_id} is not on court")));
    }
    if team.is_on_court(incoming) {
        return Err(SimError::InvalidSubstitution(format!("{in_id} is already on court")));
    }
    let p = &team.players[incoming];
    if !p.is_eligible() {
        return Err(SimError::InvalidSubstitution(format!("{in_id} is not eligible")));
    }
    if p.is_shutdown {
        return Err(SimError::InvalidSubstitution(format!("{in_id} is shut down")));
    }

    // Calling a player back early ends their temporary benching.
    for ov in team.overrides.iter_mut().filter(|o| o.active && o.out_player == in_id) {
        ov.restore(&mut team.rotation);
    }
    let p = &mut team.players[incoming];
    p.bench_reason = None;
    p.scheduled_return_minute = None;
    p.manual_until = Some(window.end);

    team.rotation.transfer(out_id, in_id, window.clone());
    team.rotation.entry(in_id).insert(window.clone());
    tracing::debug!(team = %team_id, out = %out_id, incoming = %in_id, from = window.start, to = window.end, "manual substitution");

    substitute(state, side, out, incoming, BenchReason::Manual);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rotation::check_and_apply_rotation;
    use crate::engine::test_fixtures::*;
    use crate::models::{LogType, TeamSide};

    fn at_minute_two() -> GameState {
        let mut state = create_test_state();
        state.game_clock = 600;
        state
    }

    #[test]
    fn test_manual_sub_swaps_and_transfers_quarter() {
        let mut state = at_minute_two();
        apply_manual_substitution(&mut state, "h_team", "h_pg1", "h_pg3").unwrap();

        let (pg1, pg3) = (idx(&state, "h_pg1"), idx(&state, "h_pg3"));
        assert!(state.home.is_on_court(pg3));
        assert!(!state.home.is_on_court(pg1));
        assert_eq!(state.home.players[pg1].bench_reason, Some(BenchReason::Manual));
        assert_eq!(state.logs.last().unwrap().log_type, LogType::Substitution);
        assert_eq!(state.rotation_history["h_pg3"][0].in_sec, 120);

        let rot = &state.home.rotation;
        assert!(rot.is_scheduled("h_pg3", 2) && rot.is_scheduled("h_pg3", 11));
        assert!(!rot.is_scheduled("h_pg1", 5));
        // Later quarters are untouched.
        assert!(rot.is_scheduled("h_pg1", 20));
        assert!(!rot.is_scheduled("h_pg3", 20));

        // The next rotation check keeps the user's choice.
        assert_eq!(check_and_apply_rotation(&mut state, TeamSide::Home), 0);
        assert!(state.home.is_on_court(pg3));
    }

    #[test]
    fn test_manual_sub_rejections() {
        let mut state = at_minute_two();
        let err = apply_manual_substitution(&mut state, "nope", "h_pg1", "h_pg3");
        assert!(matches!(err, Err(SimError::InvalidSubstitution(_))));
        let err = apply_manual_substitution(&mut state, "h_team", "h_pg2", "h_pg3");
        assert!(matches!(err, Err(SimError::InvalidSubstitution(_))));
        let err = apply_manual_substitution(&mut state, "h_team", "h_pg1", "h_sg1");
        assert!(matches!(err, Err(SimError::InvalidSubstitution(_))));
        let err = apply_manual_substitution(&mut state, "h_team", "h_pg1", "ghost");
        assert!(matches!(err, Err(SimError::UnknownPlayer { .. })));

        let pg3 = idx(&state, "h_pg3");
        state.home.players[pg3].fouled_out = true;
        let err = apply_manual_substitution(&mut state, "h_team", "h_pg1", "h_pg3");
        assert!(matches!(err, Err(SimError::InvalidSubstitution(_))));

        state.is_game_over = true;
        let err = apply_manual_substitution(&mut state, "h_team", "h_pg1", "h_pg2");
        assert!(matches!(err, Err(SimError::GameOver)));
        assert_eq!(state.home.on_court.len(), 5);
    }

    #[test]
    fn test_manual_sub_ends_foul_trouble_benching() {
        let mut state = at_minute_two();
        let sf1 = idx(&state, "h_sf1");
        state.home.players[sf1].stats.pf = 2;
        check_and_apply_rotation(&mut state, TeamSide::Home);
        assert!(!state.home.is_on_court(sf1));
        let filler = state.home.overrides[0].filler.clone().unwrap();

        apply_manual_substitution(&mut state, "h_team", &filler, "h_sf1").unwrap();
        assert!(state.home.is_on_court(sf1));
        assert!(!state.home.overrides[0].active);
        assert_eq!(state.home.players[sf1].bench_reason, None);

        // Still in foul trouble, but the coach's call holds for the quarter.
        state.game_clock = 590;
        check_and_apply_rotation(&mut state, TeamSide::Home);
        assert!(state.home.is_on_court(sf1));
        assert_eq!(state.home.players[sf1].bench_reason, None);

        state.game_clock = 60;
        check_and_apply_rotation(&mut state, TeamSide::Home);
        assert!(state.home.is_on_court(sf1));
    }

    #[test]
    fn test_manual_recall_still_respects_shutdown() {
        let mut state = at_minute_two();
        apply_manual_substitution(&mut state, "h_team", "h_pg1", "h_pg3").unwrap();
        let pg3 = idx(&state, "h_pg3");
        state.home.players[pg3].condition = 15.0;
        state.game_clock = 540;
        check_and_apply_rotation(&mut state, TeamSide::Home);
        assert!(!state.home.is_on_court(pg3));
        assert!(state.home.players[pg3].is_shutdown);
    }
}
