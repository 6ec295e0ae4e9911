//! Final result extraction.

use super::state::{GameState, TeamState};
use crate::models::{PlayerBoxScore, RosterUpdate, SimulationResult, TacticsSnapshot, TeamBoxScore};

/// Bumped whenever `SimulationResult` changes shape.
pub const RESULT_SCHEMA_VERSION: u8 = 1;

fn team_box_score(team: &TeamState) -> TeamBoxScore {
    let mut players: Vec<PlayerBoxScore> = team
        .players
        .iter()
        .map(|p| PlayerBoxScore {
            player_id: p.id.clone(),
            name: p.name.clone(),
            position: p.position,
            starter: p.starter,
            mp: p.stats.minutes(),
            stats: p.stats.clone(),
        })
        .collect();
    // Starters first, then by minutes.
    players.sort_by(|a, b| b.starter.cmp(&a.starter).then(b.stats.seconds_played.cmp(&a.stats.seconds_played)));

    TeamBoxScore {
        team_id: team.id.clone(),
        name: team.name.clone(),
        score: team.score,
        players,
        quarter_scores: team.quarter_scores.clone(),
        timeouts_remaining: team.timeouts,
    }
}

fn roster_updates(team: &TeamState) -> impl Iterator<Item = RosterUpdate> + '_ {
    team.players.iter().map(|p| RosterUpdate {
        player_id: p.id.clone(),
        condition: p.condition,
        condition_delta: p.condition - p.starting_condition,
        health: p.health,
    })
}

/// Snapshot the game into a `SimulationResult`. Works mid-game too; the
/// winner is only set once the game is over.
pub fn extract_sim_result(state: &GameState) -> SimulationResult {
    let winner_team_id = state.is_game_over.then(|| {
        if state.home.score > state.away.score {
            state.home.id.clone()
        } else {
            state.away.id.clone()
        }
    });

    SimulationResult {
        schema_version: RESULT_SCHEMA_VERSION,
        home: team_box_score(&state.home),
        away: team_box_score(&state.away),
        home_score: state.home.score,
        away_score: state.away.score,
        winner_team_id,
        went_to_tie_break: state.went_to_tie_break,
        tactics: TacticsSnapshot { home: state.home.tactics.clone(), away: state.away.tactics.clone() },
        roster_updates: roster_updates(&state.home).chain(roster_updates(&state.away)).collect(),
        injuries: state.injuries.clone(),
        logs: state.logs.clone(),
        rotation_history: state.rotation_history.clone(),
        shot_events: state.shot_events.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_loop::step_possession;
    use crate::engine::rotation::apply_manual_substitution;
    use crate::engine::test_fixtures::*;

    #[test]
    fn test_fresh_game_result() {
        let state = create_test_state();
        let result = extract_sim_result(&state);
        assert_eq!(result.schema_version, RESULT_SCHEMA_VERSION);
        assert!(result.winner_team_id.is_none());
        assert_eq!(result.home.players.len(), 12);
        assert!(result.home.players[..5].iter().all(|p| p.starter));
        assert_eq!(result.roster_updates.len(), 24);
        assert!(result.roster_updates.iter().all(|u| u.condition_delta == 0.0));
    }

    #[test]
    fn test_box_score_matches_team_totals() {
        let mut state = create_test_state();
        let mut rng = test_rng();
        while !step_possession(&mut state, &mut rng).unwrap().is_game_end {}
        let result = extract_sim_result(&state);

        for (team, score) in [(&result.home, result.home_score), (&result.away, result.away_score)] {
            let pts: u16 = team.players.iter().map(|p| p.stats.pts).sum();
            // A tie-break ghost point belongs to nobody.
            assert!(score == pts || (result.went_to_tie_break && score == pts + 1));
            let fga: u16 = team.players.iter().map(|p| p.stats.fga).sum();
            let shots = result.shot_events.iter().filter(|s| s.team_id == team.team_id).count();
            assert_eq!(fga as usize, shots);
        }
        let winner = result.winner_team_id.as_deref().unwrap();
        let expected = if result.home_score > result.away_score { &result.home.team_id } else { &result.away.team_id };
        assert_eq!(winner, expected.as_str());
        assert!(result.roster_updates.iter().any(|u| u.condition_delta < 0.0));
    }

    #[test]
    fn test_manual_sub_minutes_accrue_after_swap() {
        let mut state = create_test_state();
        let mut rng = test_rng();
        while state.elapsed_sec() < 120 {
            step_possession(&mut state, &mut rng).unwrap();
        }
        let swap_sec = state.elapsed_sec();
        let out = state.home.players[state.home.on_court[0]].id.clone();
        let incoming = state
            .home
            .bench
            .iter()
            .map(|&i| &state.home.players[i])
            .find(|p| p.stats.seconds_played == 0 && p.is_available())
            .map(|p| p.id.clone())
            .unwrap();
        apply_manual_substitution(&mut state, "h_team", &out, &incoming).unwrap();
        step_possession(&mut state, &mut rng).unwrap();

        let result = extract_sim_result(&state);
        let row = result.home.players.iter().find(|p| p.player_id == incoming).unwrap();
        assert!(row.mp > 0.0);
        assert!(row.stats.seconds_played <= state.elapsed_sec() - swap_sec);
        assert_eq!(result.rotation_history[&incoming].last().unwrap().in_sec, swap_sec);
    }
}
