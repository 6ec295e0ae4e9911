//! Game State
//!
//! `GameState` is the root aggregate owned by the game loop for one game.
//! Each `TeamState` keeps its roster as an arena (`players`) and refers to
//! it by index from `on_court` and `bench`, so lineup changes never move
//! player records around.

use super::archetypes::Archetypes;
use super::momentum::MomentumState;
use super::rng::SimRng;
use super::rotation::{self, build_rotation_map, RotationMap, RotationOverride};
use crate::config::EngineConfig;
use crate::error::{Result, SimError};
use crate::models::{
    format_clock, DepthChart, GameTactics, HealthStatus, InjuryRecord, LogType, PbpLog, Player,
    PlayerAttributes, PlayerStats, Position, ShotEvent, ShotTendencies, StintInterval,
    TacticSliders, Team, TeamSide,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const QUARTER_SECONDS: u16 = 720;
pub const REGULATION_QUARTERS: u8 = 4;
pub const FULL_SHOT_CLOCK: u8 = 24;
pub const RESET_SHOT_CLOCK: u8 = 14;
pub const FOUL_OUT_LIMIT: u8 = 6;
pub const BONUS_TEAM_FOULS: u8 = 5;

/// Why a player is sitting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BenchReason {
    Scheduled,
    Manual,
    FoulTrouble,
    Fatigue,
    Shutdown,
    FouledOut,
    Injury,
}

impl BenchReason {
    /// Reasons that keep the depth chart intact and expect the player back.
    pub fn is_temporary(&self) -> bool {
        matches!(self, BenchReason::FoulTrouble | BenchReason::Fatigue | BenchReason::Shutdown)
    }
}

/// Per-game inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSetup {
    pub home: Team,
    pub away: Team,
    #[serde(default)]
    pub home_tactics: GameTactics,
    #[serde(default)]
    pub away_tactics: GameTactics,
    #[serde(default)]
    pub user_team_id: Option<String>,
    #[serde(default)]
    pub home_back_to_back: bool,
    #[serde(default)]
    pub away_back_to_back: bool,
    /// `None` seeds the session from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Mutable runtime projection of a roster player.
#[derive(Debug, Clone)]
pub struct LivePlayer {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub height_cm: u16,
    pub ovr: u8,
    pub attributes: PlayerAttributes,
    pub tendencies: Option<ShotTendencies>,
    pub archetypes: Archetypes,
    pub stats: PlayerStats,
    pub starter: bool,
    pub condition: f64,
    pub starting_condition: f64,
    pub health: HealthStatus,
    pub fouled_out: bool,
    /// Game seconds elapsed at the last sub-in.
    pub last_sub_in_sec: Option<u32>,
    pub condition_at_sub_in: f64,
    pub is_shutdown: bool,
    pub bench_reason: Option<BenchReason>,
    pub scheduled_return_minute: Option<u8>,
    /// End of a user-called stint; foul trouble and red-zone benchings wait until then.
    pub manual_until: Option<u8>,
    /// Seconds played while the opposing stopper was on the floor.
    pub stopper_guarded_sec: u32,
    /// Seconds played while the opposing stopper sat.
    pub stopper_free_sec: u32,
}

impl LivePlayer {
    pub fn from_player(player: &Player) -> Self {
        let condition = player.condition.clamp(0.0, 100.0);
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            position: player.position,
            height_cm: player.height_cm,
            ovr: player.ovr,
            attributes: player.attributes.clone(),
            tendencies: player.tendencies.clone(),
            archetypes: Archetypes::derive(player),
            stats: PlayerStats::default(),
            starter: false,
            condition,
            starting_condition: condition,
            health: player.health,
            fouled_out: false,
            last_sub_in_sec: None,
            condition_at_sub_in: condition,
            is_shutdown: false,
            bench_reason: None,
            scheduled_return_minute: None,
            manual_until: None,
            stopper_guarded_sec: 0,
            stopper_free_sec: 0,
        }
    }

    /// Healthy and still under the foul limit.
    pub fn is_eligible(&self) -> bool {
        self.health.is_healthy() && !self.fouled_out
    }

    /// Eligible and not serving a temporary benching or shutdown.
    pub fn is_available(&self) -> bool {
        self.is_eligible()
            && !self.is_shutdown
            && !self.bench_reason.map_or(false, |r| r.is_temporary())
    }
}

/// One side of the game.
#[derive(Debug, Clone)]
pub struct TeamState {
    pub side: TeamSide,
    pub id: String,
    pub name: String,
    pub players: Vec<LivePlayer>,
    pub on_court: Vec<usize>,
    pub bench: Vec<usize>,
    /// Tactics as supplied, kept for the result snapshot.
    pub tactics: GameTactics,
    pub depth_chart: DepthChart,
    pub rotation: RotationMap,
    pub original_rotation: RotationMap,
    pub overrides: Vec<RotationOverride>,
    /// Highest-rated roster player; the opposing stopper shadows them.
    pub ace: Option<usize>,
    pub stopper: Option<usize>,
    pub team_fouls: u8,
    pub timeouts: u8,
    pub score: u16,
    pub quarter_scores: Vec<u16>,
    pub back_to_back: bool,
}

impl TeamState {
    fn new(
        side: TeamSide,
        team: &Team,
        tactics: &GameTactics,
        back_to_back: bool,
        config: &EngineConfig,
    ) -> Result<Self> {
        team.validate()?;
        tactics.validate()?;

        let players: Vec<LivePlayer> = team.players.iter().map(LivePlayer::from_player).collect();
        let known: HashSet<&str> = players.iter().map(|p| p.id.as_str()).collect();
        let unknown = |id: &str| SimError::UnknownPlayer { team: team.id.clone(), player: id.to_string() };

        let depth_chart = match &tactics.depth_chart {
            Some(chart) => {
                let mut chart = chart.clone();
                for column in chart.slots.values_mut() {
                    if let Some(id) = column.iter().find(|id| !known.contains(id.as_str())) {
                        return Err(unknown(id));
                    }
                    column.retain(|id| team.player(id).map_or(false, |p| p.health.is_healthy()));
                }
                chart
            }
            None => DepthChart::generate(&team.players),
        };

        let rotation = match &tactics.rotation_map {
            Some(map) => {
                if let Some(id) = map.keys().find(|id| !known.contains(id.as_str())) {
                    return Err(unknown(id));
                }
                RotationMap::from_bool_map(map)
            }
            None => build_rotation_map(&depth_chart, &tactics.minutes_limits),
        };

        let index_of = |id: &str| players.iter().position(|p| p.id == id);
        let stopper = match &tactics.stopper_id {
            Some(id) => Some(index_of(id).ok_or_else(|| unknown(id))?),
            None => None,
        };
        let ace = team.ace().and_then(|p| index_of(&p.id));

        let mut state = Self {
            side,
            id: team.id.clone(),
            name: team.name.clone(),
            bench: (0..players.len()).collect(),
            players,
            on_court: Vec::with_capacity(5),
            tactics: tactics.clone(),
            depth_chart,
            original_rotation: rotation.clone(),
            rotation,
            overrides: Vec::new(),
            ace,
            stopper,
            team_fouls: 0,
            timeouts: config.rotation.timeouts_per_game,
            score: 0,
            quarter_scores: vec![0],
            back_to_back,
        };

        let lineup = rotation::desired_lineup(&state, 0);
        if lineup.is_empty() {
            return Err(SimError::EmptyLineup { team: side });
        }
        for idx in lineup {
            state.players[idx].starter = true;
            state.players[idx].last_sub_in_sec = Some(0);
            state.bench.retain(|b| *b != idx);
            state.on_court.push(idx);
        }
        Ok(state)
    }

    pub fn sliders(&self) -> &TacticSliders {
        &self.tactics.sliders
    }

    pub fn index_of(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn is_on_court(&self, idx: usize) -> bool {
        self.on_court.contains(&idx)
    }

    pub fn on_court_players(&self) -> impl Iterator<Item = &LivePlayer> + '_ {
        self.on_court.iter().map(move |&i| &self.players[i])
    }

    /// Best rating among the five on the floor.
    pub fn top_on_court(&self) -> Option<usize> {
        self.on_court.iter().copied().max_by_key(|&i| self.players[i].ovr)
    }

    pub fn stopper_on_court(&self) -> Option<usize> {
        self.stopper.filter(|s| self.is_on_court(*s))
    }

    /// Swap `out` for `incoming` on the floor; returns false if `out` was not on court.
    pub fn swap(&mut self, out: usize, incoming: usize) -> bool {
        let Some(slot) = self.on_court.iter().position(|&i| i == out) else {
            return false;
        };
        self.on_court[slot] = incoming;
        self.bench.retain(|&i| i != incoming);
        self.bench.push(out);
        true
    }

    pub fn add_points(&mut self, points: u16) {
        self.score += points;
        if let Some(q) = self.quarter_scores.last_mut() {
            *q += points;
        }
    }
}

/// Context carried into the next possession.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NextPossession {
    pub offensive_rebound: bool,
    pub live_ball_turnover: bool,
}

/// Root aggregate for one game.
#[derive(Debug, Clone)]
pub struct GameState {
    pub home: TeamState,
    pub away: TeamState,
    pub quarter: u8,
    /// Seconds left in the quarter.
    pub game_clock: u16,
    pub shot_clock: u8,
    pub possession: TeamSide,
    pub tip_winner: TeamSide,
    pub next: NextPossession,
    pub logs: Vec<PbpLog>,
    pub shot_events: Vec<ShotEvent>,
    pub injuries: Vec<InjuryRecord>,
    pub momentum: MomentumState,
    pub rotation_history: BTreeMap<String, Vec<StintInterval>>,
    pub config: EngineConfig,
    pub user_team_id: Option<String>,
    pub went_to_tie_break: bool,
    pub is_game_over: bool,
}

/// Build the opening state: lineups fielded, tip-off decided, Q1 logged.
pub fn create_game_state<R: SimRng + ?Sized>(
    setup: &GameSetup,
    config: EngineConfig,
    rng: &mut R,
) -> Result<GameState> {
    let home =
        TeamState::new(TeamSide::Home, &setup.home, &setup.home_tactics, setup.home_back_to_back, &config)?;
    let away =
        TeamState::new(TeamSide::Away, &setup.away, &setup.away_tactics, setup.away_back_to_back, &config)?;

    // Each roster is unique on its own by now; ids must not cross over.
    let home_ids: HashSet<&str> = setup.home.players.iter().map(|p| p.id.as_str()).collect();
    if let Some(p) = setup.away.players.iter().find(|p| home_ids.contains(p.id.as_str())) {
        return Err(SimError::InvalidRoster {
            team: setup.away.id.clone(),
            reason: format!("player id {} is already on the {} roster", p.id, setup.home.id),
        });
    }

    let tip_winner = if rng.chance(0.5) { TeamSide::Home } else { TeamSide::Away };

    let mut rotation_history: BTreeMap<String, Vec<StintInterval>> = BTreeMap::new();
    for team in [&home, &away] {
        for p in &team.players {
            let stints = rotation_history.entry(p.id.clone()).or_default();
            if p.starter {
                stints.push(StintInterval { in_sec: 0, out_sec: None });
            }
        }
    }

    let mut state = GameState {
        home,
        away,
        quarter: 1,
        game_clock: QUARTER_SECONDS,
        shot_clock: FULL_SHOT_CLOCK,
        possession: tip_winner,
        tip_winner,
        next: NextPossession::default(),
        logs: Vec::new(),
        shot_events: Vec::new(),
        injuries: Vec::new(),
        momentum: MomentumState::new(),
        rotation_history,
        config,
        user_team_id: setup.user_team_id.clone(),
        went_to_tie_break: false,
        is_game_over: false,
    };

    let text = format!("Start of Q1. {} wins the tip.", state.team(tip_winner).name);
    state.log(tip_winner, LogType::QuarterStart, text, None);
    tracing::debug!(home = %state.home.id, away = %state.away.id, ?tip_winner, "game created");
    Ok(state)
}

impl GameState {
    pub fn team(&self, side: TeamSide) -> &TeamState {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut TeamState {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    /// (offense, defense) borrowed mutably together.
    pub fn split_mut(&mut self, offense: TeamSide) -> (&mut TeamState, &mut TeamState) {
        match offense {
            TeamSide::Home => (&mut self.home, &mut self.away),
            TeamSide::Away => (&mut self.away, &mut self.home),
        }
    }

    pub fn side_of(&self, team_id: &str) -> Option<TeamSide> {
        if self.home.id == team_id {
            Some(TeamSide::Home)
        } else if self.away.id == team_id {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    /// Game seconds elapsed, counting the tie-break period after regulation.
    pub fn elapsed_sec(&self) -> u32 {
        (self.quarter.max(1) as u32 - 1) * QUARTER_SECONDS as u32
            + (QUARTER_SECONDS - self.game_clock.min(QUARTER_SECONDS)) as u32
    }

    /// Schedule minute (0..48); the tie-break reads the final minute.
    pub fn current_minute(&self) -> u8 {
        (self.elapsed_sec() / 60).min(47) as u8
    }

    pub fn is_tie_break(&self) -> bool {
        self.quarter > REGULATION_QUARTERS
    }

    /// `side` score minus the opponent's.
    pub fn score_margin(&self, side: TeamSide) -> i32 {
        self.team(side).score as i32 - self.team(side.opponent()).score as i32
    }

    /// Append a play-by-play line stamped with the current clock.
    pub fn log(&mut self, side: TeamSide, log_type: LogType, text: String, points: Option<u8>) {
        let with_score = matches!(log_type, LogType::Score | LogType::FreeThrow | LogType::QuarterEnd | LogType::GameEnd);
        self.logs.push(PbpLog {
            quarter: self.quarter,
            time_remaining: format_clock(self.game_clock),
            team_id: self.team(side).id.clone(),
            text,
            log_type,
            points,
            home_score: with_score.then_some(self.home.score),
            away_score: with_score.then_some(self.away.score),
        });
    }

    /// Close an open stint for `player_id`.
    pub fn close_stint(&mut self, player_id: &str) {
        let now = self.elapsed_sec();
        if let Some(stint) = self
            .rotation_history
            .get_mut(player_id)
            .and_then(|s| s.last_mut())
            .filter(|s| s.out_sec.is_none())
        {
            stint.out_sec = Some(now);
        }
    }

    pub fn open_stint(&mut self, player_id: &str) {
        let now = self.elapsed_sec();
        self.rotation_history
            .entry(player_id.to_string())
            .or_default()
            .push(StintInterval { in_sec: now, out_sec: None });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedRng;
    use crate::engine::test_fixtures::*;

    #[test]
    fn test_create_fields_five_each() {
        let state = create_test_state();
        assert_eq!(state.home.on_court.len(), 5);
        assert_eq!(state.away.on_court.len(), 5);
        assert_eq!(state.home.on_court.len() + state.home.bench.len(), state.home.players.len());
        assert!(state.home.on_court.iter().all(|&i| state.home.players[i].starter));
        assert_eq!(state.logs.len(), 1);
        assert_eq!(state.logs[0].log_type, LogType::QuarterStart);
    }

    #[test]
    fn test_starters_follow_depth_chart() {
        let state = create_test_state();
        let starters: Vec<String> = state.home.depth_chart.starters();
        for idx in &state.home.on_court {
            assert!(starters.contains(&state.home.players[*idx].id));
        }
    }

    #[test]
    fn test_tip_off_decides_first_possession() {
        let setup = create_test_setup();
        let state = create_game_state(&setup, EngineConfig::default(), &mut ScriptedRng::constant(0.1)).unwrap();
        assert_eq!(state.possession, TeamSide::Home);
        let state = create_game_state(&setup, EngineConfig::default(), &mut ScriptedRng::constant(0.9)).unwrap();
        assert_eq!(state.possession, TeamSide::Away);
    }

    #[test]
    fn test_shared_player_ids_rejected() {
        let mut setup = create_test_setup();
        setup.away.players[0].id = setup.home.players[0].id.clone();
        let err = create_game_state(&setup, EngineConfig::default(), &mut ScriptedRng::constant(0.5));
        match err {
            Err(SimError::InvalidRoster { team, reason }) => {
                assert_eq!(team, setup.away.id);
                assert!(reason.contains(&setup.home.id), "{reason}");
            }
            other => panic!("expected InvalidRoster, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_within_one_roster_names_that_team() {
        let mut setup = create_test_setup();
        setup.home.players[1].id = setup.home.players[0].id.clone();
        let err = create_game_state(&setup, EngineConfig::default(), &mut ScriptedRng::constant(0.5));
        assert!(matches!(err, Err(SimError::InvalidRoster { team, .. }) if team == setup.home.id));
    }

    #[test]
    fn test_unknown_stopper_rejected() {
        let mut setup = create_test_setup();
        setup.home_tactics.stopper_id = Some("nobody".into());
        let err = create_game_state(&setup, EngineConfig::default(), &mut ScriptedRng::constant(0.5));
        assert!(matches!(err, Err(SimError::UnknownPlayer { .. })));
    }

    #[test]
    fn test_clock_helpers() {
        let mut state = create_test_state();
        assert_eq!(state.elapsed_sec(), 0);
        state.quarter = 3;
        state.game_clock = 600;
        assert_eq!(state.elapsed_sec(), 1440 + 120);
        assert_eq!(state.current_minute(), 26);
        state.quarter = 5;
        state.game_clock = 700;
        assert_eq!(state.current_minute(), 47);
        assert!(state.is_tie_break());
    }

    #[test]
    fn test_swap_keeps_arena_partition() {
        let mut state = create_test_state();
        let out = state.home.on_court[0];
        let incoming = state.home.bench[0];
        assert!(state.home.swap(out, incoming));
        assert!(state.home.is_on_court(incoming));
        assert!(state.home.bench.contains(&out));
        assert_eq!(state.home.on_court.len(), 5);
        assert!(!state.home.swap(out, incoming));
    }

    #[test]
    fn test_stints_open_for_starters() {
        let state = create_test_state();
        for &idx in &state.home.on_court {
            let id = &state.home.players[idx].id;
            assert_eq!(state.rotation_history[id], vec![StintInterval { in_sec: 0, out_sec: None }]);
        }
        let bench_id = &state.home.players[state.home.bench[0]].id;
        assert!(state.rotation_history[bench_id].is_empty());
    }
}
