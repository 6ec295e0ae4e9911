use super::{GameTactics, HealthStatus, PbpLog, ShotEvent, SubZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Make/attempt counter for one shot-chart sub-zone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ZoneLine {
    pub made: u16,
    pub attempted: u16,
}

/// Box-score counters for one player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlayerStats {
    pub pts: u16,
    pub reb: u16,
    pub oreb: u16,
    pub dreb: u16,
    pub ast: u16,
    pub stl: u16,
    pub blk: u16,
    pub tov: u16,
    pub pf: u8,
    pub fgm: u16,
    pub fga: u16,
    pub p3m: u16,
    pub p3a: u16,
    pub ftm: u16,
    pub fta: u16,
    pub plus_minus: i32,
    pub seconds_played: u32,
    pub zones: [ZoneLine; 10],
}

impl PlayerStats {
    pub fn minutes(&self) -> f32 {
        self.seconds_played as f32 / 60.0
    }

    /// Record a field-goal attempt; makes never outrun attempts.
    pub fn record_field_goal(&mut self, sub_zone: SubZone, made: bool) {
        let is_three = sub_zone.zone().points() == 3;
        self.fga += 1;
        if is_three {
            self.p3a += 1;
        }
        let line = &mut self.zones[sub_zone.index()];
        line.attempted += 1;
        if made {
            self.fgm += 1;
            line.made += 1;
            if is_three {
                self.p3m += 1;
            }
            self.pts += sub_zone.zone().points() as u16;
        }
    }

    pub fn record_free_throws(&mut self, attempted: u8, made: u8) {
        let made = made.min(attempted);
        self.fta += attempted as u16;
        self.ftm += made as u16;
        self.pts += made as u16;
    }

    /// fgm ≤ fga, p3m ≤ p3a, ftm ≤ fta and per-zone made ≤ attempted.
    pub fn is_consistent(&self) -> bool {
        self.fgm <= self.fga
            && self.p3m <= self.p3a
            && self.ftm <= self.fta
            && self.p3a <= self.fga
            && self.zones.iter().all(|z| z.made <= z.attempted)
    }
}

/// Box-score row as exported at game end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerBoxScore {
    pub player_id: String,
    pub name: String,
    pub position: super::Position,
    pub starter: bool,
    pub mp: f32,
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamBoxScore {
    pub team_id: String,
    pub name: String,
    pub score: u16,
    pub players: Vec<PlayerBoxScore>,
    /// Per-quarter points; index 4 holds the tie-break if one was needed.
    pub quarter_scores: Vec<u16>,
    pub timeouts_remaining: u8,
}

/// Condition/health change to be written back to the roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterUpdate {
    pub player_id: String,
    pub condition: f64,
    pub condition_delta: f64,
    pub health: HealthStatus,
}

/// One on-court stint in game seconds elapsed; `out_sec` is open while the stint runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StintInterval {
    pub in_sec: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_sec: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjuryRecord {
    pub player_id: String,
    pub team_id: String,
    pub quarter: u8,
    pub time_remaining: String,
    pub health: HealthStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TacticsSnapshot {
    pub home: GameTactics,
    pub away: GameTactics,
}

/// Everything the front-end needs once the final buzzer sounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub schema_version: u8,
    pub home: TeamBoxScore,
    pub away: TeamBoxScore,
    pub home_score: u16,
    pub away_score: u16,
    pub winner_team_id: Option<String>,
    pub went_to_tie_break: bool,
    pub tactics: TacticsSnapshot,
    pub roster_updates: Vec<RosterUpdate>,
    pub injuries: Vec<InjuryRecord>,
    pub logs: Vec<PbpLog>,
    pub rotation_history: BTreeMap<String, Vec<StintInterval>>,
    pub shot_events: Vec<ShotEvent>,
}
