use super::{Player, Position};
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    #[default]
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn is_home(self) -> bool {
        matches!(self, TeamSide::Home)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub players: Vec<Player>,
}

impl Team {
    pub fn validate(&self) -> Result<()> {
        if self.players.len() < 5 {
            return Err(SimError::InvalidRoster {
                team: self.id.clone(),
                reason: format!("need at least 5 players, found {}", self.players.len()),
            });
        }

        let mut seen = HashSet::new();
        for p in &self.players {
            if !seen.insert(p.id.as_str()) {
                return Err(SimError::InvalidRoster {
                    team: self.id.clone(),
                    reason: format!("duplicate player id {}", p.id),
                });
            }
        }
        Ok(())
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Highest-rated player on the roster; the opposing stopper shadows this player.
    pub fn ace(&self) -> Option<&Player> {
        self.players.iter().max_by_key(|p| p.ovr)
    }
}

/// The 10-slider tactical bundle (each slider 1..=10, 5 is neutral).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TacticSliders {
    pub pace: u8,
    pub ball_movement: u8,
    pub three_point_focus: u8,
    pub inside_focus: u8,
    pub off_reb: u8,
    pub def_intensity: u8,
    pub help_def: u8,
    pub switch_freq: u8,
    pub full_court_press: u8,
    pub zone_usage: u8,
}

impl Default for TacticSliders {
    fn default() -> Self {
        Self {
            pace: 5,
            ball_movement: 5,
            three_point_focus: 5,
            inside_focus: 5,
            off_reb: 5,
            def_intensity: 5,
            help_def: 5,
            switch_freq: 5,
            full_court_press: 1,
            zone_usage: 1,
        }
    }
}

impl TacticSliders {
    fn entries(&self) -> [(&'static str, u8); 10] {
        [
            ("pace", self.pace),
            ("ball_movement", self.ball_movement),
            ("three_point_focus", self.three_point_focus),
            ("inside_focus", self.inside_focus),
            ("off_reb", self.off_reb),
            ("def_intensity", self.def_intensity),
            ("help_def", self.help_def),
            ("switch_freq", self.switch_freq),
            ("full_court_press", self.full_court_press),
            ("zone_usage", self.zone_usage),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.entries() {
            if !(1..=10).contains(&value) {
                return Err(SimError::InvalidTactics(format!(
                    "slider {} must be within 1..=10, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Per-position ranked player ids; rank 0 is the starter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DepthChart {
    pub slots: BTreeMap<Position, Vec<String>>,
}

impl DepthChart {
    pub fn column(&self, position: Position) -> &[String] {
        self.slots.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// (position column, rank) of a player, if charted.
    pub fn rank_of(&self, player_id: &str) -> Option<(Position, usize)> {
        self.slots.iter().find_map(|(pos, ids)| {
            ids.iter().position(|id| id == player_id).map(|rank| (*pos, rank))
        })
    }

    pub fn starters(&self) -> Vec<String> {
        Position::ALL
            .iter()
            .filter_map(|pos| self.column(*pos).first().cloned())
            .collect()
    }

    /// Build a chart from roster positions: each column ranked by rating,
    /// empty columns borrowed from the best remaining players.
    pub fn generate(players: &[Player]) -> Self {
        let mut used: HashSet<&str> = HashSet::new();
        let mut slots: BTreeMap<Position, Vec<String>> = BTreeMap::new();

        for pos in Position::ALL {
            let mut natural: Vec<&Player> =
                players.iter().filter(|p| p.position == pos && p.health.is_healthy()).collect();
            natural.sort_by(|a, b| b.ovr.cmp(&a.ovr));
            let column: Vec<String> = natural
                .into_iter()
                .take(3)
                .map(|p| {
                    used.insert(p.id.as_str());
                    p.id.clone()
                })
                .collect();
            slots.insert(pos, column);
        }

        // Fill empty columns with the best unused player by positional proximity.
        for pos in Position::ALL {
            if slots.get(&pos).map_or(false, |c| !c.is_empty()) {
                continue;
            }
            let pick = players
                .iter()
                .filter(|p| !used.contains(p.id.as_str()) && p.health.is_healthy())
                .min_by(|a, b| {
                    a.position
                        .distance(pos)
                        .cmp(&b.position.distance(pos))
                        .then(b.ovr.cmp(&a.ovr))
                });
            if let Some(p) = pick {
                used.insert(p.id.as_str());
                slots.insert(pos, vec![p.id.clone()]);
            }
        }

        Self { slots }
    }
}

/// Tactical inputs for one side.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameTactics {
    #[serde(default)]
    pub sliders: TacticSliders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_chart: Option<DepthChart>,
    /// Explicit per-player 48-minute schedule; generated from the depth chart if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_map: Option<BTreeMap<String, Vec<bool>>>,
    #[serde(default)]
    pub minutes_limits: BTreeMap<String, u8>,
    /// Designated defender who shadows the opposing ace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopper_id: Option<String>,
}

impl GameTactics {
    pub fn validate(&self) -> Result<()> {
        self.sliders.validate()?;
        if let Some(map) = &self.rotation_map {
            for (id, minutes) in map {
                if minutes.len() != 48 {
                    return Err(SimError::InvalidTactics(format!(
                        "rotation schedule for {} must have 48 entries, found {}",
                        id,
                        minutes.len()
                    )));
                }
            }
        }
        Ok(())
    }
}
