use serde::{Deserialize, Serialize};

/// Roster player as supplied by the data layer.
///
/// # Boundary Contract
/// - Ratings are on the usual 0..=99 scale; `ovr` is computed upstream.
/// - `tendencies` is optional. When absent the shot model derives zone
///   preferences from archetypes instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    #[serde(default = "default_height_cm")]
    pub height_cm: u16,
    pub ovr: u8,
    #[serde(default)]
    pub health: HealthStatus,
    /// Pre-game condition (0-100).
    #[serde(default = "full_condition")]
    pub condition: f64,
    #[serde(default)]
    pub attributes: PlayerAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tendencies: Option<ShotTendencies>,
}

fn default_height_cm() -> u16 {
    198
}

fn full_condition() -> f64 {
    100.0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
}

impl Position {
    pub const ALL: [Position; 5] =
        [Position::PG, Position::SG, Position::SF, Position::PF, Position::C];

    /// Ordinal from the ball-handler (0) to the center (4).
    pub fn index(&self) -> usize {
        match self {
            Position::PG => 0,
            Position::SG => 1,
            Position::SF => 2,
            Position::PF => 3,
            Position::C => 4,
        }
    }

    pub fn is_guard(&self) -> bool {
        matches!(self, Position::PG | Position::SG)
    }

    pub fn is_big(&self) -> bool {
        matches!(self, Position::PF | Position::C)
    }

    /// Distance on the positional spectrum; used for mismatch detection.
    pub fn distance(&self, other: Position) -> usize {
        self.index().abs_diff(other.index())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::PG => "PG",
            Position::SG => "SG",
            Position::SF => "SF",
            Position::PF => "PF",
            Position::C => "C",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Injured,
    DayToDay,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Full rating sheet. Missing fields deserialize to a league-average 50.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerAttributes {
    // Inside scoring
    pub close_shot: u8,
    pub layup: u8,
    pub dunk: u8,
    pub post_play: u8,
    pub draw_foul: u8,
    // Outside scoring
    pub mid_range: u8,
    pub three_point: u8,
    pub free_throw: u8,
    pub shot_iq: u8,
    pub offensive_consistency: u8,
    // Playmaking
    pub pass_accuracy: u8,
    pub pass_vision: u8,
    pub pass_iq: u8,
    pub ball_handle: u8,
    pub speed_with_ball: u8,
    // Athleticism
    pub speed: u8,
    pub agility: u8,
    pub strength: u8,
    pub vertical: u8,
    pub stamina: u8,
    pub hustle: u8,
    pub durability: u8,
    // Defense
    pub interior_defense: u8,
    pub perimeter_defense: u8,
    pub steal: u8,
    pub block: u8,
    pub help_defense_iq: u8,
    pub pass_perception: u8,
    pub defensive_consistency: u8,
    // Rebounding
    pub offensive_rebound: u8,
    pub defensive_rebound: u8,
    // Mental
    pub intangibles: u8,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::uniform(50)
    }
}

impl PlayerAttributes {
    /// Every rating set to `value`; handy for fixtures and synthetic rosters.
    pub fn uniform(value: u8) -> Self {
        Self {
            close_shot: value,
            layup: value,
            dunk: value,
            post_play: value,
            draw_foul: value,
            mid_range: value,
            three_point: value,
            free_throw: value,
            shot_iq: value,
            offensive_consistency: value,
            pass_accuracy: value,
            pass_vision: value,
            pass_iq: value,
            ball_handle: value,
            speed_with_ball: value,
            speed: value,
            agility: value,
            strength: value,
            vertical: value,
            stamina: value,
            hustle: value,
            durability: value,
            interior_defense: value,
            perimeter_defense: value,
            steal: value,
            block: value,
            help_defense_iq: value,
            pass_perception: value,
            defensive_consistency: value,
            offensive_rebound: value,
            defensive_rebound: value,
            intangibles: value,
        }
    }

    /// Shot composure used to blunt the high-pace haste malus (0.0-1.0).
    pub fn composure(&self) -> f64 {
        (self.shot_iq as f64 + self.offensive_consistency as f64 + self.intangibles as f64) / 300.0
    }
}

/// Which side of the floor a shooter favours when a bucket is split left/right.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LateralBias {
    Left,
    #[default]
    Balanced,
    Right,
}

impl LateralBias {
    /// Share of a lateral bucket that lands on the left side.
    pub fn left_share(&self) -> f64 {
        match self {
            LateralBias::Left => 0.62,
            LateralBias::Balanced => 0.5,
            LateralBias::Right => 0.38,
        }
    }
}

/// Real per-player shot-location tendencies (six buckets).
///
/// Values need not sum to one; the shot model normalizes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShotTendencies {
    pub rim: f64,
    pub paint: f64,
    pub mid: f64,
    pub corner_three: f64,
    pub wing_three: f64,
    pub top_three: f64,
    #[serde(default)]
    pub lateral_bias: LateralBias,
}

impl ShotTendencies {
    pub fn total(&self) -> f64 {
        self.rim + self.paint + self.mid + self.corner_three + self.wing_three + self.top_three
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attributes_default_to_fifty() {
        let json = r#"{"id":"p1","name":"Test","position":"PG","ovr":70,
                       "attributes":{"three_point":90}}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.attributes.three_point, 90);
        assert_eq!(player.attributes.layup, 50);
        assert_eq!(player.health, HealthStatus::Healthy);
        assert_eq!(player.height_cm, 198);
        assert_eq!(player.condition, 100.0);
        assert!(player.tendencies.is_none());
    }

    #[test]
    fn test_position_distance() {
        assert_eq!(Position::PG.distance(Position::C), 4);
        assert_eq!(Position::SF.distance(Position::SF), 0);
        assert!(Position::C.is_big());
        assert!(!Position::SF.is_guard());
    }

    #[test]
    fn test_composure_range() {
        assert!((PlayerAttributes::uniform(99).composure() - 0.99).abs() < 1e-9);
        assert!((PlayerAttributes::uniform(0).composure()).abs() < 1e-9);
    }
}
