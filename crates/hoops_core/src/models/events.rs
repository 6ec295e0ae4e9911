use serde::{Deserialize, Serialize};

/// Coarse shot range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Rim,
    Paint,
    Mid,
    Three,
}

impl Zone {
    pub fn is_inside(&self) -> bool {
        matches!(self, Zone::Rim | Zone::Paint)
    }

    pub fn points(&self) -> u8 {
        match self {
            Zone::Three => 3,
            _ => 2,
        }
    }
}

/// Shot-chart sub-zone (10 buckets).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubZone {
    Rim,
    Paint,
    MidLeft,
    MidCenter,
    MidRight,
    CornerLeft,
    WingLeft,
    TopOfKey,
    WingRight,
    CornerRight,
}

impl SubZone {
    pub const ALL: [SubZone; 10] = [
        SubZone::Rim,
        SubZone::Paint,
        SubZone::MidLeft,
        SubZone::MidCenter,
        SubZone::MidRight,
        SubZone::CornerLeft,
        SubZone::WingLeft,
        SubZone::TopOfKey,
        SubZone::WingRight,
        SubZone::CornerRight,
    ];

    pub fn index(&self) -> usize {
        match self {
            SubZone::Rim => 0,
            SubZone::Paint => 1,
            SubZone::MidLeft => 2,
            SubZone::MidCenter => 3,
            SubZone::MidRight => 4,
            SubZone::CornerLeft => 5,
            SubZone::WingLeft => 6,
            SubZone::TopOfKey => 7,
            SubZone::WingRight => 8,
            SubZone::CornerRight => 9,
        }
    }

    pub fn zone(&self) -> Zone {
        match self {
            SubZone::Rim => Zone::Rim,
            SubZone::Paint => Zone::Paint,
            SubZone::MidLeft | SubZone::MidCenter | SubZone::MidRight => Zone::Mid,
            _ => Zone::Three,
        }
    }

    pub fn is_corner_three(&self) -> bool {
        matches!(self, SubZone::CornerLeft | SubZone::CornerRight)
    }

    /// Half-court anchor (feet) with the hoop at (25, 5.25); x spans 0..50, y 0..47.
    pub fn anchor(&self) -> (f32, f32) {
        match self {
            SubZone::Rim => (25.0, 5.5),
            SubZone::Paint => (25.0, 12.0),
            SubZone::MidLeft => (9.0, 12.0),
            SubZone::MidCenter => (25.0, 20.0),
            SubZone::MidRight => (41.0, 12.0),
            SubZone::CornerLeft => (2.0, 4.0),
            SubZone::WingLeft => (6.0, 22.0),
            SubZone::TopOfKey => (25.0, 30.0),
            SubZone::WingRight => (44.0, 22.0),
            SubZone::CornerRight => (48.0, 4.0),
        }
    }

    /// Max jitter radius (feet) applied around the anchor.
    pub fn spread(&self) -> f32 {
        match self {
            SubZone::Rim => 1.5,
            SubZone::CornerLeft | SubZone::CornerRight => 1.0,
            _ => 3.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Isolation,
    PnrHandler,
    PnrRoll,
    PnrPop,
    PostUp,
    CatchShoot,
    Cut,
    Handoff,
    Transition,
    Putback,
}

impl PlayType {
    /// Plays drawn from the weighted table (putback only follows an offensive rebound).
    pub const HALF_COURT: [PlayType; 9] = [
        PlayType::Isolation,
        PlayType::PnrHandler,
        PlayType::PnrRoll,
        PlayType::PnrPop,
        PlayType::PostUp,
        PlayType::CatchShoot,
        PlayType::Cut,
        PlayType::Handoff,
        PlayType::Transition,
    ];

    /// Plays built on a screen, where a switch can happen.
    pub fn is_screen_play(&self) -> bool {
        matches!(
            self,
            PlayType::PnrHandler | PlayType::PnrRoll | PlayType::PnrPop | PlayType::Handoff
        )
    }

    /// Base assist likelihood on a make.
    pub fn assist_rate(&self) -> f64 {
        match self {
            PlayType::CatchShoot | PlayType::Cut => 0.92,
            PlayType::PnrRoll | PlayType::PnrPop | PlayType::Handoff => 0.85,
            PlayType::Transition => 0.45,
            PlayType::PnrHandler => 0.12,
            PlayType::Isolation | PlayType::PostUp => 0.08,
            PlayType::Putback => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayType::Isolation => "isolation",
            PlayType::PnrHandler => "pick-and-roll",
            PlayType::PnrRoll => "roll to the rim",
            PlayType::PnrPop => "pick-and-pop",
            PlayType::PostUp => "post-up",
            PlayType::CatchShoot => "catch-and-shoot",
            PlayType::Cut => "cut",
            PlayType::Handoff => "handoff",
            PlayType::Transition => "fast break",
            PlayType::Putback => "putback",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    Score,
    Miss,
    Block,
    Rebound,
    Turnover,
    Foul,
    FreeThrow,
    Substitution,
    Timeout,
    Injury,
    FoulOut,
    QuarterStart,
    QuarterEnd,
    GameEnd,
}

/// Play-by-play line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PbpLog {
    pub quarter: u8,
    /// Clock as "M:SS".
    pub time_remaining: String,
    pub team_id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub log_type: LogType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u16>,
}

impl PbpLog {
    /// Points carried by scoring lines (score / free-throw), zero otherwise.
    pub fn scored_points(&self) -> u32 {
        match self.log_type {
            LogType::Score | LogType::FreeThrow => self.points.unwrap_or(0) as u32,
            _ => 0,
        }
    }
}

pub fn format_clock(seconds: u16) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Field-goal attempt for shot charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShotEvent {
    pub id: uuid::Uuid,
    pub quarter: u8,
    /// Seconds left in the quarter when the shot went up.
    pub game_clock: u16,
    pub team_id: String,
    pub player_id: String,
    pub x: f32,
    pub y: f32,
    pub zone: SubZone,
    pub is_make: bool,
    pub play_type: PlayType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assist_player_id: Option<String>,
}
