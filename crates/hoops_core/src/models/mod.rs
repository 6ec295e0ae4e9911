pub mod events;
pub mod player;
pub mod result;
pub mod team;

pub use events::{format_clock, LogType, PbpLog, PlayType, ShotEvent, SubZone, Zone};
pub use player::{HealthStatus, LateralBias, Player, PlayerAttributes, Position, ShotTendencies};
pub use result::{
    InjuryRecord, PlayerBoxScore, PlayerStats, RosterUpdate, SimulationResult, StintInterval,
    TacticsSnapshot, TeamBoxScore, ZoneLine,
};
pub use team::{DepthChart, GameTactics, TacticSliders, Team, TeamSide};
