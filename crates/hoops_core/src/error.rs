use thiserror::Error;

use crate::models::TeamSide;

#[derive(Error, Debug)]
pub enum SimError {
    /// The rotation manager failed to field anyone; an upstream invariant is broken.
    #[error("Empty lineup: {team:?} has no players on court")]
    EmptyLineup { team: TeamSide },

    #[error("Invalid roster for {team}: {reason}")]
    InvalidRoster { team: String, reason: String },

    #[error("Unknown player {player} on team {team}")]
    UnknownPlayer { team: String, player: String },

    #[error("Invalid substitution: {0}")]
    InvalidSubstitution(String),

    #[error("Invalid tactics: {0}")]
    InvalidTactics(String),

    #[error("Game is already over")]
    GameOver,

    #[error("Unsupported schema version: {0}")]
    UnsupportedSchema(u8),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Errors that signal a broken engine invariant rather than bad caller input.
    pub fn is_invariant_breach(&self) -> bool {
        matches!(self, SimError::EmptyLineup { .. })
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::EmptyLineup { team: TeamSide::Away };
        assert_eq!(err.to_string(), "Empty lineup: Away has no players on court");
        assert!(err.is_invariant_breach());

        let err = SimError::InvalidSubstitution("p1 is not on court".into());
        assert!(err.to_string().contains("p1 is not on court"));
        assert!(!err.is_invariant_breach());
    }

    #[test]
    fn test_from_serde_json() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: SimError = parse.unwrap_err().into();
        assert!(matches!(err, SimError::Serialization(_)));
    }
}
