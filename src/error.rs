//! Engine error type.
//!
//! Every failure the engine can report is an `EngineError`. The public
//! `MatchEngine` surface never returns these directly: they are folded into a
//! failed [`Response`](crate::engine::Response) so callers get one uniform
//! shape for success and failure.

use crate::roster::GradeKind;

/// Errors surfaced by match operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Please select wrestlers to begin the match.")]
    WrestlersNotSelected,

    #[error("Wrestler '{0}' not found")]
    UnknownWrestler(String),

    #[error("Wrestler '{0}' is not in this match")]
    NotInMatch(String),

    #[error("The same wrestler cannot be both favored and underdog: '{0}'")]
    SameWrestler(String),

    #[error("'{0}' is wrestling in this match and cannot sit in the Hot Box")]
    PrincipalInHotBox(String),

    #[error("No cards available. The deck and discard pile are both empty.")]
    DeckExhausted,

    #[error("Position {0} is off the track (0-15)")]
    PositionOutOfRange(i32),

    #[error("The match is over. Start a new match to continue.")]
    MatchOver,

    #[error("Invalid {kind} grade value: {value}")]
    InvalidGrade { kind: GradeKind, value: String },

    #[error("Invalid grade type: {0}. Must be TV or GRUDGE.")]
    InvalidGradeKind(String),

    #[error("Cannot resolve {context}: participant missing")]
    MissingParticipant { context: &'static str },
}

/// Convenience alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            EngineError::UnknownWrestler("Rex".into()).to_string(),
            "Wrestler 'Rex' not found"
        );
        assert_eq!(
            EngineError::PositionOutOfRange(16).to_string(),
            "Position 16 is off the track (0-15)"
        );
        assert_eq!(
            EngineError::InvalidGrade { kind: GradeKind::Tv, value: "Z".into() }.to_string(),
            "Invalid TV grade value: Z"
        );
    }
}
