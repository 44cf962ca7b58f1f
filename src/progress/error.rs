//! Error type for progression operations

use super::scoring::MatchState;

/// Errors surfaced by write operations.
///
/// Reads never fail: absent or unreadable records come back as fresh ones.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("Lesson ID must not be empty")]
    InvalidLessonId,

    #[error("Lab ID must not be empty")]
    InvalidLabId,

    #[error("Score {score} is outside 0-100")]
    ScoreOutOfRange { score: u32 },

    #[error("Invalid match result: {0}")]
    InvalidMatch(String),

    #[error("Match cannot go from {from} to {to}")]
    InvalidTransition { from: MatchState, to: MatchState },

    #[error("Record store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ProgressError>;
