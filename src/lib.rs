//! studyquest - learner progression engine
//!
//! Turns learning activity (completed lessons, quiz scores) and competitive
//! matches into XP, levels, daily streaks and achievements.
//!
//! ## Components
//!
//! 1. **Progress ledger**: lessons, quiz scores, virtual labs, XP and daily streaks per learner.
//! 2. **Leveling**: quadratic XP curve, `level = floor(sqrt(xp / 100)) + 1`.
//! 3. **Achievements**: a static catalog of threshold rules evaluated against a
//!    unified snapshot; each unlock grants its XP reward once.
//! 4. **Match scoring**: XP, coins and rating change for a resolved match.
//!
//! Records live in a [`progress::RecordStore`] injected by the caller; nothing
//! is kept in global state.

pub mod config;
pub mod progress;

pub use config::Config;
pub use progress::{
    Match, MatchOutcome, MatchResult, Player, ProgressError, ProgressEvent, ProgressRecord,
    ProgressSummary, ProgressionEngine, calculate_match_xp, check_achievements,
};
pub use progress::achievements::{LevelInfo, level_for_xp};
