//! Gamification rules: achievements, XP levels and daily streaks

mod checker;
mod definitions;
mod levels;
mod manager;
mod streaks;

pub use checker::check_achievements;
pub use definitions::{ACHIEVEMENTS, Achievement, AchievementCategory, AchievementId, Requirement};
pub use levels::{
    LevelInfo, XpRewards, level_for_xp, title_for_level, xp_for_level_start, xp_for_next_level,
};
pub use manager::{AchievementHolder, LevelUp, Unlocks, unlock_achievements};
pub use streaks::{Clock, DailyStreak, FixedClock, StreakChange, SystemClock};
