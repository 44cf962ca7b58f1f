//! XP and Level system
//!
//! Levels follow a quadratic curve: reaching level `L + 1` takes `100 * L^2`
//! total XP, so every level costs more than the one before it.

use serde::Serialize;

/// XP per unit of the level curve
const XP_PER_LEVEL_UNIT: u64 = 100;

/// Title bands, checked in order (upper bound is exclusive)
static TITLES: &[(u32, &str)] = &[
    (5, "Novice"),
    (10, "Apprentice"),
    (20, "Adept"),
    (30, "Expert"),
    (50, "Master"),
];

const TOP_TITLE: &str = "Legend";

/// Level derived from a total XP value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelInfo {
    pub total_xp: u64,
    pub level: u32,
    pub title: &'static str,
    /// Total XP at which the current level started
    pub xp_for_current_level: u64,
    /// Total XP at which the next level starts
    pub xp_for_next_level: u64,
    /// Progress through the current level, 0.0 - 100.0
    pub progress_percent: f64,
}

impl LevelInfo {
    /// Derive level, thresholds and progress for the given XP
    pub fn for_xp(xp: u64) -> Self {
        let level = level_for_xp(xp);
        let current = xp_for_level_start(level);
        let next = xp_for_level_start(level + 1);

        let range = next.saturating_sub(current);
        let progress = if range == 0 {
            0.0
        } else {
            (xp.saturating_sub(current) as f64 / range as f64) * 100.0
        };

        Self {
            total_xp: xp,
            level,
            title: title_for_level(level),
            xp_for_current_level: current,
            xp_for_next_level: next,
            progress_percent: progress.clamp(0.0, 100.0),
        }
    }

    /// XP still missing before the next level
    pub fn xp_to_next_level(&self) -> u64 {
        self.xp_for_next_level.saturating_sub(self.total_xp)
    }
}

/// `floor(sqrt(xp / 100)) + 1`, computed without floating point.
///
/// `floor(sqrt(xp / 100)) == floor(isqrt(xp) / 10)`, so integer arithmetic
/// gives the exact boundary values.
pub fn level_for_xp(xp: u64) -> u32 {
    let steps = xp.isqrt() / 10;
    u32::try_from(steps).unwrap_or(u32::MAX - 1) + 1
}

/// Total XP required to reach `level` (`100 * (level - 1)^2`)
pub fn xp_for_level_start(level: u32) -> u64 {
    let prior = u64::from(level.saturating_sub(1));
    XP_PER_LEVEL_UNIT.saturating_mul(prior.saturating_mul(prior))
}

/// Total XP at which the level after `level` begins (`100 * level^2`)
pub fn xp_for_next_level(level: u32) -> u64 {
    xp_for_level_start(level.saturating_add(1))
}

/// Display title for a level
pub fn title_for_level(level: u32) -> &'static str {
    TITLES
        .iter()
        .find(|(below, _)| level < *below)
        .map(|(_, title)| *title)
        .unwrap_or(TOP_TITLE)
}

/// Fixed XP rewards for learning actions
pub struct XpRewards;

impl XpRewards {
    /// XP for completing a lesson for the first time
    pub const LESSON_COMPLETE: u64 = 10;
}
