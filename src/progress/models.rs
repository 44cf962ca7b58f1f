//! Data models for progression records
//!
//! Records are stored whole as JSON; field names follow the camelCase shape
//! the web client writes so existing exports load unchanged. Client exports
//! predating `totalXP` get it rebuilt from their lessons and labs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::achievements::{DailyStreak, LevelInfo, XpRewards};

/// Learning progress for one learner profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredRecord")]
pub struct ProgressRecord {
    pub completed_lessons: BTreeSet<String>,
    /// One entry per quiz attempt, in order
    pub quiz_scores: Vec<u8>,
    /// Virtual labs by lab ID; the first completion is kept
    pub completed_labs: BTreeMap<String, LabCompletion>,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    #[serde(flatten)]
    pub streak: DailyStreak,
    pub unlocked_achievements: BTreeSet<String>,
}

/// One finished virtual lab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabCompletion {
    pub lab_id: String,
    pub completed_on: NaiveDate,
    /// Percent, 0-100
    pub score: u8,
    /// Seconds spent in the lab
    pub time_spent: u64,
    pub xp_earned: u64,
}

/// On-disk shape of a `ProgressRecord`, tolerant of older exports
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    #[serde(default)]
    completed_lessons: BTreeSet<String>,
    #[serde(default)]
    quiz_scores: Vec<u8>,
    #[serde(default)]
    completed_labs: BTreeMap<String, LabCompletion>,
    #[serde(default, rename = "totalXP")]
    total_xp: Option<u64>,
    #[serde(flatten)]
    streak: DailyStreak,
    #[serde(default)]
    unlocked_achievements: BTreeSet<String>,
}

impl From<StoredRecord> for ProgressRecord {
    fn from(stored: StoredRecord) -> Self {
        let total_xp = stored.total_xp.unwrap_or_else(|| {
            let lessons = u64::try_from(stored.completed_lessons.len()).unwrap_or(u64::MAX);
            stored
                .completed_labs
                .values()
                .fold(lessons.saturating_mul(XpRewards::LESSON_COMPLETE), |xp, lab| {
                    xp.saturating_add(lab.xp_earned)
                })
        });

        Self {
            completed_lessons: stored.completed_lessons,
            quiz_scores: stored.quiz_scores,
            completed_labs: stored.completed_labs,
            total_xp,
            streak: stored.streak,
            unlocked_achievements: stored.unlocked_achievements,
        }
    }
}

/// Competitive-play record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub user_id: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub win_streak: u32,
    #[serde(default)]
    pub best_win_streak: u32,
    #[serde(default)]
    pub rating: u32,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub achievements: BTreeSet<String>,
    #[serde(default)]
    pub coins: u64,
}

impl Player {
    /// Fresh player created on first competitive interaction
    pub fn new(user_id: impl Into<String>, initial_rating: u32) -> Self {
        Self {
            user_id: user_id.into(),
            wins: 0,
            losses: 0,
            draws: 0,
            total_games: 0,
            win_streak: 0,
            best_win_streak: 0,
            rating: initial_rating,
            xp: 0,
            achievements: BTreeSet::new(),
            coins: 0,
        }
    }

    pub fn level(&self) -> LevelInfo {
        LevelInfo::for_xp(self.xp)
    }
}

/// On-disk shape of a `Player`; a record without `rating` starts at the
/// configured initial rating rather than 0
#[derive(Deserialize)]
pub(crate) struct StoredPlayer {
    #[serde(default)]
    rating: Option<u32>,
    #[serde(flatten)]
    player: Player,
}

impl StoredPlayer {
    pub(crate) fn into_player(self, initial_rating: u32) -> Player {
        Player {
            rating: self.rating.unwrap_or(initial_rating),
            ..self.player
        }
    }
}

/// Summary of a learner's progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub lessons_completed: usize,
    pub quizzes_taken: usize,
    pub labs_completed: usize,
    pub average_quiz_score: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_xp: u64,
    pub level: LevelInfo,
}

/// Unified view that achievement conditions are evaluated against.
///
/// Both learner and player records map into this shape; metrics a record does
/// not track stay at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub wins: u32,
    pub win_streak: u32,
    pub rating: u32,
    pub matches_played: u32,
    pub lessons_completed: u32,
    pub quizzes_taken: u32,
    pub labs_completed: u32,
    /// Perfect quizzes plus perfect labs
    pub perfect_scores: u32,
    pub day_streak: u32,
}

impl ProgressSnapshot {
    /// Snapshot of a learner record as seen on `today`
    pub fn from_record(record: &ProgressRecord, today: NaiveDate) -> Self {
        Self {
            lessons_completed: count(record.completed_lessons.len()),
            quizzes_taken: count(record.quiz_scores.len()),
            labs_completed: count(record.completed_labs.len()),
            perfect_scores: count(
                record.quiz_scores.iter().filter(|s| **s >= 100).count()
                    + record.completed_labs.values().filter(|l| l.score >= 100).count(),
            ),
            day_streak: record.streak.current_on(today),
            ..Default::default()
        }
    }

    pub fn from_player(player: &Player) -> Self {
        Self {
            wins: player.wins,
            win_streak: player.win_streak,
            rating: player.rating,
            matches_played: player.total_games,
            ..Default::default()
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
