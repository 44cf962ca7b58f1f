//! Progress ledger - learning activity (lessons, quizzes, labs) on a `ProgressRecord`
//!
//! These operate on an in-memory record; `ProgressionEngine` loads and saves
//! it around each call.

use chrono::NaiveDate;
use tracing::debug;

use super::achievements::{LevelInfo, StreakChange, XpRewards};
use super::error::{ProgressError, Result};
use super::models::{LabCompletion, ProgressRecord, ProgressSummary};

/// Highest accepted quiz or lab percentage
pub const MAX_QUIZ_SCORE: u32 = 100;

/// Largest speed bonus for a lab, shrinking by one XP per minute spent
const LAB_TIME_BONUS: u64 = 50;
const LAB_PERFECT_BONUS: u64 = 50;

/// Result of recording a lesson or lab completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// False when it was already completed (nothing changed)
    pub newly_completed: bool,
    pub xp_awarded: u64,
    pub streak: StreakChange,
}

impl ProgressRecord {
    /// Mark a lesson as completed.
    ///
    /// The first completion awards `XpRewards::LESSON_COMPLETE` and counts as
    /// activity for the streak; repeats are accepted and change nothing.
    pub fn record_lesson_complete(
        &mut self,
        lesson_id: &str,
        today: NaiveDate,
    ) -> Result<CompletionOutcome> {
        let lesson_id = lesson_id.trim();
        if lesson_id.is_empty() {
            return Err(ProgressError::InvalidLessonId);
        }

        if !self.completed_lessons.insert(lesson_id.to_string()) {
            debug!(lesson_id, "Lesson already completed, ignoring");
            return Ok(CompletionOutcome {
                newly_completed: false,
                xp_awarded: 0,
                streak: StreakChange::Unchanged,
            });
        }

        self.grant_xp(XpRewards::LESSON_COMPLETE);
        let streak = self.evaluate_streak(today);

        Ok(CompletionOutcome {
            newly_completed: true,
            xp_awarded: XpRewards::LESSON_COMPLETE,
            streak,
        })
    }

    /// Mark a virtual lab as completed with its score and time spent.
    ///
    /// Awards `calculate_lab_xp` and counts as streak activity. Like lessons,
    /// only the first completion counts; repeats change nothing.
    pub fn record_lab_complete(
        &mut self,
        lab_id: &str,
        score: u32,
        time_spent_secs: u64,
        today: NaiveDate,
    ) -> Result<CompletionOutcome> {
        let lab_id = lab_id.trim();
        if lab_id.is_empty() {
            return Err(ProgressError::InvalidLabId);
        }
        let score = percent(score)?;

        if self.completed_labs.contains_key(lab_id) {
            debug!(lab_id, "Lab already completed, ignoring");
            return Ok(CompletionOutcome {
                newly_completed: false,
                xp_awarded: 0,
                streak: StreakChange::Unchanged,
            });
        }

        let xp = calculate_lab_xp(score, time_spent_secs);
        self.completed_labs.insert(
            lab_id.to_string(),
            LabCompletion {
                lab_id: lab_id.to_string(),
                completed_on: today,
                score,
                time_spent: time_spent_secs,
                xp_earned: xp,
            },
        );
        self.grant_xp(xp);
        let streak = self.evaluate_streak(today);

        Ok(CompletionOutcome {
            newly_completed: true,
            xp_awarded: xp,
            streak,
        })
    }

    pub fn is_lab_completed(&self, lab_id: &str) -> bool {
        self.completed_labs.contains_key(lab_id.trim())
    }

    pub fn lab_completion(&self, lab_id: &str) -> Option<&LabCompletion> {
        self.completed_labs.get(lab_id.trim())
    }

    /// Append a quiz percentage (0-100) and count it as activity
    pub fn record_quiz_score(&mut self, score: u32, today: NaiveDate) -> Result<StreakChange> {
        let score = percent(score)?;
        self.quiz_scores.push(score);
        Ok(self.evaluate_streak(today))
    }

    /// Update the daily streak for activity on `today`
    pub fn evaluate_streak(&mut self, today: NaiveDate) -> StreakChange {
        self.streak.record_activity(today)
    }

    pub fn is_lesson_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.contains(lesson_id.trim())
    }

    /// Add XP (lesson awards, achievement rewards)
    pub fn grant_xp(&mut self, amount: u64) {
        self.total_xp = self.total_xp.saturating_add(amount);
    }

    /// Mean quiz score rounded half-up, 0 with no quizzes
    pub fn average_quiz_score(&self) -> u32 {
        let taken = self.quiz_scores.len() as u64;
        if taken == 0 {
            return 0;
        }
        let total: u64 = self.quiz_scores.iter().map(|s| u64::from(*s)).sum();
        // bounded by MAX_QUIZ_SCORE
        ((total + taken / 2) / taken) as u32
    }

    /// Summary as seen on `today` (streak decays lazily)
    pub fn summary(&self, today: NaiveDate) -> ProgressSummary {
        ProgressSummary {
            lessons_completed: self.completed_lessons.len(),
            quizzes_taken: self.quiz_scores.len(),
            labs_completed: self.completed_labs.len(),
            average_quiz_score: self.average_quiz_score(),
            current_streak: self.streak.current_on(today),
            longest_streak: self.streak.longest,
            total_xp: self.total_xp,
            level: LevelInfo::for_xp(self.total_xp),
        }
    }
}

/// XP for a lab: the score, up to 50 for speed (minus one per minute), and 50
/// more for a perfect score
pub fn calculate_lab_xp(score: u8, time_spent_secs: u64) -> u64 {
    let mut xp = u64::from(score);
    xp += LAB_TIME_BONUS.saturating_sub(time_spent_secs / 60);
    if u32::from(score) >= MAX_QUIZ_SCORE {
        xp += LAB_PERFECT_BONUS;
    }
    xp
}

fn percent(score: u32) -> Result<u8> {
    u8::try_from(score)
        .ok()
        .filter(|s| u32::from(*s) <= MAX_QUIZ_SCORE)
        .ok_or(ProgressError::ScoreOutOfRange { score })
}
