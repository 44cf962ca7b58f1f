//! Progression events and the notification channel they are sent to

use std::sync::Mutex;

use tracing::info;

use super::achievements::{Achievement, LevelUp};
use super::scoring::MatchOutcome;

/// Something the display layer may want to announce
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    LessonCompleted { lesson_id: String },
    QuizRecorded { score: u32 },
    LabCompleted { lab_id: String, score: u32 },
    StreakExtended { days: u32 },
    StreakMilestone { days: u32 },
    AchievementUnlocked(&'static Achievement),
    XpAwarded { amount: u64, reason: String },
    LevelUp(LevelUp),
    MatchResolved { outcome: MatchOutcome, rating_change: i32 },
}

/// One-way, best-effort notification channel.
///
/// Implementations must not fail or block; nothing is acknowledged or retried.
pub trait EventSink: Send + Sync {
    fn notify(&self, user_id: &str, event: &ProgressEvent);
}

/// Logs every event through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn notify(&self, user_id: &str, event: &ProgressEvent) {
        match event {
            ProgressEvent::AchievementUnlocked(achievement) => info!(
                user_id,
                achievement = achievement.id.as_str(),
                "Achievement unlocked: {} {} (+{} XP)",
                achievement.icon,
                achievement.title,
                achievement.xp_reward
            ),
            ProgressEvent::LevelUp(level_up) => info!(
                user_id,
                "Level up: {} -> {} ({})",
                level_up.old_level,
                level_up.new_level,
                level_up.new_title
            ),
            ProgressEvent::StreakMilestone { days } => {
                info!(user_id, days, "Streak milestone reached")
            }
            other => info!(user_id, ?other, "Progress event"),
        }
    }
}

/// Keeps events in memory (tests, batch callers)
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<(String, ProgressEvent)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything collected so far
    pub fn take(&self) -> Vec<(String, ProgressEvent)> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventSink for CollectingSink {
    fn notify(&self, user_id: &str, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push((user_id.to_string(), event.clone()));
        }
    }
}
