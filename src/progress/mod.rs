//! Learner progression: XP ledger, levels, streaks, achievements and match scoring
//!
//! # Architecture
//!
//! ```text
//!  lesson / quiz / lab / match
//!          │
//!          ▼
//!   ProgressionEngine ──load──▶ RecordStore (whole JSON records)
//!          │  ▲                     ▲
//!          │  └──────save───────────┘
//!          ▼
//!   ledger / scoring ─▶ achievements (rewards) ─▶ level ─▶ EventSink
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let engine = ProgressionEngine::new(SqliteStore::open(&path)?);
//!
//! engine.record_lesson_complete("ama", "fractions-1")?;
//! let summary = engine.summary("ama");
//! ```
//!
//! All work for one call happens synchronously against one record. Two
//! processes writing the same profile race with last-write-wins.

pub mod achievements;
mod error;
mod events;
mod ledger;
mod models;
mod scoring;
mod store;

pub use achievements::{
    ACHIEVEMENTS, Achievement, AchievementCategory, AchievementId, Clock, FixedClock, LevelInfo,
    LevelUp, StreakChange, SystemClock, check_achievements,
};
pub use error::{ProgressError, Result};
pub use events::{CollectingSink, EventSink, ProgressEvent, TracingSink};
pub use ledger::{CompletionOutcome, MAX_QUIZ_SCORE, calculate_lab_xp};
pub use models::{LabCompletion, Player, ProgressRecord, ProgressSnapshot, ProgressSummary};
pub use scoring::{
    Match, MatchOutcome, MatchResult, MatchSettlement, MatchState, calculate_match_coins,
    calculate_match_xp, rating_change,
};
pub use store::{
    MemoryStore, RecordStore, SqliteStore, load_record, player_key, progress_key, save_record,
};

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, NotificationSettings, RatingSettings};
use achievements::{Unlocks, unlock_achievements};
use models::StoredPlayer;

/// What resolving a match did for the player
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReward {
    /// XP from the match itself
    pub xp: u64,
    /// XP from achievements unlocked by the match
    pub achievement_xp: u64,
    pub coins: u64,
    pub rating_change: i32,
    pub unlocked: Vec<AchievementId>,
    pub level_up: Option<LevelUp>,
    /// Player record as saved
    pub player: Player,
}

/// Catalog entry with the user's unlock state
#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub xp_reward: u64,
    pub unlocked: bool,
}

/// Central entry point for progression updates and queries
pub struct ProgressionEngine<S: RecordStore> {
    store: S,
    clock: Box<dyn Clock>,
    sink: Arc<dyn EventSink>,
    rating: RatingSettings,
    notifications: NotificationSettings,
}

impl<S: RecordStore> ProgressionEngine<S> {
    /// Engine with default settings, the system clock and a tracing sink
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            sink: Arc::new(TracingSink),
            rating: RatingSettings::default(),
            notifications: NotificationSettings::default(),
        }
    }

    /// Engine using the rating and notification sections of `config`
    pub fn from_config(store: S, config: &Config) -> Self {
        Self {
            rating: config.rating.clone(),
            notifications: config.notifications.clone(),
            ..Self::new(store)
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ========================================
    // LEARNING PROGRESS
    // ========================================

    /// Stored progress record, or a fresh one if missing or unreadable
    pub fn progress(&self, user_id: &str) -> ProgressRecord {
        load_record(&self.store, &progress_key(user_id)).unwrap_or_default()
    }

    /// Mark a lesson complete. Repeats return no events and write nothing.
    pub fn record_lesson_complete(
        &self,
        user_id: &str,
        lesson_id: &str,
    ) -> Result<Vec<ProgressEvent>> {
        let today = self.today();
        let mut record = self.progress(user_id);
        let old_xp = record.total_xp;

        let outcome = record.record_lesson_complete(lesson_id, today)?;
        if !outcome.newly_completed {
            return Ok(Vec::new());
        }
        info!(user_id, lesson_id, "Lesson completed");

        let mut events = vec![
            ProgressEvent::LessonCompleted {
                lesson_id: lesson_id.trim().to_string(),
            },
            ProgressEvent::XpAwarded {
                amount: outcome.xp_awarded,
                reason: "Lesson completed".to_string(),
            },
        ];
        self.streak_events(outcome.streak, &mut events);

        self.finish_learning_update(user_id, record, old_xp, today, events)
    }

    /// Record a quiz percentage (0-100)
    pub fn record_quiz_score(&self, user_id: &str, score: u32) -> Result<Vec<ProgressEvent>> {
        let today = self.today();
        let mut record = self.progress(user_id);
        let old_xp = record.total_xp;

        let streak = record.record_quiz_score(score, today)?;
        info!(user_id, score, "Quiz score recorded");

        let mut events = vec![ProgressEvent::QuizRecorded { score }];
        self.streak_events(streak, &mut events);

        self.finish_learning_update(user_id, record, old_xp, today, events)
    }

    pub fn is_lesson_completed(&self, user_id: &str, lesson_id: &str) -> bool {
        self.progress(user_id).is_lesson_completed(lesson_id)
    }

    /// Mark a virtual lab complete. Repeats return no events and write nothing.
    pub fn record_lab_complete(
        &self,
        user_id: &str,
        lab_id: &str,
        score: u32,
        time_spent_secs: u64,
    ) -> Result<Vec<ProgressEvent>> {
        let today = self.today();
        let mut record = self.progress(user_id);
        let old_xp = record.total_xp;

        let outcome = record.record_lab_complete(lab_id, score, time_spent_secs, today)?;
        if !outcome.newly_completed {
            return Ok(Vec::new());
        }
        info!(user_id, lab_id, score, xp = outcome.xp_awarded, "Lab completed");

        let mut events = vec![
            ProgressEvent::LabCompleted {
                lab_id: lab_id.trim().to_string(),
                score,
            },
            ProgressEvent::XpAwarded {
                amount: outcome.xp_awarded,
                reason: "Lab completed".to_string(),
            },
        ];
        self.streak_events(outcome.streak, &mut events);

        self.finish_learning_update(user_id, record, old_xp, today, events)
    }

    pub fn is_lab_completed(&self, user_id: &str, lab_id: &str) -> bool {
        self.progress(user_id).is_lab_completed(lab_id)
    }

    pub fn lab_completion(&self, user_id: &str, lab_id: &str) -> Option<LabCompletion> {
        self.progress(user_id).lab_completion(lab_id).cloned()
    }

    /// Progress summary; never fails
    pub fn summary(&self, user_id: &str) -> ProgressSummary {
        self.progress(user_id).summary(self.today())
    }

    /// Re-scan both records of a user for achievements they now satisfy
    pub fn evaluate_achievements(&self, user_id: &str) -> Result<Vec<ProgressEvent>> {
        let today = self.today();

        let record = self.progress(user_id);
        let old_xp = record.total_xp;
        let mut events = self.finish_learning_update(user_id, record, old_xp, today, Vec::new())?;

        let key = player_key(user_id);
        if let Some(mut player) = self.stored_player(&key) {
            let old_xp = player.xp;
            let unlocks = unlock_achievements(&mut player, today);
            if !unlocks.is_empty() {
                let mut player_events = Vec::new();
                push_unlock_events(&unlocks, old_xp, player.xp, &mut player_events);
                save_record(&self.store, &key, &player)?;
                self.emit(user_id, &player_events);
                events.extend(player_events);
            }
        }

        Ok(events)
    }

    /// Unlock achievements, credit rewards, save, then notify
    fn finish_learning_update(
        &self,
        user_id: &str,
        mut record: ProgressRecord,
        old_xp: u64,
        today: NaiveDate,
        mut events: Vec<ProgressEvent>,
    ) -> Result<Vec<ProgressEvent>> {
        let unlocks = unlock_achievements(&mut record, today);
        push_unlock_events(&unlocks, old_xp, record.total_xp, &mut events);

        if events.is_empty() {
            return Ok(events);
        }

        save_record(&self.store, &progress_key(user_id), &record)?;
        self.emit(user_id, &events);
        Ok(events)
    }

    fn streak_events(&self, change: StreakChange, events: &mut Vec<ProgressEvent>) {
        if let StreakChange::Extended(days) = change {
            debug!(days, "Daily streak extended");
            events.push(ProgressEvent::StreakExtended { days });
            if self.notifications.streak_milestones.contains(&days) {
                events.push(ProgressEvent::StreakMilestone { days });
            }
        }
    }

    // ========================================
    // COMPETITIVE PLAY
    // ========================================

    /// Stored player, or a new one at the initial rating (not saved)
    pub fn player(&self, user_id: &str) -> Player {
        self.stored_player(&player_key(user_id))
            .unwrap_or_else(|| Player::new(user_id, self.rating.initial))
    }

    fn stored_player(&self, key: &str) -> Option<Player> {
        load_record::<StoredPlayer>(&self.store, key)
            .map(|stored| stored.into_player(self.rating.initial))
    }

    /// Resolve `game` for this user and apply the result to their player record.
    ///
    /// The match must be in progress. It is marked resolved only after the
    /// updated player has been saved.
    pub fn resolve_match(
        &self,
        user_id: &str,
        game: &mut Match,
        result: &MatchResult,
    ) -> Result<MatchReward> {
        result.validate()?;
        let mut resolved = game.clone();
        resolved.resolve(result.outcome)?;

        let today = self.today();
        let mut player = self.player(user_id);
        let old_xp = player.xp;

        let settlement = player.apply_match(result, self.rating.k_factor);
        let unlocks = unlock_achievements(&mut player, today);
        let level_up = LevelUp::between(old_xp, player.xp);

        save_record(&self.store, &player_key(user_id), &player)?;
        *game = resolved;
        info!(
            user_id,
            match_id = %game.id,
            outcome = %result.outcome,
            xp = settlement.xp,
            rating = player.rating,
            "Match resolved"
        );

        let mut events = vec![
            ProgressEvent::MatchResolved {
                outcome: result.outcome,
                rating_change: settlement.rating_change,
            },
            ProgressEvent::XpAwarded {
                amount: settlement.xp,
                reason: format!("Match {}", result.outcome),
            },
        ];
        push_unlock_events(&unlocks, old_xp, player.xp, &mut events);
        self.emit(user_id, &events);

        Ok(MatchReward {
            xp: settlement.xp,
            achievement_xp: unlocks.xp,
            coins: settlement.coins,
            rating_change: settlement.rating_change,
            unlocked: unlocks.achievements.iter().map(|a| a.id).collect(),
            level_up,
            player,
        })
    }

    /// Players ordered by rating, then wins
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<Player>> {
        let keys = self.store.keys_with_prefix("player:")?;
        let mut players: Vec<Player> = keys
            .iter()
            .filter_map(|key| self.stored_player(key))
            .collect();
        players.sort_by(|a, b| b.rating.cmp(&a.rating).then(b.wins.cmp(&a.wins)));
        players.truncate(limit);
        Ok(players)
    }

    // ========================================
    // ACHIEVEMENTS & ADMIN
    // ========================================

    /// Every catalog entry with whether this user has unlocked it
    pub fn achievements(&self, user_id: &str) -> Vec<AchievementStatus> {
        let record = self.progress(user_id);
        let player = self.stored_player(&player_key(user_id));

        ACHIEVEMENTS
            .iter()
            .map(|a| {
                let id = a.id.as_str();
                let unlocked = record.unlocked_achievements.contains(id)
                    || player.as_ref().is_some_and(|p| p.achievements.contains(id));
                AchievementStatus {
                    id,
                    title: a.title,
                    description: a.description,
                    icon: a.icon,
                    category: a.category,
                    xp_reward: a.xp_reward,
                    unlocked,
                }
            })
            .collect()
    }

    /// Administrative reset of a learner's progress
    pub fn reset_progress(&self, user_id: &str) -> Result<()> {
        self.store.remove(&progress_key(user_id))?;
        info!(user_id, "Progress reset");
        Ok(())
    }

    /// Administrative reset of a player record
    pub fn reset_player(&self, user_id: &str) -> Result<()> {
        self.store.remove(&player_key(user_id))?;
        info!(user_id, "Player reset");
        Ok(())
    }

    fn emit(&self, user_id: &str, events: &[ProgressEvent]) {
        if !self.notifications.enabled {
            return;
        }
        for event in events {
            self.sink.notify(user_id, event);
        }
    }
}

fn push_unlock_events(
    unlocks: &Unlocks,
    old_xp: u64,
    new_xp: u64,
    events: &mut Vec<ProgressEvent>,
) {
    for achievement in unlocks.achievements.iter().copied() {
        events.push(ProgressEvent::AchievementUnlocked(achievement));
    }
    if unlocks.xp > 0 {
        events.push(ProgressEvent::XpAwarded {
            amount: unlocks.xp,
            reason: "Achievements unlocked".to_string(),
        });
    }
    if let Some(level_up) = LevelUp::between(old_xp, new_xp) {
        events.push(ProgressEvent::LevelUp(level_up));
    }
}
