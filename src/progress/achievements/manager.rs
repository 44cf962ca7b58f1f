//! Achievement manager - unlocks achievements on a record and credits rewards

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::checker::check_achievements;
use super::definitions::Achievement;
use super::levels::{level_for_xp, title_for_level};
use crate::progress::models::{Player, ProgressRecord, ProgressSnapshot};

/// A level up event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
    pub new_title: &'static str,
}

impl LevelUp {
    /// Level up caused by going from `old_xp` to `new_xp`, if any
    pub fn between(old_xp: u64, new_xp: u64) -> Option<Self> {
        let old_level = level_for_xp(old_xp);
        let new_level = level_for_xp(new_xp);
        (new_level > old_level).then(|| Self {
            old_level,
            new_level,
            new_title: title_for_level(new_level),
        })
    }
}

/// A record that owns an unlocked-achievement set and an XP total
pub trait AchievementHolder {
    fn snapshot(&self, today: NaiveDate) -> ProgressSnapshot;
    fn unlocked(&self) -> &BTreeSet<String>;
    fn unlocked_mut(&mut self) -> &mut BTreeSet<String>;
    fn credit_xp(&mut self, amount: u64);
}

impl AchievementHolder for ProgressRecord {
    fn snapshot(&self, today: NaiveDate) -> ProgressSnapshot {
        ProgressSnapshot::from_record(self, today)
    }

    fn unlocked(&self) -> &BTreeSet<String> {
        &self.unlocked_achievements
    }

    fn unlocked_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.unlocked_achievements
    }

    fn credit_xp(&mut self, amount: u64) {
        self.grant_xp(amount);
    }
}

impl AchievementHolder for Player {
    fn snapshot(&self, _today: NaiveDate) -> ProgressSnapshot {
        ProgressSnapshot::from_player(self)
    }

    fn unlocked(&self) -> &BTreeSet<String> {
        &self.achievements
    }

    fn unlocked_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.achievements
    }

    fn credit_xp(&mut self, amount: u64) {
        self.xp = self.xp.saturating_add(amount);
    }
}

/// Achievements unlocked by one evaluation
#[derive(Debug, Clone, Default)]
pub struct Unlocks {
    pub achievements: Vec<&'static Achievement>,
    pub xp: u64,
}

impl Unlocks {
    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }
}

/// Evaluate the catalog against `holder`, record new unlocks and credit their XP.
///
/// Conditions do not depend on XP, so one pass reaches a fixed point: the
/// rewards granted here cannot satisfy further conditions.
pub fn unlock_achievements<H: AchievementHolder>(holder: &mut H, today: NaiveDate) -> Unlocks {
    let snapshot = holder.snapshot(today);
    let newly = check_achievements(&snapshot, holder.unlocked());

    let mut unlocks = Unlocks::default();
    for id in newly {
        let Some(achievement) = Achievement::get(id) else {
            continue;
        };
        if holder.unlocked_mut().insert(id.as_str().to_string()) {
            unlocks.xp = unlocks.xp.saturating_add(achievement.xp_reward);
            unlocks.achievements.push(achievement);
        }
    }

    if unlocks.xp > 0 {
        holder.credit_xp(unlocks.xp);
    }
    unlocks
}
