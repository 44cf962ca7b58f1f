//! Daily streak tracking
//!
//! Streaks are evaluated lazily: nothing runs on a timer, the stored counter is
//! reinterpreted against "today" whenever a record is read or written.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Source of the current calendar day
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one day (tests, replays)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Daily activity streak
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStreak {
    #[serde(default, rename = "currentStreak")]
    pub current: u32,
    #[serde(default, rename = "longestStreak")]
    pub longest: u32,
    #[serde(default, rename = "lastActivityDate")]
    pub last_activity_date: Option<NaiveDate>,
}

/// What a recorded activity did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Already active today
    Unchanged,
    /// Activity on the day after the previous one
    Extended(u32),
    /// First activity, or a gap of more than one day
    Started,
}

impl DailyStreak {
    /// Register qualifying activity on `today`
    pub fn record_activity(&mut self, today: NaiveDate) -> StreakChange {
        let change = match self.last_activity_date {
            Some(last) if last == today => return StreakChange::Unchanged,
            Some(last) if last.succ_opt() == Some(today) => {
                self.current = self.current.saturating_add(1);
                StreakChange::Extended(self.current)
            }
            _ => {
                self.current = 1;
                StreakChange::Started
            }
        };

        self.longest = self.longest.max(self.current);
        self.last_activity_date = Some(today);
        change
    }

    /// Streak as seen on `today`: 0 once a full day has passed without activity
    pub fn current_on(&self, today: NaiveDate) -> u32 {
        match self.last_activity_date {
            Some(last) if is_still_active(last, today) => self.current,
            _ => 0,
        }
    }
}

/// Active if the last activity was today or yesterday
fn is_still_active(last: NaiveDate, today: NaiveDate) -> bool {
    let days_since = (today - last).num_days();
    (0..=1).contains(&days_since)
}
