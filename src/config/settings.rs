//! Settings sections of the configuration file

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where records are persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// SQLite database file
    /// Default: ~/.studyquest/progress.db
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    super::Config::global_config_dir().join("progress.db")
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Profile settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    /// User ID used when `--user` is not given
    #[serde(default = "default_user")]
    pub default_user: String,
}

fn default_user() -> String {
    "local".to_string()
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            default_user: default_user(),
        }
    }
}

/// Elo rating parameters for competitive play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSettings {
    /// Rating of a newly created player
    #[serde(default = "default_initial_rating")]
    pub initial: u32,

    /// Maximum rating change per match
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
}

fn default_initial_rating() -> u32 {
    1000
}

fn default_k_factor() -> f64 {
    32.0
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            initial: default_initial_rating(),
            k_factor: default_k_factor(),
        }
    }
}

/// Notification channel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Send progress events to the notification sink
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Daily streak lengths announced as milestones
    #[serde(default = "default_streak_milestones")]
    pub streak_milestones: Vec<u32>,
}

fn default_enabled() -> bool {
    true
}

fn default_streak_milestones() -> Vec<u32> {
    vec![3, 7, 14, 30]
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            streak_milestones: default_streak_milestones(),
        }
    }
}
