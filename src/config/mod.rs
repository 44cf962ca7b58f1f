//! Configuration loading and management

mod io;
mod settings;
mod template;

pub use settings::{NotificationSettings, ProfileSettings, RatingSettings, StoreSettings};
pub use template::DEFAULT_CONFIG;

use serde::{Deserialize, Serialize};

/// Main configuration structure (`~/.studyquest/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Record store location
    #[serde(default)]
    pub store: StoreSettings,

    /// Profile used when no user is given
    #[serde(default)]
    pub profile: ProfileSettings,

    /// Competitive rating parameters
    #[serde(default)]
    pub rating: RatingSettings,

    /// Notification channel settings
    #[serde(default)]
    pub notifications: NotificationSettings,
}
