//! CLI command implementations

pub mod achievements;
pub mod init;
pub mod learn;
pub mod level;
pub mod play;
pub mod reset;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use studyquest::Config;
use studyquest::progress::{ProgressionEngine, SqliteStore};

/// Loaded configuration, opened store and the profile to act on
pub struct Context {
    pub user: String,
    pub engine: ProgressionEngine<SqliteStore>,
}

impl Context {
    /// Load the config (creating it if missing) and open the record store
    pub fn load(config_path: Option<PathBuf>, user: Option<String>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load_from(&path)?,
            None => Config::load()?,
        };

        let store = SqliteStore::open(&config.store.path).with_context(|| {
            format!("Failed to open record store: {}", config.store.path.display())
        })?;

        let user = user.unwrap_or_else(|| config.profile.default_user.clone());
        tracing::debug!(user, store = %config.store.path.display(), "Loaded config");

        Ok(Self {
            user,
            engine: ProgressionEngine::from_config(store, &config),
        })
    }
}
