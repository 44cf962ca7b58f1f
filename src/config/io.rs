//! Configuration file I/O operations

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::{Config, DEFAULT_CONFIG};

impl Config {
    /// Get the global config directory path (~/.studyquest/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".studyquest")
    }

    /// Get the global config file path (~/.studyquest/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the global configuration, creating it with defaults if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::global_config_path())
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::auto_init(path)?;
        }
        Self::from_file(path)
    }

    /// Write the commented default config to `path`, replacing any existing file
    pub fn write_default(path: &Path) -> Result<()> {
        let _lock = lock_config(path)?;
        write_atomic(path, DEFAULT_CONFIG)
        // Lock is released when _lock is dropped
    }

    /// Write the default configuration to `path` unless another process got there first
    fn auto_init(path: &Path) -> Result<()> {
        let _lock = lock_config(path)?;

        // Re-check after acquiring the lock
        if path.exists() {
            return Ok(());
        }

        write_atomic(path, DEFAULT_CONFIG)?;

        tracing::info!("Created {}", path.display());
        Ok(())
    }
}

/// Create the parent directory and take an exclusive lock next to `path`
fn lock_config(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    // Separate from the config itself so the rename does not drop the lock
    let lock_path = path.with_extension("toml.lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

    lock_file
        .lock_exclusive()
        .with_context(|| "Failed to acquire config lock")?;

    Ok(lock_file)
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("toml.tmp");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .with_context(|| "Failed to write config content")?;

    temp_file
        .sync_all()
        .with_context(|| "Failed to sync config file")?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename config file: {}", path.display()))?;

    Ok(())
}
