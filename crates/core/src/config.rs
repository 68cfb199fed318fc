//! Board configuration
//!
//! Loaded from `config.toml` in the platform config directory. Every section
//! and field is optional; missing values take the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{User, DEFAULT_MAX_PARTICIPANTS};

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "themove.db";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Where moves are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One serialized blob under a fixed key
    #[default]
    Local,
    /// One document per move
    Documents,
}

/// The session identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSection {
    pub id: String,
    pub name: String,
}

impl Default for UserSection {
    fn default() -> Self {
        let user = User::default();
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageSection {
    pub backend: StorageBackend,
    /// Overrides the platform data directory location
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSection {
    /// Seconds between clock refreshes in `watch`
    pub refresh_interval_secs: u64,
    /// Capacity used when a new move leaves it blank
    pub default_max_participants: u32,
}

impl Default for BoardSection {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
            default_max_participants: DEFAULT_MAX_PARTICIPANTS,
        }
    }
}

/// Top-level config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BoardConfig {
    pub user: UserSection,
    pub storage: StorageSection,
    pub board: BoardSection,
}

impl BoardConfig {
    /// Parse config directly from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!(path = %path.display(), backend = ?config.storage.backend, "Loaded config");
        Ok(config)
    }

    /// Load from the platform config directory
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&Self::default_path()?)
    }

    /// `<config dir>/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
    }

    /// The configured database file, or `themove.db` in the platform data directory
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(DATABASE_FILE)),
        }
    }

    pub fn user(&self) -> User {
        User::new(self.user.id.clone(), self.user.name.clone())
    }

    /// Refresh cadence, never shorter than one second
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.board.refresh_interval_secs.max(1))
    }

    pub fn default_max_participants(&self) -> u32 {
        self.board.default_max_participants.max(1)
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("dev", "themove", "themove").ok_or(ConfigError::NoConfigDir)
}
