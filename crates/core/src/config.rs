//! Roster configuration
//!
//! Optional TOML file:
//!
//! ```toml
//! database_path = "/home/me/school/roster.db"
//! document_key = "teacherhub_data"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::DEFAULT_DOCUMENT_KEY;

const DATABASE_FILE: &str = "roster.db";
const CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// SQLite file; defaults to the platform data directory
    pub database_path: Option<PathBuf>,
    /// Key the session document is stored under
    pub document_key: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            document_key: DEFAULT_DOCUMENT_KEY.to_string(),
        }
    }
}

impl RosterConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.document_key.trim().is_empty() {
            return Err(Error::InvalidOperation(
                "document_key must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load `path` if given, else the platform config file if it exists,
    /// else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Ok(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Database file to open
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(default_data_dir()?.join(DATABASE_FILE)),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "onyx", "roster").ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine data directory",
        ))
    })
}

/// Platform data directory for the roster database
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Platform location of the optional config file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
}
