//! User configuration.
//!
//! Settings are read from `config.json` in the git-shepherd config directory, or
//! from the file named by `GIT_SHEPHERD_CONFIG`. A missing file means defaults;
//! a file that does not parse is an error rather than being silently ignored.

use crate::core::dirs::get_config_directory;
use crate::core::error::{Result, ShepherdError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "GIT_SHEPHERD_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShepherdConfig {
    /// Program run for every git subprocess
    pub git_binary: String,
    /// Rename modified files to `.orig` before reverting them
    pub backup_on_revert: bool,
    /// Remote used by pull and push when none is given
    pub default_remote: String,
}

impl Default for ShepherdConfig {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            backup_on_revert: true,
            default_remote: "origin".to_string(),
        }
    }
}

impl ShepherdConfig {
    pub fn config_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => get_config_directory().join("config.json"),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = serde_json::from_str(&content).map_err(|source| {
            ShepherdError::ConfigParseFailed {
                path: path.clone(),
                source,
            }
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
