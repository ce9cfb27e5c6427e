use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LibraryError;

/// Settings for the resolver driver.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Default `env_logger` filter when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Fail when a declared param resolves to nothing.
    pub strict: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            strict: false,
        }
    }
}

impl ResolverConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, LibraryError> {
        Ok(toml::from_str(toml_str)?)
    }
}

fn get_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "graph-params").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load the config from `path`, or from the per-user config directory.
///
/// An explicit path must exist and parse. The per-user file is optional and
/// falls back to defaults on any problem.
pub fn load_config(path: Option<&Path>) -> Result<ResolverConfig, LibraryError> {
    if let Some(path) = path {
        let toml_str = fs::read_to_string(path)?;
        return ResolverConfig::from_toml_str(&toml_str);
    }

    if let Some(path) = get_config_path() {
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(toml_str) => match ResolverConfig::from_toml_str(&toml_str) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!("Failed to parse config file, using defaults: {}", e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read config file, using defaults: {}", e);
                }
            }
        }
    }
    Ok(ResolverConfig::default())
}
