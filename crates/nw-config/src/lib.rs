//! Configuration management for Notewell.
//!
//! Parses `notewell.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every section
//! and field is optional; [`Config::default`] is a fully working
//! configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "notewell.toml";

/// Error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Viewer configuration.
    pub viewer: ViewerConfig,
    /// Diagram mounting configuration.
    pub diagrams: DiagramsConfig,
}

/// Viewer configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Base path the client is served from (empty for origin root).
    pub base_path: String,
    /// Capture the first H1 as the note title.
    pub title_extraction: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            title_extraction: true,
        }
    }
}

/// Diagram mounting configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramsConfig {
    /// Whether diagram blocks are mounted as interactive views.
    pub enabled: bool,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load configuration from a specific file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Search `start_dir` and its parents for a config file.
    ///
    /// Returns the loaded config and the path it came from, or `None`
    /// when no config file exists anywhere up the tree.
    pub fn discover(start_dir: &Path) -> Result<Option<(Self, PathBuf)>, ConfigError> {
        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((config, candidate)));
            }
            dir = current.parent();
        }
        Ok(None)
    }
}
