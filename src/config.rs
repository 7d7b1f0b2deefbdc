//! Application configuration
//!
//! Values come from an optional TOML file; command-line flags override them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::game::GameConfig;
use crate::store::StorageConfig;

/// Everything the binaries need at startup
///
/// # Example
///
/// ```rust
/// use arcade_snake::config::AppConfig;
///
/// let config: AppConfig = toml::from_str("sound = false").unwrap();
/// assert!(!config.sound);
/// assert_eq!(config.game.grid_width, 40);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub storage: StorageConfig,
    /// Ring the terminal bell on eat and game over
    pub sound: bool,
    /// Where the game writes its log while the terminal is in raw mode
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            storage: StorageConfig::default(),
            sound: true,
            log_file: PathBuf::from("arcade_snake.log"),
        }
    }
}

impl AppConfig {
    /// Read a config file, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: AppConfig =
            toml::from_str(&raw).with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }
}
