//! User configuration: `<config_dir>/downtime-dash/config.toml`, every field
//! optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::TOP_N;
use crate::error::ConfigError;
use crate::leaderboard::JsonFileLeaderboard;

const APP_DIR: &str = "downtime-dash";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fps: u32,
    pub top_n: usize,
    pub sound: bool,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
    pub leaderboard_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60,
            top_n: TOP_N,
            sound: true,
            seed: None,
            leaderboard_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Load `path`, or the default location when `None`.  A missing file
    /// yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        match fs::read_to_string(&path) {
            Ok(raw) => Self::parse(&raw, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Toml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.leaderboard_path
            .clone()
            .unwrap_or_else(JsonFileLeaderboard::default_path)
    }

    /// Directory for the log file; the terminal itself belongs to the renderer.
    pub fn log_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("logs")
    }
}
