//! Configuration for the REQ/REP panel.
//!
//! The config file is optional. When present it lives at a
//! platform-appropriate location:
//! - Linux: `~/.config/reqrep-panel/config.toml`
//! - macOS: `~/Library/Application Support/reqrep-panel/config.toml`
//!
//! It only seeds the initial state: the Target IP and Port fields can
//! still be edited live in the panel.
//!
//! # Config File Format (TOML)
//!
//! ```toml
//! target_ip = "127.0.0.1"
//! port = 5555
//! history_capacity = 10
//! recv_timeout_ms = 10
//! frame_rate = 60
//! vsync = true
//! window_width = 1280
//! window_height = 720
//! window_title = "REQ/REP Panel"
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use crate::history::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Directory name used under the platform config/data directories.
const APP_DIR: &str = "reqrep-panel";

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to write config file at {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("could not determine config directory for this platform")]
    NoConfigDir,
}

/// Startup settings for the panel and its window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Initial value of the Target IP field.
    pub target_ip: String,

    /// Initial value of the Port field (used for both connect and bind).
    pub port: u16,

    /// Maximum number of entries kept in the message log.
    pub history_capacity: usize,

    /// Receive timeout applied to the server socket after binding, in ms.
    pub recv_timeout_ms: u32,

    /// Frame cap for the render loop.
    pub frame_rate: u32,

    /// Whether to sync presentation to the display refresh.
    pub vsync: bool,

    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            target_ip: "127.0.0.1".to_string(),
            port: 5555,
            history_capacity: DEFAULT_CAPACITY,
            recv_timeout_ms: 10,
            frame_rate: 60,
            vsync: true,
            window_width: 1280,
            window_height: 720,
            window_title: "REQ/REP Panel".to_string(),
        }
    }
}

impl PanelConfig {
    /// Returns the platform-appropriate config directory path.
    ///
    /// Returns `None` if the platform's config directory can't be
    /// determined (no `$HOME`).
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR))
    }

    /// Returns the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("config.toml"))
    }

    /// Returns the platform-appropriate data directory, used for the log file.
    ///
    /// - Linux: `~/.local/share/reqrep-panel/`
    /// - macOS: `~/Library/Application Support/reqrep-panel/`
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR))
    }

    /// Loads the config from a specific file path.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_owned(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_owned(),
            source: e,
        })?;
        Ok(Some(config))
    }

    /// Saves this config to a specific file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
                path: path.to_owned(),
                source: e,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
            path: path.to_owned(),
            source: e,
        })?;
        Ok(())
    }

    /// Server receive timeout as a `Duration`.
    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.recv_timeout_ms))
    }

    /// Minimum time between the starts of two frames at the configured
    /// frame rate.
    ///
    /// A frame rate of `0` is treated as `1`.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_panel_defaults() {
        let config = PanelConfig::default();
        assert_eq!(config.target_ip, "127.0.0.1");
        assert_eq!(config.port, 5555);
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.recv_timeout(), Duration::from_millis(10));
        assert_eq!(config.frame_rate, 60);
        assert!(config.vsync);
    }

    #[test]
    fn config_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let config = PanelConfig {
            target_ip: "192.168.1.20".to_string(),
            port: 6000,
            history_capacity: 25,
            ..PanelConfig::default()
        };

        config.save_to(&path).unwrap();
        let loaded = PanelConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn config_missing_file_returns_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nonexistent.toml");
        assert!(PanelConfig::load_from(&path).unwrap().is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "port = 7000\n").unwrap();

        let loaded = PanelConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.port, 7000);
        assert_eq!(loaded.target_ip, "127.0.0.1");
        assert_eq!(loaded.history_capacity, 10);
    }

    #[test]
    fn invalid_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"\n").unwrap();

        let err = PanelConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFile { .. }));
    }

    #[test]
    fn config_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("deep").join("nested").join("config.toml");

        PanelConfig::default().save_to(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn frame_interval_at_sixty_fps() {
        let config = PanelConfig::default();
        assert_eq!(config.frame_interval(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn zero_frame_rate_does_not_divide_by_zero() {
        let config = PanelConfig {
            frame_rate: 0,
            ..PanelConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }
}
