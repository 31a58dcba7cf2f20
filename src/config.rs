//! Application configuration
//!
//! Optional settings are read from `config.json` in the XDG config directory
//! (`~/.config/edsalert/config.json` on Linux). A missing file means
//! defaults; a present but malformed file is an error.

use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::format::SpeedUnit;
use crate::storage::FileBackend;
use crate::worker::{WorkerConfig, CACHE_NAME};

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Origin the development server listens on
const DEFAULT_ORIGIN: &str = "http://localhost:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid origin '{0}'")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin the web app is served from
    pub origin: String,
    /// Versioned name of the worker's cache
    pub cache_name: String,
    /// Where stored values live; the XDG data directory when unset
    pub storage_dir: Option<PathBuf>,
    pub speed_unit: SpeedUnit,
    /// Decimals shown for distances between 1 and 10 km
    pub distance_precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            cache_name: CACHE_NAME.to_string(),
            storage_dir: None,
            speed_unit: SpeedUnit::default(),
            distance_precision: 1,
        }
    }
}

impl Config {
    /// Loads the config from the default location
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads the config from `path`, falling back to defaults if it is absent
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// `None` when no home directory can be determined
    pub fn config_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "edsalert")?;
        Some(project_dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin).map_err(|_| ConfigError::InvalidOrigin(self.origin.clone()))
    }

    pub fn worker_config(&self) -> Result<WorkerConfig, ConfigError> {
        Ok(WorkerConfig::new(self.origin_url()?).with_cache_name(&self.cache_name))
    }

    /// File backend at `storage_dir`, or the XDG default
    pub fn storage_backend(&self) -> Option<FileBackend> {
        match &self.storage_dir {
            Some(dir) => Some(FileBackend::with_dir(dir.clone())),
            None => FileBackend::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"speed_unit": "mph", "origin": "https://eds.example"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.speed_unit, SpeedUnit::Mph);
        assert_eq!(config.origin, "https://eds.example");
        assert_eq!(config.cache_name, CACHE_NAME);
        assert_eq!(config.distance_precision, 1);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ speed_unit: ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");
        let config = Config {
            storage_dir: Some(temp_dir.path().join("store")),
            distance_precision: 2,
            ..Config::default()
        };

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_worker_config_uses_origin_and_cache_name() {
        let config = Config {
            origin: "https://eds.example".to_string(),
            cache_name: "eds-alert-test".to_string(),
            ..Config::default()
        };

        let worker = config.worker_config().unwrap();

        assert_eq!(worker.origin.as_str(), "https://eds.example/");
        assert_eq!(worker.cache_name, "eds-alert-test");
    }

    #[test]
    fn test_invalid_origin() {
        let config = Config {
            origin: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.origin_url(), Err(ConfigError::InvalidOrigin(_))));
    }

    #[test]
    fn test_storage_backend_prefers_configured_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            storage_dir: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };
        let backend = config.storage_backend().unwrap();
        assert_eq!(backend.dir(), &temp_dir.path().to_path_buf());
    }
}
