//! Command-line interface parsing for the EDS Alert toolkit
//!
//! Exposes the geo, formatting, storage, device and shortcut helpers as
//! subcommands using clap. [`execute`] returns the text to print so commands
//! can be tested without spawning the binary.

use clap::{Parser, Subcommand};
use reqwest::Url;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::capability::{Capabilities, HostEnvironment};
use crate::config::{Config, ConfigError};
use crate::format::{format_distance, format_speed, format_time, SpeedUnit};
use crate::geo::{bearing, direction_name, distance, Coordinate};
use crate::shortcuts::ShortcutAction;
use crate::storage::{FileBackend, Storage};

/// Error types for CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No storage directory was given and none could be determined
    #[error("No storage directory available; pass --storage-dir")]
    NoStorageDir,

    #[error("Failed to write '{0}' to storage")]
    StoreFailed(String),

    #[error("Failed to remove '{0}' from storage")]
    RemoveFailed(String),

    #[error("TTL of {0} seconds is out of range")]
    InvalidTtl(i64),

    #[error("Failed to clear storage")]
    ClearFailed,

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// EDS Alert - speed camera companion utilities
#[derive(Parser, Debug)]
#[command(name = "edsalert")]
#[command(about = "Geo, formatting and storage utilities for the EDS speed-camera alert app")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON config file (defaults to the XDG config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for stored values, overriding the config file
    #[arg(long, global = true, value_name = "DIR")]
    pub storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Distance, bearing and compass direction between two points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
        /// Decimals for distances between 1 and 10 km
        #[arg(long)]
        precision: Option<usize>,
    },

    /// Format an elapsed time given in seconds
    FormatTime {
        seconds: f64,
        /// Show milliseconds for durations under an hour
        #[arg(long)]
        millis: bool,
    },

    /// Format a speed given in km/h
    FormatSpeed {
        kmh: f64,
        /// kmh, ms or mph (defaults to the configured unit)
        #[arg(long)]
        unit: Option<SpeedUnit>,
    },

    /// Read and write namespaced stored values
    #[command(subcommand)]
    Store(StoreCommand),

    /// Classify a device from its user agent
    Device {
        #[arg(long)]
        user_agent: String,
        #[arg(long, default_value = "")]
        platform: String,
    },

    /// Show which launch shortcut a URL requests
    Shortcut { url: String },
}

#[derive(Subcommand, Debug)]
pub enum StoreCommand {
    /// Print a value as JSON, or null if missing or expired
    Get { key: String },
    /// Store a value; parsed as JSON when possible, otherwise kept as text
    Set {
        key: String,
        value: String,
        /// Expire the value after this many seconds
        #[arg(long, allow_negative_numbers = true)]
        ttl_secs: Option<i64>,
    },
    Remove { key: String },
    /// Remove every stored value in the app namespace
    Clear,
}

/// Loads the config named on the command line, or the default one
pub fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Runs a parsed command and returns its output.
///
/// # Arguments
/// * `cli` - Parsed command-line arguments
/// * `config` - Loaded configuration, used for defaults the flags leave open
///
/// # Returns
/// The text to print, empty for commands that only have side effects.
pub fn execute(cli: &Cli, config: &Config) -> Result<String, CliError> {
    match &cli.command {
        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
            precision,
        } => {
            let from = Coordinate::new(*lat1, *lon1);
            let to = Coordinate::new(*lat2, *lon2);
            let meters = distance(from, to);
            let heading = bearing(from, to);
            Ok(format!(
                "{} {:.1}° {}",
                format_distance(meters, precision.unwrap_or(config.distance_precision)),
                heading,
                direction_name(heading)
            ))
        }
        Command::FormatTime { seconds, millis } => Ok(format_time(*seconds, *millis)),
        Command::FormatSpeed { kmh, unit } => Ok(format_speed(*kmh, unit.unwrap_or(config.speed_unit))),
        Command::Store(command) => {
            let storage = open_storage(cli, config)?;
            execute_store(&storage, command)
        }
        Command::Device {
            user_agent,
            platform,
        } => {
            let capabilities = Capabilities::headless(HostEnvironment {
                user_agent: user_agent.clone(),
                platform: platform.clone(),
                ..HostEnvironment::default()
            });
            Ok(serde_json::to_string_pretty(&capabilities.device_info())?)
        }
        Command::Shortcut { url } => {
            let url = Url::parse(url).map_err(|_| CliError::InvalidUrl(url.clone()))?;
            Ok(match ShortcutAction::from_url(&url) {
                Some(action) => format!("{} after {}ms", action.name(), action.delay().as_millis()),
                None => "none".to_string(),
            })
        }
    }
}

fn open_storage(cli: &Cli, config: &Config) -> Result<Storage, CliError> {
    let backend = match &cli.storage_dir {
        Some(dir) => FileBackend::with_dir(dir.clone()),
        None => config.storage_backend().ok_or(CliError::NoStorageDir)?,
    };
    Ok(Storage::new(Arc::new(backend)))
}

fn execute_store(storage: &Storage, command: &StoreCommand) -> Result<String, CliError> {
    match command {
        StoreCommand::Get { key } => {
            let value = storage.get(key, serde_json::Value::Null);
            Ok(serde_json::to_string(&value)?)
        }
        StoreCommand::Set {
            key,
            value,
            ttl_secs,
        } => {
            let parsed: serde_json::Value = serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.clone()));
            let stored = match ttl_secs {
                Some(secs) => {
                    let ttl = chrono::Duration::try_seconds(*secs).ok_or(CliError::InvalidTtl(*secs))?;
                    storage.set_with_ttl(key, &parsed, ttl)
                }
                None => storage.set(key, &parsed, None),
            };
            if !stored {
                return Err(CliError::StoreFailed(key.clone()));
            }
            Ok(String::new())
        }
        StoreCommand::Remove { key } => {
            if !storage.remove(key) {
                return Err(CliError::RemoveFailed(key.clone()));
            }
            Ok(String::new())
        }
        StoreCommand::Clear => {
            if !storage.clear() {
                return Err(CliError::ClearFailed);
            }
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(args: &[&str]) -> Result<String, CliError> {
        let cli = Cli::parse_from(args);
        execute(&cli, &Config::default())
    }

    #[test]
    fn test_distance_command() {
        let output = run(&["edsalert", "distance", "0", "0", "1", "0"]).unwrap();
        assert_eq!(output, "111km 0.0° Kuzey");
    }

    #[test]
    fn test_distance_accepts_negative_coordinates() {
        let output = run(&["edsalert", "distance", "-33.0", "151.0", "-33.0", "151.01"]).unwrap();
        assert!(output.ends_with("Doğu"), "got {}", output);
        assert!(output.starts_with("933m"), "got {}", output);
    }

    #[test]
    fn test_distance_precision_flag() {
        let output = run(&["edsalert", "distance", "0", "0", "0.01", "0", "--precision", "3"]).unwrap();
        assert!(output.starts_with("1.112km"), "got {}", output);
    }

    #[test]
    fn test_format_time_command() {
        assert_eq!(run(&["edsalert", "format-time", "3661"]).unwrap(), "01:01:01");
        assert_eq!(run(&["edsalert", "format-time", "65", "--millis"]).unwrap(), "01:05.000");
    }

    #[test]
    fn test_format_speed_command() {
        assert_eq!(run(&["edsalert", "format-speed", "90"]).unwrap(), "90 km/h");
        assert_eq!(run(&["edsalert", "format-speed", "90", "--unit", "ms"]).unwrap(), "25.0 m/s");
    }

    #[test]
    fn test_format_speed_uses_configured_unit() {
        let cli = Cli::parse_from(["edsalert", "format-speed", "100"]);
        let config = Config {
            speed_unit: SpeedUnit::Mph,
            ..Config::default()
        };
        assert_eq!(execute(&cli, &config).unwrap(), "62 mph");
    }

    #[test]
    fn test_invalid_unit_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["edsalert", "format-speed", "90", "--unit", "knots"]).is_err());
    }

    #[test]
    fn test_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_str().unwrap();

        run(&["edsalert", "--storage-dir", dir, "store", "set", "limit", "42"]).unwrap();
        run(&["edsalert", "--storage-dir", dir, "store", "set", "city", "Ankara"]).unwrap();

        assert_eq!(run(&["edsalert", "--storage-dir", dir, "store", "get", "limit"]).unwrap(), "42");
        assert_eq!(
            run(&["edsalert", "--storage-dir", dir, "store", "get", "city"]).unwrap(),
            "\"Ankara\""
        );

        run(&["edsalert", "--storage-dir", dir, "store", "clear"]).unwrap();
        assert_eq!(run(&["edsalert", "--storage-dir", dir, "store", "get", "limit"]).unwrap(), "null");
    }

    #[test]
    fn test_store_expired_value_reads_null() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_str().unwrap();

        run(&["edsalert", "--storage-dir", dir, "store", "set", "k", "1", "--ttl-secs", "-5"]).unwrap();

        assert_eq!(run(&["edsalert", "--storage-dir", dir, "store", "get", "k"]).unwrap(), "null");
        assert!(!temp_dir.path().join("eds_k.json").exists());
    }

    #[test]
    fn test_store_huge_ttl_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_str().unwrap();

        let max = i64::MAX.to_string();
        let result = run(&["edsalert", "--storage-dir", dir, "store", "set", "k", "1", "--ttl-secs", &max]);
        assert!(matches!(result, Err(CliError::InvalidTtl(i64::MAX))));

        // Representable as a duration, but past the last representable date
        let result = run(&["edsalert", "--storage-dir", dir, "store", "set", "k", "1", "--ttl-secs", "9000000000000"]);
        assert!(matches!(result, Err(CliError::StoreFailed(_))));

        assert!(!temp_dir.path().join("eds_k.json").exists());
    }

    #[test]
    fn test_store_remove_missing_key_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_str().unwrap();

        assert_eq!(run(&["edsalert", "--storage-dir", dir, "store", "remove", "nothing"]).unwrap(), "");
    }

    #[test]
    fn test_store_remove_failure_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let dir = blocker.join("store");

        let result = run(&["edsalert", "--storage-dir", dir.to_str().unwrap(), "store", "remove", "k"]);
        assert!(matches!(result, Err(CliError::RemoveFailed(_))));
    }

    #[test]
    fn test_device_command_outputs_json() {
        let output = run(&["edsalert", "device", "--user-agent", "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)"]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["isIOS"], true);
        assert_eq!(json["isMobile"], true);
    }

    #[test]
    fn test_shortcut_command() {
        assert_eq!(
            run(&["edsalert", "shortcut", "https://eds.app/?action=start-tracking"]).unwrap(),
            "start-tracking after 2000ms"
        );
        assert_eq!(run(&["edsalert", "shortcut", "https://eds.app/"]).unwrap(), "none");
        assert!(matches!(
            run(&["edsalert", "shortcut", "not a url"]),
            Err(CliError::InvalidUrl(_))
        ));
    }
}
