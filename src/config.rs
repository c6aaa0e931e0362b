//! # Configuration Management

//! This module handles the configuration loading and management for the door panel controller.
//! It leverages the `config` crate to build `Settings` from layered sources:

//! * YAML configuration files (default.yaml plus an optional per-run-mode file such as development.yaml)
//! * Environment variables prefixed with `DOORPANEL`

use serde::Deserialize;
use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use secrecy::Secret;
use log::debug;
use crate::errors::DoorPanelError;

/// The complete set of configuration settings for the door panel controller.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Where the robot controller listens
    pub robot: RobotSettings,
    /// Settings for the local SQLite database holding accounts and order logs
    pub database: DatabaseSettings,
    /// Password hashing parameters
    pub security: SecuritySettings,
    /// Settings for application logging
    pub logging: LoggingSettings,
    /// Control panel behaviour
    pub panel: PanelSettings,
    /// Accounts created at start when missing
    #[serde(default)]
    pub seed_accounts: Vec<SeedAccount>,
}

/// Address and ports of the robot controller
#[derive(Debug, Deserialize, Clone)]
pub struct RobotSettings {
    /// The hostname or IP address of the robot controller
    pub host: String,
    /// Dashboard server port, receives `brake release` / `stop`
    pub control_port: u16,
    /// Script server port, receives complete motion programs
    pub motion_port: u16,
    /// How long to wait for a TCP connection (milliseconds)
    pub connect_timeout_ms: u64,
    /// How long to wait for a payload to be written (milliseconds)
    pub write_timeout_ms: u64,
}

impl RobotSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

/// # Database Settings

/// Location of the SQLite file and the pool size used to reach it
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    /// Path of the SQLite database file, created when missing
    pub path: PathBuf,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// Builds the sqlx connection URL for the database file
    pub fn connection_string(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }
}

/// Parameters for PBKDF2 password hashing
#[derive(Debug, Deserialize, Clone)]
pub struct SecuritySettings {
    /// Length of the random salt in bytes
    pub salt_length: usize,
    /// PBKDF2 iteration count
    pub hash_iterations: u32,
}

/// Holds the configuration settings for application logging
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// The logging level used when `RUST_LOG` is not set (e.g., "info", "debug")
    pub level: String,
    /// The directory path where log files will be stored (optional)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelSettings {
    /// Size selected when an operator logs in
    pub default_door_size: String,
    /// Capacity of the serialized panel command queue
    pub command_queue_depth: usize,
}

/// An account ensured at start
#[derive(Debug, Deserialize, Clone)]
pub struct SeedAccount {
    pub username: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: Secret<String>,
    #[serde(default)]
    pub is_admin: bool,
}


impl Settings {
    /// Loads and constructs the application settings from various configuration sources.
    ///
    /// Sources, in order of precedence (later wins):
    ///
    /// 1. `default.yaml`: Contains default settings for the application (required)
    /// 2. Environment-specific YAML file (e.g., `development.yaml`) based on the `RUN_MODE` environment variable
    /// 3. Environment variables prefixed with `DOORPANEL` (e.g., `DOORPANEL__ROBOT__HOST`)
    ///
    /// The `CONFIG_DIR` environment variable can be used to specify the directory where the YAML configuration files are located (defaults to "src/config").
    pub fn new() -> Result<Self, DoorPanelError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "src/config".into());
        Self::from_dir(Path::new(&config_dir), &run_mode)
    }

    /// Loads settings from an explicit configuration directory and run mode
    pub fn from_dir(config_dir: &Path, run_mode: &str) -> Result<Self, DoorPanelError> {
        debug!("Run Mode: {:?}, Config Dir: {:?}", run_mode, config_dir);

        let s = Config::builder()
            .add_source(File::with_name(&config_dir.join("default").to_string_lossy()))
            .add_source(File::with_name(&config_dir.join(run_mode).to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("DOORPANEL").separator("__"))
            .build()?;

        let mut s: Self = s.try_deserialize::<Settings>()
            .map_err(DoorPanelError::from)?;

        if let Some(ref mut path) = s.logging.path {
            if path.is_relative() {
                *path = env::current_dir()?.join(path.clone());
            }
        }

        s.validate()?;
        Ok(s)
    }

    fn validate(&self) -> Result<(), DoorPanelError> {
        if self.robot.control_port == self.robot.motion_port {
            return Err(DoorPanelError::ConfigError(format!(
                "robot control and motion ports must differ (both {})", self.robot.control_port
            )));
        }
        if self.panel.command_queue_depth == 0 {
            return Err(DoorPanelError::ConfigError("panel.command_queue_depth must be at least 1".to_string()));
        }
        if self.security.hash_iterations == 0 || self.security.salt_length == 0 {
            return Err(DoorPanelError::ConfigError("security.salt_length and security.hash_iterations must be positive".to_string()));
        }
        Ok(())
    }
}

/// Deserializes a plain string from configuration into a `Secret<String>`
fn deserialize_secret<'de, D>(deserializer: D) -> Result<Secret<String>, D::Error>
    where
        D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(Secret::new(value))
}
