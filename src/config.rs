//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! The loaded [`Config`] is passed explicitly into the store, loader and API
//! constructors; nothing here is global.

use crate::report::VisibleHours;
use crate::store::EventWindow;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Placeholder keys shipped in the credentials template
const PLACEHOLDER_KEYS: [&str; 2] = ["PUBLIC_KEY_HERE", "PRIVATE_KEY_HERE"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub event: EventConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file holding the dataset
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

fn default_database() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("event-tracker").join("events.db"))
        .unwrap_or_else(|| PathBuf::from("events.db"))
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

impl StoreConfig {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.database.clone()
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Largest batch accepted by the create endpoints
    #[serde(default = "default_max_batch_rows")]
    pub max_batch_rows: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_batch_rows() -> usize {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
            max_batch_rows: default_max_batch_rows(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// API authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// TOML file holding `public_key` and `private_key`
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
}

fn default_credentials_file() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("event-tracker").join("credentials.toml"))
        .unwrap_or_else(|| PathBuf::from("credentials.toml"))
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_file: default_credentials_file(),
        }
    }
}

impl AuthConfig {
    /// Read and validate the credentials file
    ///
    /// A missing file, an unreadable file, or placeholder keys are errors.
    pub fn load_credentials(&self) -> Result<Credentials, ConfigError> {
        let path = &self.credentials_file;
        if !path.exists() {
            return Err(ConfigError::MissingCredentials { path: path.clone() });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            error: e.to_string(),
        })?;

        let credentials: Credentials = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            error: e.to_string(),
        })?;

        credentials
            .validate()
            .map_err(|reason| ConfigError::InvalidCredentials {
                path: path.clone(),
                reason,
            })?;

        Ok(credentials)
    }
}

/// API key pair clients must present
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub public_key: String,
    pub private_key: String,
}

impl Credentials {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        for (name, key) in [("public_key", &self.public_key), ("private_key", &self.private_key)] {
            if key.trim().is_empty() {
                return Err(format!("{} is empty", name));
            }
            if PLACEHOLDER_KEYS.contains(&key.trim()) {
                return Err(format!("{} still holds the placeholder value", name));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// The event this dataset tracks
#[derive(Debug, Clone, Deserialize)]
pub struct EventConfig {
    /// Application name shown in the navigation shell
    #[serde(default = "default_event_name")]
    pub name: String,

    /// Calendar date of the event (quoted, "YYYY-MM-DD")
    #[serde(default = "default_event_date")]
    pub date: NaiveDate,

    /// First hour orders may be placed
    #[serde(default = "default_first_hour")]
    pub first_hour: u32,

    /// Last hour orders may be placed (inclusive)
    #[serde(default = "default_last_hour")]
    pub last_hour: u32,

    /// Timeline hides each night from this hour until `first_hour`
    #[serde(default = "default_hide_from_hour")]
    pub hide_from_hour: u32,
}

fn default_event_name() -> String {
    "Event Tracking Demo".to_string()
}

fn default_event_date() -> NaiveDate {
    EventWindow::default().date
}

fn default_first_hour() -> u32 {
    6
}

fn default_last_hour() -> u32 {
    18
}

fn default_hide_from_hour() -> u32 {
    18
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            name: default_event_name(),
            date: default_event_date(),
            first_hour: default_first_hour(),
            last_hour: default_last_hour(),
            hide_from_hour: default_hide_from_hour(),
        }
    }
}

impl EventConfig {
    /// Operating window orders are checked against
    pub fn window(&self) -> EventWindow {
        EventWindow::new(self.date, self.first_hour, self.last_hour)
    }

    /// Hours the shift timeline keeps visible each day
    pub fn visible_hours(&self) -> VisibleHours {
        VisibleHours {
            first_hour: self.first_hour,
            hide_from_hour: self.hide_from_hour,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.last_hour > 23 || self.first_hour > self.last_hour {
            return Err(ConfigError::Invalid(format!(
                "event hours must satisfy first_hour <= last_hour <= 23 (got {}..={})",
                self.first_hour, self.last_hour
            )));
        }
        if self.hide_from_hour > 24 || self.hide_from_hour <= self.first_hour {
            return Err(ConfigError::Invalid(format!(
                "event.hide_from_hour must be after first_hour and at most 24 (got {})",
                self.hide_from_hour
            )));
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for development
    #[default]
    Pretty,
    /// One JSON object per line, for production
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::Invalid(format!(
                "Invalid log format: {}. Use pretty or json",
                s
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the first default location that exists, or the environment
    ///
    /// A config file that exists but cannot be read or parsed is an error,
    /// not a reason to fall back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("event-tracker").join("config.toml")),
            Some(PathBuf::from("/etc/event-tracker/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                return Ok(config);
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Load from an explicit path if given, else from the default locations
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Self::load_default(),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(database) = std::env::var("EVENT_TRACKER_DATABASE") {
            self.store.database = PathBuf::from(database);
        }

        if let Ok(host) = std::env::var("EVENT_TRACKER_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("EVENT_TRACKER_API_PORT") {
            self.api.port = port.parse().map_err(|_| {
                ConfigError::Invalid(format!("EVENT_TRACKER_API_PORT is not a port: {}", port))
            })?;
        }

        if let Ok(credentials) = std::env::var("EVENT_TRACKER_CREDENTIALS") {
            self.auth.credentials_file = PathBuf::from(credentials);
        }

        if let Ok(level) = std::env::var("EVENT_TRACKER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("EVENT_TRACKER_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.event.validate()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Credentials file {path:?} not found; create it with public_key and private_key")]
    MissingCredentials { path: PathBuf },

    #[error("Invalid credentials in {path:?}: {reason}")]
    InvalidCredentials { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Event Tracker Configuration
#
# Environment variables override these settings:
# - EVENT_TRACKER_DATABASE
# - EVENT_TRACKER_API_HOST
# - EVENT_TRACKER_API_PORT
# - EVENT_TRACKER_CREDENTIALS
# - EVENT_TRACKER_LOG_LEVEL
# - EVENT_TRACKER_LOG_FORMAT

[store]
# SQLite file holding the event dataset
database = "events.db"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8080

# Allowed CORS origins (empty = any)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

# Largest batch accepted by the create endpoints
max_batch_rows = 10000

[auth]
# TOML file with public_key and private_key; the API refuses to start without it
credentials_file = "credentials.toml"

[event]
# Name shown in the navigation shell
name = "Event Tracking Demo"

# Event date (quoted)
date = "2017-01-02"

# Orders are accepted from first_hour:00 to last_hour:59
first_hour = 6
last_hour = 18

# Shift timeline hides each night from this hour until first_hour
hide_from_hour = 18

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

/// Generate a credentials file template; the placeholders must be replaced
pub fn generate_credentials_template() -> String {
    format!(
        "# Event Tracker API credentials\npublic_key = \"{}\"\nprivate_key = \"{}\"\n",
        PLACEHOLDER_KEYS[0], PLACEHOLDER_KEYS[1]
    )
}
