//! Server configuration module
//!
//! Provides the configuration type for the canvas server. Values come from
//! defaults, an optional TOML file and environment overrides (see
//! `backend::server::config`).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default port for the HTTP and realtime listener
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening port
    pub port: u16,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Edge length of a square chunk in pixels
    pub chunk_size: u32,
    /// Cooldown window between accepted edits of one identity
    pub cooldown_secs: u64,
    /// Lifetime of a page-load address binding
    pub binding_ttl_secs: u64,
    /// How often expired bindings and cooldowns are swept
    pub binding_sweep_secs: u64,
    /// Per-session backlog of broadcast updates
    pub broadcast_capacity: usize,
    /// Pending edits buffered in front of the writer
    pub edit_queue_capacity: usize,
    /// Accepted edits buffered in front of the audit log and user store
    pub journal_capacity: usize,
    /// sqlx connection string for the user store
    pub database_url: String,
    /// Directory for `pixYYYY-MM-DD.hist` audit files
    pub audit_dir: PathBuf,
    /// Directory for canvas snapshots
    pub cache_dir: PathBuf,
    /// Directory mounted under `/static`
    pub static_dir: PathBuf,
    /// Interval between `latest.png` saves
    pub snapshot_interval_secs: u64,
    /// Interval between dated backups
    pub backup_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            width: 1000,
            height: 1000,
            chunk_size: 5,
            cooldown_secs: 5 * 60,
            binding_ttl_secs: 30,
            binding_sweep_secs: 60,
            broadcast_capacity: 4096,
            edit_queue_capacity: 1024,
            journal_capacity: 8192,
            database_url: "sqlite::memory:".to_string(),
            audit_dir: PathBuf::from("./logs"),
            cache_dir: PathBuf::from("./cache"),
            static_dir: PathBuf::from("./public"),
            snapshot_interval_secs: 5 * 60,
            backup_interval_secs: 30 * 60,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "width/height",
                reason: "canvas dimensions must be positive".to_string(),
            });
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chunk_size",
                reason: "chunk size must be positive".to_string(),
            });
        }
        if self.broadcast_capacity == 0 || self.edit_queue_capacity == 0 || self.journal_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "broadcast_capacity/edit_queue_capacity/journal_capacity",
                reason: "channel capacities must be positive".to_string(),
            });
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("database_url"));
        }
        Ok(())
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn binding_ttl(&self) -> Duration {
        Duration::from_secs(self.binding_ttl_secs)
    }

    pub fn binding_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.binding_sweep_secs.max(1))
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot_interval_secs.max(1))
    }

    pub fn backup_interval(&self) -> Duration {
        Duration::from_secs(self.backup_interval_secs.max(1))
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the canvas dimensions
    pub fn canvas(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn chunk_size(mut self, chunk_size: u32) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    pub fn cooldown_secs(mut self, secs: u64) -> Self {
        self.config.cooldown_secs = secs;
        self
    }

    pub fn binding_ttl_secs(mut self, secs: u64) -> Self {
        self.config.binding_ttl_secs = secs;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    pub fn audit_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.audit_dir = dir.into();
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.static_dir = dir.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("failed to read configuration file {path}: {reason}")]
    Io { path: String, reason: String },
}
