/**
 * Server Configuration
 *
 * This module loads the `ServerConfig` and connects the user store.
 *
 * # Configuration Sources
 *
 * In increasing precedence:
 * 1. Built-in defaults (`ServerConfig::default`)
 * 2. A TOML file named by `PIXELBOARD_CONFIG`, if set
 * 3. Environment variables (`SERVER_PORT`, `DATABASE_URL`, `CANVAS_WIDTH`,
 *    `CANVAS_HEIGHT`, `CHUNK_SIZE`, `COOLDOWN_SECS`)
 *
 * `.env` is loaded by the binary before any of this runs.
 *
 * # User Store
 *
 * The user store is SQLite through `sqlx`. Unlike the canvas itself it is
 * required: a server that cannot resolve identities cannot accept edits,
 * so connection and migration failures abort startup.
 */

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::backend::error::BackendError;
use crate::shared::{ConfigError, ServerConfig};

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_PATH_VAR: &str = "PIXELBOARD_CONFIG";

/// Load configuration from defaults, the optional TOML file and the process
/// environment
///
/// # Example
///
/// ```rust,no_run
/// use pixelboard::backend::server::config::load_config;
///
/// let config = load_config().expect("valid configuration");
/// println!("canvas is {}x{}", config.width, config.height);
/// ```
pub fn load_config() -> Result<ServerConfig, ConfigError> {
    let base = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => {
            tracing::info!("[Config] Reading {}", path);
            let source = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            ServerConfig::from_toml_str(&source)?
        }
        Err(_) => ServerConfig::default(),
    };

    let config = apply_env_overrides(base, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Apply environment overrides read through `lookup`
pub fn apply_env_overrides<F>(mut config: ServerConfig, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("SERVER_PORT") {
        config.port = parse_var("SERVER_PORT", &port)?;
    }
    if let Some(url) = lookup("DATABASE_URL") {
        config.database_url = url;
    }
    if let Some(width) = lookup("CANVAS_WIDTH") {
        config.width = parse_var("CANVAS_WIDTH", &width)?;
    }
    if let Some(height) = lookup("CANVAS_HEIGHT") {
        config.height = parse_var("CANVAS_HEIGHT", &height)?;
    }
    if let Some(chunk_size) = lookup("CHUNK_SIZE") {
        config.chunk_size = parse_var("CHUNK_SIZE", &chunk_size)?;
    }
    if let Some(cooldown) = lookup("COOLDOWN_SECS") {
        config.cooldown_secs = parse_var("COOLDOWN_SECS", &cooldown)?;
    }
    Ok(config)
}

fn parse_var<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        reason: format!("{:?}: {}", value, e),
    })
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Connect to the user store and run migrations
///
/// In-memory databases live exactly as long as their connection, so they
/// get a single connection that is never recycled.
pub async fn connect_user_store(database_url: &str) -> Result<SqlitePool, BackendError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if is_memory_url(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(8)
    };

    tracing::info!("[Store] Connecting to {}", database_url);
    let pool = pool_options.connect_with(options).await?;

    tracing::info!("[Store] Running migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("[Store] User store ready");

    Ok(pool)
}
