use std::time::Duration;

use anyhow::Result;
use config::Config;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub lock: LockConfig,
    pub cleanup: CleanupConfig,
    pub logging: LoggingConfig,
}

/// Retry budget used while draining in-flight operations before a cell is
/// marked for deletion.
#[derive(Debug, Clone, Deserialize)]
pub struct LockConfig {
    pub retry_times: u32,
    pub retry_interval_ms: u64,
}

impl LockConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

/// Retry budget applied per cleanup step by the background worker.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupConfig {
    pub retry_max: u32,
    pub retry_interval_ms: u64,
}

impl CleanupConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("lock.retry_times", 10)?
            .set_default("lock.retry_interval_ms", 100)?
            .set_default("cleanup.retry_max", 5)?
            .set_default("cleanup.retry_interval_ms", 500)?
            .set_default("logging.level", "debug")?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
