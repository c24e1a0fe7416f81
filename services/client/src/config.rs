//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development; it is also where the credential token
//! lives between runs (the only durable client-side state).

use std::time::Duration;

use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the portal API, without a trailing slash.
    pub api_base_url: String,
    /// The credential token from the last login, if one is configured.
    pub portal_token: Option<String>,
    pub log_level: Level,
    /// How often a mounted guard re-validates the session.
    pub guard_interval: Duration,
    pub request_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_base_url = std::env::var("PORTAL_API_URL")
            .map_err(|_| ConfigError::MissingVar("PORTAL_API_URL".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let portal_token = std::env::var("PORTAL_TOKEN").ok();

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let guard_interval = parse_seconds("GUARD_INTERVAL_SECS", 60)?;
        let request_timeout = parse_seconds("REQUEST_TIMEOUT_SECS", 10)?;

        Ok(Self {
            api_base_url,
            portal_token,
            log_level,
            guard_interval,
            request_timeout,
        })
    }
}

/// Reads an optional whole-seconds duration variable with a default.
fn parse_seconds(name: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match std::env::var(name) {
        Err(_) => Ok(Duration::from_secs(default_secs)),
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| {
                ConfigError::InvalidValue(
                    name.to_string(),
                    format!("'{}' is not a whole number of seconds", raw),
                )
            }),
    }
}
