//! Application Configuration Module
//!
//! Loads the client's settings from environment variables (and a `.env`
//! file, if present) into a single struct handed to the runtime at startup.

use reqwest::Url;
use std::env;
use std::time::Duration;
use storyteller_core::generation::DEFAULT_BASE_URL;
use storyteller_core::orchestrator::DEFAULT_TIMEOUT;
use tracing::Level;

/// Program used for text-to-speech when none is configured.
pub const DEFAULT_SPEECH_COMMAND: &str = "espeak";

/// Holds all configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub speech_command: String,
    pub log_level: Level,
}

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// *   `STORYTELLER_API_URL`: (Optional) Base URL of the generation service. Defaults to `http://127.0.0.1:8000/api`.
    /// *   `STORYTELLER_TIMEOUT_SECS`: (Optional) Seconds to wait for a generation. Defaults to 30.
    /// *   `STORYTELLER_SPEECH_COMMAND`: (Optional) Text-to-speech program. Defaults to "espeak".
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file. This is useful for local development and is ignored if not present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("STORYTELLER_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        validate_url(&api_url)?;

        let timeout = match lookup("STORYTELLER_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        let speech_command = lookup("STORYTELLER_SPEECH_COMMAND")
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SPEECH_COMMAND.to_string());

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_url,
            timeout,
            speech_command,
            log_level,
        })
    }
}

pub fn validate_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidValue("STORYTELLER_API_URL".to_string(), e.to_string())
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue(
            "STORYTELLER_API_URL".to_string(),
            format!("unsupported scheme '{}'", other),
        )),
    }
}

pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw.trim().parse::<u64>().map_err(|_| invalid_timeout(raw))?;
    timeout_from_secs(secs)
}

/// The timeout must be a positive whole number of seconds.
pub fn timeout_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(invalid_timeout(&secs.to_string()));
    }
    Ok(Duration::from_secs(secs))
}

fn invalid_timeout(raw: &str) -> ConfigError {
    ConfigError::InvalidValue(
        "STORYTELLER_TIMEOUT_SECS".to_string(),
        format!("'{}' is not a positive number of seconds", raw),
    )
}
