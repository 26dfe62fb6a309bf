use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::{Model, Provider};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Invalid timing: delays must strictly increase (thinking {0}ms, interim {1}ms, completion {2}ms)"
    )]
    InvalidTiming(u64, u64, u64),

    #[error("Invalid model: {model} is not offered by {provider}")]
    ModelNotOffered { provider: Provider, model: Model },

    #[error("Invalid channel_capacity: {0}. Must be at least 1")]
    InvalidChannelCapacity(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .sheetwright/config.yaml (project config)
    /// 3. .sheetwright/local.yaml (project local overrides, optional)
    /// 4. Environment variables (SHEETWRIGHT_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".sheetwright/config.yaml"))
            .merge(Yaml::file(".sheetwright/local.yaml"))
            .merge(Env::prefixed("SHEETWRIGHT_").split("__"))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let timing = &config.timing;
        if timing.thinking_delay_ms >= timing.interim_delay_ms
            || timing.interim_delay_ms >= timing.completion_delay_ms
        {
            return Err(ConfigError::InvalidTiming(
                timing.thinking_delay_ms,
                timing.interim_delay_ms,
                timing.completion_delay_ms,
            ));
        }

        if !config.governance.is_consistent() {
            return Err(ConfigError::ModelNotOffered {
                provider: config.governance.provider,
                model: config.governance.model,
            });
        }

        if config.event_bus.channel_capacity == 0 {
            return Err(ConfigError::InvalidChannelCapacity(
                config.event_bus.channel_capacity,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}
