use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::settings::GovernanceSettings;
use super::turn::AssistMode;

/// Main configuration structure for sheetwright
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Mode new sessions start in
    #[serde(default)]
    pub default_mode: AssistMode,

    /// Provider, model and safety switches
    #[serde(default)]
    pub governance: GovernanceSettings,

    /// Timer delays standing in for backend completion signals
    #[serde(default)]
    pub timing: TimingConfig,

    /// Event fan-out configuration
    #[serde(default)]
    pub event_bus: EventBusConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Delays, measured from submit, at which a scheduled turn advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimingConfig {
    /// submitted -> thinking
    #[serde(default = "default_thinking_delay_ms")]
    pub thinking_delay_ms: u64,

    /// thinking -> summarizing
    #[serde(default = "default_interim_delay_ms")]
    pub interim_delay_ms: u64,

    /// summarizing -> complete
    #[serde(default = "default_completion_delay_ms")]
    pub completion_delay_ms: u64,
}

const fn default_thinking_delay_ms() -> u64 {
    400
}

const fn default_interim_delay_ms() -> u64 {
    2000
}

const fn default_completion_delay_ms() -> u64 {
    4000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: default_thinking_delay_ms(),
            interim_delay_ms: default_interim_delay_ms(),
            completion_delay_ms: default_completion_delay_ms(),
        }
    }
}

/// Event bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventBusConfig {
    /// Broadcast channel capacity
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

const fn default_channel_capacity() -> usize {
    256
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
