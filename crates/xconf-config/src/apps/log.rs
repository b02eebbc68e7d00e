//! Runtime logging module (`log`).

use serde::{Deserialize, Serialize};
use xconf_core::app::{LogApp, LogLevel, LogTarget};
use xconf_core::defaults::{DEFAULT_LOG_LEVEL, LOG_PATH_NONE};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogConfig {
    pub access: String,
    pub error: String,
    #[serde(rename = "loglevel")]
    pub log_level: String,
    pub dns_log: bool,
}

fn target(path: &str) -> LogTarget {
    match path {
        "" => LogTarget::Console,
        LOG_PATH_NONE => LogTarget::None,
        file => LogTarget::File(file.to_string()),
    }
}

fn parse_level(level: &str) -> Result<LogLevel, ConfigError> {
    let level = if level.is_empty() { DEFAULT_LOG_LEVEL } else { level };
    Ok(match level.to_ascii_lowercase().as_str() {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warning" => LogLevel::Warning,
        "error" => LogLevel::Error,
        "none" => LogLevel::None,
        _ => return Err(ConfigError::unknown("log level", level)),
    })
}

impl LogConfig {
    pub fn build(&self) -> Result<LogApp, ConfigError> {
        Ok(LogApp {
            error_log: target(&self.error),
            error_level: parse_level(&self.log_level)?,
            access_log: target(&self.access),
            dns_log: self.dns_log,
        })
    }
}

/// Log module used when the document has no `log` section.
pub fn default_log() -> LogApp {
    LogApp {
        error_log: LogTarget::Console,
        error_level: LogLevel::Warning,
        access_log: LogTarget::Console,
        dns_log: false,
    }
}
