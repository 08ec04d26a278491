//! Logging configuration.
//!
//! Sources, lowest to highest precedence: defaults, `RUST_LOG`, `LDAR_LOG`,
//! `LDAR_LOG_FORMAT`, then CLI flags.

use serde::{Deserialize, Serialize};

pub const ENV_LOG_LEVEL: &str = "LDAR_LOG";
pub const ENV_LOG_FORMAT: &str = "LDAR_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console lines.
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Minimum level emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// One step more verbose, saturating at trace.
    pub fn louder(self) -> Self {
        match self {
            LogLevel::Off => LogLevel::Error,
            LogLevel::Error => LogLevel::Warn,
            LogLevel::Warn => LogLevel::Info,
            LogLevel::Info => LogLevel::Debug,
            LogLevel::Debug | LogLevel::Trace => LogLevel::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        use tracing_subscriber::filter::LevelFilter;
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Include timestamps in human output.
    pub timestamps: bool,
    /// Raw `RUST_LOG` directives, when set and no `LDAR_LOG` overrides them.
    pub directives: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            timestamps: true,
            directives: None,
        }
    }
}

impl LogConfig {
    /// Build from the process environment plus CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_vars(
            |key| std::env::var(key).ok(),
            cli_level,
            cli_format,
        )
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_vars(
        var: impl Fn(&str) -> Option<String>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        if let Some(level) = var(ENV_LOG_LEVEL).and_then(|v| v.parse::<LogLevel>().ok()) {
            config.level = level;
        } else if let Some(directives) = var("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            config.directives = Some(directives);
        }

        if let Some(format) = var(ENV_LOG_FORMAT).and_then(|v| v.parse::<LogFormat>().ok()) {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config.level = level;
            config.directives = None;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Filter directives for the workspace crates.
    pub fn filter_directives(&self) -> String {
        match &self.directives {
            Some(d) => d.clone(),
            None => format!(
                "ldar_core={level},ldar_config={level}",
                level = self.level
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_level_parse_and_display() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("quiet".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn test_louder_saturates() {
        assert_eq!(LogLevel::Info.louder(), LogLevel::Debug);
        assert_eq!(LogLevel::Trace.louder(), LogLevel::Trace);
        assert_eq!(LogLevel::Off.louder(), LogLevel::Error);
    }

    #[test]
    fn test_ldar_log_beats_rust_log() {
        let config = LogConfig::from_vars(
            vars(&[("LDAR_LOG", "debug"), ("RUST_LOG", "trace")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Debug);
        assert!(config.directives.is_none());
        assert_eq!(config.filter_directives(), "ldar_core=debug,ldar_config=debug");
    }

    #[test]
    fn test_rust_log_passes_through() {
        let config = LogConfig::from_vars(vars(&[("RUST_LOG", "ldar_core=trace")]), None, None);
        assert_eq!(config.filter_directives(), "ldar_core=trace");
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = LogConfig::from_vars(
            vars(&[("LDAR_LOG_FORMAT", "jsonl"), ("RUST_LOG", "trace")]),
            Some(LogLevel::Warn),
            Some(LogFormat::Human),
        );
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.filter_directives(), "ldar_core=warn,ldar_config=warn");
    }
}
