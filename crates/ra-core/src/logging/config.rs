//! Logging configuration.
//!
//! Resolved in order, later wins:
//! 1. built-in default (human, info)
//! 2. `RUST_LOG` (its most verbose directive) or `RA_LOG`
//! 3. `RA_LOG_FORMAT`
//! 4. CLI flags (`-v`/`-q`, `--log-format`)

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per event.
    Jsonl,
}

const FORMAT_ALIASES: &[(&str, LogFormat)] = &[
    ("human", LogFormat::Human),
    ("text", LogFormat::Human),
    ("pretty", LogFormat::Human),
    ("jsonl", LogFormat::Jsonl),
    ("json", LogFormat::Jsonl),
];

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        FORMAT_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, format)| *format)
            .ok_or_else(|| format!("unknown log format: {}", s))
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log level filter, most verbose first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, ValueEnum,
)]
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

const LEVEL_ALIASES: &[(&str, LogLevel)] = &[
    ("trace", LogLevel::Trace),
    ("debug", LogLevel::Debug),
    ("info", LogLevel::Info),
    ("warn", LogLevel::Warn),
    ("warning", LogLevel::Warn),
    ("error", LogLevel::Error),
    ("off", LogLevel::Off),
    ("none", LogLevel::Off),
];

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    /// Level requested by `-v` / `-q`; `None` leaves the environment in charge.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        match (quiet, verbose) {
            (true, _) => Some(LogLevel::Error),
            (false, 0) => None,
            (false, 1) => Some(LogLevel::Debug),
            (false, _) => Some(LogLevel::Trace),
        }
    }

    /// Most verbose level named in a `RUST_LOG` directive list such as
    /// `warn,ra_core=debug`.
    fn from_directives(directives: &str) -> Option<Self> {
        directives
            .split(',')
            .filter_map(|d| d.rsplit('=').next())
            .filter_map(|level| level.parse::<LogLevel>().ok())
            .min()
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        LEVEL_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, level)| *level)
            .ok_or_else(|| format!("unknown log level: {}", s))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Timestamps on human lines; JSONL always carries them.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Resolve from the process environment, then apply CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self::resolve(
            var("RA_LOG").as_deref(),
            var("RUST_LOG").as_deref(),
            var("RA_LOG_FORMAT").as_deref(),
        )
        .with_overrides(cli_level, cli_format)
    }

    fn resolve(ra_log: Option<&str>, rust_log: Option<&str>, format: Option<&str>) -> Self {
        let env_level = match ra_log {
            Some(val) => val.parse::<LogLevel>().ok(),
            None => rust_log.and_then(LogLevel::from_directives),
        };
        let defaults = LogConfig::default();
        LogConfig {
            level: env_level.unwrap_or(defaults.level),
            format: format
                .and_then(|f| f.parse::<LogFormat>().ok())
                .unwrap_or(defaults.format),
            ..defaults
        }
    }

    /// Apply CLI flags, which take final precedence.
    pub fn with_overrides(mut self, level: Option<LogLevel>, format: Option<LogFormat>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert_eq!(" text ".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("none".parse::<LogLevel>().unwrap(), LogLevel::Off);
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(LogLevel::from_verbosity(0, false), None);
        assert_eq!(LogLevel::from_verbosity(1, false), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_verbosity(3, false), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_verbosity(2, true), Some(LogLevel::Error));
    }

    #[test]
    fn test_rust_log_directives() {
        assert_eq!(
            LogLevel::from_directives("warn,ra_core=debug"),
            Some(LogLevel::Debug)
        );
        assert_eq!(LogLevel::from_directives("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_directives("ra_core::web"), None);
    }

    #[test]
    fn test_ra_log_beats_rust_log() {
        let config = LogConfig::resolve(Some("warn"), Some("trace"), None);
        assert_eq!(config.level, LogLevel::Warn);

        let config = LogConfig::resolve(None, Some("ra_core=debug"), None);
        assert_eq!(config.level, LogLevel::Debug);

        let config = LogConfig::resolve(Some("bogus"), None, None);
        assert_eq!(config.level, LogLevel::Info);
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = LogConfig::resolve(Some("error"), None, Some("jsonl"))
            .with_overrides(Some(LogLevel::Trace), Some(LogFormat::Human));
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.format, LogFormat::Human);

        let config = LogConfig::resolve(None, None, Some("json")).with_overrides(None, None);
        assert_eq!(config.format, LogFormat::Jsonl);
        assert!(config.timestamps);
    }
}
