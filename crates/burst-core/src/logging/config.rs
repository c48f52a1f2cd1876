//! Logging configuration.
//!
//! Supports configuration via:
//! - Environment variables (BURST_LOG, RUST_LOG, BURST_LOG_FORMAT)
//! - CLI flags (-v, -q, --debug, --log-format)

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" | "structured" => Ok(LogFormat::Jsonl),
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

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug information, including trellis trace records.
    Debug,
    /// Run lifecycle events (default).
    #[default]
    Info,
    Warn,
    Error,
    /// Completely silent.
    Off,
}

impl LogLevel {
    /// Level implied by `-v` / `-q` counts.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        if quiet {
            return Some(LogLevel::Error);
        }
        match verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
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
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LogLevel::Off => tracing_subscriber::filter::LevelFilter::OFF,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Minimum log level.
    pub level: LogLevel,
    /// Whether to include timestamps in human output.
    pub timestamps: bool,
    /// Raw `RUST_LOG` directives. Only kept while neither `BURST_LOG` nor a
    /// CLI level has pinned `level`; any explicit level clears them.
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
    /// Create config from environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_vars(
            std::env::var("BURST_LOG").ok().as_deref(),
            std::env::var("RUST_LOG").ok().as_deref(),
            std::env::var("BURST_LOG_FORMAT").ok().as_deref(),
            cli_level,
            cli_format,
        )
    }

    fn from_vars(
        burst_log: Option<&str>,
        rust_log: Option<&str>,
        log_format: Option<&str>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        // BURST_LOG takes precedence over RUST_LOG
        if let Some(val) = burst_log {
            if let Ok(level) = val.parse::<LogLevel>() {
                config.level = level;
            }
        } else if let Some(val) = rust_log {
            config.directives = Some(val.to_string());
            if val.contains("trace") {
                config.level = LogLevel::Trace;
            } else if val.contains("debug") {
                config.level = LogLevel::Debug;
            } else if val.contains("warn") {
                config.level = LogLevel::Warn;
            } else if val.contains("error") {
                config.level = LogLevel::Error;
            }
        }

        if let Some(val) = log_format {
            if let Ok(format) = val.parse::<LogFormat>() {
                config.format = format;
            }
        }

        // CLI overrides take final precedence
        if let Some(level) = cli_level {
            config = config.with_level(level);
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
        self.directives = None;
        self
    }

    /// Lower the level to at least `level` (never raises it).
    pub fn at_least(self, level: LogLevel) -> Self {
        let level = self.level.min(level);
        self.with_level(level)
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}
