//! Structured event definitions for logging.
//!
//! Every run-level event carries the invocation's `run_id` and the
//! pipeline stage it belongs to.

use serde::{Deserialize, Serialize};

/// Log levels for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Pipeline stages of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading timestamps and deriving intervals.
    Parse,
    /// Trellis fill and backtrace.
    Solve,
    /// Segment rendering.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Parse => "parse",
            Stage::Solve => "solve",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Parse stage
    pub const INPUT_PARSED: &str = "input.parsed";

    // Solve stage
    pub const SOLVE_STARTED: &str = "solve.started";
    pub const TRELLIS_COLUMN: &str = "trellis.column";
    pub const TRELLIS_CELL: &str = "trellis.cell";
    pub const SOLVE_FINISHED: &str = "solve.finished";

    // Report stage
    pub const REPORT_WRITTEN: &str = "report.written";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const RUN_FAILED: &str = "run.failed";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Per-invocation correlation context, stamped on every event by
/// [`log_event!`](crate::log_event).
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
        }
    }
}
