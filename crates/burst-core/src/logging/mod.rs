//! Structured logging for burst-core.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for pipelines
//!
//! # Usage
//!
//! ```ignore
//! use burst_core::logging::{init_logging, LogConfig, LogContext, Stage, event_names};
//!
//! let config = LogConfig::from_env(None, None);
//! init_logging(&config);
//!
//! let ctx = LogContext::new(generate_run_id());
//! log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "starting");
//! ```
//!
//! stdout is reserved for the segment report; all log output goes to stderr.
//! Event targets are the dotted names in [`event_names`], so a JSONL line's
//! `event` key is the target.

pub mod config;
pub mod events;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Level, LogContext, Stage};
pub use layer::JsonlLayer;

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the event filter: the `RUST_LOG` directives carried by `config`
/// when no explicit level replaced them, otherwise the configured level for
/// every target.
fn build_filter(config: &LogConfig) -> EnvFilter {
    config
        .directives
        .as_deref()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(config.level.to_string()))
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs. A second call
/// is ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = build_filter(config);

    // A subscriber may already be installed (tests, repeated calls).
    let _ = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(JsonlLayer::stderr())
            .try_init(),
    };
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    // First 12 hex chars
    format!("run-{}", &uuid.simple().to_string()[..12])
}

/// Structured event logging with context.
///
/// ```ignore
/// log_event!(ctx, INFO, event_names::SOLVE_FINISHED, Stage::Solve, "solved",
///     intervals = 42, max_level = 5);
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, INFO, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::info!(
            target: $event,
            run_id = %$ctx.run_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    ($ctx:expr, DEBUG, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::debug!(
            target: $event,
            run_id = %$ctx.run_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    ($ctx:expr, WARN, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::warn!(
            target: $event,
            run_id = %$ctx.run_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    ($ctx:expr, ERROR, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::error!(
            target: $event,
            run_id = %$ctx.run_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
}
