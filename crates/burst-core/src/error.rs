//! Error types for burst level inference.
//!
//! Every failure is fatal for the run: there is no partial or degraded
//! output. Each variant carries a stable machine-readable `kind` and maps
//! to an [`ExitCode`] so the CLI can report it without string matching.

use thiserror::Error;

use crate::config::ConfigError;
use crate::exit_codes::ExitCode;

/// Result type alias for burst-core operations.
pub type Result<T> = std::result::Result<T, BurstError>;

/// Unified error type for burst-core.
#[derive(Error, Debug)]
pub enum BurstError {
    /// The timestamp source is missing, unreadable, unparsable, or too
    /// short to form a single interval.
    #[error("malformed input{}: {message}", line_suffix(.line))]
    MalformedInput {
        message: String,
        /// 1-based line number, when the problem is tied to one line.
        line: Option<usize>,
    },

    /// A solver parameter is outside its valid range.
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// An interval is zero or negative, so its exponential log-density is undefined.
    #[error("non-positive interval {value} at index {index} (timestamps must be strictly increasing)")]
    NumericDomain { index: usize, value: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invariant violation inside burst-core (a bug).
    #[error("internal error: {0}")]
    Internal(String),
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl BurstError {
    /// Stable snake_case name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            BurstError::MalformedInput { .. } => "malformed_input",
            BurstError::InvalidParameter { .. } => "invalid_parameter",
            BurstError::NumericDomain { .. } => "numeric_domain",
            BurstError::Config(_) => "config",
            BurstError::Io(_) => "io",
            BurstError::Internal(_) => "internal",
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            BurstError::MalformedInput { .. } => ExitCode::InputError,
            BurstError::Config(ConfigError::IoError { .. }) | BurstError::Io(_) => ExitCode::IoError,
            BurstError::InvalidParameter { .. } | BurstError::Config(_) => ExitCode::ArgsError,
            BurstError::NumericDomain { .. } => ExitCode::DomainError,
            BurstError::Internal(_) => ExitCode::InternalError,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        BurstError::MalformedInput {
            message: message.into(),
            line: None,
        }
    }

    pub(crate) fn malformed_at(line: usize, message: impl Into<String>) -> Self {
        BurstError::MalformedInput {
            message: message.into(),
            line: Some(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_message_includes_line() {
        let err = BurstError::malformed_at(3, "cannot parse \"abc\" as a number");
        assert_eq!(
            err.to_string(),
            "malformed input at line 3: cannot parse \"abc\" as a number"
        );
        let err = BurstError::malformed("need at least 2 timestamps, got 1");
        assert_eq!(
            err.to_string(),
            "malformed input: need at least 2 timestamps, got 1"
        );
    }

    #[test]
    fn exit_codes_by_kind() {
        assert_eq!(
            BurstError::malformed("x").exit_code(),
            ExitCode::InputError
        );
        assert_eq!(
            BurstError::InvalidParameter {
                name: "s",
                value: 1.0,
                reason: "must be greater than 1"
            }
            .exit_code(),
            ExitCode::ArgsError
        );
        assert_eq!(
            BurstError::NumericDomain {
                index: 0,
                value: 0.0
            }
            .exit_code(),
            ExitCode::DomainError
        );
        assert_eq!(
            BurstError::Internal("boom".into()).exit_code(),
            ExitCode::InternalError
        );
        let broken = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(BurstError::from(broken).exit_code(), ExitCode::IoError);
    }

    #[test]
    fn config_errors_are_argument_errors() {
        let err = BurstError::from(ConfigError::NotFound {
            path: "/missing/config.json".into(),
        });
        assert_eq!(err.kind(), "config");
        assert_eq!(err.exit_code(), ExitCode::ArgsError);
        assert!(err.to_string().contains("/missing/config.json"));
    }

    #[test]
    fn kinds_are_snake_case() {
        let err = BurstError::NumericDomain {
            index: 2,
            value: -1.0,
        };
        assert_eq!(err.kind(), "numeric_domain");
        assert!(err.to_string().contains("index 2"));
    }
}
