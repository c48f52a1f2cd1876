//! Exit codes for the burst-core CLI.
//!
//! Exit codes communicate operation outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/input errors (recoverable by fixing arguments or input)
//! - 20-29: Internal errors (bugs, should be reported)

/// Exit codes for burst-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Segments computed and printed.
    Clean = 0,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid parameters or configuration file
    ArgsError = 10,

    /// Timestamp file missing, unreadable or malformed
    InputError = 11,

    /// Non-positive interval between consecutive timestamps
    DomainError = 12,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error while writing output
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Check if this exit code is a user/input error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        let code = self as i32;
        (10..20).contains(&code)
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Check if this exit code indicates any error.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::DomainError => "ERR_DOMAIN",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
