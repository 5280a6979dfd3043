//! Exit codes for the calceff CLI.
//!
//! Exit codes communicate the batch outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0-9: Operational outcomes (the batch ran)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, or output that could not be written)

use ce_math::ErrorKind;

/// Exit codes for calceff runs.
///
/// These codes are a stable contract for scripts wrapping the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Operational Outcomes (0-9)
    // ========================================================================
    /// Every row produced an interval
    Clean = 0,

    /// Partial failure: some rows failed, the rest were reported
    PartialFail = 3,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments (including an out-of-range confidence level)
    ArgsError = 10,

    /// Data file missing, unreadable or malformed
    DataError = 11,

    /// Config file missing, malformed or invalid
    ConfigError = 12,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error writing results
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

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        let code = self as i32;
        (10..20).contains(&code)
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::PartialFail => "ERR_PARTIAL",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::DataError => "ERR_DATA",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a computation error that aborts the whole run.
    pub fn for_error_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InputValidation => ExitCode::ArgsError,
            ErrorKind::Convergence | ErrorKind::Domain => ExitCode::InternalError,
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
