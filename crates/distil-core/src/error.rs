//! Error types and exit codes for distil
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (missing journal, lock contention, existing post)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Exit codes for the distil CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing journal, lock contention (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during distil operations
#[derive(Error, Debug)]
pub enum DistilError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("unknown confidence level: {value} (expected: low, medium, or high)")]
    InvalidConfidence { value: String },

    #[error("invalid date: {value} (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    // Data errors (exit code 3)
    #[error("journal not found: {path:?}")]
    JournalNotFound { path: PathBuf },

    #[error("post already exists: {path:?}")]
    PostExists { path: PathBuf },

    #[error("ledger lock timed out after {waited:?} at {path:?}")]
    LockTimeout { path: PathBuf, waited: Duration },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedWrite {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl DistilError {
    /// Create an error for a failed write operation with context
    pub fn write_failure(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        DistilError::FailedWrite {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            DistilError::UsageError(_)
            | DistilError::InvalidConfidence { .. }
            | DistilError::InvalidDate { .. } => ExitCode::Usage,

            DistilError::JournalNotFound { .. }
            | DistilError::PostExists { .. }
            | DistilError::LockTimeout { .. } => ExitCode::Data,

            DistilError::Io(_)
            | DistilError::Json(_)
            | DistilError::FailedWrite { .. }
            | DistilError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            DistilError::UsageError(_) => "usage_error",
            DistilError::InvalidConfidence { .. } => "invalid_confidence",
            DistilError::InvalidDate { .. } => "invalid_date",
            DistilError::JournalNotFound { .. } => "journal_not_found",
            DistilError::PostExists { .. } => "post_exists",
            DistilError::LockTimeout { .. } => "lock_timeout",
            DistilError::Io(_) => "io_error",
            DistilError::Json(_) => "json_error",
            DistilError::FailedWrite { .. } => "failed_write",
            DistilError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for distil operations
pub type Result<T> = std::result::Result<T, DistilError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            DistilError::UsageError("bad".into()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            DistilError::JournalNotFound {
                path: PathBuf::from("/x")
            }
            .exit_code(),
            ExitCode::Data
        );
        assert_eq!(
            DistilError::Other("oops".into()).exit_code(),
            ExitCode::Failure
        );
    }

    #[test]
    fn test_lock_timeout_is_data_error() {
        let err = DistilError::LockTimeout {
            path: PathBuf::from("/tmp/ledger.lock"),
            waited: Duration::from_secs(5),
        };
        assert_eq!(err.exit_code(), ExitCode::Data);
    }

    #[test]
    fn test_to_json_envelope() {
        let err = DistilError::InvalidConfidence {
            value: "wild".into(),
        };
        let json = err.to_json();
        assert_eq!(json["error"]["code"], 2);
        assert_eq!(json["error"]["type"], "invalid_confidence");
        assert!(json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("wild")));
    }
}
