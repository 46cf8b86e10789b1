//! Environment error taxonomy for diffgate.
//!
//! Policy violations are never errors; they are collected as
//! [`Diagnostic`](crate::diagnostic::Diagnostic)s. Everything here aborts the
//! invocation.

/// Fatal errors that abort a gate run.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("git error: {0}")]
    GitError(String),

    #[error("no resolvable HEAD revision")]
    NoHead,

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("parse error in {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for diffgate operations.
pub type Result<T> = std::result::Result<T, GateError>;
