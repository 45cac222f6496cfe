//! Error types shared across the registry.

use thiserror::Error;

/// Why a raw permission string was rejected by [`crate::codec::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("permission is required")]
    Empty,

    #[error("permission must be in the format 'service:action'")]
    MissingSeparator,

    #[error("permission must have exactly one non-empty service and action")]
    WrongArity,
}

/// Returned by [`crate::codec::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid permission format, expected 'service:action', got: {raw}")]
    InvalidFormat { raw: String },
}

/// Failure reported by a [`crate::repository::PermissionStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store operation `{operation}` failed: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("store operation was cancelled")]
    Cancelled,

    #[error("store operation exceeded its deadline")]
    DeadlineExceeded,

    #[error("corrupt permission row: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Wrap an underlying backend failure, keeping it as the error source.
    pub fn backend(
        operation: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Backend {
            operation,
            source: source.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
