//! Registry error types.

use permreg_core::error::{StoreError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("service name is required")]
    MissingServiceName,

    #[error("permissions are required")]
    MissingPermissions,

    #[error("failed to validate permission '{permission}': {source}")]
    InvalidPermission {
        permission: String,
        #[source]
        source: ValidationError,
    },

    #[error("page must be greater than 0")]
    InvalidPage,

    #[error("limit must be greater than 0")]
    InvalidLimit,

    #[error("limit {limit} exceeds the maximum page size of {max}")]
    LimitTooLarge { limit: u32, max: u32 },

    #[error("service is required")]
    MissingService,

    #[error("action is required")]
    MissingAction,

    #[error("failed to {operation}: {source}")]
    StoreFailure {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl EngineError {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, EngineError::StoreFailure { .. })
    }

    pub(crate) fn store(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| EngineError::StoreFailure { operation, source }
    }
}
