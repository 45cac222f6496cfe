//! Mapping engine errors onto gRPC statuses.

use permreg_core::error::StoreError;
use permreg_registry::EngineError;
use tonic::Status;
use tracing::error;

/// Caller mistakes become `InvalidArgument` with the engine's message.
/// Store failures keep their cause in the log and expose only a generic
/// message.
pub fn engine_status(err: &EngineError) -> Status {
    match err {
        EngineError::StoreFailure { source, .. } => match source {
            StoreError::Cancelled => Status::cancelled("request cancelled"),
            StoreError::DeadlineExceeded => Status::deadline_exceeded("deadline exceeded"),
            StoreError::Backend { .. } | StoreError::Corrupt(_) => {
                error!(error = %err, "Permission store failure");
                Status::internal("internal error")
            }
        },
        other => Status::invalid_argument(other.to_string()),
    }
}
