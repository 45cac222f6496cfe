//! Transport configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the gRPC listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GrpcConfig {
    /// Socket address to listen on (default: `0.0.0.0:8080`).
    pub listen: String,
    /// Per-request deadline in milliseconds applied to every store call
    /// (default: 30 000). `None` disables the deadline.
    pub request_timeout_ms: Option<u64>,
}

impl GrpcConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".into(),
            request_timeout_ms: Some(30_000),
        }
    }
}
