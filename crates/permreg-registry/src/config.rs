//! Registry configuration.

use serde::Deserialize;

/// Configuration for the registration/query engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Largest page size a listing call may request (default: 1000).
    /// `None` accepts any positive limit.
    pub max_page_limit: Option<u32>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_page_limit: Some(1000),
        }
    }
}
