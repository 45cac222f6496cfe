//! Startup registration payload.

use serde::{Deserialize, Serialize};

/// The permissions a service declares about itself.
///
/// Host processes build one of these and hand it to the registry once at
/// startup, instead of accumulating permissions in a global registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceManifest {
    pub service_name: String,
    /// Canonical `service:action` strings.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl ServiceManifest {
    pub fn new<I, P>(service_name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            service_name: service_name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}
