//! Permission domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec;
use crate::error::ParseError;

/// Namespace for deriving permission record ids from their canonical form.
const PERMISSION_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_9b37_4d0a_8e5f_13c7_a2d9_04b1);

/// A registered `(service, action)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    /// Owning service (e.g. `auth`).
    pub service: String,
    /// The action within the service (e.g. `read`, `reset-password`).
    pub action: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(self.service.clone(), self.action.clone())
    }

    /// The canonical `service:action` string.
    pub fn canonical(&self) -> String {
        codec::format(&self.service, &self.action)
    }
}

/// The identity of a permission, without storage metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionKey {
    pub service: String,
    pub action: String,
}

impl PermissionKey {
    pub fn new(service: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            action: action.into(),
        }
    }

    /// Deterministic record id: the same pair always maps to the same id,
    /// which lets the store treat a repeat registration as a no-op.
    pub fn record_id(&self) -> Uuid {
        Uuid::new_v5(&PERMISSION_NAMESPACE, self.to_string().as_bytes())
    }
}

impl FromStr for PermissionKey {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (service, action) = codec::parse(raw)?;
        Ok(Self::new(service, action))
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.service, codec::SEPARATOR, self.action)
    }
}
