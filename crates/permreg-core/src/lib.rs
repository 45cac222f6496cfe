//! permreg core: domain models, the `service:action` codec, error
//! types and the persistence contract shared by every other crate.
//!
//! Nothing in here talks to a database or the network.

pub mod codec;
pub mod context;
pub mod error;
pub mod identity;
pub mod models;
pub mod repository;

pub use context::CallContext;
pub use error::{ParseError, StoreError, StoreResult, ValidationError};
pub use models::permission::{Permission, PermissionKey};
pub use repository::{PageRequest, PaginatedResult, PermissionStore};
