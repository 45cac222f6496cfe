//! SurrealDB store implementations.

mod permission;

pub use permission::SurrealPermissionStore;
