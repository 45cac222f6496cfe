//! permreg registry: validates registration and listing requests and
//! drives a [`PermissionStore`](permreg_core::PermissionStore).

pub mod config;
pub mod error;
pub mod service;

pub use config::RegistryConfig;
pub use error::EngineError;
pub use service::PermissionService;
