//! permreg database: SurrealDB connection management, schema
//! migrations and the [`PermissionStore`](permreg_core::PermissionStore)
//! implementation.

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use repository::SurrealPermissionStore;
pub use schema::run_migrations;
