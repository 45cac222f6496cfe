//! Domain models for the permission registry.

pub mod identity;
pub mod manifest;
pub mod permission;
