//! permreg gRPC: the `permissions.v1.PermissionService` transport and
//! the registration client other services call at startup.

pub mod client;
pub mod config;
pub mod server;
pub mod status;

pub mod pb {
    tonic::include_proto!("permissions.v1");

    /// Encoded descriptors for `permissions.v1`, served over reflection.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("permissions_descriptor");
}

pub use client::{ClientError, RegistrationClient};
pub use config::GrpcConfig;
pub use pb::permission_service_server::PermissionServiceServer;
pub use server::GrpcPermissionService;
