//! Client used by other services to register themselves at startup.

use permreg_core::models::manifest::ServiceManifest;
use thiserror::Error;
use tonic::transport::Channel;
use tracing::info;

use crate::pb;
use crate::pb::permission_service_client::PermissionServiceClient;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("registry returned an error: {0}")]
    Status(#[from] tonic::Status),

    #[error("registration rejected: {0}")]
    Rejected(String),
}

/// Thin wrapper around the generated client.
#[derive(Debug, Clone)]
pub struct RegistrationClient {
    inner: PermissionServiceClient<Channel>,
}

impl RegistrationClient {
    /// Connect to a registry at `endpoint` (e.g. `http://permissions:8080`).
    pub async fn connect(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        let inner = PermissionServiceClient::connect(endpoint.into()).await?;
        Ok(Self { inner })
    }

    /// Register a service's permissions. Intended to be called once by the
    /// host process during startup.
    pub async fn register(&mut self, manifest: &ServiceManifest) -> Result<(), ClientError> {
        let response = self
            .inner
            .register_service(pb::RegisterServiceRequest {
                service_name: manifest.service_name.clone(),
                permissions: manifest.permissions.clone(),
            })
            .await?
            .into_inner();

        if !response.success {
            return Err(ClientError::Rejected(response.message));
        }

        info!(
            service = %manifest.service_name,
            permissions = manifest.permissions.len(),
            "Registered with permission registry"
        );
        Ok(())
    }

    /// Whether `permission` (`service:action`) is registered.
    pub async fn check(&mut self, permission: &str) -> Result<bool, ClientError> {
        let response = self
            .inner
            .check_permission(pb::CheckPermissionRequest {
                permission: permission.to_string(),
            })
            .await?
            .into_inner();
        Ok(response.exists)
    }
}
