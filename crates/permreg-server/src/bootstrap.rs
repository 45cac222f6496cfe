//! Startup registration of the server's own manifests.

use permreg_core::context::CallContext;
use permreg_core::models::manifest::ServiceManifest;
use permreg_core::repository::PermissionStore;
use permreg_registry::{EngineError, PermissionService};
use tracing::info;

/// Register every manifest, stopping at the first failure.
pub async fn register_manifests<S: PermissionStore>(
    engine: &PermissionService<S>,
    ctx: &CallContext,
    manifests: &[ServiceManifest],
) -> Result<(), EngineError> {
    for manifest in manifests {
        engine
            .register_service_permissions(
                ctx,
                &manifest.service_name,
                manifest.permissions.as_slice(),
            )
            .await?;
    }
    if !manifests.is_empty() {
        info!(services = manifests.len(), "Bootstrap manifests registered");
    }
    Ok(())
}
