//! Registration and query service.

use permreg_core::codec;
use permreg_core::context::CallContext;
use permreg_core::error::ValidationError;
use permreg_core::models::permission::{Permission, PermissionKey};
use permreg_core::repository::{PageRequest, PaginatedResult, PermissionStore};
use tracing::{info, warn};

use crate::config::RegistryConfig;
use crate::error::EngineError;

/// The permission registry engine.
///
/// Generic over the store implementation so that the engine has no
/// dependency on the database crate. Holds no permission state of its
/// own; every call goes to the store.
pub struct PermissionService<S: PermissionStore> {
    store: S,
    config: RegistryConfig,
}

impl<S: PermissionStore> PermissionService<S> {
    pub fn new(store: S, config: RegistryConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register the permissions a service declares about itself.
    ///
    /// Every entry is validated before anything is written; a single
    /// malformed entry rejects the whole call. Pairs that are already
    /// registered are skipped, so repeating a call is a no-op.
    pub async fn register_service_permissions<P: AsRef<str>>(
        &self,
        ctx: &CallContext,
        service_name: &str,
        permissions: &[P],
    ) -> Result<(), EngineError> {
        if service_name.is_empty() {
            return Err(EngineError::MissingServiceName);
        }
        if permissions.is_empty() {
            return Err(EngineError::MissingPermissions);
        }

        let mut keys = Vec::with_capacity(permissions.len());
        for raw in permissions {
            let raw = raw.as_ref();
            let key = parse_permission(raw).map_err(|source| {
                warn!(
                    service = service_name,
                    permission = raw,
                    error = %source,
                    "Rejected permission registration"
                );
                EngineError::InvalidPermission {
                    permission: raw.to_string(),
                    source,
                }
            })?;
            keys.push(key);
        }

        self.store
            .insert_many(ctx, &keys)
            .await
            .map_err(EngineError::store("register service permissions"))?;

        info!(
            service = service_name,
            submitted = keys.len(),
            "Registered service permissions"
        );
        Ok(())
    }

    /// One page of the permissions registered under `service_name`.
    pub async fn get_service_permissions(
        &self,
        ctx: &CallContext,
        service_name: &str,
        page: i32,
        limit: i32,
    ) -> Result<PaginatedResult<Permission>, EngineError> {
        if service_name.is_empty() {
            return Err(EngineError::MissingServiceName);
        }
        let request = self.page_request(page, limit)?;

        let (items, total_count) = self
            .store
            .list_by_service(ctx, service_name, request)
            .await
            .map_err(EngineError::store("get service permissions"))?;

        Ok(PaginatedResult::new(items, request, total_count))
    }

    /// One page of every registered permission.
    pub async fn get_all_permissions(
        &self,
        ctx: &CallContext,
        page: i32,
        limit: i32,
    ) -> Result<PaginatedResult<Permission>, EngineError> {
        let request = self.page_request(page, limit)?;

        let (items, total_count) = self
            .store
            .list_all(ctx, request)
            .await
            .map_err(EngineError::store("get all permissions"))?;

        Ok(PaginatedResult::new(items, request, total_count))
    }

    pub async fn permission_exists(
        &self,
        ctx: &CallContext,
        service: &str,
        action: &str,
    ) -> Result<bool, EngineError> {
        if service.is_empty() {
            return Err(EngineError::MissingService);
        }
        if action.is_empty() {
            return Err(EngineError::MissingAction);
        }

        self.store
            .exists_by_service_and_action(ctx, service, action)
            .await
            .map_err(EngineError::store("check if permission exists"))
    }

    fn page_request(&self, page: i32, limit: i32) -> Result<PageRequest, EngineError> {
        let page = u32::try_from(page)
            .ok()
            .filter(|p| *p > 0)
            .ok_or(EngineError::InvalidPage)?;
        let limit = u32::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .ok_or(EngineError::InvalidLimit)?;

        if let Some(max) = self.config.max_page_limit.filter(|max| limit > *max) {
            return Err(EngineError::LimitTooLarge { limit, max });
        }

        PageRequest::new(page, limit).ok_or(EngineError::InvalidPage)
    }
}

fn parse_permission(raw: &str) -> Result<PermissionKey, ValidationError> {
    codec::validate(raw)?;
    let (service, action) = codec::parse(raw).map_err(|_| ValidationError::WrongArity)?;
    Ok(PermissionKey::new(service, action))
}
