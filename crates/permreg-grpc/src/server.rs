//! gRPC adapter over the registry engine.

use std::time::Duration;

use permreg_core::codec;
use permreg_core::context::CallContext;
use permreg_core::models::permission::Permission;
use permreg_core::repository::{PaginatedResult, PermissionStore};
use permreg_registry::PermissionService;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};
use tracing::warn;

use crate::config::GrpcConfig;
use crate::pb;
use crate::pb::permission_service_server::PermissionService as PermissionServiceRpc;
use crate::status::engine_status;

pub const REGISTERED_MESSAGE: &str = "Service permissions registered successfully";

/// Serves `permissions.v1.PermissionService` from a [`PermissionService`].
///
/// Every request gets a [`CallContext`] whose token is a child of the
/// server's shutdown token, so shutting down cancels in-flight store
/// calls.
pub struct GrpcPermissionService<S: PermissionStore> {
    engine: PermissionService<S>,
    shutdown: CancellationToken,
    request_timeout: Option<Duration>,
}

impl<S: PermissionStore> GrpcPermissionService<S> {
    pub fn new(
        engine: PermissionService<S>,
        config: &GrpcConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine,
            shutdown,
            request_timeout: config.request_timeout(),
        }
    }

    fn call_context(&self) -> CallContext {
        let ctx = CallContext::new(self.shutdown.child_token());
        match self.request_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

/// Wire-form page fields. The engine only accepts positive `i32` pages and
/// limits, so those convert back losslessly; totals saturate.
struct WirePage {
    permissions: Vec<String>,
    page: i32,
    limit: i32,
    total_count: i32,
    last_page: i32,
}

impl From<PaginatedResult<Permission>> for WirePage {
    fn from(result: PaginatedResult<Permission>) -> Self {
        let result = result.map(|p| p.canonical());
        Self {
            permissions: result.items,
            page: saturating_i32(u64::from(result.page)),
            limit: saturating_i32(u64::from(result.limit)),
            total_count: saturating_i32(result.total_count),
            last_page: saturating_i32(result.last_page),
        }
    }
}

fn saturating_i32(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[tonic::async_trait]
impl<S: PermissionStore + 'static> PermissionServiceRpc for GrpcPermissionService<S> {
    async fn register_service(
        &self,
        request: Request<pb::RegisterServiceRequest>,
    ) -> Result<Response<pb::RegisterServiceResponse>, Status> {
        let ctx = self.call_context();
        let req = request.into_inner();

        let response = match self
            .engine
            .register_service_permissions(
                &ctx,
                &req.service_name,
                req.permissions.as_slice(),
            )
            .await
        {
            Ok(()) => pb::RegisterServiceResponse {
                success: true,
                message: REGISTERED_MESSAGE.to_string(),
            },
            Err(err) => {
                if !err.is_invalid_argument() {
                    warn!(service = %req.service_name, error = %err, "Registration failed");
                }
                pb::RegisterServiceResponse {
                    success: false,
                    message: err.to_string(),
                }
            }
        };

        Ok(Response::new(response))
    }

    async fn check_permission(
        &self,
        request: Request<pb::CheckPermissionRequest>,
    ) -> Result<Response<pb::CheckPermissionResponse>, Status> {
        let ctx = self.call_context();
        let req = request.into_inner();

        let Ok((service, action)) = codec::parse(&req.permission) else {
            return Ok(Response::new(pb::CheckPermissionResponse { exists: false }));
        };

        let exists = self
            .engine
            .permission_exists(&ctx, service, action)
            .await
            .map_err(|e| engine_status(&e))?;

        Ok(Response::new(pb::CheckPermissionResponse { exists }))
    }

    async fn get_service_permissions(
        &self,
        request: Request<pb::GetServicePermissionsRequest>,
    ) -> Result<Response<pb::GetServicePermissionsResponse>, Status> {
        let ctx = self.call_context();
        let req = request.into_inner();

        let page: WirePage = self
            .engine
            .get_service_permissions(&ctx, &req.service_name, req.page, req.limit)
            .await
            .map_err(|e| engine_status(&e))?
            .into();

        Ok(Response::new(pb::GetServicePermissionsResponse {
            permissions: page.permissions,
            page: page.page,
            limit: page.limit,
            total_count: page.total_count,
            last_page: page.last_page,
        }))
    }

    async fn get_all_permissions(
        &self,
        request: Request<pb::GetAllPermissionsRequest>,
    ) -> Result<Response<pb::GetAllPermissionsResponse>, Status> {
        let ctx = self.call_context();
        let req = request.into_inner();

        let page: WirePage = self
            .engine
            .get_all_permissions(&ctx, req.page, req.limit)
            .await
            .map_err(|e| engine_status(&e))?
            .into();

        Ok(Response::new(pb::GetAllPermissionsResponse {
            permissions: page.permissions,
            page: page.page,
            limit: page.limit,
            total_count: page.total_count,
            last_page: page.last_page,
        }))
    }
}
