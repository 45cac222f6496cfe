//! Tests for the gRPC adapter and the registration client.

use permreg_core::models::manifest::ServiceManifest;
use permreg_db::SurrealPermissionStore;
use permreg_grpc::pb;
use permreg_grpc::pb::permission_service_server::PermissionService as _;
use permreg_grpc::server::REGISTERED_MESSAGE;
use prost::Message;
use permreg_grpc::{
    ClientError, GrpcConfig, GrpcPermissionService, PermissionServiceServer, RegistrationClient,
};
use permreg_registry::{PermissionService, RegistryConfig};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tonic::{Code, Request};

type Service = GrpcPermissionService<SurrealPermissionStore<Db>>;

/// Helper: in-memory DB behind the engine and the adapter.
async fn setup_with(shutdown: CancellationToken) -> Service {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    permreg_db::run_migrations(&db).await.unwrap();
    let engine = PermissionService::new(SurrealPermissionStore::new(db), RegistryConfig::default());
    GrpcPermissionService::new(engine, &GrpcConfig::default(), shutdown)
}

async fn setup() -> Service {
    setup_with(CancellationToken::new()).await
}

async fn register(svc: &Service, name: &str, permissions: &[&str]) -> pb::RegisterServiceResponse {
    svc.register_service(Request::new(pb::RegisterServiceRequest {
        service_name: name.into(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    }))
    .await
    .unwrap()
    .into_inner()
}

async fn check(svc: &Service, permission: &str) -> bool {
    svc.check_permission(Request::new(pb::CheckPermissionRequest {
        permission: permission.into(),
    }))
    .await
    .unwrap()
    .into_inner()
    .exists
}

// ---------------------------------------------------------------------------
// RegisterService
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_reports_success() {
    let svc = setup().await;

    let response = register(&svc, "auth", &["auth:read", "auth:write"]).await;
    assert!(response.success);
    assert_eq!(response.message, REGISTERED_MESSAGE);
}

#[tokio::test]
async fn register_reports_validation_failures_in_band() {
    let svc = setup().await;

    let response = register(&svc, "auth", &["auth:read", "bad"]).await;
    assert!(!response.success);
    assert!(response.message.contains("'bad'"), "{}", response.message);

    let response = register(&svc, "", &["auth:read"]).await;
    assert!(!response.success);
    assert_eq!(response.message, "service name is required");

    let response = register(&svc, "auth", &[]).await;
    assert!(!response.success);
    assert_eq!(response.message, "permissions are required");

    assert!(!check(&svc, "auth:read").await);
}

#[tokio::test]
async fn register_reports_store_failures_in_band() {
    let shutdown = CancellationToken::new();
    let svc = setup_with(shutdown.clone()).await;
    shutdown.cancel();

    let response = register(&svc, "auth", &["auth:read"]).await;
    assert!(!response.success);
    assert!(response.message.contains("cancelled"), "{}", response.message);
}

// ---------------------------------------------------------------------------
// CheckPermission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn check_permission_answers_existence() {
    let svc = setup().await;
    register(&svc, "auth", &["auth:read", "auth:write"]).await;

    assert!(check(&svc, "auth:read").await);
    assert!(!check(&svc, "auth:delete").await);
}

#[tokio::test]
async fn malformed_check_answers_false() {
    let svc = setup().await;
    register(&svc, "auth", &["auth:read"]).await;

    for raw in ["", "auth", "auth:read:extra", ":read", "auth:"] {
        assert!(!check(&svc, raw).await, "{raw:?} should not exist");
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn service_listing_uses_canonical_strings() {
    let svc = setup().await;
    register(&svc, "auth", &["auth:read", "auth:write"]).await;
    register(&svc, "billing", &["billing:refund"]).await;

    let response = svc
        .get_service_permissions(Request::new(pb::GetServicePermissionsRequest {
            service_name: "auth".into(),
            page: 1,
            limit: 10,
        }))
        .await
        .unwrap()
        .into_inner();

    let mut permissions = response.permissions.clone();
    permissions.sort();
    assert_eq!(permissions, ["auth:read", "auth:write"]);
    assert_eq!(response.page, 1);
    assert_eq!(response.limit, 10);
    assert_eq!(response.total_count, 2);
    assert_eq!(response.last_page, 1);
}

#[tokio::test]
async fn all_listing_pages_through_every_service() {
    let svc = setup().await;
    register(&svc, "auth", &["auth:read", "auth:write"]).await;
    register(&svc, "billing", &["billing:refund"]).await;

    let response = svc
        .get_all_permissions(Request::new(pb::GetAllPermissionsRequest { page: 2, limit: 2 }))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.permissions.len(), 1);
    assert_eq!(response.page, 2);
    assert_eq!(response.total_count, 3);
    assert_eq!(response.last_page, 2);
}

#[tokio::test]
async fn bad_paging_is_invalid_argument() {
    let svc = setup().await;

    let status = svc
        .get_service_permissions(Request::new(pb::GetServicePermissionsRequest {
            service_name: "auth".into(),
            page: 0,
            limit: 10,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = svc
        .get_all_permissions(Request::new(pb::GetAllPermissionsRequest { page: 1, limit: 0 }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "limit must be greater than 0");
}

#[tokio::test]
async fn shutdown_cancels_queries() {
    let shutdown = CancellationToken::new();
    let svc = setup_with(shutdown.clone()).await;
    shutdown.cancel();

    let status = svc
        .get_all_permissions(Request::new(pb::GetAllPermissionsRequest { page: 1, limit: 10 }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Cancelled);
}

// ---------------------------------------------------------------------------
// Reflection
// ---------------------------------------------------------------------------

#[test]
fn descriptor_set_describes_the_service() {
    let set = prost_types::FileDescriptorSet::decode(pb::FILE_DESCRIPTOR_SET).unwrap();
    let file = set
        .file
        .iter()
        .find(|f| f.package() == "permissions.v1")
        .expect("permissions.v1 descriptor");

    let service = file
        .service
        .iter()
        .find(|s| s.name() == "PermissionService")
        .expect("PermissionService descriptor");
    let mut methods: Vec<&str> = service.method.iter().map(|m| m.name()).collect();
    methods.sort();
    assert_eq!(
        methods,
        [
            "CheckPermission",
            "GetAllPermissions",
            "GetServicePermissions",
            "RegisterService"
        ]
    );
}

#[test]
fn reflection_service_accepts_the_descriptor_set() {
    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(pb::FILE_DESCRIPTOR_SET)
        .build_v1();
    assert!(reflection.is_ok());
}

// ---------------------------------------------------------------------------
// Over the wire
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registration_client_round_trip() {
    let svc = setup().await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let incoming = TcpListenerStream::new(listener);
    let stop = CancellationToken::new();
    let server_stop = stop.clone();

    let server = tokio::spawn(async move {
        Server::builder()
            .add_service(PermissionServiceServer::new(svc))
            .serve_with_incoming_shutdown(incoming, server_stop.cancelled_owned())
            .await
            .unwrap();
    });

    let mut client = RegistrationClient::connect(format!("http://{addr}"))
        .await
        .unwrap();

    let manifest = ServiceManifest::new("auth", ["auth:read", "auth:write"]);
    client.register(&manifest).await.unwrap();
    // A second registration at the next startup is accepted as well.
    client.register(&manifest).await.unwrap();

    assert!(client.check("auth:read").await.unwrap());
    assert!(!client.check("auth:delete").await.unwrap());

    let err = client
        .register(&ServiceManifest::new("auth", ["auth"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));

    stop.cancel();
    server.await.unwrap();
}
