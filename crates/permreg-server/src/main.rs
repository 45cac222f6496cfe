//! permreg server: application entry point.

mod bootstrap;
mod config;

use std::net::SocketAddr;

use clap::Parser;
use permreg_core::context::CallContext;
use permreg_db::DbManager;
use permreg_grpc::{GrpcPermissionService, PermissionServiceServer, pb};
use permreg_registry::PermissionService;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Args, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("permreg=info".parse()?))
        .json()
        .init();

    let config = ServerConfig::load(&args)?;
    info!("Starting permission registry...");

    let db = DbManager::connect(&config.database).await?;
    permreg_db::run_migrations(db.client()).await?;

    let engine = PermissionService::new(db.permission_store(), config.registry.clone());

    let shutdown = CancellationToken::new();
    bootstrap::register_manifests(
        &engine,
        &CallContext::new(shutdown.child_token()),
        &config.bootstrap,
    )
    .await?;

    let addr: SocketAddr = config.grpc.listen.parse()?;
    let svc = GrpcPermissionService::new(engine, &config.grpc, shutdown.clone());

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(pb::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    info!(%addr, "Serving permissions.v1.PermissionService");

    tonic::transport::Server::builder()
        .add_service(PermissionServiceServer::new(svc))
        .add_service(reflection)
        .serve_with_shutdown(addr, shutdown_signal(shutdown))
        .await?;

    info!("Permission registry stopped.");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM, cancelling `shutdown` so that in-flight
/// store calls stop.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down gracefully...");
    shutdown.cancel();
}
