//! Server configuration: defaults, then an optional TOML file, then
//! command-line flags / `PERMREG_*` environment variables.

use std::path::{Path, PathBuf};

use clap::Parser;
use permreg_core::models::manifest::ServiceManifest;
use permreg_db::DbConfig;
use permreg_grpc::GrpcConfig;
use permreg_registry::RegistryConfig;
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(name = "permreg-server")]
#[command(about = "Permission registry gRPC server")]
pub struct Args {
    /// Path to a TOML configuration file.
    #[arg(long, env = "PERMREG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to serve gRPC on.
    #[arg(long, env = "PERMREG_LISTEN")]
    pub listen: Option<String>,

    #[arg(long, env = "PERMREG_DB_URL")]
    pub db_url: Option<String>,

    #[arg(long, env = "PERMREG_DB_NAMESPACE")]
    pub db_namespace: Option<String>,

    #[arg(long, env = "PERMREG_DB_DATABASE")]
    pub db_database: Option<String>,

    #[arg(long, env = "PERMREG_DB_USERNAME")]
    pub db_username: Option<String>,

    #[arg(long, env = "PERMREG_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub grpc: GrpcConfig,
    pub database: DbConfig,
    pub registry: RegistryConfig,
    /// Manifests the server registers on its own behalf at startup.
    pub bootstrap: Vec<ServiceManifest>,
}

impl ServerConfig {
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn apply_overrides(&mut self, args: &Args) {
        let overrides = [
            (&args.listen, &mut self.grpc.listen),
            (&args.db_url, &mut self.database.url),
            (&args.db_namespace, &mut self.database.namespace),
            (&args.db_database, &mut self.database.database),
            (&args.db_username, &mut self.database.username),
            (&args.db_password, &mut self.database.password),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
    }
}
