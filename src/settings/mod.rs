//! Layered application configuration.
//!
//! Values are resolved from defaults, then an optional TOML file, then
//! `SHOPD__`-prefixed environment variables (e.g.
//! `SHOPD__AUTH__JWT_SECRET`).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;

const ENV_PREFIX: &str = "SHOPD";

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthConfig,
    pub uploads: UploadSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    /// Resolve the listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

/// Upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Directory served under `/static`; images land in `<media_dir>/images`.
    pub media_dir: PathBuf,
    /// Maximum accepted image size in bytes.
    pub max_file_size: u64,
}

impl Settings {
    /// Load settings from defaults, an optional TOML file, and the
    /// environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000_i64)?
            .set_default("database.path", "shop.db")?
            .set_default("auth.jwt_secret", "insecure-dev-secret-change-me")?
            .set_default("auth.jwt_algorithm", "HS256")?
            .set_default("auth.access_ttl_minutes", 10_i64)?
            .set_default("auth.refresh_ttl_minutes", 60_i64 * 24 * 7)?
            .set_default("uploads.media_dir", "static")?
            .set_default("uploads.max_file_size", 2_i64 * 1024 * 1024)?;

        if let Some(path) = config_file {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        let built = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("assembling configuration")?;

        built
            .try_deserialize()
            .context("deserializing configuration")
    }
}
