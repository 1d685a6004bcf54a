//! shopd server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shopd::api::{self, AppState};
use shopd::auth::{AuthState, SessionService, TokenCodec};
use shopd::db::Database;
use shopd::order::OrderRepository;
use shopd::product::ProductRepository;
use shopd::settings::Settings;
use shopd::upload::ImageStore;
use shopd::user::UserRepository;

#[derive(Debug, Parser)]
#[command(author, version, about = "Shop backend server.")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, value_name = "PATH", env = "SHOPD_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, value_name = "ADDR")]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load(cli.config.as_deref())?;
    let addr = match cli.listen {
        Some(addr) => addr,
        None => settings.server.socket_addr()?,
    };

    let db = Database::new(&settings.database.path).await?;

    let auth_config = Arc::new(settings.auth.clone());
    let codec = Arc::new(TokenCodec::new(&auth_config)?);
    let users = UserRepository::new(db.pool().clone());

    let sessions = SessionService::new(users.clone(), codec.clone(), auth_config);
    let auth = AuthState::new(codec, users);
    let products = ProductRepository::new(db.pool().clone());
    let orders = OrderRepository::new(db.pool().clone());
    let images = ImageStore::new(
        settings.uploads.media_dir.clone(),
        settings.uploads.max_file_size,
    );

    let state = AppState::new(sessions, auth, products, orders, images);
    let app = api::create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}
