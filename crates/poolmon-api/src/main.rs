use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use tokio::net::TcpListener;

use poolmon_store::{JsonlStore, UserDirectory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Observability
    poolmon_obs::init("poolmond");

    // Config
    let cfg = poolmon_config::AppConfig::load().unwrap_or_default();
    let http_bind = cfg.http_bind();
    let mut data_dir = PathBuf::from(cfg.data_dir());

    // Optional per-user routing: resolve the configured email through the
    // user directory and serve that user's data set.
    if let (Some(directory_path), Some(email)) = (cfg.user_directory(), cfg.user_email()) {
        let directory = UserDirectory::from_json_file(&directory_path)
            .with_context(|| format!("failed to load user directory {}", directory_path))?;
        let storage_id = directory
            .resolve(&email)
            .with_context(|| format!("cannot serve data for {}", email))?;
        data_dir = data_dir.join(storage_id);
        tracing::info!(%email, "serving data for configured user");
    }

    let store = JsonlStore::new(&data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
    tracing::info!(pool = %cfg.pool_name(), data_dir = %data_dir.display(), "store opened");

    // Build app and state
    let (app, state) = poolmon_api::build_app(Box::new(store));

    // Start HTTP server
    let addr: SocketAddr = http_bind.parse().context("Invalid HTTP bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    // Mark ready just before serving
    poolmon_api::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
