mod api;
mod config;
mod models;
mod shortener;
mod storage;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use config::Config;
use shortener::Shortener;
use storage::{LinkStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Arc::new(Config::from_env()?);
    info!("Loaded configuration");

    // The database directory may not exist on first run
    if let Some(dir) = Path::new(&config.db_path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    // Initialize storage
    let database_url = format!("sqlite://{}?mode=rwc", config.db_path);
    info!("Using SQLite storage: {}", config.db_path);
    let storage: Arc<dyn LinkStore> = Arc::new(SqliteStore::new(&database_url, 5).await?);

    info!("Initializing database...");
    storage.init().await?;
    info!("Database initialized successfully");

    if config.api_key.is_empty() {
        info!("API key check is disabled - all shorten requests are allowed");
    } else {
        info!("API key check is enabled");
    }

    let code_shortener = Shortener::new(Arc::clone(&storage), config.code_length);
    let app = api::create_router(code_shortener, Arc::clone(&config));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    info!("Domain: {}", config.domain);
    info!("Base path: {}", config.base_path);

    axum::serve(listener, app).await?;

    Ok(())
}
