use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use roster_core::{backend::StoreBackendBuilder, store::DocumentStore};
use roster_memory::InMemoryStore;

use crate::{
    config::{AppConfig, StoreConfig, StoreKind},
    logging::init_logging,
    routes::{build_router, AppState},
    students::StudentStore,
};

/// Connects the configured backend.
pub async fn build_store(config: &StoreConfig) -> anyhow::Result<DocumentStore> {
    match config.backend() {
        StoreKind::Memory => Ok(DocumentStore::new(InMemoryStore::builder().build().await?)),
        StoreKind::Mongodb => build_mongodb(config).await,
    }
}

#[cfg(feature = "mongodb")]
async fn build_mongodb(config: &StoreConfig) -> anyhow::Result<DocumentStore> {
    use anyhow::Context;
    use roster_mongodb::MongoDbStore;

    let url = config.url.as_deref().unwrap_or_default();
    let backend = MongoDbStore::builder(url, &config.database)
        .build()
        .await
        .context("connecting to mongodb")?;
    Ok(DocumentStore::new(backend))
}

#[cfg(not(feature = "mongodb"))]
async fn build_mongodb(_config: &StoreConfig) -> anyhow::Result<DocumentStore> {
    anyhow::bail!("mongodb backend selected but roster was built without the `mongodb` feature")
}

/// The full application router over `store`.
pub fn app(store: &DocumentStore) -> Router {
    build_router(AppState { students: StudentStore::new(store) })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: load config, connect the store and serve until ctrl-c.
pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(config.log.format);

    let store = build_store(&config.store).await?;
    info!(backend = %config.store.backend(), database = %config.store.database, "store ready");

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr.as_str()).await?;
    info!(addr = %listener.local_addr()?, "starting roster");

    axum::serve(listener, app(&store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.shutdown().await?;
    info!("roster stopped");
    Ok(())
}
