use apiary_core::config::load_config;
use apiary_engine::cell::CellService;
use apiary_store::store::memory::MemoryStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Apiary cell unit");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let store = MemoryStore::new();
    let (_service, worker) = CellService::new(store, config.lock.clone(), config.cleanup.clone());
    let worker_handle = tokio::spawn(worker.run());

    tracing::info!("Cell lifecycle engine running, cleanup worker spawned");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    worker_handle.abort();

    Ok(())
}
