//! Gateway runtime entry point.

use anyhow::Result;
use gateway_runtime::{GatewayConfig, GatewayRuntime, StorageBackend};
use shared_types::Address;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Load configuration from defaults and environment.
fn load_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();

    if let Ok(raw) = std::env::var("PG_CONTRACT_ADDRESS") {
        match raw.parse::<Address>() {
            Ok(address) => config.chain.contract_address = address,
            Err(e) => warn!("Ignoring PG_CONTRACT_ADDRESS: {}", e),
        }
    }
    if let Ok(raw) = std::env::var("PG_CHAIN_ID") {
        if let Ok(id) = raw.parse() {
            config.chain.chain_id = id;
        }
    }
    if let Ok(raw) = std::env::var("PG_STORAGE_BACKEND") {
        match raw.as_str() {
            "memory" => config.storage.backend = StorageBackend::Memory,
            "rocksdb" => config.storage.backend = StorageBackend::RocksDb,
            other => warn!("Ignoring unknown PG_STORAGE_BACKEND: {}", other),
        }
    }
    if let Ok(raw) = std::env::var("PG_DATA_DIR") {
        config.storage.data_dir = raw.into();
    }
    if let Ok(raw) = std::env::var("PG_RECONNECT_DELAY_SECS") {
        if let Ok(secs) = raw.parse() {
            config.indexer.reconnect_delay_secs = secs;
        }
    }

    config
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = load_config();
    if let Err(e) = config.validate_for_production() {
        warn!("Running with development configuration: {}", e);
    }

    // Create and start the runtime
    let runtime = GatewayRuntime::new(config)?;
    runtime.start();

    // Keep the gateway running
    info!("Gateway is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    runtime.shutdown().await;

    Ok(())
}
