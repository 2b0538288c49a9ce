use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use log::info;

use gatt_explorer::config::SessionConfig;
use gatt_explorer::core::bluetooth::backend::BluestBackend;
use gatt_explorer::core::SessionManager;
use gatt_explorer::logging::{LogPanel, StructuralLogger};
use gatt_explorer::state::SessionState;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config_dir = std::env::var_os("GATT_EXPLORER_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let config = SessionConfig::load_config(&config_dir).await?;

    let backend = Arc::new(BluestBackend::new().await?);
    let panel = Arc::new(LogPanel::new());
    let state = Arc::new(SessionState::new());
    let manager = SessionManager::new(
        backend,
        state.clone(),
        StructuralLogger::new(panel.clone()),
        config,
    );

    manager.connect().await?;

    let snapshot = state.snapshot();
    info!(
        "Session connected: {} services, {} characteristics",
        snapshot.all_services.len(),
        snapshot.all_characteristics.len()
    );
    for entry in panel.entries() {
        println!("{} : {}", entry.timestamp, entry.description);
        print!("{}", entry.body);
    }

    info!("Press Ctrl-C to disconnect");
    tokio::signal::ctrl_c().await?;

    manager.disconnect().await;
    info!("Session closed");
    Ok(())
}
