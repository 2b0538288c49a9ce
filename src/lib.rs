//! GATT explorer library
//! Connects to a BLE peripheral, enumerates its GATT services and
//! characteristics with strict discovery ordering, and keeps an append-only
//! session log of everything it finds.

// Module declarations
pub mod config;
pub mod core;
pub mod logging;
pub mod state;
pub mod utils;

// Initialize logging
pub fn setup_logging() {
    env_logger::init();
    log::info!("Logging initialized");
}
