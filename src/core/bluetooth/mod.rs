//! Bluetooth functionality for the GATT explorer
//! This module handles device selection, connection, discovery of services
//! and characteristics, and disconnect handling.

pub mod backend;
mod constants;
mod gatt;
mod properties;
mod session;
mod types;

// Re-export types that should be publicly accessible
pub use constants::*; // Re-export all constants
pub use gatt::{DeviceSelector, GattCharacteristic, GattDevice, GattService, SelectionRequest};
pub use properties::describe_properties;
pub use session::{SessionError, SessionManager, SessionPhase};
pub use types::{CharacteristicFlags, CharacteristicInfo, ServiceInfo};
