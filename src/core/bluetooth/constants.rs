//! Constants used throughout the application
//! This module contains all the constant values used in the application,
//! such as UUIDs, device name filters, and log rendering bounds.

use uuid::Uuid;

/// Peripheral names the device picker is allowed to select.
pub const DEVICE_NAME_FILTERS: &[&str] = &["P2PSRV1", "HRSTM", "DT_SERVER", "STM_OTA", "MyCST"];

/// The UUID of the peer-to-peer server service
pub const UUID_P2P_SERVICE: Uuid = Uuid::from_u128(0x0000fe40_cc7a_482a_984a_7f2ed5b3e58f);

/// The UUID of the standard Heart Rate service
pub const UUID_HEART_RATE_SERVICE: Uuid = Uuid::from_u128(0x0000180d_0000_1000_8000_00805f9b34fb);

/// The UUID of the data throughput service
pub const UUID_DATA_THROUGHPUT_SERVICE: Uuid =
    Uuid::from_u128(0x0000fe80_8e22_4541_9d4c_21edae82ed19);

/// The UUID of the over-the-air firmware update service
pub const UUID_OTA_SERVICE: Uuid = Uuid::from_u128(0x0000fe20_cc7a_482a_984a_7f2ed5b3e58f);

/// Optional service UUIDs requested alongside device selection
pub const OPTIONAL_SERVICE_UUIDS: &[Uuid] = &[
    UUID_P2P_SERVICE,
    UUID_HEART_RATE_SERVICE,
    UUID_DATA_THROUGHPUT_SERVICE,
    UUID_OTA_SERVICE,
];

/// Structural log depth when rendering a discovered service
pub const SERVICE_LOG_DEPTH: usize = 3;

/// Structural log depth when rendering a discovered characteristic
pub const CHARACTERISTIC_LOG_DEPTH: usize = 4;

/// Depth used in place of 0 ("unlimited") so rendering always terminates
pub const FALLBACK_RENDER_DEPTH: usize = 16;

/// Indentation unit for one nesting level of rendered structure
pub const RENDER_INDENT: &str = "    ";

/// Minimum signal strength for a scanned device to be considered
pub const MIN_RSSI_THRESHOLD: i16 = -80;

/// How long device selection scans before giving up, in seconds
pub const SELECTION_TIMEOUT_SECS: u64 = 30;
