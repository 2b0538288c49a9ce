//! Defines shared data structures for the Bluetooth module.

use serde::{Deserialize, Serialize};

/// Named capability flags of a characteristic, in BLE declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicFlags {
    pub broadcast: bool,
    pub read: bool,
    pub write_without_response: bool,
    pub write: bool,
    pub notify: bool,
    pub indicate: bool,
    pub authenticated_signed_writes: bool,
    pub extended_properties: bool,
}

impl CharacteristicFlags {
    /// Flag names paired with their values, in declaration order.
    pub fn entries(&self) -> [(&'static str, bool); 8] {
        [
            ("broadcast", self.broadcast),
            ("read", self.read),
            ("write_without_response", self.write_without_response),
            ("write", self.write),
            ("notify", self.notify),
            ("indicate", self.indicate),
            ("authenticated_signed_writes", self.authenticated_signed_writes),
            ("extended_properties", self.extended_properties),
        ]
    }
}

/// A discovered GATT service as published to the UI state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    /// The UUID of the service
    pub uuid: String,
    /// Whether this is a primary service of the device
    pub is_primary: bool,
}

/// A discovered GATT characteristic as published to the UI state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacteristicInfo {
    /// The UUID of the characteristic
    pub uuid: String,
    /// The UUID of the service this characteristic belongs to
    pub service_uuid: String,
    /// Capability flags reported by the peripheral
    pub flags: CharacteristicFlags,
}
