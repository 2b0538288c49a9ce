//! Boundary traits over the platform's Bluetooth transport.
//!
//! The session core drives device selection, connection and discovery
//! through these traits; the production implementation lives in
//! [`backend`](crate::core::bluetooth::backend) and test doubles implement
//! them in-process.

use anyhow::Result;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::Value;
use uuid::Uuid;

use crate::config::session_config::SessionConfig;
use crate::core::bluetooth::types::CharacteristicFlags;

/// Parameters handed to the device picker.
#[derive(Debug, Clone)]
pub struct SelectionRequest {
    /// Exact device names the user may pick from
    pub name_filters: Vec<String>,
    /// Services the session intends to access after connecting
    pub optional_service_uuids: Vec<Uuid>,
}

impl From<&SessionConfig> for SelectionRequest {
    fn from(config: &SessionConfig) -> Self {
        Self {
            name_filters: config.name_filters.clone(),
            optional_service_uuids: config.optional_service_uuids.clone(),
        }
    }
}

/// A discovered GATT characteristic handle.
pub trait GattCharacteristic: Send + Sync {
    fn uuid(&self) -> String;
    /// Capability flags, resolved at discovery time.
    fn flags(&self) -> CharacteristicFlags;
    /// Structural descriptor for diagnostics logging.
    fn descriptor(&self) -> Value;
}

/// A discovered GATT service handle.
#[async_trait]
pub trait GattService: Send + Sync {
    fn uuid(&self) -> String;
    fn is_primary(&self) -> bool;
    /// Enumerates the characteristics of this service, in discovery order.
    async fn characteristics(&self) -> Result<Vec<Box<dyn GattCharacteristic>>>;
    /// Structural descriptor for diagnostics logging.
    fn descriptor(&self) -> Value;
}

/// A selected peripheral with at most one outstanding GATT connection.
#[async_trait]
pub trait GattDevice: Send + Sync {
    fn id(&self) -> String;
    fn name(&self) -> Option<String>;
    /// Opens the GATT connection.
    async fn connect(&self) -> Result<()>;
    /// Enumerates the primary services, in discovery order.
    async fn primary_services(&self) -> Result<Vec<Box<dyn GattService>>>;
    /// Yields one item per spontaneous disconnect raised by the platform.
    async fn disconnect_events(&self) -> Result<BoxStream<'static, ()>>;
    /// Closes the GATT connection if it is still open.
    async fn close(&self) -> Result<()>;
    /// Structural descriptor for diagnostics logging.
    fn descriptor(&self) -> Value;
}

/// Device picker capability.
#[async_trait]
pub trait DeviceSelector: Send + Sync {
    /// Produces a device matching the request, or fails when the user
    /// cancels or nothing matches.
    async fn select_device(&self, request: &SelectionRequest) -> Result<Box<dyn GattDevice>>;
}
