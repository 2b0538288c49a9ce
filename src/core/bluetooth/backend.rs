//! bluest-backed implementation of the GATT boundary
//! This module adapts the platform Bluetooth stack to the traits the session
//! core consumes: picking a device by name allow-list, connecting, and
//! enumerating services and characteristics.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bluest::{Adapter, Characteristic, ConnectionEvent, Device, Service};
use futures_channel::mpsc;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use log::{debug, error, info};
use regex::Regex;
use serde_json::{json, Value};
use std::time::Duration;

use crate::core::bluetooth::constants::{MIN_RSSI_THRESHOLD, SELECTION_TIMEOUT_SECS};
use crate::core::bluetooth::gatt::{
    DeviceSelector, GattCharacteristic, GattDevice, GattService, SelectionRequest,
};
use crate::core::bluetooth::types::CharacteristicFlags;

/// Device picker and transport over the system Bluetooth adapter.
pub struct BluestBackend {
    adapter: Adapter,
}

impl BluestBackend {
    pub async fn new() -> Result<Self> {
        let adapter = Adapter::default()
            .await
            .ok_or_else(|| anyhow!("No Bluetooth adapter found"))?;
        adapter.wait_available().await?;
        info!("Bluetooth adapter is available.");
        Ok(Self { adapter })
    }

    fn matches_filters(device: &Device, filters: &[String]) -> bool {
        device
            .name()
            .ok()
            .map(|name| filters.iter().any(|filter| *filter == name))
            .unwrap_or(false)
    }
}

#[async_trait]
impl DeviceSelector for BluestBackend {
    /// Picks the first advertising device whose name is on the allow-list.
    /// Already-connected matches are preferred over starting a scan.
    async fn select_device(&self, request: &SelectionRequest) -> Result<Box<dyn GattDevice>> {
        info!("Checking for connected devices");
        for device in self.adapter.connected_devices().await? {
            if Self::matches_filters(&device, &request.name_filters) {
                info!("Reusing connected device {}", device.id());
                return Ok(Box::new(BluestGattDevice::new(self.adapter.clone(), device)));
            }
        }

        info!(
            "Starting bluetooth scan for {:?} (optional services: {:?})",
            request.name_filters, request.optional_service_uuids
        );
        let mut scan_stream = self.adapter.scan(&[]).await?;
        let deadline = tokio::time::sleep(Duration::from_secs(SELECTION_TIMEOUT_SECS));
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                result = scan_stream.next() => {
                    match result {
                        Some(discovered) => {
                            let device = discovered.device;
                            debug!("Found device - Device: {:?}, RSSI: {:?}", device, discovered.rssi);
                            if let Some(rssi) = discovered.rssi {
                                if rssi < MIN_RSSI_THRESHOLD {
                                    continue;
                                }
                            }
                            if Self::matches_filters(&device, &request.name_filters) {
                                info!("Selected device {}", device.id());
                                return Ok(Box::new(BluestGattDevice::new(self.adapter.clone(), device)));
                            }
                        }
                        None => return Err(anyhow!("Bluetooth scan stream has ended")),
                    }
                }
                _ = &mut deadline => {
                    return Err(anyhow!(
                        "No matching device found within {}s",
                        SELECTION_TIMEOUT_SECS
                    ));
                }
            }
        }
    }
}

/// A selected peripheral bound to the adapter that found it.
pub struct BluestGattDevice {
    adapter: Adapter,
    device: Device,
}

impl BluestGattDevice {
    pub fn new(adapter: Adapter, device: Device) -> Self {
        Self { adapter, device }
    }
}

#[async_trait]
impl GattDevice for BluestGattDevice {
    fn id(&self) -> String {
        self.device.id().to_string()
    }

    fn name(&self) -> Option<String> {
        self.device.name().ok()
    }

    async fn connect(&self) -> Result<()> {
        if !self.device.is_connected().await {
            info!("Initiating connection to {}...", self.device.id());
            self.adapter.connect_device(&self.device).await?;
        }
        Ok(())
    }

    async fn primary_services(&self) -> Result<Vec<Box<dyn GattService>>> {
        let services = self.device.services().await?;
        let device_descriptor = self.descriptor();
        Ok(services
            .into_iter()
            .map(|service| {
                Box::new(BluestGattService::new(service, device_descriptor.clone()))
                    as Box<dyn GattService>
            })
            .collect())
    }

    async fn disconnect_events(&self) -> Result<BoxStream<'static, ()>> {
        let adapter = self.adapter.clone();
        let device = self.device.clone();
        let (tx, rx) = mpsc::unbounded();
        tokio::spawn(async move {
            let mut events = match adapter.device_connection_events(&device).await {
                Ok(events) => events,
                Err(e) => {
                    error!("Failed to watch connection events: {e}");
                    return;
                }
            };
            while let Some(event) = events.next().await {
                if matches!(event, ConnectionEvent::Disconnected)
                    && tx.unbounded_send(()).is_err()
                {
                    break;
                }
            }
        });
        Ok(Box::pin(rx))
    }

    async fn close(&self) -> Result<()> {
        if self.device.is_connected().await {
            info!("Disconnecting from device {}", self.device.id());
            self.adapter.disconnect_device(&self.device).await?;
            info!("Successfully disconnected");
        } else {
            info!("Device {} not connected", self.device.id());
        }
        Ok(())
    }

    fn descriptor(&self) -> Value {
        let id = self.device.id().to_string();
        json!({
            "id": id,
            "name": self.device.name().ok(),
            "address": extract_mac_address(&id),
            "gatt": { "connected": true },
        })
    }
}

/// A discovered service, wrapped for the session core.
pub struct BluestGattService {
    service: Service,
    uuid: String,
    device_descriptor: Value,
}

impl BluestGattService {
    fn new(service: Service, device_descriptor: Value) -> Self {
        let uuid = service.uuid().to_string();
        Self {
            service,
            uuid,
            device_descriptor,
        }
    }
}

#[async_trait]
impl GattService for BluestGattService {
    fn uuid(&self) -> String {
        self.uuid.clone()
    }

    fn is_primary(&self) -> bool {
        // Device::services() only yields primary services.
        true
    }

    async fn characteristics(&self) -> Result<Vec<Box<dyn GattCharacteristic>>> {
        let characteristics = self.service.characteristics().await?;
        let mut wrapped: Vec<Box<dyn GattCharacteristic>> =
            Vec::with_capacity(characteristics.len());
        for characteristic in characteristics {
            wrapped.push(Box::new(
                BluestGattCharacteristic::new(characteristic, self.uuid.clone()).await?,
            ));
        }
        Ok(wrapped)
    }

    fn descriptor(&self) -> Value {
        json!({
            "uuid": self.uuid,
            "isPrimary": true,
            "device": self.device_descriptor,
        })
    }
}

/// A discovered characteristic with its flags resolved at discovery time.
pub struct BluestGattCharacteristic {
    uuid: String,
    service_uuid: String,
    flags: CharacteristicFlags,
}

impl BluestGattCharacteristic {
    async fn new(characteristic: Characteristic, service_uuid: String) -> Result<Self> {
        let properties = characteristic.properties().await?;
        let flags = CharacteristicFlags {
            broadcast: properties.broadcast,
            read: properties.read,
            write_without_response: properties.write_without_response,
            write: properties.write,
            notify: properties.notify,
            indicate: properties.indicate,
            authenticated_signed_writes: properties.authenticated_signed_writes,
            extended_properties: properties.extended_properties,
        };
        Ok(Self {
            uuid: characteristic.uuid().to_string(),
            service_uuid,
            flags,
        })
    }
}

impl GattCharacteristic for BluestGattCharacteristic {
    fn uuid(&self) -> String {
        self.uuid.clone()
    }

    fn flags(&self) -> CharacteristicFlags {
        self.flags
    }

    fn descriptor(&self) -> Value {
        json!({
            "uuid": self.uuid,
            "service": { "uuid": self.service_uuid },
            "properties": serde_json::to_value(self.flags).unwrap_or(Value::Null),
        })
    }
}

/// Pulls a MAC address out of a platform device identifier, where present.
fn extract_mac_address(device_id: &str) -> Option<String> {
    let re = Regex::new(r"([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})").unwrap();
    re.find_iter(device_id)
        .last()
        .map(|m| m.as_str().to_uppercase())
}
