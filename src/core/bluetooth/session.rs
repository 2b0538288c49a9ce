//! Session lifecycle for a connected peripheral
//! This module owns the connect/disconnect state machine: device selection,
//! GATT connection, service and characteristic discovery, and the cleanup
//! shared by user-initiated and spontaneous disconnects.

use std::sync::Arc;

use futures_util::StreamExt;
use log::{error, info, warn};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::session_config::SessionConfig;
use crate::core::bluetooth::constants::{CHARACTERISTIC_LOG_DEPTH, SERVICE_LOG_DEPTH};
use crate::core::bluetooth::gatt::{DeviceSelector, GattDevice, SelectionRequest};
use crate::core::bluetooth::properties::describe_properties;
use crate::core::bluetooth::types::{CharacteristicInfo, ServiceInfo};
use crate::logging::StructuralLogger;
use crate::state::StatePublisher;

/// Terminal failures of a single connect attempt.
///
/// None of these roll back entities already published during the attempt;
/// the published lists simply stop growing.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("device selection failed: {0}")]
    Selection(#[source] anyhow::Error),
    #[error("connection failed: {0}")]
    Connection(#[source] anyhow::Error),
    #[error("discovery failed: {0}")]
    Discovery(#[source] anyhow::Error),
    #[error("a connect attempt is already in progress")]
    Busy,
}

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Connecting,
    Discovering,
    Connected,
}

/// Handles owned while a device is selected.
struct ActiveSession {
    device: Arc<dyn GattDevice>,
    watcher_cancel: CancellationToken,
}

/// Drives the connect/disconnect lifecycle and publishes what it finds.
pub struct SessionManager {
    selector: Arc<dyn DeviceSelector>,
    publisher: Arc<dyn StatePublisher>,
    logger: StructuralLogger,
    config: SessionConfig,
    active: Arc<Mutex<Option<ActiveSession>>>,
    phase: Arc<Mutex<SessionPhase>>,
}

impl SessionManager {
    pub fn new(
        selector: Arc<dyn DeviceSelector>,
        publisher: Arc<dyn StatePublisher>,
        logger: StructuralLogger,
        config: SessionConfig,
    ) -> Self {
        Self {
            selector,
            publisher,
            logger,
            config,
            active: Arc::new(Mutex::new(None)),
            phase: Arc::new(Mutex::new(SessionPhase::Idle)),
        }
    }

    /// Current lifecycle phase.
    pub async fn phase(&self) -> SessionPhase {
        *self.phase.lock().await
    }

    /// Selects a device, connects, and runs the full discovery pass.
    ///
    /// Only one attempt may be in flight at a time; a concurrent call fails
    /// with [`SessionError::Busy`].
    pub async fn connect(&self) -> Result<(), SessionError> {
        {
            let mut phase = self.phase.lock().await;
            if *phase != SessionPhase::Idle {
                return Err(SessionError::Busy);
            }
            *phase = SessionPhase::Connecting;
        }

        match self.run_connect().await {
            Ok(()) => {
                *self.phase.lock().await = SessionPhase::Connected;
                Ok(())
            }
            Err(e) => {
                error!("Connect attempt failed: {e}");
                *self.phase.lock().await = SessionPhase::Idle;
                Err(e)
            }
        }
    }

    async fn run_connect(&self) -> Result<(), SessionError> {
        info!("Requesting Bluetooth device...");
        let request = SelectionRequest::from(&self.config);
        let device: Arc<dyn GattDevice> = Arc::from(
            self.selector
                .select_device(&request)
                .await
                .map_err(SessionError::Selection)?,
        );
        info!(
            "Selected device {} ({})",
            device.id(),
            device.name().unwrap_or_else(|| "unnamed".to_string())
        );

        // Watch for spontaneous disconnects before opening the link, so an
        // early drop is never missed.
        let watcher_cancel = CancellationToken::new();
        self.spawn_disconnect_watcher(device.clone(), watcher_cancel.clone())
            .await
            .map_err(SessionError::Connection)?;
        {
            let mut active = self.active.lock().await;
            if let Some(previous) = active.take() {
                previous.watcher_cancel.cancel();
            }
            *active = Some(ActiveSession {
                device: device.clone(),
                watcher_cancel,
            });
        }

        device.connect().await.map_err(SessionError::Connection)?;
        *self.phase.lock().await = SessionPhase::Discovering;

        info!("Connection successful, discovering services...");
        let services = device
            .primary_services()
            .await
            .map_err(SessionError::Discovery)?;
        info!("Discovered {} primary services", services.len());

        // Eager pass: every service is logged and published before any
        // characteristic traffic starts.
        for service in &services {
            self.logger
                .log(&service.descriptor(), SERVICE_LOG_DEPTH, "SERVICE");
            self.publisher.append_service(ServiceInfo {
                uuid: service.uuid(),
                is_primary: service.is_primary(),
            });
        }

        // Characteristic discovery is strictly sequential across services so
        // the peripheral never sees overlapping discovery requests.
        for service in &services {
            let characteristics = service
                .characteristics()
                .await
                .map_err(SessionError::Discovery)?;
            info!(
                "Service {}: {} characteristics",
                service.uuid(),
                characteristics.len()
            );
            for characteristic in &characteristics {
                let flags = characteristic.flags();
                self.publisher.append_characteristic(CharacteristicInfo {
                    uuid: characteristic.uuid(),
                    service_uuid: service.uuid(),
                    flags,
                });
                let summary = describe_properties(&flags);
                let description = if summary.is_empty() {
                    format!("CHARACTERISTIC {}", characteristic.uuid())
                } else {
                    format!("CHARACTERISTIC {} {}", characteristic.uuid(), summary)
                };
                self.logger.log(
                    &characteristic.descriptor(),
                    CHARACTERISTIC_LOG_DEPTH,
                    &description,
                );
            }
        }

        self.publisher.set_connect_trigger(false);
        self.publisher.set_connection_flag(false);
        info!("Discovery complete, session connected");
        Ok(())
    }

    /// User-initiated disconnect: closes the link, then runs the shared
    /// cleanup. Closing is best-effort and never blocks the cleanup.
    pub async fn disconnect(&self) {
        info!("Disconnecting from Bluetooth device...");
        let session = self.active.lock().await.take();
        if let Some(session) = session {
            session.watcher_cancel.cancel();
            if let Err(e) = session.device.close().await {
                warn!("Failed to close GATT connection: {e}");
            }
        }
        Self::cleanup(self.publisher.as_ref(), &self.phase).await;
    }

    /// Spawns the task that reacts to a platform-raised disconnect with the
    /// same cleanup as the user path (the link is already closed there).
    async fn spawn_disconnect_watcher(
        &self,
        device: Arc<dyn GattDevice>,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        let mut events = device.disconnect_events().await?;
        let publisher = self.publisher.clone();
        let phase = self.phase.clone();
        let active = self.active.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                event = events.next() => {
                    if event.is_some() {
                        info!("Bluetooth device disconnected");
                        active.lock().await.take();
                        Self::cleanup(publisher.as_ref(), &phase).await;
                    }
                }
            }
        });
        Ok(())
    }

    /// Cleanup shared by both disconnect paths. Only the service list is
    /// reset; published characteristics are intentionally left in place.
    async fn cleanup(publisher: &dyn StatePublisher, phase: &Mutex<SessionPhase>) {
        publisher.set_connect_trigger(true);
        publisher.set_connection_flag(true);
        publisher.reset_services();
        publisher.reset_view();
        *phase.lock().await = SessionPhase::Idle;
    }
}
