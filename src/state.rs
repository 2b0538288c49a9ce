//! Published session state
//! This module holds the externally visible state of a session, mutated only
//! through the [`StatePublisher`] boundary so the core stays decoupled from
//! any rendering technology.

use std::sync::Mutex;

use crate::core::bluetooth::{CharacteristicInfo, ServiceInfo};

/// Outbound boundary the session core publishes through.
pub trait StatePublisher: Send + Sync {
    /// Appends a discovered service, in discovery order.
    fn append_service(&self, service: ServiceInfo);
    /// Appends a discovered characteristic, in discovery order.
    fn append_characteristic(&self, characteristic: CharacteristicInfo);
    /// Publishes the disconnected flag.
    fn set_connection_flag(&self, is_disconnected: bool);
    /// Enables or disables the connect trigger affordance.
    fn set_connect_trigger(&self, enabled: bool);
    /// Empties the published service list.
    fn reset_services(&self);
    /// Returns the view to its root.
    fn reset_view(&self);
}

/// Snapshot of the externally visible session state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub is_disconnected: bool,
    pub all_services: Vec<ServiceInfo>,
    pub all_characteristics: Vec<CharacteristicInfo>,
    pub connect_enabled: bool,
    pub at_view_root: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            is_disconnected: true,
            all_services: Vec::new(),
            all_characteristics: Vec::new(),
            connect_enabled: true,
            at_view_root: true,
        }
    }
}

/// Default state holder backing the publisher boundary.
#[derive(Default)]
pub struct SessionState {
    inner: Mutex<SessionSnapshot>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().unwrap().clone()
    }
}

impl StatePublisher for SessionState {
    fn append_service(&self, service: ServiceInfo) {
        self.inner.lock().unwrap().all_services.push(service);
    }

    fn append_characteristic(&self, characteristic: CharacteristicInfo) {
        self.inner
            .lock()
            .unwrap()
            .all_characteristics
            .push(characteristic);
    }

    fn set_connection_flag(&self, is_disconnected: bool) {
        self.inner.lock().unwrap().is_disconnected = is_disconnected;
    }

    fn set_connect_trigger(&self, enabled: bool) {
        self.inner.lock().unwrap().connect_enabled = enabled;
    }

    fn reset_services(&self) {
        self.inner.lock().unwrap().all_services.clear();
    }

    fn reset_view(&self) {
        self.inner.lock().unwrap().at_view_root = true;
    }
}
