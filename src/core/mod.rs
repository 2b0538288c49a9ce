//! Core functionality for the GATT explorer
//! This module contains the session lifecycle and the transport boundary.

pub mod bluetooth;

// Re-export commonly used types
pub use bluetooth::{SessionError, SessionManager, SessionPhase};
