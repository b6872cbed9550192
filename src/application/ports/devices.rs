//! Device directory port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::DeviceDescriptor;

/// Device enumeration errors
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("Failed to enumerate audio input devices: {0}")]
    EnumerationFailed(String),

    #[error("No audio input devices found")]
    NoDevices,
}

/// Port for enumerating audio input devices.
/// Queried fresh on every session open; results are never persisted.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    /// List the available input devices, default device first.
    async fn list(&self) -> Result<Vec<DeviceDescriptor>, DeviceError>;
}
