//! Input device enumeration using cpal

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait};

use crate::application::ports::{DeviceDirectory, DeviceError};
use crate::domain::recording::DeviceDescriptor;

/// Device directory backed by the default cpal host.
/// Queried fresh on every session open; the default device (when the
/// host reports one) is listed first.
#[derive(Debug, Default)]
pub struct CpalDeviceDirectory;

impl CpalDeviceDirectory {
    /// Create the directory
    pub fn new() -> Self {
        Self
    }

    fn enumerate() -> Result<Vec<DeviceDescriptor>, DeviceError> {
        let host = cpal::default_host();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());

        let mut devices = Vec::new();
        for device in host
            .input_devices()
            .map_err(|e| DeviceError::EnumerationFailed(e.to_string()))?
        {
            if let Ok(name) = device.name() {
                devices.push(DeviceDescriptor::new(name.clone(), name));
            }
        }

        if devices.is_empty() {
            return Err(DeviceError::NoDevices);
        }

        // Default device first so "no selection" and "first entry" agree
        if let Some(default_name) = default_name {
            if let Some(pos) = devices.iter().position(|d| d.label == default_name) {
                let default = devices.remove(pos);
                devices.insert(0, default);
            }
        }

        Ok(devices)
    }
}

#[async_trait]
impl DeviceDirectory for CpalDeviceDirectory {
    async fn list(&self) -> Result<Vec<DeviceDescriptor>, DeviceError> {
        // Enumeration can block on some hosts
        tokio::task::spawn_blocking(Self::enumerate)
            .await
            .map_err(|e| DeviceError::EnumerationFailed(format!("Task join error: {}", e)))?
    }
}
