//! Captured-audio and input-device value objects

pub mod audio;
pub mod device;

pub use audio::{RecordedAudio, RecordedMimeType};
pub use device::{DeviceDescriptor, DeviceId};
