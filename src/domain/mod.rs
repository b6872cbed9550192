//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recording;
pub mod session;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use recording::{DeviceDescriptor, DeviceId, RecordedAudio, RecordedMimeType};
pub use session::{InvalidTransition, RecordingSession, RecordingTitle, SessionStatus};
