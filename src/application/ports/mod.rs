//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod devices;
pub mod engine;
pub mod presence;
pub mod sink;

// Re-export common types
pub use config::ConfigStore;
pub use devices::{DeviceDirectory, DeviceError};
pub use engine::{
    CaptureEngine, EngineBinding, EngineError, EngineEvent, EngineFactory, RenderSurface,
};
pub use presence::{PresenceError, PresenceIndicator};
pub use sink::{UploadError, UploadSink};
