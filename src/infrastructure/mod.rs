//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with cpal, the transcription backend, notifications, etc.

pub mod backend;
pub mod config;
pub mod devices;
pub mod engine;
pub mod presence;

// Re-export adapters
pub use backend::{Profile, ProfilesClient, ProfilesError, RestUploadSink};
pub use config::XdgConfigStore;
pub use devices::CpalDeviceDirectory;
pub use engine::{CpalEngineFactory, SurfaceHandle};
pub use presence::{NoopPresence, NotifyRustPresence, TerminalPresence};
