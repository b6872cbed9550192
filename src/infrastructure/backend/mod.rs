//! Transcription backend REST adapters

pub mod profiles;
pub mod sink;

pub use profiles::{Profile, ProfilesClient, ProfilesError};
pub use sink::RestUploadSink;
