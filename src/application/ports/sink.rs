//! Upload sink port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::RecordedAudio;
use crate::domain::session::RecordingTitle;

/// Upload errors.
/// The backend contract surfaces no distinction beyond a generic
/// failure, but auth problems get their own variant so the CLI can
/// point at the API key.
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Upload request failed: {0}")]
    RequestFailed(String),

    #[error("Upload rejected by backend: {0}")]
    Rejected(String),
}

/// Port that persists a finished recording to the backend.
/// Resolves only on durable acceptance.
#[async_trait]
pub trait UploadSink: Send + Sync {
    /// Submit the payload under the given title.
    async fn submit(
        &self,
        audio: &RecordedAudio,
        title: &RecordingTitle,
    ) -> Result<(), UploadError>;
}
