//! Recording presence port interface
//!
//! While a capture is in flight the host environment should show a
//! visible indicator. Modeled as a scoped resource: acquired on
//! entering Recording, released on every path that leaves
//! Recording/Paused, including abrupt close.

use async_trait::async_trait;
use thiserror::Error;

/// Presence indicator errors
#[derive(Debug, Clone, Error)]
pub enum PresenceError {
    #[error("Presence indicator unavailable: {0}")]
    Unavailable(String),
}

/// Port for the process-wide "recording in progress" indicator
#[async_trait]
pub trait PresenceIndicator: Send + Sync {
    /// Show the indicator. Failures are non-fatal to the session.
    async fn acquire(&self) -> Result<(), PresenceError>;

    /// Remove the indicator. Idempotent.
    async fn release(&self);
}
