//! No-op presence indicator

use async_trait::async_trait;

use crate::application::ports::{PresenceError, PresenceIndicator};

/// Presence indicator that does nothing
#[derive(Debug, Default)]
pub struct NoopPresence;

impl NoopPresence {
    /// Create a no-op presence indicator
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PresenceIndicator for NoopPresence {
    async fn acquire(&self) -> Result<(), PresenceError> {
        Ok(())
    }

    async fn release(&self) {}
}
