//! Rendering surface readiness signal
//!
//! Replaces the fixed "wait a bit and hope the surface mounted" delay
//! with an explicit mounted signal the controller can await.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::application::ports::{EngineError, RenderSurface};

/// Watch-channel backed surface handle.
/// The owner flips the mounted flag when the rendering surface is
/// attached or detached; `ready` resolves as soon as it is mounted.
pub struct SurfaceHandle {
    state: watch::Sender<bool>,
}

impl SurfaceHandle {
    /// Create an unmounted surface
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(false),
        }
    }

    /// Create a surface that is already mounted (e.g. a terminal)
    pub fn mounted() -> Self {
        Self {
            state: watch::Sender::new(true),
        }
    }

    /// Signal that the surface is attached
    pub fn mark_mounted(&self) {
        let _ = self.state.send(true);
    }

    /// Signal that the surface was detached
    pub fn mark_unmounted(&self) {
        let _ = self.state.send(false);
    }

    /// Whether the surface is currently mounted
    pub fn is_mounted(&self) -> bool {
        *self.state.borrow()
    }
}

impl Default for SurfaceHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RenderSurface for SurfaceHandle {
    async fn ready(&self) -> Result<(), EngineError> {
        let mut rx = self.state.subscribe();
        rx.wait_for(|mounted| *mounted)
            .await
            .map_err(|_| EngineError::SurfaceNotMounted)?;
        Ok(())
    }
}
