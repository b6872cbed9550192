//! Capture engine port interfaces
//!
//! The engine is the capture/visualization pipeline bound to one
//! rendering surface. Its callback-style notifications are re-expressed
//! as a typed event stream consumed by the session controller.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::recording::{DeviceId, RecordedAudio};

/// Capture engine errors
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("Rendering surface is not mounted")]
    SurfaceNotMounted,

    #[error("Failed to bind capture engine: {0}")]
    BindFailed(String),

    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("Audio input device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("No capture engine is bound")]
    Unbound,

    #[error("Capture failed: {0}")]
    CaptureFailed(String),
}

/// Typed notifications emitted by a capture engine
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Periodic progress while capturing; `elapsed_ms` counts active
    /// recording time only (paused spans excluded)
    Progress { elapsed_ms: u64 },
    /// Capture finalized; carries the finished payload
    Completed {
        audio: RecordedAudio,
        elapsed_ms: u64,
    },
    /// The capture pipeline died; the session should be reset
    Faulted { reason: String },
}

/// Readiness signal of the surface an engine renders into.
/// Binding must wait for this instead of guessing with a fixed delay,
/// since mounting is asynchronous relative to session open.
#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// Resolves once the surface can host an engine binding.
    async fn ready(&self) -> Result<(), EngineError>;
}

/// One live capture/visualization pipeline.
///
/// `start` begins capture on the given device (host default when
/// `None`). `finalize` signals the engine to stop and encode; the
/// finished payload arrives asynchronously as [`EngineEvent::Completed`]
/// on the binding's event stream.
#[async_trait]
pub trait CaptureEngine: Send + Sync {
    /// Begin capturing from the given device
    async fn start(&self, device: Option<&DeviceId>) -> Result<(), EngineError>;

    /// Suspend capture; elapsed time freezes
    async fn pause(&self) -> Result<(), EngineError>;

    /// Continue a paused capture
    async fn resume(&self) -> Result<(), EngineError>;

    /// Stop capturing and produce the payload as an event
    async fn finalize(&self) -> Result<(), EngineError>;

    /// Release the capture pipeline without producing a payload.
    /// Idempotent; safe to call in any state.
    async fn teardown(&self);

    /// Whether a capture is in flight (paused counts as in flight)
    fn is_capturing(&self) -> bool;

    /// Active recording time in milliseconds
    fn elapsed_ms(&self) -> u64;
}

/// A live engine plus its event stream.
/// At most one binding exists at a time; a prior binding must be fully
/// torn down before a new one is created.
pub struct EngineBinding {
    pub engine: Arc<dyn CaptureEngine>,
    pub events: mpsc::UnboundedReceiver<EngineEvent>,
}

/// Creates fresh engine bindings, one per session open.
#[async_trait]
pub trait EngineFactory: Send + Sync {
    /// Build a new engine and its event channel
    async fn bind(&self) -> Result<EngineBinding, EngineError>;
}
