//! Recording session use case
//!
//! Drives one microphone-capture session from device selection through
//! captured-audio upload: bind engine, enumerate devices, start ->
//! (pause <-> resume)* -> stop, then hand the payload to the upload
//! sink on confirmation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::recording::{DeviceDescriptor, DeviceId};
use crate::domain::session::{InvalidTransition, RecordingSession, RecordingTitle, SessionStatus};

use super::ports::{
    DeviceDirectory, EngineBinding, EngineError, EngineEvent, EngineFactory, PresenceIndicator,
    RenderSurface, UploadError, UploadSink,
};

/// Errors from the session use case
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Capture engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error(transparent)]
    InvalidState(#[from] InvalidTransition),

    #[error("An upload is already in progress")]
    SubmitInProgress,

    #[error("No completed recording to upload")]
    NothingToSubmit,

    #[error("Capture engine closed before completing")]
    EngineClosed,
}

/// Recording session controller.
///
/// Owns the session entity and the single live engine binding. All
/// mutation happens through `&self` methods awaited from one logical
/// UI task; the mutexes only bridge the async suspension points.
pub struct SessionController<F, D, P>
where
    F: EngineFactory,
    D: DeviceDirectory,
    P: PresenceIndicator,
{
    factory: F,
    directory: D,
    presence: P,
    surface: Arc<dyn RenderSurface>,
    session: Mutex<RecordingSession>,
    binding: Mutex<Option<EngineBinding>>,
    devices: Mutex<Vec<DeviceDescriptor>>,
    submitting: AtomicBool,
}

impl<F, D, P> SessionController<F, D, P>
where
    F: EngineFactory,
    D: DeviceDirectory,
    P: PresenceIndicator,
{
    /// Create a controller with no engine bound yet
    pub fn new(factory: F, directory: D, presence: P, surface: Arc<dyn RenderSurface>) -> Self {
        Self {
            factory,
            directory,
            presence,
            surface,
            session: Mutex::new(RecordingSession::new()),
            binding: Mutex::new(None),
            devices: Mutex::new(Vec::new()),
            submitting: AtomicBool::new(false),
        }
    }

    /// Get the current session status
    pub async fn status(&self) -> SessionStatus {
        self.session.lock().await.status()
    }

    /// Elapsed active recording time in milliseconds
    pub async fn elapsed_ms(&self) -> u64 {
        self.session.lock().await.elapsed_ms()
    }

    /// Size of the completed payload, if any
    pub async fn payload_size(&self) -> Option<usize> {
        self.session.lock().await.payload().map(|p| p.size_bytes())
    }

    /// Human-readable size of the completed payload, if any
    pub async fn payload_size_display(&self) -> Option<String> {
        self.session
            .lock()
            .await
            .payload()
            .map(|p| p.human_readable_size())
    }

    /// Whether an engine is currently bound
    pub async fn is_bound(&self) -> bool {
        self.binding.lock().await.is_some()
    }

    /// The device list from the last `initialize`. Empty when
    /// enumeration failed, in which case device selection is hidden.
    pub async fn devices(&self) -> Vec<DeviceDescriptor> {
        self.devices.lock().await.clone()
    }

    /// Choose the input device for the next recording
    pub async fn select_device(&self, device: Option<DeviceId>) {
        self.session.lock().await.select_device(device);
    }

    /// Set the user-entered title
    pub async fn set_title(&self, title: Option<String>) {
        self.session.lock().await.set_title(title);
    }

    /// Bind a fresh engine to the rendering surface and refresh the
    /// device list. Tears down any previously bound engine first so a
    /// duplicate capture pipeline can never exist. Waits for the
    /// surface's explicit readiness signal; an unmountable surface
    /// leaves the engine unbound and the caller may retry.
    pub async fn initialize(&self) -> Result<(), SessionError> {
        self.surface.ready().await.map_err(|e| {
            warn!(error = %e, "surface not ready; engine left unbound");
            e
        })?;

        {
            let mut binding = self.binding.lock().await;
            if let Some(old) = binding.take() {
                debug!("tearing down previous engine binding");
                old.engine.teardown().await;
            }

            let mut session = self.session.lock().await;
            if session.status().is_active() {
                self.presence.release().await;
            }
            session.reset();

            match self.factory.bind().await {
                Ok(fresh) => *binding = Some(fresh),
                Err(e) => {
                    warn!(error = %e, "engine bind failed");
                    return Err(e.into());
                }
            }
        }

        self.refresh_devices().await;
        Ok(())
    }

    /// Enumerate devices; on failure the list stays empty and recording
    /// falls back to the system default device.
    async fn refresh_devices(&self) {
        let mut devices = self.devices.lock().await;
        match self.directory.list().await {
            Ok(list) => *devices = list,
            Err(e) => {
                warn!(error = %e, "device enumeration failed; hiding device selection");
                devices.clear();
            }
        }
    }

    /// Start capturing on the selected (or system default) device.
    /// On failure the session stays idle and the error is surfaced.
    pub async fn start(&self) -> Result<(), SessionError> {
        let engine = {
            let binding = self.binding.lock().await;
            let bound = binding.as_ref().ok_or(EngineError::Unbound)?;
            Arc::clone(&bound.engine)
        };

        let device = {
            let session = self.session.lock().await;
            if session.status().is_active() {
                return Err(InvalidTransition {
                    current_status: session.status(),
                    action: "start recording",
                }
                .into());
            }
            session.selected_device().cloned()
        };

        engine.start(device.as_ref()).await?;
        self.session.lock().await.begin()?;

        if let Err(e) = self.presence.acquire().await {
            warn!(error = %e, "presence indicator unavailable");
        }
        Ok(())
    }

    /// Suspend capture. Guarded no-op when the engine is unbound or the
    /// session is not recording.
    pub async fn pause(&self) -> Result<(), SessionError> {
        let Some(engine) = self.engine().await else {
            debug!("pause ignored: engine unbound");
            return Ok(());
        };
        if self.status().await != SessionStatus::Recording {
            debug!("pause ignored: not recording");
            return Ok(());
        }

        engine.pause().await?;
        if let Err(e) = self.session.lock().await.pause() {
            debug!(error = %e, "pause raced with another transition");
        }
        Ok(())
    }

    /// Continue a paused capture. Guarded no-op like `pause`.
    pub async fn resume(&self) -> Result<(), SessionError> {
        let Some(engine) = self.engine().await else {
            debug!("resume ignored: engine unbound");
            return Ok(());
        };
        if self.status().await != SessionStatus::Paused {
            debug!("resume ignored: not paused");
            return Ok(());
        }

        engine.resume().await?;
        if let Err(e) = self.session.lock().await.resume() {
            debug!(error = %e, "resume raced with another transition");
        }
        Ok(())
    }

    /// Drain pending engine events without blocking, folding progress
    /// into the session. Call from the UI tick.
    pub async fn pump_events(&self) {
        let mut events = Vec::new();
        {
            let mut binding = self.binding.lock().await;
            let Some(bound) = binding.as_mut() else { return };
            while let Ok(event) = bound.events.try_recv() {
                events.push(event);
            }
        }
        for event in events {
            self.apply_event(event).await;
        }
    }

    /// Signal the engine to finalize and wait for the completed payload.
    /// Guarded no-op unless the session is recording or paused.
    pub async fn stop(&self) -> Result<(), SessionError> {
        if !self.status().await.is_active() {
            debug!("stop ignored: no capture in flight");
            return Ok(());
        }

        let mut binding = self.binding.lock().await;
        let Some(bound) = binding.as_mut() else {
            debug!("stop ignored: engine unbound");
            return Ok(());
        };

        bound.engine.finalize().await?;

        while let Some(event) = bound.events.recv().await {
            match event {
                EngineEvent::Progress { elapsed_ms } => {
                    self.session.lock().await.observe_progress(elapsed_ms);
                }
                EngineEvent::Completed { audio, elapsed_ms } => {
                    self.session.lock().await.complete(audio, elapsed_ms)?;
                    self.presence.release().await;
                    return Ok(());
                }
                EngineEvent::Faulted { reason } => {
                    warn!(%reason, "capture pipeline faulted during stop");
                    self.presence.release().await;
                    self.session.lock().await.reset();
                    return Err(EngineError::CaptureFailed(reason).into());
                }
            }
        }

        // Channel closed without a completion: the pipeline is gone.
        self.presence.release().await;
        self.session.lock().await.reset();
        Err(SessionError::EngineClosed)
    }

    /// Hand the completed payload to the upload sink. While an upload
    /// is pending further submits are rejected. On failure the session
    /// stays completed with the payload retained so the user can retry;
    /// on success it resets to idle.
    pub async fn submit<S: UploadSink>(&self, sink: &S) -> Result<(), SessionError> {
        if self.submitting.swap(true, Ordering::SeqCst) {
            return Err(SessionError::SubmitInProgress);
        }

        let result = self.do_submit(sink).await;
        self.submitting.store(false, Ordering::SeqCst);
        result
    }

    async fn do_submit<S: UploadSink>(&self, sink: &S) -> Result<(), SessionError> {
        let (audio, title) = {
            let session = self.session.lock().await;
            if session.status() != SessionStatus::Completed {
                return Err(SessionError::NothingToSubmit);
            }
            let audio = session
                .payload()
                .cloned()
                .ok_or(SessionError::NothingToSubmit)?;
            (audio, RecordingTitle::resolve(session.title()))
        };

        sink.submit(&audio, &title).await?;
        self.session.lock().await.reset();
        Ok(())
    }

    /// Close the session: best-effort capture stop when recording or
    /// paused (no partial save), then release presence, discard the
    /// session and tear the binding down.
    pub async fn discard_and_close(&self) {
        let mut binding = self.binding.lock().await;
        if let Some(bound) = binding.take() {
            bound.engine.teardown().await;
        }
        drop(binding);

        self.presence.release().await;
        self.session.lock().await.reset();
    }

    async fn engine(&self) -> Option<Arc<dyn super::ports::CaptureEngine>> {
        self.binding
            .lock()
            .await
            .as_ref()
            .map(|b| Arc::clone(&b.engine))
    }

    /// State-machine transition function for engine notifications.
    async fn apply_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::Progress { elapsed_ms } => {
                self.session.lock().await.observe_progress(elapsed_ms);
            }
            EngineEvent::Completed { audio, elapsed_ms } => {
                if let Err(e) = self.session.lock().await.complete(audio, elapsed_ms) {
                    debug!(error = %e, "completion event ignored");
                    return;
                }
                self.presence.release().await;
            }
            EngineEvent::Faulted { reason } => {
                warn!(%reason, "capture pipeline faulted; resetting session");
                self.presence.release().await;
                self.session.lock().await.reset();
            }
        }
    }
}
