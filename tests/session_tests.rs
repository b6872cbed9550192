//! Session controller integration tests
//!
//! Exercises the full session lifecycle against scripted port
//! implementations: bind/teardown bookkeeping, the recording state
//! machine, upload retry behavior, and presence release on every exit
//! path.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use scribe_booth::application::ports::{
    CaptureEngine, DeviceDirectory, DeviceError, EngineBinding, EngineError, EngineEvent,
    EngineFactory, PresenceError, PresenceIndicator, RenderSurface, UploadError, UploadSink,
};
use scribe_booth::application::{SessionController, SessionError};
use scribe_booth::domain::recording::{
    DeviceDescriptor, DeviceId, RecordedAudio, RecordedMimeType,
};
use scribe_booth::domain::session::{RecordingTitle, SessionStatus};

/// Which step of the scripted pipeline dies
#[derive(Debug, Clone, Copy, Default)]
struct FaultPlan {
    after_start: bool,
    on_finalize: bool,
}

struct ScriptedEngine {
    capturing: AtomicBool,
    elapsed: AtomicU64,
    fault: FaultPlan,
    teardowns: Arc<AtomicUsize>,
    started_device: Arc<StdMutex<Option<String>>>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

#[async_trait]
impl CaptureEngine for ScriptedEngine {
    async fn start(&self, device: Option<&DeviceId>) -> Result<(), EngineError> {
        *self.started_device.lock().unwrap() = device.map(|d| d.as_str().to_string());
        self.capturing.store(true, Ordering::SeqCst);
        if self.fault.after_start {
            // Pipeline dies once start has already returned; the
            // failure arrives asynchronously on the event channel
            self.capturing.store(false, Ordering::SeqCst);
            let _ = self.events.send(EngineEvent::Faulted {
                reason: "stream setup failed".to_string(),
            });
        }
        Ok(())
    }

    async fn pause(&self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn resume(&self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn finalize(&self) -> Result<(), EngineError> {
        self.capturing.store(false, Ordering::SeqCst);
        if self.fault.on_finalize {
            let _ = self.events.send(EngineEvent::Faulted {
                reason: "stream died".to_string(),
            });
        } else {
            let _ = self.events.send(EngineEvent::Progress { elapsed_ms: 1900 });
            let _ = self.events.send(EngineEvent::Completed {
                audio: RecordedAudio::new(vec![0xAB; 64], RecordedMimeType::Flac),
                elapsed_ms: 2000,
            });
        }
        Ok(())
    }

    async fn teardown(&self) {
        self.capturing.store(false, Ordering::SeqCst);
        self.teardowns.fetch_add(1, Ordering::SeqCst);
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn elapsed_ms(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }
}

struct ScriptedFactory {
    binds: Arc<AtomicUsize>,
    teardowns: Arc<AtomicUsize>,
    started_device: Arc<StdMutex<Option<String>>>,
    fault: FaultPlan,
}

#[async_trait]
impl EngineFactory for ScriptedFactory {
    async fn bind(&self) -> Result<EngineBinding, EngineError> {
        self.binds.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(EngineBinding {
            engine: Arc::new(ScriptedEngine {
                capturing: AtomicBool::new(false),
                elapsed: AtomicU64::new(0),
                fault: self.fault,
                teardowns: Arc::clone(&self.teardowns),
                started_device: Arc::clone(&self.started_device),
                events: tx,
            }),
            events: rx,
        })
    }
}

struct TwoDeviceDirectory;

#[async_trait]
impl DeviceDirectory for TwoDeviceDirectory {
    async fn list(&self) -> Result<Vec<DeviceDescriptor>, DeviceError> {
        Ok(vec![
            DeviceDescriptor::new("mic-1", "Built-in Microphone"),
            DeviceDescriptor::new("mic-2", "USB Microphone"),
        ])
    }
}

struct CountingPresence {
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl PresenceIndicator for CountingPresence {
    async fn acquire(&self) -> Result<(), PresenceError> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

struct ReadySurface;

#[async_trait]
impl RenderSurface for ReadySurface {
    async fn ready(&self) -> Result<(), EngineError> {
        Ok(())
    }
}

struct FlakySink {
    failures_remaining: AtomicUsize,
    submissions: AtomicUsize,
    last_title: StdMutex<Option<String>>,
}

impl FlakySink {
    fn failing(times: usize) -> Self {
        Self {
            failures_remaining: AtomicUsize::new(times),
            submissions: AtomicUsize::new(0),
            last_title: StdMutex::new(None),
        }
    }
}

#[async_trait]
impl UploadSink for FlakySink {
    async fn submit(
        &self,
        _audio: &RecordedAudio,
        title: &RecordingTitle,
    ) -> Result<(), UploadError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        *self.last_title.lock().unwrap() = Some(title.as_str().to_string());

        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(UploadError::Rejected("HTTP 503: try later".to_string()));
        }
        Ok(())
    }
}

struct Harness {
    controller:
        SessionController<ScriptedFactory, TwoDeviceDirectory, CountingPresence>,
    binds: Arc<AtomicUsize>,
    teardowns: Arc<AtomicUsize>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    started_device: Arc<StdMutex<Option<String>>>,
}

fn harness(fault_on_finalize: bool) -> Harness {
    harness_with(FaultPlan {
        after_start: false,
        on_finalize: fault_on_finalize,
    })
}

fn harness_with(fault: FaultPlan) -> Harness {
    let binds = Arc::new(AtomicUsize::new(0));
    let teardowns = Arc::new(AtomicUsize::new(0));
    let acquired = Arc::new(AtomicUsize::new(0));
    let released = Arc::new(AtomicUsize::new(0));
    let started_device = Arc::new(StdMutex::new(None));

    let controller = SessionController::new(
        ScriptedFactory {
            binds: Arc::clone(&binds),
            teardowns: Arc::clone(&teardowns),
            started_device: Arc::clone(&started_device),
            fault,
        },
        TwoDeviceDirectory,
        CountingPresence {
            acquired: Arc::clone(&acquired),
            released: Arc::clone(&released),
        },
        Arc::new(ReadySurface),
    );

    Harness {
        controller,
        binds,
        teardowns,
        acquired,
        released,
        started_device,
    }
}

#[tokio::test]
async fn rebinding_tears_down_previous_engine() {
    let h = harness(false);

    h.controller.initialize().await.unwrap();
    h.controller.initialize().await.unwrap();
    h.controller.initialize().await.unwrap();

    assert_eq!(h.binds.load(Ordering::SeqCst), 3);
    assert_eq!(h.teardowns.load(Ordering::SeqCst), 2);
    assert!(h.controller.is_bound().await);
}

#[tokio::test]
async fn close_while_recording_leaves_fresh_idle_session() {
    let h = harness(false);

    h.controller.initialize().await.unwrap();
    h.controller.start().await.unwrap();
    assert_eq!(h.controller.status().await, SessionStatus::Recording);

    h.controller.discard_and_close().await;

    assert_eq!(h.controller.status().await, SessionStatus::Idle);
    assert!(!h.controller.is_bound().await);
    assert!(h.controller.payload_size().await.is_none());
    assert_eq!(h.teardowns.load(Ordering::SeqCst), 1);
    assert!(h.released.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn submit_failure_keeps_payload_for_retry() {
    let h = harness(false);
    let sink = FlakySink::failing(1);

    h.controller.initialize().await.unwrap();
    h.controller.start().await.unwrap();
    h.controller.stop().await.unwrap();
    assert_eq!(h.controller.status().await, SessionStatus::Completed);

    let first = h.controller.submit(&sink).await;
    assert!(matches!(first, Err(SessionError::Upload(_))));
    assert_eq!(h.controller.status().await, SessionStatus::Completed);
    assert_eq!(h.controller.payload_size().await, Some(64));

    h.controller.submit(&sink).await.unwrap();
    assert_eq!(h.controller.status().await, SessionStatus::Idle);
    assert_eq!(sink.submissions.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn submit_without_completed_recording_is_rejected() {
    let h = harness(false);
    let sink = FlakySink::failing(0);

    h.controller.initialize().await.unwrap();

    let result = h.controller.submit(&sink).await;
    assert!(matches!(result, Err(SessionError::NothingToSubmit)));
    assert_eq!(sink.submissions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn pause_resume_roundtrip_reaches_completed() {
    let h = harness(false);

    h.controller.initialize().await.unwrap();
    h.controller.start().await.unwrap();

    h.controller.pause().await.unwrap();
    assert_eq!(h.controller.status().await, SessionStatus::Paused);

    // Repeated pause is a guarded no-op
    h.controller.pause().await.unwrap();
    assert_eq!(h.controller.status().await, SessionStatus::Paused);

    h.controller.resume().await.unwrap();
    assert_eq!(h.controller.status().await, SessionStatus::Recording);

    h.controller.stop().await.unwrap();
    assert_eq!(h.controller.status().await, SessionStatus::Completed);
    assert_eq!(h.controller.elapsed_ms().await, 2000);
}

#[tokio::test]
async fn fault_after_start_is_reported_through_the_event_pump() {
    let h = harness_with(FaultPlan {
        after_start: true,
        on_finalize: false,
    });

    h.controller.initialize().await.unwrap();
    h.controller.start().await.unwrap();
    assert_eq!(h.controller.status().await, SessionStatus::Recording);

    // The controller learns about the dead pipeline on the next tick
    h.controller.pump_events().await;

    assert_eq!(h.controller.status().await, SessionStatus::Idle);
    assert!(h.controller.payload_size().await.is_none());
    assert!(h.released.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn faulted_finalize_resets_session() {
    let h = harness(true);

    h.controller.initialize().await.unwrap();
    h.controller.start().await.unwrap();

    let result = h.controller.stop().await;
    assert!(matches!(
        result,
        Err(SessionError::Engine(EngineError::CaptureFailed(_)))
    ));
    assert_eq!(h.controller.status().await, SessionStatus::Idle);
    assert!(h.controller.payload_size().await.is_none());
    assert!(h.released.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn start_while_recording_is_invalid() {
    let h = harness(false);

    h.controller.initialize().await.unwrap();
    h.controller.start().await.unwrap();

    let result = h.controller.start().await;
    assert!(matches!(result, Err(SessionError::InvalidState(_))));
    assert_eq!(h.controller.status().await, SessionStatus::Recording);
    assert_eq!(h.acquired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn selected_device_reaches_the_engine() {
    let h = harness(false);

    h.controller.initialize().await.unwrap();
    h.controller
        .select_device(Some(DeviceId::from("mic-2")))
        .await;
    h.controller.start().await.unwrap();

    assert_eq!(
        h.started_device.lock().unwrap().as_deref(),
        Some("mic-2")
    );
}

#[tokio::test]
async fn title_flows_into_the_upload() {
    let h = harness(false);
    let sink = FlakySink::failing(0);

    h.controller.initialize().await.unwrap();
    h.controller.set_title(Some("Standup notes".to_string())).await;
    h.controller.start().await.unwrap();
    h.controller.stop().await.unwrap();
    h.controller.submit(&sink).await.unwrap();

    assert_eq!(
        sink.last_title.lock().unwrap().as_deref(),
        Some("Standup notes")
    );
}

#[tokio::test]
async fn blank_title_falls_back_to_timestamp_default() {
    let h = harness(false);
    let sink = FlakySink::failing(0);

    h.controller.initialize().await.unwrap();
    h.controller.set_title(Some("   ".to_string())).await;
    h.controller.start().await.unwrap();
    h.controller.stop().await.unwrap();
    h.controller.submit(&sink).await.unwrap();

    let title = sink.last_title.lock().unwrap().clone().unwrap();
    assert!(title.starts_with("Recording "), "got title: {}", title);
}
