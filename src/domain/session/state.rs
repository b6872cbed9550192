//! Recording session state machine

use std::fmt;
use thiserror::Error;

use crate::domain::recording::{DeviceId, RecordedAudio};

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Recording,
    Paused,
    Completed,
}

impl SessionStatus {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    /// Whether capture is in flight (recording or paused)
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid session transition: cannot {action} while in {current_status} state")]
pub struct InvalidTransition {
    pub current_status: SessionStatus,
    pub action: &'static str,
}

/// Recording session entity.
/// One instance per dialog-open lifecycle; destroyed (reset to idle,
/// payload discarded) when the session is closed or a new one starts.
///
/// State machine:
///   IDLE -> RECORDING (begin)
///   RECORDING -> PAUSED (pause)
///   PAUSED -> RECORDING (resume)
///   RECORDING/PAUSED -> COMPLETED (complete)
///   COMPLETED -> RECORDING (begin, discards the stale payload)
///   any -> IDLE (reset)
///
/// Invariants: the payload is present only while COMPLETED, and
/// `elapsed_ms` only advances while RECORDING.
#[derive(Debug, Default)]
pub struct RecordingSession {
    status: SessionStatus,
    elapsed_ms: u64,
    selected_device: Option<DeviceId>,
    title: Option<String>,
    payload: Option<RecordedAudio>,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current status
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Elapsed active recording time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// The device chosen for this session, if any
    pub fn selected_device(&self) -> Option<&DeviceId> {
        self.selected_device.as_ref()
    }

    /// The user-entered title, if any
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The captured payload; present only while completed
    pub fn payload(&self) -> Option<&RecordedAudio> {
        self.payload.as_ref()
    }

    /// Choose the input device for the next recording
    pub fn select_device(&mut self, device: Option<DeviceId>) {
        self.selected_device = device;
    }

    /// Set the user-entered title
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Transition to RECORDING.
    /// Valid from IDLE, or from COMPLETED when starting a fresh take;
    /// either way the elapsed counter restarts and any stale payload
    /// is discarded.
    pub fn begin(&mut self) -> Result<(), InvalidTransition> {
        match self.status {
            SessionStatus::Idle | SessionStatus::Completed => {
                self.status = SessionStatus::Recording;
                self.elapsed_ms = 0;
                self.payload = None;
                Ok(())
            }
            current_status => Err(InvalidTransition {
                current_status,
                action: "start recording",
            }),
        }
    }

    /// Transition from RECORDING to PAUSED
    pub fn pause(&mut self) -> Result<(), InvalidTransition> {
        if self.status != SessionStatus::Recording {
            return Err(InvalidTransition {
                current_status: self.status,
                action: "pause",
            });
        }
        self.status = SessionStatus::Paused;
        Ok(())
    }

    /// Transition from PAUSED to RECORDING
    pub fn resume(&mut self) -> Result<(), InvalidTransition> {
        if self.status != SessionStatus::Paused {
            return Err(InvalidTransition {
                current_status: self.status,
                action: "resume",
            });
        }
        self.status = SessionStatus::Recording;
        Ok(())
    }

    /// Transition from RECORDING or PAUSED to COMPLETED, capturing the
    /// finished payload and the final active-time elapsed value.
    pub fn complete(
        &mut self,
        payload: RecordedAudio,
        elapsed_ms: u64,
    ) -> Result<(), InvalidTransition> {
        if !self.status.is_active() {
            return Err(InvalidTransition {
                current_status: self.status,
                action: "complete",
            });
        }
        self.status = SessionStatus::Completed;
        self.elapsed_ms = elapsed_ms.max(self.elapsed_ms);
        self.payload = Some(payload);
        Ok(())
    }

    /// Advance the elapsed counter. Progress reports only take effect
    /// while RECORDING and never move the counter backwards.
    pub fn observe_progress(&mut self, elapsed_ms: u64) {
        if self.status == SessionStatus::Recording {
            self.elapsed_ms = self.elapsed_ms.max(elapsed_ms);
        }
    }

    /// Destroy the session: back to IDLE with the payload discarded.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
