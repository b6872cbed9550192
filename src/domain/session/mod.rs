//! Recording session entity and related value objects

pub mod state;
pub mod title;

pub use state::{InvalidTransition, RecordingSession, SessionStatus};
pub use title::RecordingTitle;
