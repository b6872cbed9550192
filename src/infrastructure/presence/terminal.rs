//! Terminal-title presence indicator
//!
//! Overwrites the terminal title with a recording marker while capture
//! is in flight and restores it afterwards.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::application::ports::{PresenceError, PresenceIndicator};

/// Presence indicator that rewrites the terminal title
pub struct TerminalPresence {
    app_name: String,
    active: AtomicBool,
}

impl TerminalPresence {
    /// Create an indicator labeled with the default app name
    pub fn new() -> Self {
        Self::with_app_name("scribe-booth")
    }

    /// Create with a custom app name
    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            active: AtomicBool::new(false),
        }
    }

    fn set_title(title: &str) -> io::Result<()> {
        let mut stderr = io::stderr();
        // OSC 0: set icon name and window title
        write!(stderr, "\x1b]0;{}\x07", title)?;
        stderr.flush()
    }
}

impl Default for TerminalPresence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresenceIndicator for TerminalPresence {
    async fn acquire(&self) -> Result<(), PresenceError> {
        Self::set_title(&format!("REC ● {}", self.app_name))
            .map_err(|e| PresenceError::Unavailable(e.to_string()))?;
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn release(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            let _ = Self::set_title(&self.app_name);
        }
    }
}
