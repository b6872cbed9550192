//! Desktop-notification presence indicator using notify-rust
//!
//! Works on Windows, macOS, and Linux.

use async_trait::async_trait;

use crate::application::ports::{PresenceError, PresenceIndicator};

/// Presence indicator that shows desktop notifications
pub struct NotifyRustPresence {
    /// Application name for notifications
    app_name: String,
}

impl NotifyRustPresence {
    /// Create a notify-rust presence indicator
    pub fn new() -> Self {
        Self {
            app_name: "ScribeBooth".to_string(),
        }
    }

    /// Create with custom app name
    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    async fn notify(&self, summary: &str, body: &str, icon: &str) -> Result<(), PresenceError> {
        let app_name = self.app_name.clone();
        let summary = summary.to_owned();
        let body = body.to_owned();
        let icon = icon.to_owned();

        // notify-rust operations can block, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .appname(&app_name)
                .summary(&summary)
                .body(&body)
                .icon(&icon)
                .show()
                .map_err(|e| PresenceError::Unavailable(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| PresenceError::Unavailable(format!("Task join error: {}", e)))?
    }
}

impl Default for NotifyRustPresence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresenceIndicator for NotifyRustPresence {
    async fn acquire(&self) -> Result<(), PresenceError> {
        self.notify(
            "Recording in progress",
            "Microphone capture is active",
            "audio-input-microphone",
        )
        .await
    }

    async fn release(&self) {
        let _ = self
            .notify("Recording stopped", "Microphone released", "dialog-ok")
            .await;
    }
}
