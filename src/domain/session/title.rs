//! Recording title value object

use std::fmt;

use chrono::Local;

/// Title attached to an uploaded recording.
/// Falls back to a timestamp-derived default when the user left it blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingTitle(String);

impl RecordingTitle {
    /// Build a title from optional user input, trimming whitespace and
    /// substituting the timestamp default for empty input.
    pub fn resolve(input: Option<&str>) -> Self {
        match input.map(str::trim) {
            Some(t) if !t.is_empty() => Self(t.to_string()),
            _ => Self::timestamped(),
        }
    }

    /// The timestamp-derived default, e.g. "Recording 2026-08-25 14:30"
    pub fn timestamped() -> Self {
        Self(format!("Recording {}", Local::now().format("%Y-%m-%d %H:%M")))
    }

    /// The title text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordingTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_keeps_user_input() {
        let title = RecordingTitle::resolve(Some("standup notes"));
        assert_eq!(title.as_str(), "standup notes");
    }

    #[test]
    fn resolve_trims_whitespace() {
        let title = RecordingTitle::resolve(Some("  meeting  "));
        assert_eq!(title.as_str(), "meeting");
    }

    #[test]
    fn resolve_defaults_on_none() {
        let title = RecordingTitle::resolve(None);
        assert!(title.as_str().starts_with("Recording "));
    }

    #[test]
    fn resolve_defaults_on_blank() {
        let title = RecordingTitle::resolve(Some("   "));
        assert!(title.as_str().starts_with("Recording "));
    }

    #[test]
    fn timestamped_contains_date() {
        let title = RecordingTitle::timestamped();
        // "Recording YYYY-MM-DD HH:MM"
        assert_eq!(title.as_str().len(), "Recording ".len() + 16);
    }
}
