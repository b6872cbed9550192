//! Captured audio value object

use std::fmt;

/// MIME type of the capture pipeline's output.
/// The pipeline always encodes FLAC; the type exists so the upload
/// contract names the format explicitly instead of assuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordedMimeType {
    #[default]
    Flac,
}

impl RecordedMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flac => "audio/flac",
        }
    }
}

impl fmt::Display for RecordedMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value object holding one finished recording.
/// The session controller treats the bytes as an opaque blob; only the
/// upload sink and the encoder care about the actual format.
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    data: Vec<u8>,
    mime_type: RecordedMimeType,
}

impl RecordedAudio {
    /// Create from raw bytes
    pub fn new(data: Vec<u8>, mime_type: RecordedMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Get the raw bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> RecordedMimeType {
        self.mime_type
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Encode the audio data as base64
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}
