//! REST upload sink adapter
//!
//! Posts the finished recording to the transcription backend. The
//! payload travels base64-inlined in a JSON body; the backend treats it
//! as an opaque blob.

use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::{UploadError, UploadSink};
use crate::domain::recording::RecordedAudio;
use crate::domain::session::RecordingTitle;

/// Header carrying the API key on every backend request
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Upload endpoint path
const RECORDINGS_PATH: &str = "/api/v1/recordings";

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    title: &'a str,
    audio: AudioPayload,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioPayload {
    mime_type: String,
    data: String,
}

/// Upload sink talking to the transcription backend
pub struct RestUploadSink {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestUploadSink {
    /// Create a sink for the given backend
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, RECORDINGS_PATH)
    }

    fn build_request<'a>(audio: &RecordedAudio, title: &'a RecordingTitle) -> UploadRequest<'a> {
        UploadRequest {
            title: title.as_str(),
            audio: AudioPayload {
                mime_type: audio.mime_type().to_string(),
                data: audio.to_base64(),
            },
        }
    }
}

#[async_trait]
impl UploadSink for RestUploadSink {
    async fn submit(
        &self,
        audio: &RecordedAudio,
        title: &RecordingTitle,
    ) -> Result<(), UploadError> {
        let body = Self::build_request(audio, title);

        let response = self
            .client
            .post(self.upload_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(UploadError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UploadError::Rejected(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::RecordedMimeType;

    #[test]
    fn upload_url_joins_base_and_path() {
        let sink = RestUploadSink::new("http://localhost:8080", "key");
        assert_eq!(
            sink.upload_url(),
            "http://localhost:8080/api/v1/recordings"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let sink = RestUploadSink::new("http://localhost:8080/", "key");
        assert_eq!(
            sink.upload_url(),
            "http://localhost:8080/api/v1/recordings"
        );
    }

    #[test]
    fn build_request_inlines_payload() {
        let audio = RecordedAudio::new(vec![1, 2, 3], RecordedMimeType::Flac);
        let title = RecordingTitle::resolve(Some("standup"));

        let request = RestUploadSink::build_request(&audio, &title);

        assert_eq!(request.title, "standup");
        assert_eq!(request.audio.mime_type, "audio/flac");
        assert_eq!(request.audio.data, audio.to_base64());
    }
}
