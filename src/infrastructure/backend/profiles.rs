//! Profiles REST client
//!
//! The surrounding application keeps saved transcription profiles on
//! the backend; this client covers the profile surface the CLI needs:
//! list, delete, and the user's default profile.

use serde::Deserialize;
use thiserror::Error;

use super::sink::API_KEY_HEADER;

const PROFILES_PATH: &str = "/api/v1/profiles";
const DEFAULT_PROFILE_PATH: &str = "/api/v1/user/default-profile";

/// Profiles API errors
#[derive(Debug, Clone, Error)]
pub enum ProfilesError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// One saved transcription profile
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub name: String,
}

/// Client for the backend's profiles endpoints
pub struct ProfilesClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ProfilesClient {
    /// Create a client for the given backend
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProfilesError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProfilesError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProfilesError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }

    /// List all saved profiles
    pub async fn list(&self) -> Result<Vec<Profile>, ProfilesError> {
        let response = self
            .client
            .get(self.url(PROFILES_PATH))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ProfilesError::RequestFailed(e.to_string()))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProfilesError::ParseError(e.to_string()))
    }

    /// Delete a profile by id
    pub async fn delete(&self, id: &str) -> Result<(), ProfilesError> {
        let response = self
            .client
            .delete(self.url(&format!("{}/{}", PROFILES_PATH, id)))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ProfilesError::RequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProfilesError::NotFound(id.to_string()));
        }

        Self::check_status(response).await?;
        Ok(())
    }

    /// The user's default profile, or None when no default is set
    pub async fn default_profile(&self) -> Result<Option<Profile>, ProfilesError> {
        let response = self
            .client
            .get(self.url(DEFAULT_PROFILE_PATH))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ProfilesError::RequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let profile = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProfilesError::ParseError(e.to_string()))?;

        Ok(Some(profile))
    }
}
