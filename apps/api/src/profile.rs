//! Applicant profile retrieval.
//!
//! The profile is opaque JSON that is serialized straight into the prompt.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Profile service returned status {0}")]
    Status(u16),

    #[error("Profile {0} is empty")]
    Empty(String),

    #[error("No profile source configured")]
    NotConfigured,

    #[error("Invalid profile URL: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self, profile_id: &str) -> Result<Value, ProfileError>;
}

/// Fetches profiles with `GET {base_url}/{profile_id}`.
#[derive(Clone)]
pub struct HttpProfileClient {
    client: Client,
    base_url: Option<String>,
    token: Option<String>,
}

impl HttpProfileClient {
    pub fn new(base_url: Option<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            token,
        }
    }

    /// Appends `profile_id` as exactly one percent-encoded path segment.
    fn profile_url(&self, profile_id: &str) -> Result<Url, ProfileError> {
        let base = self.base_url.as_deref().ok_or(ProfileError::NotConfigured)?;
        if matches!(profile_id.trim(), "" | "." | "..") {
            return Err(ProfileError::InvalidUrl(format!(
                "'{profile_id}' is not a profile id"
            )));
        }

        let mut url = Url::parse(base).map_err(|e| ProfileError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ProfileError::InvalidUrl(format!("{base} cannot take a path")))?
            .pop_if_empty()
            .push(profile_id);
        Ok(url)
    }
}

#[async_trait]
impl ProfileSource for HttpProfileClient {
    async fn fetch(&self, profile_id: &str) -> Result<Value, ProfileError> {
        let url = self.profile_url(profile_id)?;
        debug!("Fetching user data from {url}");

        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            error!("HTTP error occurred: {status} for {url}");
            return Err(ProfileError::Status(status.as_u16()));
        }

        let profile: Value = response.json().await?;
        if is_empty_profile(&profile) {
            return Err(ProfileError::Empty(profile_id.to_string()));
        }
        Ok(profile)
    }
}

/// `null`, `{}` and `[]` carry nothing to answer from.
pub fn is_empty_profile(profile: &Value) -> bool {
    match profile {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
