//! In-memory doubles for the external collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::answer::pipeline::PipelineConfig;
use crate::config::Config;
use crate::language::WhatlangIdentifier;
use crate::llm_client::{DecodingParams, InferenceClient, InferenceError};
use crate::profile::{ProfileError, ProfileSource};
use crate::state::AppState;

pub struct StubInference {
    reply: Result<String, String>,
    pub calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubInference {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Fails every call with a service-reported error.
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl InferenceClient for StubInference {
    async fn invoke(
        &self,
        _model_id: &str,
        prompt: &str,
        _params: &DecodingParams,
    ) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(InferenceError::Service)
    }
}

pub struct StubProfiles {
    profile: Option<Value>,
    requested: Mutex<Vec<String>>,
}

impl StubProfiles {
    pub fn with(profile: Value) -> Arc<Self> {
        Arc::new(Self {
            profile: Some(profile),
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            profile: None,
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileSource for StubProfiles {
    async fn fetch(&self, profile_id: &str) -> Result<Value, ProfileError> {
        self.requested.lock().unwrap().push(profile_id.to_string());
        self.profile.clone().ok_or(ProfileError::Status(503))
    }
}

pub fn test_config(pipeline: PipelineConfig) -> Config {
    Config {
        port: 0,
        rust_log: "debug".to_string(),
        aws_region: "us-east-1".to_string(),
        model_id: "test-model".to_string(),
        decoding: DecodingParams::default(),
        profile_api_url: None,
        profile_api_token: None,
        default_profile_id: Some("default-profile".to_string()),
        pipeline,
    }
}

pub fn test_state(
    llm: Arc<StubInference>,
    profiles: Arc<StubProfiles>,
    pipeline: PipelineConfig,
) -> AppState {
    AppState {
        detector: Arc::new(WhatlangIdentifier::new()),
        llm,
        profiles,
        config: test_config(pipeline),
    }
}
