/// LLM client: the single point of entry for model inference.
///
/// No other module may talk to the model endpoint directly. Handlers receive an
/// `Arc<dyn InferenceClient>` through `AppState`, built once at startup.
///
/// Calls are made exactly once; there is no retry layer.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod bedrock;

pub use bedrock::BedrockClient;

/// Model used when `BEDROCK_MODEL_ID` is not set.
pub const DEFAULT_MODEL_ID: &str = "us.meta.llama3-2-90b-instruct-v1:0";

#[derive(Debug, Error)]
pub enum InferenceError {
    /// The service received the call and rejected it (throttling, validation,
    /// access denied, model not ready...).
    #[error("Model service error: {0}")]
    Service(String),

    #[error("Unexpected inference failure: {0}")]
    Unexpected(String),

    #[error("Failed to decode model response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Generation controls sent with every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodingParams {
    pub max_gen_len: u32,
    /// Sampling randomness in `[0, 1]`; lower is more deterministic.
    pub temperature: f32,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self {
            max_gen_len: 300,
            temperature: 0.7,
        }
    }
}

/// Text-completion model invocation.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Sends `prompt` to `model_id` and returns the raw generated text.
    async fn invoke(
        &self,
        model_id: &str,
        prompt: &str,
        params: &DecodingParams,
    ) -> Result<String, InferenceError>;
}

/// Request body understood by text-generation models behind `InvokeModel`.
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    prompt: &'a str,
    max_gen_len: u32,
    temperature: f32,
}

impl<'a> GenerationRequest<'a> {
    fn new(prompt: &'a str, params: &DecodingParams) -> Self {
        Self {
            prompt,
            max_gen_len: params.max_gen_len,
            temperature: params.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    generation: String,
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    generation_token_count: Option<u32>,
    #[serde(default)]
    stop_reason: Option<String>,
}
