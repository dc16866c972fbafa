//! Bedrock Runtime `InvokeModel` adapter.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use tracing::{debug, error};

use super::{
    DecodingParams, GenerationRequest, GenerationResponse, InferenceClient, InferenceError,
};

/// Bedrock Runtime client handle. Cheap to clone; build once per process.
#[derive(Clone)]
pub struct BedrockClient {
    client: Client,
}

impl BedrockClient {
    /// Loads AWS credentials from the default provider chain for `region`.
    pub async fn from_region(region: &str) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl InferenceClient for BedrockClient {
    async fn invoke(
        &self,
        model_id: &str,
        prompt: &str,
        params: &DecodingParams,
    ) -> Result<String, InferenceError> {
        let body = serde_json::to_vec(&GenerationRequest::new(prompt, params))?;

        debug!(
            model = %model_id,
            max_gen_len = params.max_gen_len,
            temperature = params.temperature,
            "Calling Bedrock InvokeModel"
        );

        let output = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|err| match err {
                SdkError::ServiceError(service) => {
                    let message = service.into_err().to_string();
                    error!("A client error occurred: {message}");
                    InferenceError::Service(message)
                }
                other => InferenceError::Unexpected(other.to_string()),
            })?;

        let response: GenerationResponse = serde_json::from_slice(output.body().as_ref())?;

        debug!(
            prompt_tokens = ?response.prompt_token_count,
            generation_tokens = ?response.generation_token_count,
            stop_reason = ?response.stop_reason,
            "Bedrock call succeeded"
        );

        Ok(response.generation)
    }
}
