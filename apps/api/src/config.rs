use anyhow::{bail, Context, Result};

use crate::answer::pipeline::PipelineConfig;
use crate::llm_client::{DecodingParams, DEFAULT_MODEL_ID};

/// Application configuration loaded from environment variables.
/// Only deployment-specific values are required; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub aws_region: String,
    pub model_id: String,
    pub decoding: DecodingParams,
    /// Base URL of the profile service. Profiles are fetched from `{url}/{id}`.
    pub profile_api_url: Option<String>,
    pub profile_api_token: Option<String>,
    pub default_profile_id: Option<String>,
    pub pipeline: PipelineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let decoding = DecodingParams {
            max_gen_len: parse_env("MAX_GEN_LEN", 300)?,
            temperature: parse_env("TEMPERATURE", 0.7)?,
        };
        if !(0.0..=1.0).contains(&decoding.temperature) {
            bail!(
                "TEMPERATURE must be between 0 and 1, got {}",
                decoding.temperature
            );
        }

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            aws_region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            model_id: std::env::var("BEDROCK_MODEL_ID")
                .unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string()),
            decoding,
            profile_api_url: optional_env("PROFILE_API_URL"),
            profile_api_token: optional_env("PROFILE_API_TOKEN"),
            default_profile_id: optional_env("DEFAULT_PROFILE_ID"),
            pipeline: PipelineConfig {
                include_document_text: parse_env("INCLUDE_DOCUMENT_TEXT", true)?,
                include_options: parse_env("INCLUDE_OPTIONS", true)?,
                include_rewrite: parse_env("INCLUDE_REWRITE", true)?,
                strip_sys_tokens: parse_env("STRIP_SYS_TOKENS", false)?,
            },
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
