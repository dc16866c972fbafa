// Grant answer pipeline: request validation, orchestration, and HTTP handlers.
// All model calls go through llm_client; all prompt text lives in prompt/.

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod service;
