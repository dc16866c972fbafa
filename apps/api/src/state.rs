use std::sync::Arc;

use crate::config::Config;
use crate::language::LanguageIdentifier;
use crate::llm_client::InferenceClient;
use crate::profile::ProfileSource;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Language identifier, configured once so detection is reproducible.
    pub detector: Arc<dyn LanguageIdentifier>,
    pub llm: Arc<dyn InferenceClient>,
    pub profiles: Arc<dyn ProfileSource>,
    pub config: Config,
}
