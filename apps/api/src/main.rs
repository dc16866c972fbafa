mod answer;
mod config;
mod document;
mod errors;
mod language;
mod llm_client;
mod normalize;
mod profile;
mod prompt;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::language::WhatlangIdentifier;
use crate::llm_client::BedrockClient;
use crate::profile::HttpProfileClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Grant API v{}", env!("CARGO_PKG_VERSION"));

    // Language identifier, shared by every request
    let detector = Arc::new(WhatlangIdentifier::new());

    // Initialize Bedrock client
    let llm = BedrockClient::from_region(&config.aws_region).await;
    info!(
        "Bedrock client initialized (model: {}, region: {})",
        config.model_id, config.aws_region
    );

    // Initialize profile client
    let profiles = HttpProfileClient::new(
        config.profile_api_url.clone(),
        config.profile_api_token.clone(),
    );
    match &config.profile_api_url {
        Some(url) => info!("Profile service: {url}"),
        None => info!("No PROFILE_API_URL set; requests must carry user_data"),
    }

    info!("Pipeline config: {:?}", config.pipeline);

    // Build app state
    let state = AppState {
        detector,
        llm: Arc::new(llm),
        profiles: Arc::new(profiles),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
