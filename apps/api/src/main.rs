mod comparisons;
mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::comparisons::store::ComparisonStore;
use crate::config::{CompletionConfig, Config};
use crate::generation::generator::{Completion, Orchestrator};
use crate::llm_client::OpenAiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; only malformed values fail here
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Exemplar API v{}", env!("CARGO_PKG_VERSION"));

    let completion = build_completion(&config.completion)?;
    let orchestrator = Orchestrator::new(completion, config.criteria_defaults.clone());

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        comparisons: Arc::new(ComparisonStore::new()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Turns the credential config into a completion capability. A missing key
/// is not fatal; every request is then served from fallback templates.
fn build_completion(config: &CompletionConfig) -> Result<Completion> {
    match config {
        CompletionConfig::Configured {
            api_key,
            model,
            base_url,
            timeout,
        } => {
            let client = OpenAiClient::new(api_key.clone(), model.clone(), base_url.clone(), *timeout)
                .context("Failed to build completion HTTP client")?;
            info!("Completion client initialized (model: {})", client.model());
            Ok(Completion::Configured(Arc::new(client)))
        }
        CompletionConfig::Unconfigured => {
            warn!("No completion API key configured; serving fallback examples only");
            Ok(Completion::Unconfigured)
        }
    }
}

fn build_cors(config: &Config) -> Result<CorsLayer> {
    let origins = config
        .allowed_origins()
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true))
}
