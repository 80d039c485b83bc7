use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use bloodwork_core::{BloodTestExtractor, EnvValues, ServiceConfig};
use gemini_client::GeminiClient;

/// Main entry point for the blood test extraction service
///
/// Resolves configuration once, builds the Gemini collaborator and serves the REST API.
/// A missing `GOOGLE_GEMINI_API_KEY` stops the process here rather than failing requests.
///
/// # Environment Variables
/// - `GOOGLE_GEMINI_API_KEY`: credential for the extraction collaborator (required)
/// - `GEMINI_MODEL_ID`: model used for extraction (default: "gemini-2.5-flash")
/// - `GEMINI_BASE_URL`: Gemini API base URL
/// - `EXTRACTION_TIMEOUT_SECS`: hard timeout per extraction (default: 120)
/// - `BLOODWORK_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `BLOODWORK_MAX_UPLOAD_BYTES`: request body cap (default: 25 MiB)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration is missing or invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bloodwork_run=info".parse()?)
                .add_directive("bloodwork_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServiceConfig::from_env_values(EnvValues::from_process_env())?;

    let gemini = GeminiClient::new(cfg.api_key(), cfg.model_id(), cfg.extraction_timeout())?
        .with_base_url(cfg.base_url());
    let extractor = BloodTestExtractor::new(Arc::new(gemini), cfg.extraction_timeout());

    tracing::info!(
        model = cfg.model_id(),
        timeout_secs = cfg.extraction_timeout().as_secs(),
        "++ Starting blood test extraction REST on {}",
        cfg.rest_addr()
    );

    let app = api_rest::router(AppState::new(extractor), cfg.max_upload_bytes());

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
