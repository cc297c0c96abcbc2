//! AI News Aggregator — Binary Entrypoint
//! Boots the Axum HTTP server, wiring config, shared state, and middleware.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ai_news_aggregator::aggregate::fetch::HttpTransport;
use ai_news_aggregator::api::{self, AppState};
use ai_news_aggregator::config::AppConfig;
use ai_news_aggregator::relevance::KeywordFilter;

/// Compact tracing output; quiet by default, RUST_LOG overrides.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ai_news_aggregator=info,aggregate=info,warn"));

    // The deployment runtime may have installed a subscriber already.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This enables
    // NEWS_CONFIG_PATH from .env so config.rs can pick it up.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = AppConfig::load().expect("Failed to load feeds config");
    let filter = KeywordFilter::new(&config.relevance.keywords);
    let transport = HttpTransport::new(&config.http).expect("Failed to build feed transport");

    let state = AppState {
        config: Arc::new(config),
        filter: Arc::new(filter),
        transport: Arc::new(transport),
    };

    Ok(api::create_router(state).into())
}
