// src/api.rs
//! HTTP boundary: routing, CORS, parameter clamping, and JSON framing.
//! All aggregation logic lives in `crate::aggregate`.

use std::collections::HashMap;
use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::aggregate::fetch::FeedTransport;
use crate::aggregate::types::FeedItem;
use crate::aggregate;
use crate::config::AppConfig;
use crate::relevance::KeywordFilter;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub filter: Arc<KeywordFilter>,
    pub transport: Arc<dyn FeedTransport>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/news", get(news))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub const DEFAULT_TOTAL: usize = 60;
pub const MIN_TOTAL: usize = 1;
pub const MAX_TOTAL: usize = 200;

/// Parse and clamp a count parameter; unparsable or absent values fall
/// back to `default`.
fn clamp_total(raw: Option<&str>, default: usize, min: usize, max: usize) -> usize {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) => n.clamp(min as i64, max as i64) as usize,
        None => default,
    }
}

#[derive(serde::Serialize)]
struct NewsResponse {
    total: usize,
    items: Vec<FeedItem>,
}

/// GET /news?n=<count> — one aggregation pass over the configured
/// feeds. The result depends on live feed state and a "now" timestamp
/// fallback, so it is explicitly non-cacheable.
async fn news(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let total = clamp_total(
        params.get("n").map(String::as_str),
        DEFAULT_TOTAL,
        MIN_TOTAL,
        MAX_TOTAL,
    );

    let items = aggregate::aggregate(
        state.transport.as_ref(),
        &state.config,
        &state.filter,
        total,
    )
    .await;

    let mut response = Json(NewsResponse {
        total: items.len(),
        items,
    })
    .into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
