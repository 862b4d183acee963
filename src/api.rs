// src/api.rs
//! Public HTTP surface: the two proxy endpoints plus a health probe.
//! Both proxy routes always answer 200; upstream trouble degrades to the
//! documented empty shapes (see `epic` / `donki`).

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::config::ProxyConfig;
use crate::donki;
use crate::epic::{self, EarthImageryResponse};
use crate::fetch::JsonFetcher;

#[derive(Clone)]
pub struct AppState {
    config: Arc<ProxyConfig>,
    fetcher: Arc<dyn JsonFetcher>,
}

impl AppState {
    pub fn new(config: ProxyConfig, fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/earth-imagery", get(earth_imagery))
        .route("/space-weather", get(space_weather))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn earth_imagery(State(state): State<AppState>) -> Json<EarthImageryResponse> {
    Json(epic::resolve(state.fetcher.as_ref(), &state.config).await)
}

async fn space_weather(State(state): State<AppState>) -> Json<Vec<Value>> {
    let today = Utc::now().date_naive();
    Json(donki::resolve(state.fetcher.as_ref(), &state.config, today).await)
}
