//! Space Dashboard Proxy: Binary Entrypoint
//! Boots the Axum HTTP server, wiring the two fallback-resolving proxy
//! routes, the health probe, and the Prometheus exporter.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use space_dashboard_api::api::{create_router, AppState};
use space_dashboard_api::config::ProxyConfig;
use space_dashboard_api::fetch::HttpFetcher;
use space_dashboard_api::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - PROXY_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("PROXY_DEV_LOG").ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("space_dashboard_api=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let config = ProxyConfig::from_env().expect("Failed to load proxy config");
    let metrics = Metrics::init(config.upstream_timeout.as_millis() as u64);

    let state = AppState::new(config, Arc::new(HttpFetcher::new()));
    let router = create_router(state).merge(metrics.router());

    Ok(router.into())
}
