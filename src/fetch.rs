// src/fetch.rs
//! Bounded JSON fetch: one outbound GET with a hard deadline, any failure
//! collapsed to `None`. Retry-across-sources lives in the resolver, not here.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Transport seam for the resolver. The production impl talks HTTP; tests
/// substitute scripted fetchers.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// GET `url` and parse the body as JSON. Resolves within `timeout`.
    /// Timeout, connect failure, non-2xx status, or unparseable body all
    /// yield `None`; this never errors and never hangs past the deadline.
    async fn fetch_json(&self, url: &str, timeout: Duration) -> Option<Value>;
}

/// reqwest-backed fetcher. The deadline is passed per call because the
/// resolver owns deadline policy per candidate.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str, timeout: Duration) -> Option<Value> {
        // The deadline covers the whole exchange, body read and parse included.
        let attempt = async {
            let resp = match self.client.get(url).send().await {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(error = ?e, "upstream transport error");
                    return None;
                }
            };
            let status = resp.status();
            if !status.is_success() {
                tracing::warn!(%status, "upstream returned non-2xx");
                return None;
            }
            match resp.json::<Value>().await {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(error = ?e, "upstream body is not valid JSON");
                    None
                }
            }
        };

        match tokio::time::timeout(timeout, attempt).await {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(timeout_ms = timeout.as_millis() as u64, "upstream deadline elapsed");
                None
            }
        }
    }
}
