// src/config.rs
//! Process-start configuration for the proxy: upstream credential and
//! outbound deadline. Loaded once in the entrypoint and shared read-only.

use anyhow::{Context, Result};
use std::time::Duration;

// --- env defaults & names ---
pub const ENV_NASA_API_KEY: &str = "NASA_API_KEY";
pub const ENV_UPSTREAM_TIMEOUT_MS: &str = "UPSTREAM_TIMEOUT_MS";

pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;

/// Last-resort demo credential. Deployments are expected to set
/// `NASA_API_KEY`; falling back to this key is logged at warn level.
pub const FALLBACK_API_KEY: &str = "bToFMQbJE8hFdeu9q5aWrvL1dlb8foEyjumqHQbR";

/// Upstream API hosts. All candidate URLs are built from these.
pub const NASA_API_BASE: &str = "https://api.nasa.gov";
pub const EPIC_ARCHIVE_BASE: &str = "https://epic.gsfc.nasa.gov";

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// API key appended to every upstream URL as `api_key=`.
    pub api_key: String,
    /// Per-candidate deadline for outbound calls.
    pub upstream_timeout: Duration,
}

impl ProxyConfig {
    /// Read configuration from the environment. A malformed timeout override
    /// is a startup error; a missing API key degrades to the bundled default.
    pub fn from_env() -> Result<Self> {
        let api_key = match std::env::var(ENV_NASA_API_KEY) {
            Ok(k) if !k.trim().is_empty() => k.trim().to_string(),
            _ => {
                tracing::warn!(
                    "{} not set; using bundled demo key (rate-limited, not for production)",
                    ENV_NASA_API_KEY
                );
                FALLBACK_API_KEY.to_string()
            }
        };

        let timeout_ms = match std::env::var(ENV_UPSTREAM_TIMEOUT_MS) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("parsing {ENV_UPSTREAM_TIMEOUT_MS}='{raw}'"))?,
            Err(_) => DEFAULT_UPSTREAM_TIMEOUT_MS,
        };

        Ok(Self {
            api_key,
            upstream_timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Fixed config for tests; no env access.
    pub fn with_key(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            upstream_timeout: Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS),
        }
    }
}
