// src/epic.rs
//! Earth-imagery endpoint semantics: EPIC "natural" first, "enhanced" as
//! fallback, each record annotated with a derived archive image URL.

use serde::Serialize;
use serde_json::Value;

use crate::config::{ProxyConfig, EPIC_ARCHIVE_BASE, NASA_API_BASE};
use crate::fetch::JsonFetcher;
use crate::resolve::{non_empty_array, resolve_first_usable, Candidate};

/// Priority order. "natural" is also the default mode reported when every
/// candidate comes back empty.
pub const SOURCE_MODES: [&str; 2] = ["natural", "enhanced"];
pub const DEFAULT_SOURCE_MODE: &str = "natural";

#[derive(Debug, Serialize)]
pub struct EarthImageryResponse {
    #[serde(rename = "sourceMode")]
    pub source_mode: String,
    pub items: Vec<Value>,
}

pub fn candidates(cfg: &ProxyConfig) -> Vec<Candidate> {
    SOURCE_MODES
        .iter()
        .copied()
        .map(|mode| Candidate {
            id: mode,
            url: format!("{NASA_API_BASE}/EPIC/api/{mode}?api_key={}", cfg.api_key),
            timeout: cfg.upstream_timeout,
            usable: non_empty_array,
        })
        .collect()
}

/// Superset merge: the raw record's fields survive untouched, plus an
/// `imageUrl` that is null whenever the date or image name is unusable.
/// Pure in (record, mode, key); the EPIC date format is
/// `"YYYY-MM-DD HH:MM:SS"` and the zero-padded date parts are kept verbatim
/// in the derived path.
pub fn normalize_item(raw: &Value, mode: &str, api_key: &str) -> Value {
    let image_url = derive_image_url(raw, mode, api_key);
    let mut out = raw.clone();
    if let Some(obj) = out.as_object_mut() {
        obj.insert(
            "imageUrl".to_string(),
            image_url.map(Value::String).unwrap_or(Value::Null),
        );
    }
    out
}

fn derive_image_url(raw: &Value, mode: &str, api_key: &str) -> Option<String> {
    let date = raw.get("date").and_then(Value::as_str).unwrap_or("");
    let date_part = date.split(' ').next().unwrap_or("");
    let mut parts = date_part.splitn(3, '-');
    let year = parts.next().unwrap_or("");
    let month = parts.next().unwrap_or("");
    let day = parts.next().unwrap_or("");

    let image = raw.get("image").and_then(Value::as_str).unwrap_or("");
    if year.is_empty() || month.is_empty() || day.is_empty() || image.is_empty() {
        return None;
    }

    Some(format!(
        "{EPIC_ARCHIVE_BASE}/archive/{mode}/{year}/{month}/{day}/png/{image}.png?api_key={api_key}"
    ))
}

/// Resolve the imagery feed. Exhaustion degrades to the default mode with an
/// empty item list; the endpoint never errors on upstream failure.
pub async fn resolve(fetcher: &dyn JsonFetcher, cfg: &ProxyConfig) -> EarthImageryResponse {
    match resolve_first_usable(fetcher, &candidates(cfg)).await {
        Some(res) => EarthImageryResponse {
            items: res
                .items
                .iter()
                .map(|item| normalize_item(item, res.source_id, &cfg.api_key))
                .collect(),
            source_mode: res.source_id.to_string(),
        },
        None => EarthImageryResponse {
            source_mode: DEFAULT_SOURCE_MODE.to_string(),
            items: Vec::new(),
        },
    }
}
