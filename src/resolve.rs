// src/resolve.rs
//! Source-priority resolution: try an ordered list of upstream candidates,
//! keep the first one whose payload passes its shape predicate. Candidate
//! order is a client-visible contract; do not reorder casually.

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::time::Duration;

use crate::fetch::JsonFetcher;

/// Emission cap applied to whichever candidate wins.
pub const MAX_ITEMS: usize = 30;

/// Decides whether a raw upstream payload counts as present data.
pub type ShapePredicate = fn(&Value) -> bool;

/// One upstream dataset in a priority-ordered fallback chain.
pub struct Candidate {
    /// Stable identifier, surfaced in responses and telemetry.
    pub id: &'static str,
    /// Fully-qualified URL, credential already embedded.
    pub url: String,
    /// Deadline for this candidate's single outbound call.
    pub timeout: Duration,
    pub usable: ShapePredicate,
}

/// The winning candidate plus its payload, already truncated.
pub struct Resolution {
    pub source_id: &'static str,
    pub items: Vec<Value>,
}

/// The shape every current upstream dataset must have to be usable.
pub fn non_empty_array(v: &Value) -> bool {
    v.as_array().is_some_and(|a| !a.is_empty())
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "proxy_resolved_total",
            "Requests resolved per winning upstream source."
        );
        describe_counter!(
            "proxy_candidate_empty_total",
            "Candidates skipped because the payload was empty or mis-shaped."
        );
        describe_counter!(
            "proxy_candidate_failures_total",
            "Candidates skipped on timeout, transport, non-2xx, or bad JSON."
        );
        describe_counter!(
            "proxy_exhausted_total",
            "Requests where every candidate failed or came back empty."
        );
    });
}

/// First-usable-wins over the candidate list, strictly sequential. Failure
/// and empty-success both mean "try the next one"; they differ only in
/// telemetry. Returns `None` when the whole list is exhausted; callers map
/// that to their documented empty/default shape, never to an error.
pub async fn resolve_first_usable(
    fetcher: &dyn JsonFetcher,
    candidates: &[Candidate],
) -> Option<Resolution> {
    ensure_metrics_described();

    for c in candidates {
        match fetcher.fetch_json(&c.url, c.timeout).await {
            Some(payload) if (c.usable)(&payload) => {
                let mut items = payload.as_array().cloned().unwrap_or_default();
                items.truncate(MAX_ITEMS);
                tracing::info!(source = c.id, count = items.len(), "candidate accepted");
                counter!("proxy_resolved_total", "source" => c.id).increment(1);
                return Some(Resolution {
                    source_id: c.id,
                    items,
                });
            }
            Some(_) => {
                tracing::debug!(source = c.id, "candidate empty or mis-shaped, trying next");
                counter!("proxy_candidate_empty_total", "source" => c.id).increment(1);
            }
            None => {
                // The fetch layer already logged the specific failure.
                counter!("proxy_candidate_failures_total", "source" => c.id).increment(1);
            }
        }
    }

    counter!("proxy_exhausted_total").increment(1);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_empty_array_rejects_everything_else() {
        assert!(non_empty_array(&json!([1])));
        assert!(!non_empty_array(&json!([])));
        assert!(!non_empty_array(&json!({"items": [1]})));
        assert!(!non_empty_array(&json!(null)));
        assert!(!non_empty_array(&json!("natural")));
    }
}
