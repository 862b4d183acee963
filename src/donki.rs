// src/donki.rs
//! Space-weather endpoint semantics over the DONKI datasets. Notifications
//! are already in the target alert shape; flare and CME events are mapped
//! into it so the dashboard never sees which dataset answered.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::config::{ProxyConfig, NASA_API_BASE};
use crate::fetch::JsonFetcher;
use crate::resolve::{non_empty_array, resolve_first_usable, Candidate};

// Fixed lookback policy per dataset, in calendar days. Not client-tunable.
pub const NOTIFICATIONS_WINDOW_DAYS: u64 = 365;
pub const FLR_WINDOW_DAYS: u64 = 180;
pub const CME_WINDOW_DAYS: u64 = 120;

const DATE_FMT: &str = "%Y-%m-%d";

/// Calendar-day subtraction from `today`, the window's inclusive start.
pub fn window_start(today: NaiveDate, days: u64) -> NaiveDate {
    today - chrono::Duration::days(days as i64)
}

fn donki_url(dataset: &str, start: NaiveDate, end: NaiveDate, api_key: &str) -> String {
    format!(
        "{NASA_API_BASE}/DONKI/{dataset}?startDate={}&endDate={}&api_key={api_key}",
        start.format(DATE_FMT),
        end.format(DATE_FMT)
    )
}

pub fn candidates(cfg: &ProxyConfig, today: NaiveDate) -> Vec<Candidate> {
    [
        ("notifications", NOTIFICATIONS_WINDOW_DAYS),
        ("FLR", FLR_WINDOW_DAYS),
        ("CME", CME_WINDOW_DAYS),
    ]
    .into_iter()
    .map(|(dataset, days)| Candidate {
        id: dataset,
        url: donki_url(dataset, window_start(today, days), today, &cfg.api_key),
        timeout: cfg.upstream_timeout,
        usable: non_empty_array,
    })
    .collect()
}

/// First non-empty string under `key`, if any.
fn non_empty_str(event: &Value, key: &str) -> Option<String> {
    event
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// DONKI is loose about scalar types; active-region numbers arrive as
/// numbers, catalogs as strings.
fn scalar_display(v: Option<&Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Map one solar-flare event into the alert shape.
pub fn flare_alert(event: &Value) -> Value {
    let class_type = event.get("classType").and_then(Value::as_str).unwrap_or("");
    let issue_time = non_empty_str(event, "beginTime")
        .or_else(|| non_empty_str(event, "peakTime"))
        .or_else(|| non_empty_str(event, "endTime"));
    let region = scalar_display(event.get("activeRegionNum")).unwrap_or_else(|| "N/A".into());
    let location = non_empty_str(event, "sourceLocation").unwrap_or_else(|| "Unknown".into());

    json!({
        "messageType": format!("FLR {class_type}").trim_end().to_string(),
        "messageIssueTime": issue_time,
        "messageBody": format!("Active Region: {region} | Source: {location}"),
        "messageURL": non_empty_str(event, "link"),
    })
}

/// Map one coronal-mass-ejection event into the alert shape.
pub fn cme_alert(event: &Value) -> Value {
    let catalog = scalar_display(event.get("catalog")).unwrap_or_else(|| "N/A".into());
    let location = non_empty_str(event, "sourceLocation").unwrap_or_else(|| "Unknown".into());

    json!({
        "messageType": "CME",
        "messageIssueTime": non_empty_str(event, "startTime"),
        "messageBody": format!("Catalog: {catalog} | Source: {location}"),
        "messageURL": non_empty_str(event, "link"),
    })
}

/// Resolve the space-weather feed for the given calendar date. `today` is a
/// parameter so window arithmetic is testable against a fixed date.
/// Exhaustion degrades to an empty list, never an error.
pub async fn resolve(fetcher: &dyn JsonFetcher, cfg: &ProxyConfig, today: NaiveDate) -> Vec<Value> {
    match resolve_first_usable(fetcher, &candidates(cfg, today)).await {
        Some(res) => match res.source_id {
            "FLR" => res.items.iter().map(flare_alert).collect(),
            "CME" => res.items.iter().map(cme_alert).collect(),
            // notifications already carry messageType/messageIssueTime/...
            _ => res.items,
        },
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn window_start_subtracts_calendar_days() {
        let today = fixed_today();
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(window_start(today, NOTIFICATIONS_WINDOW_DAYS), ymd(2023, 6, 16));
        assert_eq!(window_start(today, FLR_WINDOW_DAYS), ymd(2023, 12, 18));
        assert_eq!(window_start(today, CME_WINDOW_DAYS), ymd(2024, 2, 16));
    }

    #[test]
    fn candidates_are_ranked_notifications_flr_cme() {
        let cfg = ProxyConfig::with_key("KEY");
        let cands = candidates(&cfg, fixed_today());
        let ids: Vec<_> = cands.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["notifications", "FLR", "CME"]);
        assert_eq!(
            cands[0].url,
            format!("{NASA_API_BASE}/DONKI/notifications?startDate=2023-06-16&endDate=2024-06-15&api_key=KEY")
        );
        assert!(cands[1].url.contains("startDate=2023-12-18"));
        assert!(cands[2].url.contains("startDate=2024-02-16"));
    }

    #[test]
    fn flare_alert_embeds_class_region_and_location() {
        let event = json!({
            "classType": "M1.2",
            "activeRegionNum": 1234,
            "beginTime": "2024-05-01T12:00Z",
            "peakTime": "2024-05-01T12:30Z"
        });
        let alert = flare_alert(&event);
        assert_eq!(alert["messageType"], json!("FLR M1.2"));
        assert_eq!(alert["messageIssueTime"], json!("2024-05-01T12:00Z"));
        assert_eq!(
            alert["messageBody"],
            json!("Active Region: 1234 | Source: Unknown")
        );
        assert_eq!(alert["messageURL"], json!(null));
    }

    #[test]
    fn flare_alert_falls_back_through_times_and_defaults() {
        let event = json!({
            "endTime": "2024-05-01T13:00Z",
            "sourceLocation": "N15W30",
            "link": "https://example.invalid/flr/1"
        });
        let alert = flare_alert(&event);
        assert_eq!(alert["messageType"], json!("FLR"));
        assert_eq!(alert["messageIssueTime"], json!("2024-05-01T13:00Z"));
        assert_eq!(
            alert["messageBody"],
            json!("Active Region: N/A | Source: N15W30")
        );
        assert_eq!(alert["messageURL"], json!("https://example.invalid/flr/1"));
    }

    #[test]
    fn cme_alert_embeds_catalog_and_location() {
        let event = json!({
            "catalog": "M2M_CATALOG",
            "startTime": "2024-04-20T03:12Z",
            "sourceLocation": "S05E11"
        });
        let alert = cme_alert(&event);
        assert_eq!(alert["messageType"], json!("CME"));
        assert_eq!(alert["messageIssueTime"], json!("2024-04-20T03:12Z"));
        assert_eq!(
            alert["messageBody"],
            json!("Catalog: M2M_CATALOG | Source: S05E11")
        );
    }

    #[test]
    fn mapping_is_deterministic() {
        let event = json!({"classType": "X9.0", "activeRegionNum": 3664});
        assert_eq!(flare_alert(&event), flare_alert(&event));
    }
}
