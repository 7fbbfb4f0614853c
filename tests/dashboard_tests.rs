// The dashboard markup is pure string building, so it is included directly
// like the input helpers.

#![allow(dead_code)]
#[path = "../src/dashboard.rs"]
mod web_dashboard;

use hero_core::{AnalyticsData, AnalyticsSummary, CustomEvent, PageView};
use web_dashboard::*;

fn view(i: usize) -> PageView {
    PageView {
        timestamp: format!("2026-10-19T10:00:{i:02}.000Z"),
        language: "en-GB".into(),
        screen_resolution: "1920x1080".into(),
        ..Default::default()
    }
}

fn event(name: &str, i: usize) -> CustomEvent {
    CustomEvent {
        event: name.into(),
        properties: Some(serde_json::json!({ "n": i })),
        timestamp: format!("2026-10-19T11:00:{i:02}Z"),
        session_id: "sess_a".into(),
    }
}

#[test]
fn lists_show_the_ten_newest_entries_first() {
    let data = AnalyticsData {
        page_views: (0..15).map(view).collect(),
        custom_events: (0..12).map(|i| event("click", i)).collect(),
        ..Default::default()
    };
    let html = dashboard_html(&AnalyticsSummary::default(), &data);

    assert!(html.contains("Recent Page Views"));
    assert!(html.contains("Recent Events"));
    assert_eq!(html.matches("en-GB | 1920x1080").count(), RECENT_LIMIT);
    assert_eq!(html.matches("<li>").count(), 2 * RECENT_LIMIT);
    let newest = html.find("2026-10-19 10:00:14").unwrap();
    let older = html.find("2026-10-19 10:00:05").unwrap();
    assert!(newest < older);
    assert!(!html.contains("10:00:04"));
    assert!(html.contains("{&quot;n&quot;:11}"));
}

#[test]
fn stored_text_is_escaped() {
    let data = AnalyticsData {
        custom_events: vec![event("<img src=x onerror=alert(1)>", 1)],
        ..Default::default()
    };
    let html = dashboard_html(&AnalyticsSummary::default(), &data);
    assert!(!html.contains("<img"));
    assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    assert_eq!(escape_html(r#"a&b"'"#), "a&amp;b&quot;&#39;");
}

#[test]
fn empty_lists_say_so() {
    let summary = AnalyticsSummary {
        today_visitors: 3,
        ..Default::default()
    };
    let html = dashboard_html(&summary, &AnalyticsData::default());
    assert!(html.contains("Today: 3"));
    assert_eq!(html.matches("None yet").count(), 2);
}

#[test]
fn timestamps_drop_fraction_and_zone() {
    assert_eq!(short_timestamp("2026-10-19T10:00:00.123Z"), "2026-10-19 10:00:00");
    assert_eq!(short_timestamp("2026-10-19T10:00:00Z"), "2026-10-19 10:00:00");
}
