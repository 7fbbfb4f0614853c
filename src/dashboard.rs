//! Markup for the analytics dashboard panel. No web-sys here so the host
//! tests can `include!` this file.

use hero_core::{AnalyticsData, AnalyticsSummary, CustomEvent, PageView};

pub const RECENT_LIMIT: usize = 10;

/// Escape text for use inside element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `2026-10-19T10:00:00.123Z` reads as `2026-10-19 10:00:00`.
pub fn short_timestamp(iso: &str) -> String {
    let trimmed = iso.split('.').next().unwrap_or(iso).trim_end_matches('Z');
    trimmed.replacen('T', " ", 1)
}

fn page_view_row(view: &PageView) -> String {
    format!(
        "<li><div>{}</div><small>{} | {}</small></li>",
        escape_html(&short_timestamp(&view.timestamp)),
        escape_html(&view.language),
        escape_html(&view.screen_resolution)
    )
}

fn event_row(event: &CustomEvent) -> String {
    let properties = event
        .properties
        .as_ref()
        .map(|p| format!("<code>{}</code>", escape_html(&p.to_string())))
        .unwrap_or_default();
    format!(
        "<li><div>{} <small>{}</small></div>{}</li>",
        escape_html(&event.event),
        escape_html(&short_timestamp(&event.timestamp)),
        properties
    )
}

fn section(title: &str, rows: Vec<String>) -> String {
    if rows.is_empty() {
        return format!("<h4>{title}</h4><div>None yet</div>");
    }
    format!("<h4>{title}</h4><ul>{}</ul>", rows.concat())
}

pub fn dashboard_html(summary: &AnalyticsSummary, data: &AnalyticsData) -> String {
    let views = data.recent_page_views(RECENT_LIMIT).map(page_view_row).collect();
    let events = data.recent_events(RECENT_LIMIT).map(event_row).collect();
    format!(
        "<strong>Analytics</strong>\
         <div>Today: {}</div>\
         <div>This week: {}</div>\
         <div>Page views: {}</div>\
         <div>Avg load: {} ms</div>\
         {}{}",
        summary.today_visitors,
        summary.weekly_visitors,
        summary.total_page_views,
        summary.average_load_ms,
        section("Recent Page Views", views),
        section("Recent Events", events)
    )
}
