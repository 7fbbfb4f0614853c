//! Local, privacy-preserving page analytics.
//!
//! Everything lives in a key/value store owned by the page (browser
//! `localStorage` on the web, [`MemoryStore`] in tests). Logs are bounded
//! FIFOs; the oldest entry is dropped first. Timestamps and date keys are
//! supplied by the caller so this module stays clock-free.

use crate::constants::{CUSTOM_EVENT_CAP, PAGE_VIEW_CAP, PERFORMANCE_CAP};
use crate::error::Result;
use fnv::FnvHashMap;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

pub const KEY_PAGE_VIEWS: &str = "page_views";
pub const KEY_PERFORMANCE: &str = "performance_history";
pub const KEY_CUSTOM_EVENTS: &str = "custom_events";
pub const KEY_DAILY_VISITORS: &str = "daily_visitors";
pub const KEY_FIRST_VISIT: &str = "first_visit";
pub const KEY_SESSION_ID: &str = "session_id";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    map: FnvHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }
}

// Lets several short-lived handles share one store.
impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Append-only log that keeps at most `cap` entries.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundedLog<T> {
    cap: usize,
    items: VecDeque<T>,
}

impl<T> BoundedLog<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            items: VecDeque::new(),
        }
    }

    /// Adopt existing entries, keeping only the newest `cap`.
    pub fn from_vec(cap: usize, items: Vec<T>) -> Self {
        let mut log = Self {
            cap,
            items: items.into(),
        };
        log.evict();
        log
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        self.evict();
    }

    fn evict(&mut self) {
        while self.items.len() > self.cap {
            self.items.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items.into()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub url: String,
    pub referrer: String,
    pub timestamp: String,
    pub user_agent: String,
    pub screen_resolution: String,
    pub language: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    pub load_time: f64,
    pub dom_content_loaded: f64,
    pub first_paint: Option<f64>,
    pub timestamp: String,
}

/// Navigation timing marks in milliseconds, as the browser reports them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavigationTiming {
    pub load_event_start: f64,
    pub load_event_end: f64,
    pub dom_content_loaded_event_start: f64,
    pub dom_content_loaded_event_end: f64,
}

impl PerformanceSample {
    /// Durations of the load and DOMContentLoaded handlers themselves.
    pub fn from_navigation(timing: &NavigationTiming, first_paint: Option<f64>, timestamp: &str) -> Self {
        Self {
            load_time: timing.load_event_end - timing.load_event_start,
            dom_content_loaded: timing.dom_content_loaded_event_end - timing.dom_content_loaded_event_start,
            first_paint,
            timestamp: timestamp.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomEvent {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    pub timestamp: String,
    pub session_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub page_views: Vec<PageView>,
    pub daily_visitors: BTreeMap<String, Vec<String>>,
    pub performance_history: Vec<PerformanceSample>,
    pub custom_events: Vec<CustomEvent>,
}

impl AnalyticsData {
    /// Up to `n` page views, newest first.
    pub fn recent_page_views(&self, n: usize) -> impl Iterator<Item = &PageView> {
        self.page_views.iter().rev().take(n)
    }

    /// Up to `n` custom events, newest first.
    pub fn recent_events(&self, n: usize) -> impl Iterator<Item = &CustomEvent> {
        self.custom_events.iter().rev().take(n)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub today_visitors: usize,
    pub weekly_visitors: usize,
    pub total_page_views: usize,
    /// Mean load time in whole milliseconds, 0 when no samples exist.
    pub average_load_ms: u64,
}

/// Where components report named events. The scene and the contact form get
/// one of these handed in at mount instead of reaching for a global.
pub trait AnalyticsSink {
    fn track(&mut self, name: &str, properties: Option<serde_json::Value>, timestamp: &str);
}

/// `sess_` + 9 base-36 characters + `_` + epoch milliseconds.
pub fn new_session_id(rng: &mut impl Rng, now_ms: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let tag: String = (0..9)
        .map(|_| DIGITS[rng.gen_range(0..DIGITS.len())] as char)
        .collect();
    format!("sess_{tag}_{now_ms}")
}

pub struct Analytics<S: KeyValueStore> {
    store: S,
    session_id: String,
}

impl<S: KeyValueStore> Analytics<S> {
    pub fn new(store: S, session_id: impl Into<String>) -> Self {
        Self {
            store,
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored JSON that fails to parse is logged and treated as empty.
    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.store.get(key) {
            None => T::default(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("[analytics] discarding corrupt `{key}`: {e}");
                T::default()
            }),
        }
    }

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }

    fn append<T: Serialize + DeserializeOwned>(&mut self, key: &str, cap: usize, item: T) -> Result<()> {
        let mut log = BoundedLog::from_vec(cap, self.load::<Vec<T>>(key));
        log.push(item);
        self.save(key, &log.into_vec())
    }

    pub fn track_page_view(&mut self, view: PageView) -> Result<()> {
        log::info!("[analytics] page view {}", view.url);
        self.append(KEY_PAGE_VIEWS, PAGE_VIEW_CAP, view)
    }

    /// Record this session under `date_key`. Returns whether this was the
    /// first visit ever recorded in the store.
    pub fn track_visitor(&mut self, date_key: &str, timestamp: &str) -> Result<bool> {
        let first_visit = self.store.get(KEY_FIRST_VISIT).is_none();
        if first_visit {
            self.store.set(KEY_FIRST_VISIT, timestamp)?;
        }
        let mut daily: BTreeMap<String, Vec<String>> = self.load(KEY_DAILY_VISITORS);
        let sessions = daily.entry(date_key.to_owned()).or_default();
        if !sessions.iter().any(|s| s == &self.session_id) {
            sessions.push(self.session_id.clone());
        }
        self.save(KEY_DAILY_VISITORS, &daily)?;
        Ok(first_visit)
    }

    pub fn track_performance(&mut self, sample: PerformanceSample) -> Result<()> {
        log::info!("[analytics] load {:.0}ms", sample.load_time);
        self.append(KEY_PERFORMANCE, PERFORMANCE_CAP, sample)
    }

    pub fn track_event(
        &mut self,
        name: &str,
        properties: Option<serde_json::Value>,
        timestamp: &str,
    ) -> Result<()> {
        let event = CustomEvent {
            event: name.to_owned(),
            properties,
            timestamp: timestamp.to_owned(),
            session_id: self.session_id.clone(),
        };
        log::debug!("[analytics] event {name}");
        self.append(KEY_CUSTOM_EVENTS, CUSTOM_EVENT_CAP, event)
    }

    pub fn analytics_data(&self) -> AnalyticsData {
        AnalyticsData {
            page_views: self.load(KEY_PAGE_VIEWS),
            daily_visitors: self.load(KEY_DAILY_VISITORS),
            performance_history: self.load(KEY_PERFORMANCE),
            custom_events: self.load(KEY_CUSTOM_EVENTS),
        }
    }

    pub fn daily_visitor_count(&self, date_key: &str) -> usize {
        let daily: BTreeMap<String, Vec<String>> = self.load(KEY_DAILY_VISITORS);
        daily.get(date_key).map_or(0, Vec::len)
    }

    /// Dashboard figures. `week` lists the date keys of the last seven days.
    pub fn summary(&self, today: &str, week: &[String]) -> AnalyticsSummary {
        let data = self.analytics_data();
        let count = |d: &str| data.daily_visitors.get(d).map_or(0, Vec::len);
        let perf = &data.performance_history;
        let average_load_ms = if perf.is_empty() {
            0
        } else {
            let total: f64 = perf.iter().map(|p| p.load_time).sum();
            (total / perf.len() as f64).round().max(0.0) as u64
        };
        AnalyticsSummary {
            today_visitors: count(today),
            weekly_visitors: week.iter().map(|d| count(d)).sum(),
            total_page_views: data.page_views.len(),
            average_load_ms,
        }
    }
}

impl<S: KeyValueStore> AnalyticsSink for Analytics<S> {
    fn track(&mut self, name: &str, properties: Option<serde_json::Value>, timestamp: &str) {
        if let Err(e) = self.track_event(name, properties, timestamp) {
            log::warn!("[analytics] dropped event `{name}`: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_log_drops_oldest() {
        let mut log = BoundedLog::new(3);
        for i in 0..5 {
            log.push(i);
        }
        assert_eq!(log.into_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(KEY_PAGE_VIEWS, "{not json").unwrap();
        let analytics = Analytics::new(store, "sess_a");
        assert!(analytics.analytics_data().page_views.is_empty());
    }
}
