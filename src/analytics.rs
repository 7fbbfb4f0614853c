//! Browser-storage backing for the analytics counter.

use crate::constants::MS_PER_DAY;
use crate::input;
use hero_core::{
    new_session_id, Analytics, HeroError, KeyValueStore, NavigationTiming, PageView, PerformanceSample,
    KEY_SESSION_ID, WEEKLY_WINDOW_DAYS,
};
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct BrowserStorage(web::Storage);

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> hero_core::Result<()> {
        self.0
            .set_item(key, value)
            .map_err(|e| HeroError::Storage(format!("set `{key}`: {:?}", e)))
    }

    fn remove(&mut self, key: &str) -> hero_core::Result<()> {
        self.0
            .remove_item(key)
            .map_err(|e| HeroError::Storage(format!("remove `{key}`: {:?}", e)))
    }
}

fn local_storage() -> Option<BrowserStorage> {
    web::window()?.local_storage().ok().flatten().map(BrowserStorage)
}

fn session_storage() -> Option<BrowserStorage> {
    web::window()?.session_storage().ok().flatten().map(BrowserStorage)
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

/// Local date key such as `Mon Oct 19 2026`, `days_ago` days before today.
pub fn date_key(days_ago: u32) -> String {
    let at = now_ms() - f64::from(days_ago) * MS_PER_DAY;
    js_sys::Date::new(&at.into()).to_date_string().into()
}

pub fn week_keys() -> Vec<String> {
    input::week_offsets(WEEKLY_WINDOW_DAYS).map(date_key).collect()
}

/// Open the counter over localStorage with this tab's session id, minting the
/// id on first use. Returns `None` when storage is unavailable (private mode).
pub fn open() -> Option<Analytics<BrowserStorage>> {
    let store = local_storage()?;
    let mut session = session_storage();
    let existing = session.as_ref().and_then(|s| s.get(KEY_SESSION_ID));
    let session_id = match existing {
        Some(id) => id,
        None => {
            let id = new_session_id(&mut rand::thread_rng(), now_ms() as u64);
            if let Some(s) = session.as_mut() {
                if let Err(e) = s.set(KEY_SESSION_ID, &id) {
                    log::warn!("[analytics] {e}");
                }
            }
            id
        }
    };
    Some(Analytics::new(store, session_id))
}

fn page_view(window: &web::Window) -> PageView {
    let navigator = window.navigator();
    let screen_resolution = window
        .screen()
        .ok()
        .map(|s| {
            format!(
                "{}x{}",
                s.width().unwrap_or_default(),
                s.height().unwrap_or_default()
            )
        })
        .unwrap_or_default();
    PageView {
        url: window.location().href().unwrap_or_default(),
        referrer: window.document().map(|d| d.referrer()).unwrap_or_default(),
        timestamp: now_iso(),
        user_agent: navigator.user_agent().unwrap_or_default(),
        screen_resolution,
        language: navigator.language().unwrap_or_default(),
    }
}

/// Page view plus daily unique-visitor bookkeeping, once per page load.
pub fn record_visit() {
    let (Some(window), Some(mut analytics)) = (web::window(), open()) else {
        return;
    };
    let view = page_view(&window);
    let recorded = analytics
        .track_page_view(view)
        .and_then(|()| analytics.track_visitor(&date_key(0), &now_iso()));
    match recorded {
        Ok(true) => log::info!("[analytics] first visit"),
        Ok(false) => {}
        Err(e) => log::warn!("[analytics] visit not recorded: {e}"),
    }
}

/// Navigation timings, read once the load event has fired.
pub fn record_performance() {
    let Some(window) = web::window() else {
        return;
    };
    let Some(perf) = window.performance() else {
        return;
    };
    let timing = perf.timing();
    let marks = NavigationTiming {
        load_event_start: timing.load_event_start() as f64,
        load_event_end: timing.load_event_end() as f64,
        dom_content_loaded_event_start: timing.dom_content_loaded_event_start() as f64,
        dom_content_loaded_event_end: timing.dom_content_loaded_event_end() as f64,
    };
    let first_paint = perf
        .get_entries_by_name("first-paint")
        .get(0)
        .dyn_into::<web::PerformanceEntry>()
        .ok()
        .map(|e| e.start_time());
    let sample = PerformanceSample::from_navigation(&marks, first_paint, &now_iso());
    if let Some(mut analytics) = open() {
        if let Err(e) = analytics.track_performance(sample) {
            log::warn!("[analytics] performance not recorded: {e}");
        }
    }
}
