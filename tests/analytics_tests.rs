use hero_core::{
    new_session_id, Analytics, AnalyticsSink, KeyValueStore, MemoryStore, NavigationTiming, PageView,
    PerformanceSample, CUSTOM_EVENT_CAP, KEY_DAILY_VISITORS, PAGE_VIEW_CAP, PERFORMANCE_CAP,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn view(i: usize) -> PageView {
    PageView {
        url: format!("https://example.test/#{i}"),
        timestamp: format!("2026-10-19T10:00:{:02}Z", i % 60),
        ..Default::default()
    }
}

fn perf(load_time: f64) -> PerformanceSample {
    PerformanceSample {
        load_time,
        dom_content_loaded: load_time / 2.0,
        first_paint: None,
        timestamp: "2026-10-19T10:00:00Z".into(),
    }
}

#[test]
fn logs_are_capped_oldest_first() {
    let mut a = Analytics::new(MemoryStore::new(), "sess_a");
    for i in 0..PAGE_VIEW_CAP + 25 {
        a.track_page_view(view(i)).unwrap();
    }
    for i in 0..PERFORMANCE_CAP + 5 {
        a.track_performance(perf(i as f64)).unwrap();
    }
    for i in 0..CUSTOM_EVENT_CAP + 1 {
        a.track_event(&format!("e{i}"), None, "t").unwrap();
    }

    let data = a.analytics_data();
    assert_eq!(data.page_views.len(), PAGE_VIEW_CAP);
    assert_eq!(data.page_views[0], view(25));
    assert_eq!(data.performance_history.len(), PERFORMANCE_CAP);
    assert_eq!(data.performance_history[0].load_time, 5.0);
    assert_eq!(data.custom_events.len(), CUSTOM_EVENT_CAP);
    assert_eq!(data.custom_events[0].event, "e1");
    assert_eq!(data.custom_events[0].session_id, "sess_a");
}

#[test]
fn visitors_are_unique_per_session_and_day() {
    let mut store = MemoryStore::new();
    {
        let mut a = Analytics::new(&mut store, "sess_a");
        assert!(a.track_visitor("Mon Oct 19 2026", "t0").unwrap());
        assert!(!a.track_visitor("Mon Oct 19 2026", "t1").unwrap());
    }
    let mut b = Analytics::new(&mut store, "sess_b");
    assert!(!b.track_visitor("Mon Oct 19 2026", "t2").unwrap());
    b.track_visitor("Tue Oct 20 2026", "t3").unwrap();

    assert_eq!(b.daily_visitor_count("Mon Oct 19 2026"), 2);
    assert_eq!(b.daily_visitor_count("Tue Oct 20 2026"), 1);
    assert_eq!(b.daily_visitor_count("Sun Oct 18 2026"), 0);
}

#[test]
fn summary_rounds_average_load() {
    let mut a = Analytics::new(MemoryStore::new(), "sess_a");
    a.track_visitor("d1", "t").unwrap();
    a.track_page_view(view(0)).unwrap();
    a.track_page_view(view(1)).unwrap();
    a.track_performance(perf(100.0)).unwrap();
    a.track_performance(perf(101.0)).unwrap();

    let week: Vec<String> = ["d0", "d1"].iter().map(|s| s.to_string()).collect();
    let s = a.summary("d1", &week);
    assert_eq!(s.today_visitors, 1);
    assert_eq!(s.weekly_visitors, 1);
    assert_eq!(s.total_page_views, 2);
    assert_eq!(s.average_load_ms, 101);

    let empty = Analytics::new(MemoryStore::new(), "x").summary("d1", &week);
    assert_eq!(empty.average_load_ms, 0);
}

#[test]
fn stored_json_uses_page_field_names() {
    let mut a = Analytics::new(MemoryStore::new(), "sess_a");
    a.track_visitor("d1", "t").unwrap();
    let raw = a.store().get(KEY_DAILY_VISITORS).unwrap();
    assert_eq!(raw, r#"{"d1":["sess_a"]}"#);

    let json = serde_json::to_string(&a.analytics_data()).unwrap();
    assert!(json.contains("\"pageViews\""));
    assert!(json.contains("\"dailyVisitors\""));
}

#[test]
fn sink_stores_events_under_any_name() {
    let mut a = Analytics::new(MemoryStore::new(), "sess_a");
    let sink: &mut dyn AnalyticsSink = &mut a;
    sink.track("", None, "t");
    sink.track("hero_scene_mounted", Some(serde_json::json!({"peaks": 1})), "t");
    let events = a.analytics_data().custom_events;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event, "");
    assert_eq!(events[0].session_id, "sess_a");
    assert_eq!(events[1].properties, Some(serde_json::json!({"peaks": 1})));
}

#[test]
fn session_ids_have_the_expected_shape() {
    let mut rng = StdRng::seed_from_u64(8);
    let id = new_session_id(&mut rng, 1_760_000_000_000);
    let parts: Vec<&str> = id.split('_').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "sess");
    assert_eq!(parts[1].len(), 9);
    assert!(parts[1].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_eq!(parts[2], "1760000000000");
}

#[test]
fn performance_sample_measures_handler_durations() {
    let marks = NavigationTiming {
        load_event_start: 1_840.0,
        load_event_end: 1_852.5,
        dom_content_loaded_event_start: 910.0,
        dom_content_loaded_event_end: 914.0,
    };
    let sample = PerformanceSample::from_navigation(&marks, Some(320.0), "2026-10-19T10:00:00Z");
    assert_eq!(sample.load_time, 12.5);
    assert_eq!(sample.dom_content_loaded, 4.0);
    assert_eq!(sample.first_paint, Some(320.0));
    assert_eq!(sample.timestamp, "2026-10-19T10:00:00Z");
}
