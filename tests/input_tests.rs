// Host-side tests for pointer/scroll normalization and the pure web helpers.
// The root crate is wasm-only, so its pure module is included directly.

#![allow(dead_code)]
#[path = "../src/input.rs"]
mod web_input;

use glam::Vec2;
use hero_core::{normalize_pointer, scroll_progress, InputState};
use web_input::*;

#[test]
fn pointer_maps_corners_and_center() {
    assert_eq!(normalize_pointer(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
    assert_eq!(normalize_pointer(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
    assert_eq!(normalize_pointer(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
}

#[test]
fn pointer_outside_viewport_is_clamped() {
    assert_eq!(normalize_pointer(-50.0, 900.0, 800.0, 600.0), Vec2::new(-1.0, -1.0));
    assert_eq!(normalize_pointer(10.0, 10.0, 0.0, 600.0), Vec2::ZERO);
}

#[test]
fn scroll_progress_spans_one_viewport() {
    assert_eq!(scroll_progress(0.0, 720.0), 0.0);
    assert!((scroll_progress(360.0, 720.0) - 0.5).abs() < 1e-6);
    assert_eq!(scroll_progress(5_000.0, 720.0), 1.0);
    assert_eq!(scroll_progress(100.0, 0.0), 0.0);
}

#[test]
fn input_state_rejects_bad_values() {
    let mut input = InputState::new(1000.0, 500.0);
    input.set_scroll(-20.0);
    assert_eq!(input.scroll_px, 0.0);
    input.set_scroll(f32::NAN);
    assert_eq!(input.scroll_px, 0.0);

    input.resize(0.0, 300.0);
    assert_eq!(input.viewport, Vec2::new(1000.0, 500.0));
    input.resize(1200.0, 600.0);
    input.set_pointer_px(1200.0, 300.0);
    assert_eq!(input.pointer, Vec2::new(1.0, 0.0));
}

#[test]
fn backing_size_applies_capped_dpr() {
    assert_eq!(backing_size(800.0, 600.0, 1.0), (800, 600));
    assert_eq!(backing_size(800.0, 600.0, 1.5), (1200, 900));
    assert_eq!(backing_size(800.0, 600.0, 3.0), (1600, 1200));
    assert_eq!(backing_size(0.0, 600.0, 2.0), (1, 1200));
    assert_eq!(backing_size(100.0, 100.0, f64::NAN), (100, 100));
}

#[test]
fn dashboard_shortcut_needs_both_modifiers() {
    assert!(is_dashboard_shortcut("A", true, true));
    assert!(is_dashboard_shortcut("a", true, true));
    assert!(!is_dashboard_shortcut("A", false, true));
    assert!(!is_dashboard_shortcut("A", true, false));
    assert!(!is_dashboard_shortcut("b", true, true));
}

#[test]
fn week_offsets_end_today() {
    let offsets: Vec<u32> = week_offsets(7).collect();
    assert_eq!(offsets, vec![6, 5, 4, 3, 2, 1, 0]);
}
