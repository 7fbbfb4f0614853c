//! Latest pointer, scroll and viewport values, as seen by the frame loop.
//!
//! Only the platform adapters write here; the frame loop reads it once per
//! tick. No history is kept.

use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    /// Normalized pointer in `[-1, 1]` per axis, y up, `(0, 0)` at center.
    pub pointer: Vec2,
    /// Vertical page scroll in CSS pixels, never negative.
    pub scroll_px: f32,
    /// Viewport size in CSS pixels. Scroll progress is measured against its height.
    pub viewport: Vec2,
}

impl InputState {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Vec2::new(width, height),
            ..Default::default()
        }
    }

    pub fn set_pointer_px(&mut self, x: f32, y: f32) {
        self.pointer = normalize_pointer(x, y, self.viewport.x, self.viewport.y);
    }

    pub fn set_scroll(&mut self, scroll_px: f32) {
        self.scroll_px = if scroll_px.is_finite() { scroll_px.max(0.0) } else { 0.0 };
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    pub fn scroll_progress(&self) -> f32 {
        scroll_progress(self.scroll_px, self.viewport.y)
    }
}

/// Map a position in viewport pixels to `[-1, 1]²` with y pointing up.
#[inline]
pub fn normalize_pointer(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    let nx = (x / width) * 2.0 - 1.0;
    let ny = -((y / height) * 2.0 - 1.0);
    Vec2::new(nx.clamp(-1.0, 1.0), ny.clamp(-1.0, 1.0))
}

/// How far through one viewport height the page has scrolled, in `[0, 1]`.
#[inline]
pub fn scroll_progress(scroll_px: f32, viewport_height: f32) -> f32 {
    if viewport_height <= 0.0 {
        return 0.0;
    }
    (scroll_px / viewport_height).clamp(0.0, 1.0)
}
