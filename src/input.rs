//! Pure input helpers shared by the DOM listeners. No web-sys here so the
//! host tests can `include!` this file.

// Backing stores above 2x cost fill rate for no visible gain.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

/// Canvas backing size in device pixels for a CSS box, never zero.
pub fn backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
    } else {
        1.0
    };
    let px = |css: f64| {
        if css.is_finite() && css > 0.0 {
            ((css * dpr).round() as u32).max(1)
        } else {
            1
        }
    };
    (px(css_width), px(css_height))
}

/// Ctrl+Shift+A opens and closes the analytics dashboard.
pub fn is_dashboard_shortcut(key: &str, ctrl: bool, shift: bool) -> bool {
    ctrl && shift && key.eq_ignore_ascii_case("a")
}

/// Date offsets (in days before today) making up the dashboard's weekly window.
pub fn week_offsets(days: usize) -> impl Iterator<Item = u32> {
    (0..days as u32).rev()
}
