//! Page-level ids and tuning for the web front-end.

// Element the page marks for the scene; mounted automatically on start.
pub const AUTO_MOUNT_ID: &str = "hero-scene";
pub const CANVAS_CLASS: &str = "hero-canvas";
pub const CANVAS_STYLE: &str =
    "position:absolute;inset:0;width:100%;height:100%;display:block;pointer-events:none;";

pub const DASHBOARD_ID: &str = "analytics-dashboard";
pub const TOAST_CLASS: &str = "hero-toast";
pub const TOAST_DURATION_MS: i32 = 4000;

pub const MS_PER_DAY: f64 = 86_400_000.0;
