// Shared tuning constants for the hero scene and its page collaborators.

// Frame timing
pub const REFERENCE_FPS: f32 = 60.0; // smoothing factors are expressed per 60 Hz frame
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // clamp long stalls (throttled background tabs)

// Camera defaults
pub const DEFAULT_FOV_Y_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// Exponential smoothing range used by the presets
pub const SMOOTHING_K_MIN: f32 = 0.01;
pub const SMOOTHING_K_MAX: f32 = 0.08;

// Procedural texture
pub const TEXTURE_SIZE: u32 = 512;
pub const TEXTURE_REFERENCE_SIZE: f32 = 512.0; // mark sizes are authored against this
pub const TEXTURE_SIZE_MAX: u32 = 2048;
pub const TEXTURE_MARK_COUNT_MAX: u32 = 5_000; // per mark layer
pub const TEXTURE_MARK_EXTENT_MAX: f32 = 512.0; // radius, length or line width in reference px

// Lighting
pub const MAX_LIGHTS: usize = 8; // fixed-size light array in the frame uniforms

// Particles
pub const PARTICLE_CAPACITY_MAX: usize = 10_000;

// Low-poly peak proportions
pub const PEAK_MID_HEIGHT_FRACTION: f32 = 0.6;
pub const PEAK_MID_RADIUS_FRACTION: f32 = 0.4;

// Analytics retention (oldest entries dropped first)
pub const PAGE_VIEW_CAP: usize = 100;
pub const PERFORMANCE_CAP: usize = 50;
pub const CUSTOM_EVENT_CAP: usize = 100;
pub const WEEKLY_WINDOW_DAYS: usize = 7;

// Contact form limits
pub const CONTACT_NAME_MAX_CHARS: usize = 100;
pub const CONTACT_EMAIL_MAX_CHARS: usize = 100;
pub const CONTACT_MESSAGE_MIN_CHARS: usize = 10;
pub const CONTACT_MESSAGE_MAX_CHARS: usize = 1000;
pub const SPAM_REPEAT_RUN: usize = 5; // same character this many times in a row
pub const SPAM_WORDS: [&str; 5] = ["viagra", "casino", "lottery", "winner", "congratulations"];
