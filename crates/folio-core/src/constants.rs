use std::time::Duration;

// Shared tuning constants used by the core model and the web frontend.

// Theme persistence
pub const THEME_STORAGE_KEY: &str = "theme";
pub const DARK_MODE_CLASS: &str = "dark-mode";
pub const LIGHT_MODE_CLASS: &str = "light-mode";

// Chat
pub const REPLY_DELAY: Duration = Duration::from_millis(1000);

// Camera
pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const CAMERA_Z: f32 = 30.0;

// Scroll-driven camera orbit
pub const SCROLL_CAMERA_RADIUS: f32 = 2.0; // world units at full sin/cos swing
pub const CAMERA_SMOOTH_TAU_SEC: f32 = 0.5; // time constant toward scroll target

// Ambient level mapping (dark rises with scroll, light falls)
pub const AMBIENT_DARK_BASE: f32 = 0.5;
pub const AMBIENT_LIGHT_BASE: f32 = 1.5;
pub const AMBIENT_SCROLL_SPAN: f32 = 0.3;

// Layer materials
pub const STAR_OPACITY: f32 = 0.8;
pub const STAR_POINT_SIZE: f32 = 0.1;
pub const NEBULA_POINT_SIZE: f32 = 0.5;
pub const NEBULA_OPACITY_DARK: f32 = 0.2;
pub const NEBULA_OPACITY_LIGHT: f32 = 0.1;
pub const NEBULA_PULSE_AMPLITUDE: f32 = 0.1;
pub const NEBULA_PULSE_TIME_SCALE: f64 = 0.0005; // per millisecond

// Surface
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Frame timing: the first tick (and any tick after a long stall) uses this dt
pub const NOMINAL_FRAME_SEC: f32 = 1.0 / 60.0;
pub const MAX_FRAME_SEC: f32 = 0.25;

// Entrance and scroll reveals
pub const REVEAL_VIEWPORT_FRACTION: f64 = 0.8; // section top crosses 80% of viewport height
pub const REVEAL_STAGGER: Duration = Duration::from_millis(100);
pub const HEADER_STAGGER: Duration = Duration::from_millis(200);
pub const CHAT_ENTRANCE_DELAY: Duration = Duration::from_millis(2000);
