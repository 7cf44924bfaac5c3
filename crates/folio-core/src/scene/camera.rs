use crate::constants::{
    AMBIENT_DARK_BASE, AMBIENT_LIGHT_BASE, AMBIENT_SCROLL_SPAN, CAMERA_FOVY_DEG,
    CAMERA_SMOOTH_TAU_SEC, CAMERA_Z, CAMERA_ZFAR, CAMERA_ZNEAR, SCROLL_CAMERA_RADIUS,
};
use crate::theme::Theme;
use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// Render surface size in physical pixels. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportSize {
    width: u32,
    height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn for_viewport(size: ViewportSize) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: size.aspect(),
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    pub fn set_viewport(&mut self, size: ViewportSize) {
        self.aspect = size.aspect();
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Ease the eye's x/y toward `offset` with time constant
    /// [`CAMERA_SMOOTH_TAU_SEC`]. The camera keeps looking at the origin.
    pub fn ease_toward(&mut self, offset: [f32; 2], dt_sec: f32) {
        let alpha = 1.0 - (-dt_sec / CAMERA_SMOOTH_TAU_SEC).exp();
        self.eye.x += (offset[0] - self.eye.x) * alpha;
        self.eye.y += (offset[1] - self.eye.y) * alpha;
    }
}

/// Camera orbit target for a given scroll progress.
#[inline]
pub fn scroll_camera_offset(progress: f32) -> [f32; 2] {
    let angle = progress * TAU;
    [
        angle.sin() * SCROLL_CAMERA_RADIUS,
        angle.cos() * SCROLL_CAMERA_RADIUS,
    ]
}

/// Clamp a scroll progress value to `[0, 1]`. Non-finite input yields `None`.
#[inline]
pub fn sanitize_progress(progress: f32) -> Option<f32> {
    progress.is_finite().then(|| progress.clamp(0.0, 1.0))
}

/// Page scroll position mapped to `[0, 1]`. A page that does not scroll
/// reports 0.
#[inline]
pub fn scroll_progress(scroll_y: f64, document_height: f64, viewport_height: f64) -> f32 {
    let range = document_height - viewport_height;
    if range <= 0.0 {
        return 0.0;
    }
    (scroll_y / range).clamp(0.0, 1.0) as f32
}

/// Ambient brightness: dark scenes brighten as the page scrolls, light ones dim.
#[inline]
pub fn ambient_level(theme: Theme, progress: f32) -> f32 {
    match theme {
        Theme::Dark => AMBIENT_DARK_BASE + progress * AMBIENT_SCROLL_SPAN,
        Theme::Light => AMBIENT_LIGHT_BASE - progress * AMBIENT_SCROLL_SPAN,
    }
}
