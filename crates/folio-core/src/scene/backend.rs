use super::camera::ViewportSize;
use super::layers::{PointMaterial, PointVertex};
use crate::error::SceneError;
use glam::Mat4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerHandle(pub u32);

/// Per-frame transform and opacity for one uploaded layer.
#[derive(Clone, Copy, Debug)]
pub struct LayerDraw {
    pub handle: LayerHandle,
    pub model: Mat4,
    pub opacity: f32,
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub view: Mat4,
    pub projection: Mat4,
    pub layers: &'a [LayerDraw],
    /// Scroll-dependent ambient level, used to tint the clear colour.
    pub ambient: f32,
    pub dark: bool,
}

/// The 3D rendering capability the scene consumes.
///
/// A backend is created already bound to its mount target; the scene only
/// uploads point clouds, adjusts materials, renders, and releases resources.
pub trait SceneBackend {
    fn resize(&mut self, size: ViewportSize);
    fn add_point_layer(&mut self, points: &[PointVertex], material: &PointMaterial) -> LayerHandle;
    fn update_material(&mut self, layer: LayerHandle, material: &PointMaterial);
    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), SceneError>;
    fn dispose_layer(&mut self, layer: LayerHandle);
    /// Release the surface and device. Called once, after every layer has
    /// been disposed.
    fn dispose(&mut self);
}
