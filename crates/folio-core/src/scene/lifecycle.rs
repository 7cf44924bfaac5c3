//! Mount, per-frame update, and teardown of the animated background.

use super::backend::{FrameView, LayerDraw, LayerHandle, SceneBackend};
use super::camera::{
    ambient_level, sanitize_progress, scroll_camera_offset, Camera, ViewportSize,
};
use super::layers::{layer_rng, LayerSpec, DEFAULT_LAYERS};
use crate::constants::{MAX_FRAME_SEC, NOMINAL_FRAME_SEC};
use crate::error::SceneError;
use crate::schedule::{FrameScheduler, RepeatingTask};
use crate::theme::Theme;
use glam::Mat4;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::{Rc, Weak};

#[derive(Clone, Debug)]
pub struct SceneOptions {
    /// Rotate star layers from scroll position instead of a constant drift.
    pub scroll_driven: bool,
    pub seed: u64,
    pub layers: Vec<LayerSpec>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            scroll_driven: true,
            seed: 0x5EED_57A2,
            layers: DEFAULT_LAYERS.to_vec(),
        }
    }
}

struct LiveLayer {
    spec: LayerSpec,
    handle: LayerHandle,
    rotation_y: f32,
    opacity: f32,
}

type TeardownHook = Box<dyn FnOnce()>;

struct SceneState<B> {
    backend: Option<B>,
    layers: SmallVec<[LiveLayer; 6]>,
    camera: Camera,
    viewport: ViewportSize,
    theme: Theme,
    scroll_progress: f32,
    scroll_driven: bool,
    last_frame_ms: Option<f64>,
    frames_rendered: u64,
    teardown: Vec<TeardownHook>,
    draws: Vec<LayerDraw>,
}

impl<B: SceneBackend> SceneState<B> {
    fn frame(&mut self, now_ms: f64) -> Result<(), SceneError> {
        if self.backend.is_none() {
            return Err(SceneError::Disposed);
        }
        let dt_sec = match self.last_frame_ms {
            Some(prev) => ((now_ms - prev) / 1000.0) as f32,
            None => NOMINAL_FRAME_SEC,
        };
        let dt_sec = if dt_sec.is_finite() {
            dt_sec.clamp(0.0, MAX_FRAME_SEC)
        } else {
            NOMINAL_FRAME_SEC
        };
        self.last_frame_ms = Some(now_ms);

        let progress_angle = self.scroll_progress * TAU;
        for layer in self.layers.iter_mut() {
            if self.scroll_driven {
                // Layers without a scroll factor hold their last angle.
                if layer.spec.scroll_factor != 0.0 {
                    layer.rotation_y = progress_angle * layer.spec.scroll_factor;
                }
            } else {
                layer.rotation_y += layer.spec.rotation_speed;
            }
            layer.opacity = layer.spec.pulsed_opacity(self.theme, now_ms);
        }
        if self.scroll_driven {
            self.camera
                .ease_toward(scroll_camera_offset(self.scroll_progress), dt_sec);
        }
        self.render()
    }

    fn render(&mut self) -> Result<(), SceneError> {
        let Some(backend) = self.backend.as_mut() else {
            return Err(SceneError::Disposed);
        };
        self.draws.clear();
        self.draws.extend(self.layers.iter().map(|l| LayerDraw {
            handle: l.handle,
            model: Mat4::from_rotation_y(l.rotation_y),
            opacity: l.opacity,
        }));
        let view = FrameView {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            layers: &self.draws,
            ambient: ambient_level(self.theme, self.scroll_progress),
            dark: self.theme.is_dark(),
        };
        backend.render(&view)?;
        self.frames_rendered += 1;
        Ok(())
    }

    fn resize(&mut self, size: ViewportSize) -> Result<(), SceneError> {
        let Some(backend) = self.backend.as_mut() else {
            return Err(SceneError::Disposed);
        };
        self.viewport = size;
        self.camera.set_viewport(size);
        backend.resize(size);
        Ok(())
    }

    fn set_scroll_progress(&mut self, progress: f32) {
        match sanitize_progress(progress) {
            Some(p) => self.scroll_progress = p,
            None => log::debug!("[scene] ignoring scroll progress {}", progress),
        }
    }

    fn set_theme(&mut self, theme: Theme) -> Result<(), SceneError> {
        let Some(backend) = self.backend.as_mut() else {
            return Err(SceneError::Disposed);
        };
        if theme == self.theme {
            return Ok(());
        }
        self.theme = theme;
        for layer in self.layers.iter_mut() {
            backend.update_material(layer.handle, &layer.spec.material(theme));
            layer.opacity = layer.spec.base_opacity(theme);
        }
        log::debug!("[scene] recoloured {} layers for {}", self.layers.len(), theme.as_str());
        Ok(())
    }
}

/// Owner of a mounted scene. Unmounting consumes the handle; dropping it
/// tears the scene down the same way.
pub struct SceneHandle<B: SceneBackend + 'static> {
    state: Rc<RefCell<SceneState<B>>>,
    frame_loop: Option<RepeatingTask>,
}

impl<B: SceneBackend + 'static> SceneHandle<B> {
    /// Build the layers on `target` and start the frame loop. A missing
    /// target means there is nowhere to draw; nothing is scheduled.
    pub fn mount(
        target: Option<B>,
        size: ViewportSize,
        theme: Theme,
        options: SceneOptions,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Option<Self> {
        let Some(mut backend) = target else {
            log::debug!("[scene] no mount target; background disabled");
            return None;
        };
        backend.resize(size);

        let mut layers: SmallVec<[LiveLayer; 6]> = SmallVec::new();
        let mut total_points = 0usize;
        for (i, spec) in options.layers.into_iter().enumerate() {
            let points = spec.generate(&mut layer_rng(options.seed, i));
            total_points += points.len();
            let handle = backend.add_point_layer(&points, &spec.material(theme));
            layers.push(LiveLayer {
                opacity: spec.base_opacity(theme),
                spec,
                handle,
                rotation_y: 0.0,
            });
        }
        log::info!(
            "[scene] mounted {} layers ({} points) at {}x{}, theme={}",
            layers.len(),
            total_points,
            size.width(),
            size.height(),
            theme.as_str()
        );

        let state = Rc::new(RefCell::new(SceneState {
            backend: Some(backend),
            draws: Vec::with_capacity(layers.len()),
            layers,
            camera: Camera::for_viewport(size),
            viewport: size,
            theme,
            scroll_progress: 0.0,
            scroll_driven: options.scroll_driven,
            last_frame_ms: None,
            frames_rendered: 0,
            teardown: Vec::new(),
        }));

        let weak = Rc::downgrade(&state);
        let frame_loop = RepeatingTask::start(scheduler, move |timestamp_ms| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let result = state.borrow_mut().frame(timestamp_ms);
            if let Err(e) = result {
                log::error!("[scene] frame error: {}", e);
            }
        });

        Some(Self {
            state,
            frame_loop: Some(frame_loop),
        })
    }

    /// Weak reference for event listeners; it never keeps the scene alive.
    pub fn scene_ref(&self) -> SceneRef<B> {
        SceneRef {
            state: Rc::downgrade(&self.state),
        }
    }

    /// Run `hook` at unmount, after the frame loop is cancelled and GPU
    /// resources are released. Used for listener removal.
    pub fn on_unmount(&self, hook: impl FnOnce() + 'static) {
        self.state.borrow_mut().teardown.push(Box::new(hook));
    }

    pub fn on_resize(&self, size: ViewportSize) {
        _ = self.state.borrow_mut().resize(size);
    }

    pub fn on_theme_change(&self, theme: Theme) {
        _ = self.state.borrow_mut().set_theme(theme);
    }

    /// Out-of-range progress is clamped; NaN and infinities are ignored.
    pub fn set_scroll_progress(&self, progress: f32) {
        self.state.borrow_mut().set_scroll_progress(progress);
    }

    pub fn set_scroll_driven(&self, enabled: bool) {
        self.state.borrow_mut().scroll_driven = enabled;
    }

    pub fn is_scroll_driven(&self) -> bool {
        self.state.borrow().scroll_driven
    }

    /// Draw once outside the frame loop.
    pub fn render_now(&self) -> Result<(), SceneError> {
        self.state.borrow_mut().render()
    }

    pub fn viewport(&self) -> ViewportSize {
        self.state.borrow().viewport
    }

    pub fn camera(&self) -> Camera {
        self.state.borrow().camera.clone()
    }

    pub fn theme(&self) -> Theme {
        self.state.borrow().theme
    }

    pub fn layer_rotations(&self) -> Vec<f32> {
        self.state.borrow().layers.iter().map(|l| l.rotation_y).collect()
    }

    pub fn layer_opacities(&self) -> Vec<f32> {
        self.state.borrow().layers.iter().map(|l| l.opacity).collect()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.state.borrow().frames_rendered
    }

    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(frame_loop) = self.frame_loop.take() else {
            return;
        };
        frame_loop.cancel();
        let hooks = {
            let mut st = self.state.borrow_mut();
            if let Some(mut backend) = st.backend.take() {
                let handles: Vec<LayerHandle> = st.layers.drain(..).map(|l| l.handle).collect();
                for handle in handles {
                    backend.dispose_layer(handle);
                }
                backend.dispose();
            }
            std::mem::take(&mut st.teardown)
        };
        for hook in hooks {
            hook();
        }
        log::info!("[scene] unmounted");
    }
}

impl<B: SceneBackend + 'static> Drop for SceneHandle<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Non-owning access to a mounted scene. Every call fails with
/// [`SceneError::Disposed`] once the scene has been unmounted.
pub struct SceneRef<B> {
    state: Weak<RefCell<SceneState<B>>>,
}

impl<B> Clone for SceneRef<B> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<B: SceneBackend> SceneRef<B> {
    fn with<R>(
        &self,
        f: impl FnOnce(&mut SceneState<B>) -> Result<R, SceneError>,
    ) -> Result<R, SceneError> {
        let state = self.state.upgrade().ok_or(SceneError::Disposed)?;
        let mut st = state.borrow_mut();
        f(&mut st)
    }

    pub fn on_resize(&self, size: ViewportSize) -> Result<(), SceneError> {
        self.with(|st| st.resize(size))
    }

    pub fn on_theme_change(&self, theme: Theme) -> Result<(), SceneError> {
        self.with(|st| st.set_theme(theme))
    }

    pub fn set_scroll_progress(&self, progress: f32) -> Result<(), SceneError> {
        self.with(|st| {
            if st.backend.is_none() {
                return Err(SceneError::Disposed);
            }
            st.set_scroll_progress(progress);
            Ok(())
        })
    }

    pub fn set_scroll_driven(&self, enabled: bool) -> Result<(), SceneError> {
        self.with(|st| {
            if st.backend.is_none() {
                return Err(SceneError::Disposed);
            }
            st.scroll_driven = enabled;
            log::info!("[scene] scroll rotation {}", if enabled { "on" } else { "off" });
            Ok(())
        })
    }

    /// Flip between scroll-driven and idle rotation; returns the new mode.
    pub fn toggle_scroll_driven(&self) -> Result<bool, SceneError> {
        self.with(|st| {
            if st.backend.is_none() {
                return Err(SceneError::Disposed);
            }
            st.scroll_driven = !st.scroll_driven;
            log::info!("[scene] scroll rotation {}", if st.scroll_driven { "on" } else { "off" });
            Ok(st.scroll_driven)
        })
    }

    pub fn render_now(&self) -> Result<(), SceneError> {
        self.with(|st| st.render())
    }
}
