// Shared test doubles for the scene tests.

#![allow(dead_code)]
use folio_core::{
    FrameView, LayerHandle, PointMaterial, PointVertex, SceneBackend, SceneError, ViewportSize,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default, Debug)]
pub struct BackendLog {
    pub resizes: Vec<ViewportSize>,
    pub layers_added: Vec<(LayerHandle, usize, PointMaterial)>,
    pub material_updates: Vec<(LayerHandle, PointMaterial)>,
    pub renders: usize,
    pub last_opacities: Vec<f32>,
    pub last_ambient: f32,
    pub disposed_layers: Vec<LayerHandle>,
    pub disposed: bool,
    pub fail_renders: bool,
}

/// Records every call; shares its log with the test through an `Rc`.
pub struct MockBackend {
    pub log: Rc<RefCell<BackendLog>>,
    next_handle: u32,
}

impl MockBackend {
    pub fn new() -> (Self, Rc<RefCell<BackendLog>>) {
        let log = Rc::new(RefCell::new(BackendLog::default()));
        (
            Self {
                log: log.clone(),
                next_handle: 0,
            },
            log,
        )
    }
}

impl SceneBackend for MockBackend {
    fn resize(&mut self, size: ViewportSize) {
        self.log.borrow_mut().resizes.push(size);
    }

    fn add_point_layer(&mut self, points: &[PointVertex], material: &PointMaterial) -> LayerHandle {
        let handle = LayerHandle(self.next_handle);
        self.next_handle += 1;
        self.log
            .borrow_mut()
            .layers_added
            .push((handle, points.len(), *material));
        handle
    }

    fn update_material(&mut self, layer: LayerHandle, material: &PointMaterial) {
        self.log.borrow_mut().material_updates.push((layer, *material));
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), SceneError> {
        let mut log = self.log.borrow_mut();
        assert!(!log.disposed, "render after dispose");
        if log.fail_renders {
            return Err(SceneError::Backend("surface lost".into()));
        }
        log.renders += 1;
        log.last_opacities = frame.layers.iter().map(|l| l.opacity).collect();
        log.last_ambient = frame.ambient;
        Ok(())
    }

    fn dispose_layer(&mut self, layer: LayerHandle) {
        self.log.borrow_mut().disposed_layers.push(layer);
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().disposed = true;
    }
}
