// Host-side tests for the background scene lifecycle, driven by a recording
// backend and a manual frame scheduler.

mod common;

use common::MockBackend;
use folio_core::{
    ambient_level, hex_to_rgb, layer_rng, scroll_progress, LayerShape, ManualScheduler,
    MemoryThemeHost, SceneError, SceneHandle, SceneOptions, Theme, ThemeProvider, ViewportSize,
    DEFAULT_LAYERS,
};
use std::cell::Cell;
use std::f32::consts::TAU;
use std::rc::Rc;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn mount(
    options: SceneOptions,
) -> (
    SceneHandle<MockBackend>,
    Rc<std::cell::RefCell<common::BackendLog>>,
    Rc<ManualScheduler>,
) {
    let sched = Rc::new(ManualScheduler::new());
    let (backend, log) = MockBackend::new();
    let scene = SceneHandle::mount(
        Some(backend),
        ViewportSize::new(1280, 720),
        Theme::Dark,
        options,
        sched.clone(),
    )
    .unwrap();
    (scene, log, sched)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn missing_target_mounts_nothing() {
    let sched = Rc::new(ManualScheduler::new());
    let scene = SceneHandle::<MockBackend>::mount(
        None,
        ViewportSize::new(800, 600),
        Theme::Dark,
        SceneOptions::default(),
        sched.clone(),
    );
    assert!(scene.is_none());
    assert_eq!(sched.outstanding_frames(), 0);
}

#[test]
fn mount_uploads_every_layer() {
    let (_scene, log, sched) = mount(SceneOptions::default());
    let log = log.borrow();
    let counts: Vec<usize> = log.layers_added.iter().map(|(_, n, _)| *n).collect();
    assert_eq!(counts, vec![3000, 5000, 8000, 1000, 1000, 1000]);
    assert_eq!(log.resizes, vec![ViewportSize::new(1280, 720)]);
    assert_eq!(sched.outstanding_frames(), 1);
    assert_eq!(log.renders, 0);
}

#[test]
fn one_render_per_frame() {
    let (scene, log, sched) = mount(SceneOptions::default());
    for _ in 0..4 {
        sched.run_frame(FRAME);
    }
    assert_eq!(log.borrow().renders, 4);
    assert_eq!(scene.frames_rendered(), 4);
    assert_eq!(sched.outstanding_frames(), 1);

    scene.render_now().unwrap();
    assert_eq!(log.borrow().renders, 5);
    assert_eq!(sched.outstanding_frames(), 1);
}

#[test]
fn unmount_releases_everything() {
    let (scene, log, sched) = mount(SceneOptions::default());
    sched.run_frame(FRAME);
    scene.unmount();

    assert_eq!(sched.outstanding_frames(), 0);
    let log = log.borrow();
    assert!(log.disposed);
    assert_eq!(log.disposed_layers.len(), 6);
    assert_eq!(sched.run_frame(FRAME), 0);
}

#[test]
fn repeated_mount_unmount_leaves_no_frames() {
    let sched = Rc::new(ManualScheduler::new());
    for _ in 0..10 {
        let (backend, log) = MockBackend::new();
        let scene = SceneHandle::mount(
            Some(backend),
            ViewportSize::new(640, 480),
            Theme::Light,
            SceneOptions::default(),
            sched.clone(),
        )
        .unwrap();
        sched.run_frame(FRAME);
        scene.unmount();
        assert!(log.borrow().disposed);
    }
    assert_eq!(sched.outstanding_frames(), 0);
}

#[test]
fn dropping_the_handle_tears_down() {
    let (scene, log, sched) = mount(SceneOptions::default());
    drop(scene);
    assert!(log.borrow().disposed);
    assert_eq!(sched.outstanding_frames(), 0);
}

#[test]
fn teardown_hooks_run_once_after_dispose() {
    let (scene, log, _sched) = mount(SceneOptions::default());
    let ran = Rc::new(Cell::new(0u32));
    let r = ran.clone();
    let l = log.clone();
    scene.on_unmount(move || {
        assert!(l.borrow().disposed);
        r.set(r.get() + 1);
    });
    scene.unmount();
    assert_eq!(ran.get(), 1);
}

#[test]
fn scene_ref_fails_after_unmount() {
    let (scene, _log, _sched) = mount(SceneOptions::default());
    let scene_ref = scene.scene_ref();
    assert!(scene_ref.on_resize(ViewportSize::new(10, 10)).is_ok());
    assert!(scene_ref.render_now().is_ok());

    scene.unmount();
    assert_eq!(
        scene_ref.on_resize(ViewportSize::new(10, 10)),
        Err(SceneError::Disposed)
    );
    assert_eq!(scene_ref.on_theme_change(Theme::Light), Err(SceneError::Disposed));
    assert_eq!(scene_ref.set_scroll_progress(0.5), Err(SceneError::Disposed));
    assert_eq!(scene_ref.set_scroll_driven(false), Err(SceneError::Disposed));
    assert_eq!(scene_ref.render_now(), Err(SceneError::Disposed));
}

#[test]
fn resize_updates_viewport_and_aspect() {
    let (scene, log, _sched) = mount(SceneOptions::default());
    scene.on_resize(ViewportSize::new(1000, 500));
    assert_eq!(scene.viewport(), ViewportSize::new(1000, 500));
    assert!(approx(scene.camera().aspect, 2.0));
    assert_eq!(log.borrow().resizes.last(), Some(&ViewportSize::new(1000, 500)));
}

#[test]
fn zero_sized_viewport_is_clamped() {
    let size = ViewportSize::new(0, 0);
    assert_eq!((size.width(), size.height()), (1, 1));
    assert!(approx(size.aspect(), 1.0));
}

#[test]
fn zero_sized_resize_reaches_backend_as_one_pixel() {
    let (scene, log, sched) = mount(SceneOptions::default());
    scene.on_resize(ViewportSize::new(0, 0));
    assert_eq!(scene.viewport(), ViewportSize::new(1, 1));
    assert!(approx(scene.camera().aspect, 1.0));
    assert_eq!(log.borrow().resizes.last(), Some(&ViewportSize::new(1, 1)));

    scene.scene_ref().on_resize(ViewportSize::new(640, 0)).unwrap();
    assert!(approx(scene.camera().aspect, 640.0));
    sched.run_frame(FRAME);
    assert!(scene.camera().projection_matrix().is_finite());
}

#[test]
fn theme_change_recolours_without_rebuilding() {
    let (scene, log, _sched) = mount(SceneOptions::default());
    scene.on_theme_change(Theme::Dark);
    assert!(log.borrow().material_updates.is_empty());

    scene.on_theme_change(Theme::Light);
    let log = log.borrow();
    assert_eq!(log.layers_added.len(), 6);
    assert_eq!(log.material_updates.len(), 6);
    assert_eq!(log.material_updates[0].1.color, hex_to_rgb(0x555555));
    assert_eq!(log.material_updates[3].1.color, hex_to_rgb(0x6633AA));
    assert!(approx(log.material_updates[3].1.opacity, 0.1));
    assert_eq!(scene.theme(), Theme::Light);
}

#[test]
fn theme_toggle_reaches_scene_through_subscription() {
    let provider = ThemeProvider::install(MemoryThemeHost::new(Some("dark"), false)).unwrap();
    let ctx = provider.context();
    let (scene, log, _sched) = mount(SceneOptions::default());
    let scene_ref = scene.scene_ref();
    let _sub = ctx.subscribe(move |t| {
        _ = scene_ref.on_theme_change(t);
    });

    ctx.toggle();
    assert_eq!(scene.theme(), Theme::Light);
    assert_eq!(log.borrow().material_updates.len(), 6);

    scene.unmount();
    // A late toggle after unmount is harmless.
    ctx.toggle();
}

#[test]
fn idle_mode_rotates_by_constant_speed() {
    let (scene, _log, sched) = mount(SceneOptions {
        scroll_driven: false,
        ..SceneOptions::default()
    });
    let eye_before = scene.camera().eye;
    for _ in 0..3 {
        sched.run_frame(FRAME);
    }
    let rot = scene.layer_rotations();
    for (r, spec) in rot.iter().zip(DEFAULT_LAYERS.iter()) {
        assert!(approx(*r, spec.rotation_speed * 3.0));
    }
    assert_eq!(scene.camera().eye, eye_before);
}

#[test]
fn scroll_mode_rotates_from_progress() {
    let (scene, _log, sched) = mount(SceneOptions::default());
    scene.set_scroll_progress(0.5);
    sched.run_frame(FRAME);
    let rot = scene.layer_rotations();
    assert!(approx(rot[0], 0.5 * TAU * 0.1));
    assert!(approx(rot[1], 0.5 * TAU * 0.05));
    assert!(approx(rot[2], 0.5 * TAU * 0.02));
    assert_eq!(&rot[3..], &[0.0, 0.0, 0.0]);

    // Rotation is a function of progress, not of elapsed frames.
    sched.run_frame(FRAME);
    assert!(approx(scene.layer_rotations()[0], 0.5 * TAU * 0.1));
}

#[test]
fn scroll_progress_is_clamped() {
    let (scene, _log, sched) = mount(SceneOptions::default());
    scene.set_scroll_progress(3.0);
    sched.run_frame(FRAME);
    assert!(approx(scene.layer_rotations()[0], TAU * 0.1));
}

#[test]
fn non_finite_scroll_progress_is_ignored() {
    let (scene, _log, sched) = mount(SceneOptions::default());
    scene.set_scroll_progress(0.25);
    sched.run_frame(FRAME);
    let rot_before = scene.layer_rotations();

    scene.set_scroll_progress(f32::NAN);
    sched.run_frame(FRAME);
    assert_eq!(scene.layer_rotations(), rot_before);
    assert!(scene.camera().eye.is_finite());

    let scene_ref = scene.scene_ref();
    scene_ref.set_scroll_progress(f32::INFINITY).unwrap();
    scene_ref.set_scroll_progress(f32::NEG_INFINITY).unwrap();
    for _ in 0..300 {
        sched.run_frame(FRAME);
    }
    let eye = scene.camera().eye;
    assert!((eye.x - 2.0).abs() < 1e-3);
    assert!(eye.y.abs() < 1e-3);
}

#[test]
fn switching_to_idle_keeps_angle_and_drifts() {
    let (scene, _log, sched) = mount(SceneOptions::default());
    assert!(scene.is_scroll_driven());
    scene.set_scroll_progress(0.5);
    sched.run_frame(FRAME);
    let held = scene.layer_rotations();
    let eye_held = scene.camera().eye;

    let scene_ref = scene.scene_ref();
    assert_eq!(scene_ref.toggle_scroll_driven(), Ok(false));
    assert!(!scene.is_scroll_driven());
    // Progress changes no longer move the stars or the camera.
    scene.set_scroll_progress(1.0);
    for _ in 0..2 {
        sched.run_frame(FRAME);
    }
    for ((r, h), spec) in scene
        .layer_rotations()
        .iter()
        .zip(held.iter())
        .zip(DEFAULT_LAYERS.iter())
    {
        assert!(approx(*r, h + spec.rotation_speed * 2.0));
    }
    assert_eq!(scene.camera().eye, eye_held);

    // Switching back snaps star layers to the scroll angle again.
    scene_ref.set_scroll_driven(true).unwrap();
    sched.run_frame(FRAME);
    assert!(approx(scene.layer_rotations()[0], TAU * 0.1));
    assert_eq!(scene_ref.toggle_scroll_driven(), Ok(false));

    scene.unmount();
    assert_eq!(scene_ref.toggle_scroll_driven(), Err(SceneError::Disposed));
}

#[test]
fn camera_eases_toward_scroll_target() {
    let (scene, _log, sched) = mount(SceneOptions::default());
    scene.set_scroll_progress(0.25);
    sched.run_frame(FRAME);
    let first = scene.camera().eye.x;
    assert!(first > 0.0 && first < 2.0);
    for _ in 0..300 {
        sched.run_frame(FRAME);
    }
    let eye = scene.camera().eye;
    assert!((eye.x - 2.0).abs() < 1e-3);
    assert!(eye.y.abs() < 1e-3);
    assert!(approx(eye.z, 30.0));
}

#[test]
fn nebula_opacity_pulses_with_time() {
    let (scene, log, sched) = mount(SceneOptions::default());
    sched.run_frame(Duration::from_millis(1000));
    let ops = scene.layer_opacities();
    assert!(approx(ops[0], 0.8));
    assert!(approx(ops[3], 0.2 + (0.35f64).sin() as f32 * 0.1));
    assert!(approx(ops[4], 0.2 + (0.65f64).sin() as f32 * 0.1));
    assert!(approx(ops[5], 0.2 + (0.5f64).sin() as f32 * 0.1));
    assert_eq!(log.borrow().last_opacities, ops);
}

#[test]
fn render_failure_keeps_loop_running() {
    let (scene, log, sched) = mount(SceneOptions::default());
    log.borrow_mut().fail_renders = true;
    sched.run_frame(FRAME);
    assert_eq!(scene.frames_rendered(), 0);
    assert_eq!(sched.outstanding_frames(), 1);
    assert!(matches!(scene.render_now(), Err(SceneError::Backend(_))));

    log.borrow_mut().fail_renders = false;
    sched.run_frame(FRAME);
    assert_eq!(scene.frames_rendered(), 1);
}

#[test]
fn ambient_tracks_theme_and_scroll() {
    assert!(approx(ambient_level(Theme::Dark, 0.0), 0.5));
    assert!(approx(ambient_level(Theme::Dark, 1.0), 0.8));
    assert!(approx(ambient_level(Theme::Light, 1.0), 1.2));

    let (scene, log, sched) = mount(SceneOptions::default());
    scene.set_scroll_progress(1.0);
    sched.run_frame(FRAME);
    assert!(approx(log.borrow().last_ambient, 0.8));
}

#[test]
fn page_scroll_maps_to_unit_progress() {
    assert_eq!(scroll_progress(0.0, 1000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(250.0, 1500.0, 1000.0), 0.5);
    assert_eq!(scroll_progress(900.0, 1500.0, 1000.0), 1.0);
    assert_eq!(scroll_progress(-20.0, 1500.0, 1000.0), 0.0);
}

#[test]
fn layer_geometry_is_seeded_and_bounded() {
    let near = &DEFAULT_LAYERS[0];
    let a = near.generate(&mut layer_rng(7, 0));
    let b = near.generate(&mut layer_rng(7, 0));
    assert_eq!(a, b);
    assert!(a
        .iter()
        .all(|p| p.position[0].abs() <= 150.0 && p.position[2].abs() <= 75.0));
    assert!(a.iter().all(|p| p.size >= 0.5 && p.size < 2.0));

    let nebula = &DEFAULT_LAYERS[5];
    let LayerShape::Shell { center, radius } = nebula.shape else {
        panic!("nebula should be a shell");
    };
    for p in nebula.generate(&mut layer_rng(7, 5)) {
        let d = ((p.position[0] - center[0]).powi(2)
            + (p.position[1] - center[1]).powi(2)
            + (p.position[2] - center[2]).powi(2))
        .sqrt();
        assert!(d >= 0.3 * radius - 1e-3 && d <= radius + 1e-3);
        assert_eq!(p.size, 1.0);
    }
}
