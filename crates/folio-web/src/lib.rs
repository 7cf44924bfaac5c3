#![cfg(target_arch = "wasm32")]
use folio_core::{
    scroll_progress, use_theme, FrameScheduler, Notifier, SceneHandle, SceneOptions, Subscription,
    ThemeContext, ThemeProvider, TimerScheduler,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod chat;
mod constants;
mod content;
mod dom;
mod render;
mod reveal;
mod schedule;
mod theme;
mod toast;

use constants::{BG_CANVAS_ID, SCROLL_ROTATION_ATTR, SCROLL_ROTATION_TOGGLE_ID};
use dom::Listener;
use render::GpuBackend;

/// Everything that must live for the page's lifetime.
struct App {
    _theme: ThemeProvider,
    _scene: Option<SceneHandle<GpuBackend>>,
    _chat: Option<chat::ChatView>,
    _subscriptions: Vec<Subscription>,
    _listeners: Vec<Listener>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("folio-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let provider = ThemeProvider::install(theme::WebThemeHost::new(window.clone()))?;
    let theme = use_theme()?;

    let mut subscriptions = Vec::new();
    let mut listeners = Vec::new();
    if let Some((listener, sub)) = theme::wire_toggle(&window, &document, &theme)? {
        listeners.push(listener);
        subscriptions.push(sub);
    }

    let frames: Rc<dyn FrameScheduler> = Rc::new(schedule::RafScheduler::new(window.clone()));
    let timers: Rc<dyn TimerScheduler> = Rc::new(schedule::TimeoutScheduler::new(window.clone()));

    let scene = mount_scene(&window, &document, &theme, frames).await?;
    if let Some(scene) = &scene {
        let scene_ref = scene.scene_ref();
        subscriptions.push(theme.subscribe(move |t| {
            if let Err(e) = scene_ref.on_theme_change(t) {
                log::debug!("[scene] theme change ignored: {}", e);
            }
        }));
    }

    let notifier: Rc<dyn Notifier> = Rc::new(toast::WebNotifier::new(
        window.clone(),
        document.clone(),
    ));
    listeners.extend(content::render(&window, &document, notifier)?);
    listeners.extend(reveal::mount(&window, &document)?);

    let chat = chat::ChatView::mount(&document, timers)?;

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            _theme: provider,
            _scene: scene,
            _chat: chat,
            _subscriptions: subscriptions,
            _listeners: listeners,
        });
    });
    log::info!("folio-web ready");
    Ok(())
}

/// Mount the starfield on `#bg-canvas` and hook it to window resize and page
/// scroll. A missing canvas or unavailable WebGPU leaves the page without a
/// background.
async fn mount_scene(
    window: &web::Window,
    document: &web::Document,
    theme: &ThemeContext,
    frames: Rc<dyn FrameScheduler>,
) -> anyhow::Result<Option<SceneHandle<GpuBackend>>> {
    let Some(canvas) = document
        .get_element_by_id(BG_CANVAS_ID)
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
    else {
        log::info!("[scene] no #{}; background disabled", BG_CANVAS_ID);
        return Ok(None);
    };

    let size = dom::viewport_size(window);
    dom::sync_canvas_backing_size(&canvas, size);
    let backend = match GpuBackend::new(canvas.clone(), size).await {
        Ok(b) => Some(b),
        Err(e) => {
            log::error!("[gpu] WebGPU init error: {:?}", e);
            None
        }
    };

    let options = SceneOptions {
        scroll_driven: canvas.get_attribute(SCROLL_ROTATION_ATTR).as_deref() != Some("off"),
        ..SceneOptions::default()
    };
    let Some(scene) = SceneHandle::mount(backend, size, theme.theme(), options, frames) else {
        return Ok(None);
    };

    let scene_ref = scene.scene_ref();
    let win = window.clone();
    let resize = Listener::new(window.as_ref(), "resize", move |_| {
        let size = dom::viewport_size(&win);
        dom::sync_canvas_backing_size(&canvas, size);
        _ = scene_ref.on_resize(size);
    })?;

    let scene_ref = scene.scene_ref();
    let win = window.clone();
    let doc = document.clone();
    let update_scroll = move || {
        let scroll_y = win.scroll_y().unwrap_or(0.0);
        let view_h = win
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let doc_h = doc
            .document_element()
            .map(|el| el.scroll_height() as f64)
            .unwrap_or(0.0);
        _ = scene_ref.set_scroll_progress(scroll_progress(scroll_y, doc_h, view_h));
    };
    update_scroll();
    let scroll = Listener::new(window.as_ref(), "scroll", move |_| update_scroll())?;

    let switch = wire_scroll_rotation_switch(document, &scene)?;

    scene.on_unmount(move || {
        drop(resize);
        drop(scroll);
        drop(switch);
        log::debug!("[scene] scene listeners removed");
    });
    Ok(Some(scene))
}

/// Hook `#scroll-rotation-toggle` to flip between scroll-driven and idle
/// rotation on the live scene. `aria-checked` mirrors the current mode.
fn wire_scroll_rotation_switch(
    document: &web::Document,
    scene: &SceneHandle<GpuBackend>,
) -> anyhow::Result<Option<Listener>> {
    let Some(switch) = document.get_element_by_id(SCROLL_ROTATION_TOGGLE_ID) else {
        log::debug!("[scene] no #{}; rotation mode fixed", SCROLL_ROTATION_TOGGLE_ID);
        return Ok(None);
    };
    sync_switch(&switch, scene.is_scroll_driven());

    let scene_ref = scene.scene_ref();
    let el = switch.clone();
    let listener = Listener::new(switch.as_ref(), "click", move |_| {
        match scene_ref.toggle_scroll_driven() {
            Ok(enabled) => sync_switch(&el, enabled),
            Err(e) => log::debug!("[scene] rotation switch ignored: {}", e),
        }
    })?;
    Ok(Some(listener))
}

fn sync_switch(switch: &web::Element, enabled: bool) {
    _ = switch.set_attribute("role", "switch");
    _ = switch.set_attribute("aria-checked", if enabled { "true" } else { "false" });
}
