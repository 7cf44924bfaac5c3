use folio_core::{ViewportSize, MAX_PIXEL_RATIO};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// An attached DOM event listener. Dropping it detaches the handler and frees
/// the closure.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Option<Closure<dyn FnMut(web::Event)>>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("add {} listener: {:?}", event, e))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure: Some(closure),
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(closure) = self.closure.take() {
            _ = self
                .target
                .remove_event_listener_with_callback(self.event, closure.as_ref().unchecked_ref());
        }
    }
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) -> anyhow::Result<Option<Listener>> {
    let Some(el) = document.get_element_by_id(element_id) else {
        log::debug!("[dom] no #{}; click handler skipped", element_id);
        return Ok(None);
    };
    Listener::new(el.as_ref(), "click", move |_| handler()).map(Some)
}

/// Window size in physical pixels, with the device pixel ratio capped.
pub fn viewport_size(window: &web::Window) -> ViewportSize {
    let dpr = window.device_pixel_ratio().min(MAX_PIXEL_RATIO);
    let css_w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let css_h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    ViewportSize::new((css_w * dpr) as u32, (css_h * dpr) as u32)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, size: ViewportSize) {
    canvas.set_width(size.width());
    canvas.set_height(size.height());
}

pub fn create_element(
    document: &web::Document,
    tag: &str,
    class: &str,
) -> anyhow::Result<web::HtmlElement> {
    let el = document
        .create_element(tag)
        .map_err(|e| anyhow::anyhow!("create <{}>: {:?}", tag, e))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    Ok(el)
}

pub fn append(parent: &web::Node, child: &web::Node) -> anyhow::Result<()> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!("append_child: {:?}", e))
}

/// Milliseconds for `setTimeout`, saturating at `i32::MAX`.
#[inline]
pub fn duration_ms(d: Duration) -> i32 {
    d.as_millis().min(i32::MAX as u128) as i32
}

/// Run `f` once after `delay_ms`. The timer is not cancellable.
pub fn set_timeout_once(window: &web::Window, delay_ms: i32, f: impl FnOnce() + 'static) {
    let callback = Closure::once_into_js(f);
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms)
    {
        log::warn!("[dom] setTimeout failed: {:?}", e);
    }
}
