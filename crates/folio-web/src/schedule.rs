//! Browser implementations of the core scheduling traits.
//!
//! Each request owns its JS callback in the pending map. Firing or cancelling
//! removes the entry, which drops the closure and the user callback with it.

use crate::dom;
use fnv::FnvHashMap;
use folio_core::{FrameCallback, FrameId, FrameScheduler, TimerCallback, TimerId, TimerScheduler};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Pending<F> = Rc<RefCell<FnvHashMap<u64, (i32, Closure<F>)>>>;

/// Take the entry for `id` out of the map. The returned closure may be the
/// one currently running; wasm-bindgen defers freeing it until the call
/// returns.
fn take_entry<F: ?Sized>(
    pending: &Weak<RefCell<FnvHashMap<u64, (i32, Closure<F>)>>>,
    id: u64,
) -> Option<(i32, Closure<F>)> {
    let pending = pending.upgrade()?;
    let entry = pending.borrow_mut().remove(&id);
    entry
}

pub struct RafScheduler {
    window: web::Window,
    next_id: Cell<u64>,
    pending: Pending<dyn FnMut(f64)>,
}

impl RafScheduler {
    pub fn new(window: web::Window) -> Self {
        Self {
            window,
            next_id: Cell::new(0),
            pending: Rc::default(),
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let pending = Rc::downgrade(&self.pending);
        let closure: Closure<dyn FnMut(f64)> = Closure::once(move |timestamp_ms: f64| {
            let entry = take_entry(&pending, id);
            callback(timestamp_ms);
            drop(entry);
        });
        let js = closure.as_ref().unchecked_ref::<js_sys::Function>();
        match self.window.request_animation_frame(js) {
            Ok(handle) => {
                self.pending.borrow_mut().insert(id, (handle, closure));
            }
            Err(e) => log::error!("[scene] requestAnimationFrame failed: {:?}", e),
        }
        FrameId(id)
    }

    fn cancel_frame(&self, id: FrameId) {
        let entry = self.pending.borrow_mut().remove(&id.0);
        if let Some((handle, _closure)) = entry {
            _ = self.window.cancel_animation_frame(handle);
        }
    }
}

pub struct TimeoutScheduler {
    window: web::Window,
    next_id: Cell<u64>,
    pending: Pending<dyn FnMut()>,
}

impl TimeoutScheduler {
    pub fn new(window: web::Window) -> Self {
        Self {
            window,
            next_id: Cell::new(0),
            pending: Rc::default(),
        }
    }
}

impl TimerScheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let pending = Rc::downgrade(&self.pending);
        let closure: Closure<dyn FnMut()> = Closure::once(move || {
            let entry = take_entry(&pending, id);
            callback();
            drop(entry);
        });
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref::<js_sys::Function>(),
                dom::duration_ms(delay),
            ) {
            Ok(handle) => {
                self.pending.borrow_mut().insert(id, (handle, closure));
            }
            Err(e) => log::error!("[chat] setTimeout failed: {:?}", e),
        }
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) {
        let entry = self.pending.borrow_mut().remove(&id.0);
        if let Some((handle, _closure)) = entry {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}
