//! Host scheduling seams.
//!
//! The browser drives the page through two callback mechanisms: animation
//! frames and one-shot timers. Both are modelled as traits so the scene and
//! chat logic can run against `requestAnimationFrame`/`setTimeout` in the web
//! frontend and against [`ManualScheduler`] in host-side tests.

use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::rc::Rc;
use std::time::Duration;

/// Frame callbacks receive the host timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;
pub type TimerCallback = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameId;
    fn cancel_frame(&self, id: FrameId);
}

pub trait TimerScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;
    fn cancel(&self, id: TimerId);
}

/// Deterministic scheduler with a virtual clock.
///
/// Nothing runs until the owner calls [`run_frame`](Self::run_frame) or
/// [`advance`](Self::advance), which makes outstanding callbacks countable.
#[derive(Default)]
pub struct ManualScheduler {
    now_ms: Cell<f64>,
    next_id: Cell<u64>,
    frames: RefCell<FnvHashMap<u64, FrameCallback>>,
    timers: RefCell<FnvHashMap<u64, (f64, TimerCallback)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }

    pub fn outstanding_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn outstanding_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Move the clock forward by `dt` and run every frame callback that was
    /// pending when the call started. Frames requested from inside a callback
    /// wait for the next call, as they would in a browser. Returns the number
    /// of callbacks run.
    pub fn run_frame(&self, dt: Duration) -> usize {
        self.now_ms.set(self.now_ms.get() + duration_ms(dt));
        let now = self.now_ms.get();
        let mut ids: Vec<u64> = self.frames.borrow().keys().copied().collect();
        ids.sort_unstable();
        let mut ran = 0;
        for id in ids {
            // An earlier callback may have cancelled this one.
            let callback = self.frames.borrow_mut().remove(&id);
            if let Some(callback) = callback {
                callback(now);
                ran += 1;
            }
        }
        ran
    }

    /// Move the clock forward by `dt`, firing due timers in due order (ties
    /// broken by scheduling order). Timers scheduled by a firing timer also
    /// fire if they fall inside the window.
    pub fn advance(&self, dt: Duration) -> usize {
        let target = self.now_ms.get() + duration_ms(dt);
        let mut fired = 0;
        loop {
            let next = self
                .timers
                .borrow()
                .iter()
                .filter(|(_, (due, _))| *due <= target)
                .map(|(id, (due, _))| (*id, *due))
                .min_by(|a, b| {
                    a.1.partial_cmp(&b.1)
                        .unwrap_or(Ordering::Equal)
                        .then(a.0.cmp(&b.0))
                });
            let Some((id, due)) = next else { break };
            let entry = self.timers.borrow_mut().remove(&id);
            if let Some((_, callback)) = entry {
                self.now_ms.set(due.max(self.now_ms.get()));
                callback();
                fired += 1;
            }
        }
        self.now_ms.set(target);
        fired
    }

    fn take_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

// Whole microseconds keep the virtual clock exact for millisecond steps.
#[inline]
fn duration_ms(d: Duration) -> f64 {
    d.as_micros() as f64 / 1000.0
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        let id = self.take_id();
        self.frames.borrow_mut().insert(id, callback);
        FrameId(id)
    }

    fn cancel_frame(&self, id: FrameId) {
        self.frames.borrow_mut().remove(&id.0);
    }
}

impl TimerScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = self.take_id();
        let due = self.now_ms.get() + duration_ms(delay);
        self.timers.borrow_mut().insert(id, (due, callback));
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id.0);
    }
}

struct LoopShared {
    scheduler: Rc<dyn FrameScheduler>,
    pending: Cell<Option<FrameId>>,
    cancelled: Cell<bool>,
    tick: RefCell<Box<dyn FnMut(f64)>>,
}

/// A self-rescheduling frame loop with an explicit cancel handle.
///
/// The next frame is requested only after `tick` returns, so ticks never
/// overlap. Dropping the task cancels it.
pub struct RepeatingTask {
    shared: Rc<LoopShared>,
}

impl RepeatingTask {
    pub fn start(scheduler: Rc<dyn FrameScheduler>, tick: impl FnMut(f64) + 'static) -> Self {
        let shared = Rc::new(LoopShared {
            scheduler,
            pending: Cell::new(None),
            cancelled: Cell::new(false),
            tick: RefCell::new(Box::new(tick)),
        });
        request_next(&shared);
        Self { shared }
    }

    /// Stop the loop. Safe to call repeatedly and from inside `tick`.
    pub fn cancel(&self) {
        if self.shared.cancelled.replace(true) {
            return;
        }
        if let Some(id) = self.shared.pending.take() {
            self.shared.scheduler.cancel_frame(id);
        }
    }

    pub fn is_active(&self) -> bool {
        !self.shared.cancelled.get()
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn request_next(shared: &Rc<LoopShared>) {
    let weak = Rc::downgrade(shared);
    let id = shared.scheduler.request_frame(Box::new(move |timestamp_ms| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        shared.pending.set(None);
        if shared.cancelled.get() {
            return;
        }
        (&mut *shared.tick.borrow_mut())(timestamp_ms);
        if !shared.cancelled.get() {
            request_next(&shared);
        }
    }));
    shared.pending.set(Some(id));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeferredState {
    Pending,
    Fired,
    Cancelled,
}

/// One-shot callback after a delay, cancellable until it fires.
pub struct DeferredTask {
    timers: Rc<dyn TimerScheduler>,
    id: TimerId,
    state: Rc<Cell<DeferredState>>,
}

impl DeferredTask {
    pub fn schedule(
        timers: Rc<dyn TimerScheduler>,
        delay: Duration,
        f: impl FnOnce() + 'static,
    ) -> Self {
        let state = Rc::new(Cell::new(DeferredState::Pending));
        let state_cb = state.clone();
        let id = timers.schedule(
            delay,
            Box::new(move || {
                if state_cb.get() == DeferredState::Pending {
                    state_cb.set(DeferredState::Fired);
                    f();
                }
            }),
        );
        Self { timers, id, state }
    }

    pub fn cancel(&self) {
        if self.state.get() == DeferredState::Pending {
            self.state.set(DeferredState::Cancelled);
            self.timers.cancel(self.id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.get() == DeferredState::Pending
    }
}
