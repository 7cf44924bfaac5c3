// Host-side tests for the frame loop and deferred timers.

use folio_core::{DeferredTask, FrameScheduler, ManualScheduler, RepeatingTask, TimerScheduler};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn repeating_task_ticks_once_per_frame() {
    let sched = Rc::new(ManualScheduler::new());
    let ticks = Rc::new(Cell::new(0u32));
    let t = ticks.clone();
    let task = RepeatingTask::start(sched.clone(), move |_| t.set(t.get() + 1));

    assert_eq!(sched.outstanding_frames(), 1);
    for _ in 0..5 {
        assert_eq!(sched.run_frame(FRAME), 1);
    }
    assert_eq!(ticks.get(), 5);
    assert_eq!(sched.outstanding_frames(), 1);
    assert!(task.is_active());
}

#[test]
fn repeating_task_receives_host_timestamp() {
    let sched = Rc::new(ManualScheduler::new());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let _task = RepeatingTask::start(sched.clone(), move |ts| s.borrow_mut().push(ts));

    sched.run_frame(Duration::from_millis(10));
    sched.run_frame(Duration::from_millis(20));
    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!((seen[0] - 10.0).abs() < 1e-9);
    assert!((seen[1] - 30.0).abs() < 1e-9);
}

#[test]
fn cancel_leaves_no_outstanding_frame() {
    let sched = Rc::new(ManualScheduler::new());
    let ticks = Rc::new(Cell::new(0u32));
    let t = ticks.clone();
    let task = RepeatingTask::start(sched.clone(), move |_| t.set(t.get() + 1));
    sched.run_frame(FRAME);

    task.cancel();
    task.cancel();
    assert!(!task.is_active());
    assert_eq!(sched.outstanding_frames(), 0);
    assert_eq!(sched.run_frame(FRAME), 0);
    assert_eq!(ticks.get(), 1);
}

#[test]
fn dropping_the_task_cancels_it() {
    let sched = Rc::new(ManualScheduler::new());
    let task = RepeatingTask::start(sched.clone(), |_| {});
    drop(task);
    assert_eq!(sched.outstanding_frames(), 0);
}

#[test]
fn cancel_from_inside_tick_stops_rescheduling() {
    let sched = Rc::new(ManualScheduler::new());
    let slot: Rc<RefCell<Option<RepeatingTask>>> = Rc::new(RefCell::new(None));
    let ticks = Rc::new(Cell::new(0u32));

    let slot_in = slot.clone();
    let t = ticks.clone();
    let task = RepeatingTask::start(sched.clone(), move |_| {
        t.set(t.get() + 1);
        if t.get() == 3 {
            if let Some(task) = slot_in.borrow().as_ref() {
                task.cancel();
            }
        }
    });
    *slot.borrow_mut() = Some(task);

    for _ in 0..10 {
        sched.run_frame(FRAME);
    }
    assert_eq!(ticks.get(), 3);
    assert_eq!(sched.outstanding_frames(), 0);
}

#[test]
fn frames_requested_inside_a_callback_wait_for_next_frame() {
    let sched = Rc::new(ManualScheduler::new());
    let inner_ran = Rc::new(Cell::new(false));
    let s = sched.clone();
    let flag = inner_ran.clone();
    sched.request_frame(Box::new(move |_| {
        let flag = flag.clone();
        s.request_frame(Box::new(move |_| flag.set(true)));
    }));

    assert_eq!(sched.run_frame(FRAME), 1);
    assert!(!inner_ran.get());
    assert_eq!(sched.run_frame(FRAME), 1);
    assert!(inner_ran.get());
}

#[test]
fn timers_fire_in_due_order() {
    let sched = ManualScheduler::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    for (label, ms) in [("c", 30u64), ("a", 10), ("b", 20), ("a2", 10)] {
        let o = order.clone();
        sched.schedule(
            Duration::from_millis(ms),
            Box::new(move || o.borrow_mut().push(label)),
        );
    }

    assert_eq!(sched.advance(Duration::from_millis(15)), 2);
    assert_eq!(*order.borrow(), vec!["a", "a2"]);
    assert_eq!(sched.advance(Duration::from_millis(100)), 2);
    assert_eq!(*order.borrow(), vec!["a", "a2", "b", "c"]);
    assert_eq!(sched.outstanding_timers(), 0);
}

#[test]
fn chained_timer_inside_window_fires() {
    let sched = Rc::new(ManualScheduler::new());
    let fired = Rc::new(Cell::new(0u32));
    let s = sched.clone();
    let f = fired.clone();
    sched.schedule(
        Duration::from_millis(10),
        Box::new(move || {
            f.set(f.get() + 1);
            let f = f.clone();
            s.schedule(Duration::from_millis(10), Box::new(move || f.set(f.get() + 1)));
        }),
    );

    assert_eq!(sched.advance(Duration::from_millis(25)), 2);
    assert_eq!(fired.get(), 2);
}

#[test]
fn deferred_task_fires_once_after_delay() {
    let sched = Rc::new(ManualScheduler::new());
    let fired = Rc::new(Cell::new(0u32));
    let f = fired.clone();
    let task = DeferredTask::schedule(sched.clone(), Duration::from_secs(1), move || {
        f.set(f.get() + 1)
    });

    sched.advance(Duration::from_millis(999));
    assert!(task.is_pending());
    assert_eq!(fired.get(), 0);

    sched.advance(Duration::from_millis(1));
    assert!(!task.is_pending());
    assert_eq!(fired.get(), 1);

    task.cancel();
    sched.advance(Duration::from_secs(5));
    assert_eq!(fired.get(), 1);
}

#[test]
fn cancelled_deferred_task_never_fires() {
    let sched = Rc::new(ManualScheduler::new());
    let fired = Rc::new(Cell::new(false));
    let f = fired.clone();
    let task = DeferredTask::schedule(sched.clone(), Duration::from_secs(1), move || f.set(true));

    task.cancel();
    assert!(!task.is_pending());
    assert_eq!(sched.outstanding_timers(), 0);
    sched.advance(Duration::from_secs(2));
    assert!(!fired.get());
}
