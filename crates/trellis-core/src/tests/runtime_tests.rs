use crate::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn frame_callback_runs_once_with_frame_time() {
    let runtime = TestRuntime::new();
    let handle = runtime.handle();
    let seen = Rc::new(Cell::new(None));
    let sink = seen.clone();

    let registration = handle.frame_clock().with_frame_nanos(move |time| sink.set(Some(time)));
    assert!(registration.is_active());
    assert!(handle.needs_frame());

    handle.drain_frame_callbacks(42);
    registration.disarm();
    assert_eq!(seen.get(), Some(42));
    assert_eq!(handle.last_frame_nanos(), Some(42));

    seen.set(None);
    handle.drain_frame_callbacks(84);
    assert_eq!(seen.get(), None);
    assert!(!handle.needs_frame());
}

#[test]
fn dropping_registration_cancels_callback() {
    let runtime = TestRuntime::new();
    let handle = runtime.handle();
    let fired = Rc::new(Cell::new(false));
    let sink = fired.clone();

    let registration = handle.frame_clock().with_frame_nanos(move |_| sink.set(true));
    drop(registration);
    assert!(!handle.has_frame_callbacks());

    handle.drain_frame_callbacks(1);
    assert!(!fired.get());
}

#[test]
fn callbacks_registered_during_a_frame_wait_for_the_next_one() {
    let runtime = TestRuntime::new();
    let handle = runtime.handle();
    let frames = Rc::new(RefCell::new(Vec::new()));
    let keep: Rc<RefCell<Vec<FrameCallbackRegistration>>> = Rc::new(RefCell::new(Vec::new()));

    let (sink, inner_handle, inner_keep) = (frames.clone(), handle.clone(), keep.clone());
    let first = handle.frame_clock().with_frame_millis(move |millis| {
        sink.borrow_mut().push(millis);
        let sink = sink.clone();
        let next = inner_handle
            .frame_clock()
            .with_frame_millis(move |millis| sink.borrow_mut().push(millis));
        inner_keep.borrow_mut().push(next);
    });

    handle.drain_frame_callbacks(16_000_000);
    first.disarm();
    assert_eq!(*frames.borrow(), vec![16]);

    handle.drain_frame_callbacks(32_000_000);
    assert_eq!(*frames.borrow(), vec![16, 32]);
}

#[test]
fn detached_handle_registers_nothing() {
    let handle = RuntimeHandle::detached();
    let registration = handle.frame_clock().with_frame_nanos(|_| {});
    assert!(!registration.is_active());
    assert!(!handle.is_alive());
}
