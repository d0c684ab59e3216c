//! Testing utilities and harness for Trellis
//!
//! [`FrameHarness`] owns a runtime whose frames only happen when a test asks
//! for them, on a clock that only moves when a test moves it.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trellis_core::{Clock, Runtime, RuntimeHandle, RuntimeScheduler};

const DEFAULT_FRAME_INTERVAL_NANOS: u64 = 16_000_000;

/// Scheduler that only counts frame requests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    requests: AtomicUsize,
}

impl ManualScheduler {
    pub fn frame_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl RuntimeScheduler for ManualScheduler {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

/// Clock reporting whatever time the harness last advanced to.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualClock {
    now_nanos: u64,
}

impl Clock for ManualClock {
    type Instant = u64;

    fn now(&self) -> u64 {
        self.now_nanos
    }

    fn elapsed_millis(&self, since: u64) -> u64 {
        self.now_nanos.saturating_sub(since) / 1_000_000
    }
}

pub struct FrameHarness {
    scheduler: Arc<ManualScheduler>,
    runtime: Runtime,
    now_nanos: Cell<u64>,
    frame_interval_nanos: u64,
    frames: Cell<usize>,
}

impl FrameHarness {
    pub fn new() -> Self {
        Self::with_frame_interval_millis(DEFAULT_FRAME_INTERVAL_NANOS / 1_000_000)
    }

    pub fn with_frame_interval_millis(interval_millis: u64) -> Self {
        let scheduler = Arc::new(ManualScheduler::default());
        let runtime = Runtime::new(scheduler.clone());
        Self {
            scheduler,
            runtime,
            now_nanos: Cell::new(0),
            frame_interval_nanos: interval_millis.max(1) * 1_000_000,
            frames: Cell::new(0),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn clock(&self) -> ManualClock {
        ManualClock {
            now_nanos: self.now_nanos.get(),
        }
    }

    pub fn now_millis(&self) -> u64 {
        self.now_nanos.get() / 1_000_000
    }

    /// Number of frames delivered so far.
    pub fn frames(&self) -> usize {
        self.frames.get()
    }

    pub fn frame_requests(&self) -> usize {
        self.scheduler.frame_requests()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.handle().has_frame_callbacks()
    }

    /// Delivers a frame at the current time without moving the clock.
    pub fn frame(&self) {
        self.frames.set(self.frames.get() + 1);
        self.handle().drain_frame_callbacks(self.now_nanos.get());
    }

    /// Moves the clock forward by `millis` and delivers one frame.
    pub fn advance_millis(&self, millis: u64) {
        self.now_nanos
            .set(self.now_nanos.get() + millis.saturating_mul(1_000_000));
        self.frame();
    }

    /// Moves the clock by one frame interval and delivers a frame.
    pub fn advance_frame(&self) {
        self.now_nanos
            .set(self.now_nanos.get() + self.frame_interval_nanos);
        self.frame();
    }

    /// Delivers frames at the harness interval until nothing is waiting for
    /// one, or `max_frames` have been delivered. Returns how many ran.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut ran = 0;
        while ran < max_frames && self.has_pending_frame() {
            self.advance_frame();
            ran += 1;
        }
        ran
    }
}

impl Default for FrameHarness {
    fn default() -> Self {
        Self::new()
    }
}
