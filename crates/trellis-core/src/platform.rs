//! Platform abstraction traits for Trellis runtime services.
//!
//! These traits let the host platform own frame scheduling and time
//! keeping, so the object model never reaches for `std` timers directly.

/// Schedules work for the Trellis runtime.
///
/// Implementations are responsible for triggering frame processing on the
/// thread that owns the object tree. They must be safe to share across
/// threads because hosts typically wake the UI loop from elsewhere.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Provides timing information for the runtime.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}
