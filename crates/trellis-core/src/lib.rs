//! Core object model for Trellis.
//!
//! Provides property descriptors, the priority-layered property store with
//! change notification, and the frame-callback runtime that drives anything
//! time based.

pub mod collections;
pub mod error;
pub mod frame_clock;
pub mod object;
pub mod platform;
pub mod priority;
pub mod property;
pub mod runtime;
pub mod value;

pub use error::{HandlerError, PropertyError};
pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use object::{
    ObjectId, PropertyChange, PropertyChangeHandler, Subscription, UiObject, WeakUiObject,
};
pub use platform::{Clock, RuntimeScheduler};
pub use priority::BindingPriority;
pub use property::{DirectProperty, PropertyDescriptor, PropertyId, PropertyKind, StyledProperty};
pub use runtime::{DefaultScheduler, FrameCallbackId, Runtime, RuntimeHandle};
pub use value::{AnyValue, PropertyType};

#[cfg(test)]
pub use runtime::{TestRuntime, TestScheduler};

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod runtime_tests;
