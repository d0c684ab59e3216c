//! The contract every transition implementation satisfies.

use trellis_core::{AnyValue, PropertyError, PropertyId};

use crate::animatable::Animatable;

#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("transition for {property} cannot interpolate values of type {found}, expected {expected}")]
    IncompatibleValue {
        property: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// Converts a discrete change of one property into an animated write sequence.
///
/// Implementations are shared descriptors: the same instance may sit in the
/// registries of many objects, so per-run state belongs in the
/// [`TransitionSequence`] handed to [`Animatable::begin_transition`].
pub trait Transition {
    /// The property this transition animates.
    fn property(&self) -> PropertyId;

    /// Starts animating `target` from `old` to `new`, replacing any sequence
    /// already running for the same property on that target.
    fn apply(&self, target: &Animatable, old: &AnyValue, new: &AnyValue)
        -> Result<(), TransitionError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SequenceState {
    Running,
    Finished,
}

/// One running application of a transition to one object.
pub trait TransitionSequence {
    fn property(&self) -> PropertyId;

    /// Writes the value for `elapsed_nanos` of running time. Paused time is
    /// not counted.
    fn advance(&mut self, target: &Animatable, elapsed_nanos: u64)
        -> Result<SequenceState, TransitionError>;
}
