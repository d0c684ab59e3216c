use std::any::type_name;
use std::fmt;

use trellis_core::{AnyValue, BindingPriority, PropertyId, PropertyType, StyledProperty};

use crate::animatable::Animatable;
use crate::easing::{Lerp, TransitionSpec};
use crate::transition::{SequenceState, Transition, TransitionError, TransitionSequence};

/// Tween from the old value to the new one for a single styled property.
pub struct PropertyTransition<T> {
    property: StyledProperty<T>,
    spec: TransitionSpec,
}

pub type DoubleTransition = PropertyTransition<f64>;
pub type FloatTransition = PropertyTransition<f32>;
pub type IntegerTransition = PropertyTransition<i32>;

impl<T: PropertyType + Lerp> PropertyTransition<T> {
    pub fn new(property: &StyledProperty<T>, spec: TransitionSpec) -> Self {
        Self {
            property: property.clone(),
            spec,
        }
    }

    /// Default easing over `duration_millis`.
    pub fn with_duration(property: &StyledProperty<T>, duration_millis: u64) -> Self {
        Self::new(
            property,
            TransitionSpec {
                duration_millis,
                ..TransitionSpec::default()
            },
        )
    }

    pub fn spec(&self) -> TransitionSpec {
        self.spec
    }

    pub fn target_property(&self) -> &StyledProperty<T> {
        &self.property
    }

    fn unpack(&self, value: &AnyValue) -> Result<T, TransitionError> {
        value
            .downcast::<T>()
            .ok_or_else(|| TransitionError::IncompatibleValue {
                property: self.property.name(),
                expected: type_name::<T>(),
                found: value.type_name(),
            })
    }
}

impl<T: PropertyType + Lerp> Transition for PropertyTransition<T> {
    fn property(&self) -> PropertyId {
        self.property.id()
    }

    fn apply(
        &self,
        target: &Animatable,
        old: &AnyValue,
        new: &AnyValue,
    ) -> Result<(), TransitionError> {
        let from = self.unpack(old)?;
        let to = self.unpack(new)?;
        log::debug!(
            "{target}: {} {from:?} -> {to:?} over {}ms",
            self.property.descriptor(),
            self.spec.duration_millis
        );
        target.begin_transition(Box::new(TweenSequence {
            property: self.property.clone(),
            spec: self.spec,
            from,
            to,
        }))
    }
}

impl<T: PropertyType> fmt::Debug for PropertyTransition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyTransition")
            .field("property", self.property.descriptor())
            .field("spec", &self.spec)
            .finish()
    }
}

struct TweenSequence<T> {
    property: StyledProperty<T>,
    spec: TransitionSpec,
    from: T,
    to: T,
}

impl<T: PropertyType + Lerp> TransitionSequence for TweenSequence<T> {
    fn property(&self) -> PropertyId {
        self.property.id()
    }

    fn advance(
        &mut self,
        target: &Animatable,
        elapsed_nanos: u64,
    ) -> Result<SequenceState, TransitionError> {
        // Hold the old value until the delay has passed.
        let Some(progress) = self.spec.linear_progress(elapsed_nanos) else {
            target.set_value_with_priority(
                &self.property,
                self.from.clone(),
                BindingPriority::Animation,
            )?;
            return Ok(SequenceState::Running);
        };
        if progress >= 1.0 {
            target.set_value_with_priority(&self.property, self.to.clone(), BindingPriority::Animation)?;
            return Ok(SequenceState::Finished);
        }
        let value = self.from.lerp(&self.to, self.spec.easing.transform(progress));
        target.set_value_with_priority(&self.property, value, BindingPriority::Animation)?;
        Ok(SequenceState::Running)
    }
}

#[cfg(test)]
#[path = "tests/property_transition_tests.rs"]
mod tests;
