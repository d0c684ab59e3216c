//! Property transitions for Trellis
//!
//! An [`Animatable`] intercepts every property change, finds the first
//! registered [`Transition`] for the changed property and lets it animate
//! the change instead of applying it at once.

pub mod animatable;
pub mod easing;
pub mod play_state;
pub mod property_transition;
pub mod transition;
pub mod transitions;

pub use animatable::{
    Animatable, ChangeInterceptor, RouteOutcome, WeakAnimatable, ANIMATION_PLAY_STATE, TRANSITIONS,
};
pub use easing::{Easing, Lerp, TransitionSpec};
pub use play_state::AnimationPlayState;
pub use property_transition::{
    DoubleTransition, FloatTransition, IntegerTransition, PropertyTransition,
};
pub use transition::{SequenceState, Transition, TransitionError, TransitionSequence};
pub use transitions::{CollectionChange, CollectionSubscription, Transitions};

pub mod prelude {
    pub use crate::animatable::{Animatable, ANIMATION_PLAY_STATE, TRANSITIONS};
    pub use crate::easing::{Easing, Lerp, TransitionSpec};
    pub use crate::play_state::AnimationPlayState;
    pub use crate::property_transition::{DoubleTransition, PropertyTransition};
    pub use crate::transition::Transition;
    pub use crate::transitions::Transitions;
}
