//! Objects whose property changes may be turned into transitions.
//!
//! Every change committed on an [`Animatable`] passes through its router:
//! * changes at `Animation` priority are never matched, so a sequence's own
//!   writes cannot start new transitions;
//! * otherwise the first registered transition for the property is applied;
//! * while the object is `Paused` no transition starts and running sequences
//!   freeze until it is `Running` again.
//!
//! A non-animation change that does not start a transition, including one
//! whose transition fails to apply, cancels whatever sequence was running
//! for that property, so the raw value shows at once. A sequence that does
//! start writes its first value before the change returns, so the raw value
//! of a matched change is never visible on its own.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use once_cell::sync::Lazy;
use trellis_core::collections::map::HashMap;
use trellis_core::{
    BindingPriority, DirectProperty, FrameCallbackRegistration, HandlerError, PropertyChange,
    PropertyChangeHandler, PropertyError, PropertyId, RuntimeHandle, StyledProperty, UiObject,
    WeakUiObject,
};

use crate::play_state::AnimationPlayState;
use crate::transition::{SequenceState, TransitionError, TransitionSequence};
use crate::transitions::Transitions;

pub static ANIMATION_PLAY_STATE: Lazy<StyledProperty<AnimationPlayState>> = Lazy::new(|| {
    StyledProperty::register("Animatable", "AnimationPlayState", AnimationPlayState::Running)
});

pub static TRANSITIONS: Lazy<DirectProperty<Transitions>> =
    Lazy::new(|| DirectProperty::register("Animatable", "Transitions"));

/// What the router did with one change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Written by a running sequence; not matched.
    AnimationWrite,
    /// No registered transition targets the property.
    NoMatch,
    /// A transition matched but the object is paused.
    Suppressed,
    /// The matched transition was applied.
    Started,
}

/// Hook around the router, for types built on top of [`Animatable`].
pub trait ChangeInterceptor {
    fn before_route(&self, _target: &Animatable, _change: &PropertyChange) {}

    fn after_route(&self, _target: &Animatable, _change: &PropertyChange, _outcome: RouteOutcome) {}
}

struct RunningTransition {
    generation: u64,
    sequence: Rc<RefCell<Box<dyn TransitionSequence>>>,
    elapsed_nanos: u64,
    last_frame_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    frozen: bool,
}

struct AnimatableState {
    transitions: RefCell<Transitions>,
    running: RefCell<HashMap<PropertyId, RunningTransition>>,
    interceptor: RefCell<Option<Rc<dyn ChangeInterceptor>>>,
    next_generation: Cell<u64>,
}

struct ChangeRouter {
    state: Weak<AnimatableState>,
}

impl PropertyChangeHandler for ChangeRouter {
    fn property_changed(
        &self,
        object: &UiObject,
        change: &PropertyChange,
    ) -> Result<(), HandlerError> {
        let Some(state) = self.state.upgrade() else {
            return Ok(());
        };
        let target = Animatable {
            object: object.clone(),
            state,
        };
        target.dispatch(change).map_err(Into::into)
    }
}

/// A [`UiObject`] carrying a transition registry and a play state.
#[derive(Clone)]
pub struct Animatable {
    object: UiObject,
    state: Rc<AnimatableState>,
}

#[derive(Clone)]
pub struct WeakAnimatable {
    object: WeakUiObject,
    state: Weak<AnimatableState>,
}

impl WeakAnimatable {
    pub fn upgrade(&self) -> Option<Animatable> {
        Some(Animatable {
            object: self.object.upgrade()?,
            state: self.state.upgrade()?,
        })
    }
}

impl Animatable {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self::with_type_name("Animatable", runtime)
    }

    pub fn with_type_name(type_name: &'static str, runtime: RuntimeHandle) -> Self {
        let object = UiObject::new(type_name, runtime);
        let state = Rc::new(AnimatableState {
            transitions: RefCell::new(Transitions::new()),
            running: RefCell::new(HashMap::new()),
            interceptor: RefCell::new(None),
            next_generation: Cell::new(1),
        });
        object.set_change_handler(Rc::new(ChangeRouter {
            state: Rc::downgrade(&state),
        }));
        Self { object, state }
    }

    pub fn object(&self) -> &UiObject {
        &self.object
    }

    pub fn downgrade(&self) -> WeakAnimatable {
        WeakAnimatable {
            object: self.object.downgrade(),
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn play_state(&self) -> AnimationPlayState {
        self.object.get_value(&ANIMATION_PLAY_STATE)
    }

    pub fn set_play_state(&self, state: AnimationPlayState) -> Result<(), PropertyError> {
        self.object.set_value(&ANIMATION_PLAY_STATE, state)
    }

    /// The live registry. Edits through the returned handle apply to the
    /// very next routed change.
    pub fn transitions(&self) -> Transitions {
        self.state.transitions.borrow().clone()
    }

    /// Replaces the registry. `None` installs a fresh empty one.
    pub fn set_transitions(
        &self,
        transitions: impl Into<Option<Transitions>>,
    ) -> Result<(), PropertyError> {
        let transitions = transitions.into().unwrap_or_default();
        self.object
            .set_and_raise(&TRANSITIONS, &self.state.transitions, transitions)
            .map(|_| ())
    }

    pub fn set_interceptor(
        &self,
        interceptor: Rc<dyn ChangeInterceptor>,
    ) -> Option<Rc<dyn ChangeInterceptor>> {
        self.state.interceptor.replace(Some(interceptor))
    }

    pub fn is_transition_running(&self, property: PropertyId) -> bool {
        self.state.running.borrow().contains_key(&property)
    }

    pub fn is_transition_frozen(&self, property: PropertyId) -> bool {
        self.state
            .running
            .borrow()
            .get(&property)
            .is_some_and(|entry| entry.frozen)
    }

    pub fn running_transitions(&self) -> usize {
        self.state.running.borrow().len()
    }

    fn dispatch(&self, change: &PropertyChange) -> Result<(), TransitionError> {
        let interceptor = self.state.interceptor.borrow().clone();
        if let Some(interceptor) = &interceptor {
            interceptor.before_route(self, change);
        }
        let outcome = self.route_property_change(change)?;
        if let Some(interceptor) = &interceptor {
            interceptor.after_route(self, change, outcome);
        }
        Ok(())
    }

    /// Decides whether `change` becomes a transition and starts it if so.
    pub fn route_property_change(
        &self,
        change: &PropertyChange,
    ) -> Result<RouteOutcome, TransitionError> {
        let property = change.property.id();
        // Resuming is not matching, so it also follows animated play-state writes.
        if property == ANIMATION_PLAY_STATE.id()
            && change.new_value::<AnimationPlayState>() == Some(&AnimationPlayState::Running)
        {
            self.resume_frozen();
        }
        if change.is_animation() {
            return Ok(RouteOutcome::AnimationWrite);
        }

        let Some(transition) = self.transitions().find(property) else {
            log::trace!("{self}: no transition for {}", change.property);
            self.cancel_transition(property)?;
            return Ok(RouteOutcome::NoMatch);
        };
        if self.play_state().is_paused() {
            log::debug!("{self}: paused, {} changes without a transition", change.property);
            self.cancel_transition(property)?;
            return Ok(RouteOutcome::Suppressed);
        }
        if let Err(err) = transition.apply(self, &change.old, &change.new) {
            self.cancel_transition(property)?;
            return Err(err);
        }
        Ok(RouteOutcome::Started)
    }

    /// Installs `sequence` as the only running sequence for its property,
    /// writes its value for elapsed time zero and schedules the next frame.
    /// A sequence already running for that property is dropped without
    /// clearing its last animated value, so the replacement continues from it.
    pub fn begin_transition(
        &self,
        sequence: Box<dyn TransitionSequence>,
    ) -> Result<(), TransitionError> {
        let property = sequence.property();
        let generation = self.state.next_generation.get();
        self.state.next_generation.set(generation + 1);
        let sequence = Rc::new(RefCell::new(sequence));
        let replaced = self.state.running.borrow_mut().insert(
            property,
            RunningTransition {
                generation,
                sequence: sequence.clone(),
                elapsed_nanos: 0,
                last_frame_nanos: None,
                registration: None,
                frozen: false,
            },
        );
        if replaced.is_some() {
            log::debug!("{self}: superseding running transition for {property}");
        }
        drop(replaced);

        let result = sequence.borrow_mut().advance(self, 0);
        match result {
            Ok(SequenceState::Running) => {
                if self.is_current(property, generation) {
                    self.schedule_frame(property, generation);
                }
                Ok(())
            }
            Ok(SequenceState::Finished) => Ok(self.finish_transition(property, generation)?),
            Err(err) => {
                if self.is_current(property, generation) {
                    self.cancel_transition(property)?;
                }
                Err(err)
            }
        }
    }

    /// Stops the sequence running for `property` and removes its animated
    /// value. Returns whether one was running.
    pub fn cancel_transition(&self, property: PropertyId) -> Result<bool, PropertyError> {
        let removed = self.state.running.borrow_mut().remove(&property);
        match removed {
            Some(entry) => {
                log::debug!("{self}: cancelled transition for {property}");
                drop(entry);
                self.object
                    .clear_value_by_id(property, BindingPriority::Animation)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops a sequence that reached its end and removes its animated value.
    fn finish_transition(&self, property: PropertyId, generation: u64) -> Result<(), PropertyError> {
        if !self.is_current(property, generation) {
            return Ok(());
        }
        self.state.running.borrow_mut().remove(&property);
        self.object
            .clear_value_by_id(property, BindingPriority::Animation)
    }

    fn is_current(&self, property: PropertyId, generation: u64) -> bool {
        self.state
            .running
            .borrow()
            .get(&property)
            .is_some_and(|entry| entry.generation == generation)
    }

    fn schedule_frame(&self, property: PropertyId, generation: u64) {
        let weak = self.downgrade();
        let registration = self
            .object
            .runtime()
            .frame_clock()
            .with_frame_nanos(move |frame_time_nanos| {
                if let Some(target) = weak.upgrade() {
                    target.on_transition_frame(property, generation, frame_time_nanos);
                }
            });
        if !registration.is_active() {
            log::warn!("{self}: runtime is gone, dropping transition for {property}");
            if let Err(err) = self.cancel_transition(property) {
                log::error!("{self}: cancelling transition for {property} failed: {err}");
            }
            return;
        }
        if let Some(entry) = self
            .state
            .running
            .borrow_mut()
            .get_mut(&property)
            .filter(|entry| entry.generation == generation)
        {
            entry.registration = Some(registration);
        }
    }

    fn resume_frozen(&self) {
        let frozen: Vec<(PropertyId, u64)> = self
            .state
            .running
            .borrow_mut()
            .iter_mut()
            .filter(|(_, entry)| entry.frozen)
            .map(|(property, entry)| {
                entry.frozen = false;
                (*property, entry.generation)
            })
            .collect();
        for (property, generation) in frozen {
            log::debug!("{self}: resuming transition for {property}");
            self.schedule_frame(property, generation);
        }
    }

    fn on_transition_frame(&self, property: PropertyId, generation: u64, frame_time_nanos: u64) {
        let paused = self.play_state().is_paused();
        let (sequence, elapsed_nanos) = {
            let mut running = self.state.running.borrow_mut();
            let Some(entry) = running
                .get_mut(&property)
                .filter(|entry| entry.generation == generation)
            else {
                return;
            };
            if let Some(registration) = entry.registration.take() {
                registration.disarm();
            }
            if paused {
                log::debug!("{self}: freezing transition for {property}");
                entry.frozen = true;
                entry.last_frame_nanos = None;
                return;
            }
            if let Some(last) = entry.last_frame_nanos {
                entry.elapsed_nanos += frame_time_nanos.saturating_sub(last);
            }
            entry.last_frame_nanos = Some(frame_time_nanos);
            (entry.sequence.clone(), entry.elapsed_nanos)
        };

        let result = sequence.borrow_mut().advance(self, elapsed_nanos);
        match result {
            Ok(SequenceState::Running) => {
                if self.is_current(property, generation) {
                    self.schedule_frame(property, generation);
                }
            }
            Ok(SequenceState::Finished) => {
                if let Err(err) = self.finish_transition(property, generation) {
                    log::error!("{self}: finishing transition for {property} failed: {err}");
                }
            }
            Err(err) => {
                log::error!("{self}: transition for {property} failed: {err}");
                if self.is_current(property, generation) {
                    if let Err(err) = self.cancel_transition(property) {
                        log::error!("{self}: cancelling transition for {property} failed: {err}");
                    }
                }
            }
        }
    }
}

impl Deref for Animatable {
    type Target = UiObject;

    fn deref(&self) -> &UiObject {
        &self.object
    }
}

impl fmt::Display for Animatable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.object, f)
    }
}

impl fmt::Debug for Animatable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animatable")
            .field("object", &self.object)
            .field("transitions", &*self.state.transitions.borrow())
            .field("running", &self.running_transitions())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/animatable_tests.rs"]
mod tests;
