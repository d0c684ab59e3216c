use super::*;
use crate::easing::TransitionSpec;
use crate::property_transition::DoubleTransition;
use crate::transition::Transition;
use trellis_core::AnyValue;
use trellis_testing::FrameHarness;

static OPACITY: Lazy<StyledProperty<f64>> =
    Lazy::new(|| StyledProperty::register("Visual", "Opacity", 1.0));
static WIDTH: Lazy<StyledProperty<f64>> =
    Lazy::new(|| StyledProperty::register("Layoutable", "Width", 0.0));

type Calls = Rc<RefCell<Vec<(f64, f64)>>>;

struct Recording {
    property: PropertyId,
    calls: Calls,
}

impl Transition for Recording {
    fn property(&self) -> PropertyId {
        self.property
    }

    fn apply(&self, _: &Animatable, old: &AnyValue, new: &AnyValue) -> Result<(), TransitionError> {
        let old = old.downcast::<f64>().unwrap_or(f64::NAN);
        let new = new.downcast::<f64>().unwrap_or(f64::NAN);
        self.calls.borrow_mut().push((old, new));
        Ok(())
    }
}

fn recording(property: &StyledProperty<f64>) -> (Rc<dyn Transition>, Calls) {
    let calls = Calls::default();
    let transition = Rc::new(Recording {
        property: property.id(),
        calls: calls.clone(),
    });
    (transition, calls)
}

#[test]
fn starts_running_with_empty_registry() {
    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    assert_eq!(target.play_state(), AnimationPlayState::Running);
    assert!(target.transitions().is_empty());
}

#[test]
fn animation_priority_writes_are_not_matched() {
    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    let (transition, calls) = recording(&OPACITY);
    target.transitions().push(transition);

    target
        .set_value_with_priority(&OPACITY, 0.5, BindingPriority::Animation)
        .unwrap();
    assert!(calls.borrow().is_empty());

    let change = PropertyChange {
        property: *OPACITY.descriptor(),
        old: AnyValue::new(1.0f64),
        new: AnyValue::new(0.2f64),
        priority: BindingPriority::Animation,
    };
    assert_eq!(
        target.route_property_change(&change).unwrap(),
        RouteOutcome::AnimationWrite
    );
    assert!(calls.borrow().is_empty());
}

#[test]
fn local_write_applies_matching_transition() {
    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    let (transition, calls) = recording(&OPACITY);
    target.transitions().push(transition);

    target.set_value(&OPACITY, 0.0).unwrap();
    assert_eq!(*calls.borrow(), vec![(1.0, 0.0)]);
}

#[test]
fn only_first_duplicate_is_applied() {
    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    let (first, first_calls) = recording(&OPACITY);
    let (second, second_calls) = recording(&OPACITY);
    let transitions = target.transitions();
    transitions.push(first);
    transitions.push(second);

    target.set_value(&OPACITY, 0.0).unwrap();
    target.set_value(&OPACITY, 0.5).unwrap();
    assert_eq!(first_calls.borrow().len(), 2);
    assert!(second_calls.borrow().is_empty());
}

#[test]
fn unmatched_property_is_left_alone() {
    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    let (transition, calls) = recording(&OPACITY);
    target.transitions().push(transition);

    target.set_value(&WIDTH, 120.0).unwrap();
    assert!(calls.borrow().is_empty());
    assert_eq!(target.get_value(&WIDTH), 120.0);
    assert_eq!(target.get_value(&OPACITY), 1.0);
    assert_eq!(target.transitions().len(), 1);
    assert_eq!(target.running_transitions(), 0);
}

#[test]
fn registry_edits_apply_to_the_next_change() {
    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    let (transition, calls) = recording(&OPACITY);

    target.set_value(&OPACITY, 0.5).unwrap();
    target.transitions().push(transition);
    target.set_value(&OPACITY, 0.25).unwrap();
    target.transitions().clear();
    target.set_value(&OPACITY, 0.75).unwrap();

    assert_eq!(*calls.borrow(), vec![(0.5, 0.25)]);
}

#[test]
fn replacing_registry_notifies_once_with_both_lists() {
    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    let original = target.transitions();
    let replacement = Transitions::new();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _subscription = target.subscribe(move |_, change| {
        if change.property.id() == TRANSITIONS.id() {
            sink.borrow_mut().push(change.clone());
        }
    });

    target.set_transitions(replacement.clone()).unwrap();
    target.set_transitions(replacement.clone()).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(Transitions::ptr_eq(seen[0].old_value::<Transitions>().unwrap(), &original));
    assert!(Transitions::ptr_eq(seen[0].new_value::<Transitions>().unwrap(), &replacement));
    assert!(Transitions::ptr_eq(&target.transitions(), &replacement));
}

#[test]
fn clearing_registry_installs_an_empty_one() {
    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    let (transition, calls) = recording(&OPACITY);
    let populated: Transitions = [transition].into_iter().collect();
    target.set_transitions(populated.clone()).unwrap();

    target.set_transitions(None).unwrap();
    assert!(target.transitions().is_empty());
    assert!(!Transitions::ptr_eq(&target.transitions(), &populated));

    target.set_value(&OPACITY, 0.0).unwrap();
    assert!(calls.borrow().is_empty());
}

#[test]
fn paused_object_does_not_start_transitions() {
    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    let (transition, calls) = recording(&OPACITY);
    target.transitions().push(transition);

    for round in 0..3 {
        target.set_play_state(AnimationPlayState::Paused).unwrap();
        target.set_value(&OPACITY, 0.0).unwrap();
        assert_eq!(target.get_value(&OPACITY), 0.0, "round {round}");

        target.set_play_state(AnimationPlayState::Running).unwrap();
        target.set_value(&OPACITY, 1.0).unwrap();
    }
    assert_eq!(*calls.borrow(), vec![(0.0, 1.0); 3]);
}

#[test]
fn interceptor_sees_every_routed_change() {
    struct Log(RefCell<Vec<(&'static str, Option<RouteOutcome>)>>);

    impl ChangeInterceptor for Log {
        fn before_route(&self, _: &Animatable, change: &PropertyChange) {
            self.0.borrow_mut().push((change.property.name(), None));
        }

        fn after_route(&self, _: &Animatable, change: &PropertyChange, outcome: RouteOutcome) {
            self.0.borrow_mut().push((change.property.name(), Some(outcome)));
        }
    }

    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    let (transition, _calls) = recording(&OPACITY);
    target.transitions().push(transition);
    let log = Rc::new(Log(RefCell::new(Vec::new())));
    target.set_interceptor(log.clone());

    target.set_value(&OPACITY, 0.0).unwrap();
    target.set_value(&WIDTH, 10.0).unwrap();
    target
        .set_value_with_priority(&OPACITY, 0.3, BindingPriority::Animation)
        .unwrap();

    assert_eq!(
        *log.0.borrow(),
        vec![
            ("Opacity", None),
            ("Opacity", Some(RouteOutcome::Started)),
            ("Width", None),
            ("Width", Some(RouteOutcome::NoMatch)),
            ("Opacity", None),
            ("Opacity", Some(RouteOutcome::AnimationWrite)),
        ]
    );
}

#[test]
fn incompatible_values_fail_without_losing_the_write() {
    static LABEL: Lazy<StyledProperty<String>> =
        Lazy::new(|| StyledProperty::register("TextBlock", "Label", String::new()));

    struct Mismatched(DoubleTransition);

    impl Transition for Mismatched {
        fn property(&self) -> PropertyId {
            LABEL.id()
        }

        fn apply(&self, target: &Animatable, old: &AnyValue, new: &AnyValue) -> Result<(), TransitionError> {
            self.0.apply(target, old, new)
        }
    }

    let harness = FrameHarness::new();
    let target = Animatable::new(harness.handle());
    target
        .transitions()
        .add(Mismatched(DoubleTransition::new(&OPACITY, TransitionSpec::linear(100))));

    let err = target.set_value(&LABEL, "hello".to_owned()).unwrap_err();
    let cause = err.downcast_handler::<TransitionError>().unwrap();
    assert!(matches!(
        cause,
        TransitionError::IncompatibleValue { property: "Opacity", .. }
    ));
    assert_eq!(target.get_value(&LABEL), "hello");
    assert!(!target.is_animating(LABEL.id()));
    assert_eq!(target.running_transitions(), 0);
}
