use super::*;

#[test]
fn easing_linear_is_identity() {
    assert_eq!(Easing::LinearEasing.transform(0.0), 0.0);
    assert_eq!(Easing::LinearEasing.transform(0.5), 0.5);
    assert_eq!(Easing::LinearEasing.transform(1.0), 1.0);
}

#[test]
fn easing_bounds_are_correct() {
    let easings = [
        Easing::LinearEasing,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::FastOutSlowInEasing,
        Easing::LinearOutSlowInEasing,
        Easing::FastOutLinearEasing,
    ];

    for easing in easings {
        let start = easing.transform(0.0);
        let end = easing.transform(1.0);
        assert!((start - 0.0).abs() < 0.01, "Start should be ~0 for {:?}", easing);
        assert!((end - 1.0).abs() < 0.01, "End should be ~1 for {:?}", easing);
    }
}

#[test]
fn transition_spec_default_has_reasonable_values() {
    let spec = TransitionSpec::default();
    assert_eq!(spec.duration_millis, 300);
    assert_eq!(spec.easing, Easing::FastOutSlowInEasing);
    assert_eq!(spec.delay_millis, 0);
}

#[test]
fn progress_waits_for_delay_then_clamps() {
    let spec = TransitionSpec::linear(100).with_delay(50);
    assert_eq!(spec.linear_progress(0), None);
    assert_eq!(spec.linear_progress(49_999_999), None);
    assert_eq!(spec.linear_progress(50_000_000), Some(0.0));
    assert_eq!(spec.linear_progress(100_000_000), Some(0.5));
    assert_eq!(spec.linear_progress(10_000_000_000), Some(1.0));
}

#[test]
fn zero_duration_completes_immediately() {
    let spec = TransitionSpec::linear(0);
    assert_eq!(spec.linear_progress(0), Some(1.0));
    assert_eq!(TransitionSpec::linear(0).with_delay(5).linear_progress(0), None);
}

#[test]
fn integer_lerp_rounds() {
    assert_eq!(0i32.lerp(&10, 0.25), 3);
    assert_eq!(10i32.lerp(&0, 0.5), 5);
    assert_eq!(0.0f64.lerp(&2.0, 0.5), 1.0);
}
