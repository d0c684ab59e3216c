use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use trellis_animation::prelude::*;
use trellis_core::StyledProperty;
use trellis_runtime_std::StdRuntime;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

static OPACITY: Lazy<StyledProperty<f64>> =
    Lazy::new(|| StyledProperty::register("Visual", "Opacity", 1.0));

/// Pumps frames until `until` has passed or nothing is animating.
fn run_frames(runtime: &StdRuntime, target: &Animatable, until: Duration) {
    let started = Instant::now();
    while started.elapsed() < until {
        if !runtime.take_frame_request() && !runtime.has_pending_frame() {
            break;
        }
        runtime.pump_frame();
        println!(
            "  t={:>4}ms opacity={:.3}",
            runtime.frame_time_nanos() / 1_000_000,
            target.get_value(&OPACITY)
        );
        thread::sleep(FRAME_INTERVAL);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== Trellis Transition Demo ===");
    println!("Set RUST_LOG=debug to see routing decisions.");
    println!();

    let runtime = StdRuntime::new();
    let target = Animatable::with_type_name("Border", runtime.runtime_handle());
    target.transitions().add(DoubleTransition::new(
        &OPACITY,
        TransitionSpec::linear(400).with_easing(Easing::EaseInOut),
    ));

    println!("Fade out:");
    target.set_value(&OPACITY, 0.0)?;
    run_frames(&runtime, &target, Duration::from_millis(200));

    println!("Interrupted, fading back in from {:.3}:", target.get_value(&OPACITY));
    target.set_value(&OPACITY, 1.0)?;
    run_frames(&runtime, &target, Duration::from_millis(100));

    println!("Paused:");
    target.set_play_state(AnimationPlayState::Paused)?;
    run_frames(&runtime, &target, Duration::from_millis(100));
    log::info!(
        "{target}: frozen={} at {:.3}",
        target.is_transition_frozen(OPACITY.id()),
        target.get_value(&OPACITY)
    );

    println!("Resumed:");
    target.set_play_state(AnimationPlayState::Running)?;
    run_frames(&runtime, &target, Duration::from_secs(1));

    println!();
    println!("Final opacity: {:.3}", target.get_value(&OPACITY));
    Ok(())
}
