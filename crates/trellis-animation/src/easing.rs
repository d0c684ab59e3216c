//! Interpolation primitives used by the built-in transitions.

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction as f64
    }
}

impl Lerp for i32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        let start = *self as f64;
        (start + (*target as f64 - start) * fraction as f64).round() as i32
    }
}

/// Easing curves applied to the linear progress of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// No easing.
    LinearEasing,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve.
    #[default]
    FastOutSlowInEasing,
    LinearOutSlowInEasing,
    FastOutLinearEasing,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowInEasing => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowInEasing => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearEasing => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
        }
    }
}

/// Bezier y polynomial evaluated at parameter `t`.
///
/// The x control points are ignored, so the result only approximates the
/// shape of the named curve and is not an exact timing function.
fn cubic_bezier(_x1: f32, y1: f32, _x2: f32, y2: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * y1 + 3.0 * mt * t2 * y2 + t3
}

/// Timing of a transition: how long, how late, and along which curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
    /// Delay before the value starts moving, in milliseconds.
    pub delay_millis: u64,
}

impl TransitionSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }

    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress in [0, 1] after `elapsed_nanos` of running time, or
    /// `None` while the delay has not yet passed.
    pub fn linear_progress(&self, elapsed_nanos: u64) -> Option<f32> {
        let delay_nanos = self.delay_millis.saturating_mul(1_000_000);
        if elapsed_nanos < delay_nanos {
            return None;
        }
        if self.duration_millis == 0 {
            return Some(1.0);
        }
        let duration_nanos = self.duration_millis.saturating_mul(1_000_000);
        let moving = elapsed_nanos - delay_nanos;
        Some((moving as f64 / duration_nanos as f64).clamp(0.0, 1.0) as f32)
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowInEasing)
    }
}

#[cfg(test)]
#[path = "tests/easing_tests.rs"]
mod tests;
