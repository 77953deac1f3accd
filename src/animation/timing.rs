//! Timing functions (easing curves) for tweens.
//!
//! A timing function remaps normalized time `t` in `[0, 1]` to a progress
//! value. The result is fed straight into [`Animatable::lerp`] and is allowed
//! to leave `[0, 1]`, which is how [`TimingFunction::Backout`] produces its
//! overshoot-and-settle stop.
//!
//! ## Example
//!
//! ```
//! use reelspin::animation::TimingFunction;
//!
//! let ease = TimingFunction::Backout(0.5);
//! assert_eq!(ease.evaluate(0.0), 0.0);
//! assert_eq!(ease.evaluate(1.0), 1.0);
//! ```
//!
//! [`Animatable::lerp`]: super::Animatable::lerp

use std::sync::Arc;

/// Timing function that controls the animation curve
#[derive(Clone)]
pub enum TimingFunction {
    /// Linear interpolation (constant speed)
    Linear,
    /// Decelerates past the target by the given amount, then settles back.
    /// `0.0` never overshoots; larger values bounce further.
    Backout(f64),
    /// Custom timing function
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl TimingFunction {
    /// Evaluate the timing function at time t (0.0 to 1.0).
    /// Returns the interpolation factor (can exceed [0, 1] for overshoot).
    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            TimingFunction::Linear => t,
            TimingFunction::Backout(amount) => backout(*amount, t),
            TimingFunction::Custom(f) => f(t),
        }
    }

    /// Create a custom timing function from a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        TimingFunction::Custom(Arc::new(f))
    }
}

impl Default for TimingFunction {
    fn default() -> Self {
        TimingFunction::Linear
    }
}

impl std::fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingFunction::Linear => write!(f, "Linear"),
            TimingFunction::Backout(amount) => write!(f, "Backout({})", amount),
            TimingFunction::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// `(t-1)^2 * ((a+1)(t-1) + a) + 1`
///
/// Exactly 0 at `t = 0` and exactly 1 at `t = 1` for any `a`.
fn backout(amount: f64, t: f64) -> f64 {
    let s = t - 1.0;
    s * s * ((amount + 1.0) * s + amount) + 1.0
}
