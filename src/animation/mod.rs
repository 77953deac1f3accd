mod animatable;
mod scheduler;
mod timing;
mod tween;

use std::time::Duration;

pub use animatable::Animatable;
pub use scheduler::{Finished, TweenScheduler};
pub use timing::TimingFunction;
pub use tween::{
    AdvanceResult, Tween, TweenHooks, TweenId, TweenProgress, TweenSpec, Tweenable,
};

/// How long a tween runs and which curve it follows
#[derive(Clone, Debug)]
pub struct Transition {
    /// Duration of the animation. Zero completes on the first tick.
    pub duration: Duration,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
}

impl Transition {
    /// Create a new transition with the given duration and timing function
    pub fn new(duration: Duration, timing: TimingFunction) -> Self {
        Self { duration, timing }
    }

    /// Create a transition from a duration in milliseconds
    pub fn from_millis(duration_ms: u64, timing: TimingFunction) -> Self {
        Self::new(Duration::from_millis(duration_ms), timing)
    }

    /// Set the duration of the animation
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the timing function
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }
}
