use std::fmt;
use std::time::{Duration, Instant};

use super::{Animatable, Transition};

/// Something whose named numeric properties a tween can drive.
///
/// Targets are not owned by the scheduler. Tweens refer to them by index into
/// the slice handed to [`TweenScheduler::tick`](super::TweenScheduler::tick),
/// so the target must stay at that index for as long as the tween runs.
pub trait Tweenable {
    /// Closed set of properties that can be animated on this target
    type Property: Copy + PartialEq + fmt::Debug;
    /// Value type of every animatable property
    type Value: Animatable + Copy + fmt::Debug;

    fn get(&self, property: Self::Property) -> Self::Value;
    fn set(&mut self, property: Self::Property, value: Self::Value);
}

/// Handle to a tween registered with a scheduler
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub(crate) u64);

impl fmt::Display for TweenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tween#{}", self.0)
    }
}

/// Snapshot handed to tween hooks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenProgress<P, V> {
    pub id: TweenId,
    /// Index of the target the tween drives
    pub target: usize,
    pub property: P,
    /// Value written to the property on this advance
    pub value: V,
    /// Normalized time, clamped to [0, 1]
    pub phase: f64,
}

type ChangeHook<T> =
    Box<dyn FnMut(&TweenProgress<<T as Tweenable>::Property, <T as Tweenable>::Value>)>;
type CompleteHook<T> =
    Box<dyn FnOnce(&TweenProgress<<T as Tweenable>::Property, <T as Tweenable>::Value>)>;

/// Optional lifecycle callbacks of a tween.
///
/// `on_change` runs after every advance, including the final one.
/// `on_complete` runs exactly once, after the property has been forced to the
/// end value. Cancelled tweens never run `on_complete`.
pub struct TweenHooks<T: Tweenable> {
    on_change: Option<ChangeHook<T>>,
    on_complete: Option<CompleteHook<T>>,
}

impl<T: Tweenable> TweenHooks<T> {
    pub fn new() -> Self {
        Self {
            on_change: None,
            on_complete: None,
        }
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TweenProgress<T::Property, T::Value>) + 'static,
    {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&TweenProgress<T::Property, T::Value>) + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl<T: Tweenable> Default for TweenHooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything needed to start a tween, minus the start value and timestamp,
/// which are captured by the scheduler at creation.
pub struct TweenSpec<T: Tweenable> {
    pub(crate) target: usize,
    pub(crate) property: T::Property,
    pub(crate) end: T::Value,
    pub(crate) transition: Transition,
    pub(crate) hooks: TweenHooks<T>,
}

impl<T: Tweenable> TweenSpec<T> {
    pub fn new(
        target: usize,
        property: T::Property,
        end: T::Value,
        transition: Transition,
    ) -> Self {
        Self {
            target,
            property,
            end,
            transition,
            hooks: TweenHooks::new(),
        }
    }

    pub fn hooks(mut self, hooks: TweenHooks<T>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TweenProgress<T::Property, T::Value>) + 'static,
    {
        self.hooks = self.hooks.on_change(f);
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&TweenProgress<T::Property, T::Value>) + 'static,
    {
        self.hooks = self.hooks.on_complete(f);
        self
    }
}

/// Result of advancing a tween by one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceResult {
    /// Phase is still below 1
    Running,
    /// Phase reached 1 on this advance; the tween must be removed
    Finished,
}

/// One in-flight animation of a single property
pub struct Tween<T: Tweenable> {
    id: TweenId,
    target: usize,
    property: T::Property,
    /// Captured once at creation and never recomputed
    start: T::Value,
    end: T::Value,
    transition: Transition,
    start_time: Instant,
    hooks: TweenHooks<T>,
    done: bool,
}

impl<T: Tweenable> Tween<T> {
    pub(crate) fn new(id: TweenId, target: &T, spec: TweenSpec<T>, now: Instant) -> Self {
        Self {
            id,
            target: spec.target,
            property: spec.property,
            start: target.get(spec.property),
            end: spec.end,
            transition: spec.transition,
            start_time: now,
            hooks: spec.hooks,
            done: false,
        }
    }

    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn property(&self) -> T::Property {
        self.property
    }

    pub fn start_value(&self) -> T::Value {
        self.start
    }

    pub fn end_value(&self) -> T::Value {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.transition.duration
    }

    /// Whether the tween has finished or been dropped and awaits removal
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Normalized time at `now`, clamped to [0, 1].
    /// A zero duration is always complete.
    pub fn phase(&self, now: Instant) -> f64 {
        let duration = self.transition.duration;
        if duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Write the eased value for `now` into the target property.
    pub fn advance(&mut self, target: &mut T, now: Instant) -> AdvanceResult {
        if self.done {
            return AdvanceResult::Finished;
        }

        let phase = self.phase(now);
        let eased = self.transition.timing.evaluate(phase);
        let value = <T::Value as Animatable>::lerp(&self.start, &self.end, eased);
        target.set(self.property, value);

        if let Some(on_change) = self.hooks.on_change.as_mut() {
            on_change(&TweenProgress {
                id: self.id,
                target: self.target,
                property: self.property,
                value,
                phase,
            });
        }

        if phase < 1.0 {
            return AdvanceResult::Running;
        }

        // Drop any residual interpolation error
        target.set(self.property, self.end);
        self.done = true;
        if let Some(on_complete) = self.hooks.on_complete.take() {
            on_complete(&TweenProgress {
                id: self.id,
                target: self.target,
                property: self.property,
                value: self.end,
                phase,
            });
        }
        AdvanceResult::Finished
    }

    /// Mark the tween for removal without completing it
    pub(crate) fn abandon(&mut self) {
        self.done = true;
        self.hooks.on_complete = None;
    }
}

impl<T: Tweenable> fmt::Debug for Tween<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("property", &self.property)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("transition", &self.transition)
            .field("done", &self.done)
            .finish()
    }
}
