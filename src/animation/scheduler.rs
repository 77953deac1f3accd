//! Tween scheduler
//!
//! Owns every active tween and advances them once per frame.

use std::time::Instant;

use super::tween::{AdvanceResult, Tween, TweenId, TweenSpec, Tweenable};

/// A tween that reached phase 1 during a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Finished {
    pub id: TweenId,
    /// Index of the target the tween was driving
    pub target: usize,
}

/// The scheduler that ticks all active tweens of one session
pub struct TweenScheduler<T: Tweenable> {
    tweens: Vec<Tween<T>>,
    next_id: u64,
}

impl<T: Tweenable> TweenScheduler<T> {
    pub fn new() -> Self {
        Self {
            tweens: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a tween on `targets[spec.target]`, capturing the property's
    /// current value as the start value and `now` as the start time.
    ///
    /// Returns `None` if the target index does not exist.
    pub fn create(&mut self, targets: &[T], spec: TweenSpec<T>, now: Instant) -> Option<TweenId> {
        let Some(target) = targets.get(spec.target) else {
            log::warn!(
                "Tween target {} does not exist ({} targets)",
                spec.target,
                targets.len()
            );
            return None;
        };

        let id = TweenId(self.next_id);
        self.next_id += 1;

        let tween = Tween::new(id, target, spec, now);
        log::trace!("Created {:?}", tween);
        self.tweens.push(tween);
        Some(id)
    }

    /// Advance every active tween exactly once, then drop the ones that
    /// finished. Removal happens after the whole pass so it cannot skip or
    /// reorder the remaining tweens.
    pub fn tick(&mut self, targets: &mut [T], now: Instant) -> Vec<Finished> {
        let mut finished = Vec::new();

        for tween in self.tweens.iter_mut() {
            match targets.get_mut(tween.target()) {
                Some(target) => {
                    if tween.advance(target, now) == AdvanceResult::Finished {
                        finished.push(Finished {
                            id: tween.id(),
                            target: tween.target(),
                        });
                    }
                }
                None => {
                    log::warn!(
                        "Dropping {}: target {} disappeared",
                        tween.id(),
                        tween.target()
                    );
                    tween.abandon();
                }
            }
        }

        self.tweens.retain(|tween| !tween.is_done());
        finished
    }

    /// Remove a tween without completing it. Its `on_complete` hook never runs
    /// and the property keeps whatever value the last tick wrote.
    pub fn cancel(&mut self, id: TweenId) -> bool {
        match self.tweens.iter().position(|tween| tween.id() == id) {
            Some(index) => {
                self.tweens.remove(index);
                log::debug!("Cancelled {}", id);
                true
            }
            None => false,
        }
    }

    /// Check if a tween is still registered
    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|tween| tween.id() == id)
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween<T>> {
        self.tweens.iter().find(|tween| tween.id() == id)
    }

    /// Iterate over active tweens in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Tween<T>> {
        self.tweens.iter()
    }

    /// Number of active tweens
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

impl<T: Tweenable> Default for TweenScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
