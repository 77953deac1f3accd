//! Spin orchestration.
//!
//! A [`SpinController`] owns the reels, the tween scheduler that moves them,
//! and the `Idle -> Spinning -> Idle` state of one slot-machine session. The
//! frame driver calls [`SpinController::update`] once per frame; input calls
//! [`SpinController::start_spin`].

use std::time::Instant;

use bitflags::bitflags;
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::animation::{TweenId, TweenScheduler, TweenSpec};
use crate::config::MachineConfig;
use crate::error::Result;
use crate::events::{Listeners, SpinEvent};
use crate::reel::{Reel, ReelProperty, SymbolAtlas, SymbolId};

bitflags! {
    /// What changed during one frame
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct FrameChanges: u8 {
        /// At least one reel moved; sprites need repositioning
        const MOVED    = 0b001;
        /// Blur of at least one reel is or just stopped being non-zero
        const BLUR     = 0b010;
        /// The spin ended on this frame
        const FINISHED = 0b100;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    Spinning,
}

/// Symbols read off the win line once every reel stopped
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpinOutcome {
    /// Landed symbol per reel, left to right
    pub landed: Vec<Option<SymbolId>>,
}

impl SpinOutcome {
    /// A win iff every reel landed the same symbol.
    /// Zero or one reel is trivially a win.
    pub fn is_win(&self) -> bool {
        self.landed.iter().all(Option::is_some) && self.landed.windows(2).all(|w| w[0] == w[1])
    }
}

/// Ephemeral state of the spin in progress
#[derive(Debug)]
struct SpinSession {
    tweens: Vec<TweenId>,
    landed: Vec<Option<Option<SymbolId>>>,
}

impl SpinSession {
    fn new(reels: usize) -> Self {
        Self {
            tweens: Vec::with_capacity(reels),
            landed: vec![None; reels],
        }
    }

    fn is_complete(&self) -> bool {
        self.landed.iter().all(Option::is_some)
    }

    fn into_outcome(self) -> SpinOutcome {
        SpinOutcome {
            landed: self.landed.into_iter().map(Option::flatten).collect(),
        }
    }
}

pub struct SpinController<R: Rng = ThreadRng> {
    config: MachineConfig,
    reels: Vec<Reel>,
    scheduler: TweenScheduler<Reel>,
    state: SpinState,
    session: Option<SpinSession>,
    last_outcome: Option<SpinOutcome>,
    listeners: Listeners,
    last_frame: Option<Instant>,
    rng: R,
}

impl SpinController<ThreadRng> {
    /// Build the reels described by `config`, drawing jitter from the thread RNG
    pub fn new<A: SymbolAtlas + ?Sized>(config: MachineConfig, atlas: &A) -> Result<Self> {
        Self::with_rng(config, atlas, rand::rng())
    }
}

impl<R: Rng> SpinController<R> {
    /// Build the reels described by `config`, drawing jitter from `rng`
    pub fn with_rng<A: SymbolAtlas + ?Sized>(
        config: MachineConfig,
        atlas: &A,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        let reels: Vec<Reel> = config
            .strips
            .iter()
            .map(|strip| Reel::new(strip.clone(), atlas, config.symbol_size))
            .collect();
        log::info!(
            "Built {} reels with {:?} symbols",
            reels.len(),
            reels.iter().map(Reel::len).collect::<Vec<_>>()
        );

        Ok(Self {
            config,
            reels,
            scheduler: TweenScheduler::new(),
            state: SpinState::Idle,
            session: None,
            last_outcome: None,
            listeners: Listeners::new(),
            last_frame: None,
            rng,
        })
    }

    /// Subscribe to spin cues (start, reel stop, finish)
    pub fn subscribe<F: FnMut(&SpinEvent) + 'static>(&mut self, listener: F) {
        self.listeners.subscribe(listener);
    }

    /// Send every reel spinning. Ignored while a spin is already running.
    ///
    /// Returns whether a new spin started.
    pub fn start_spin(&mut self, now: Instant) -> bool {
        if self.state == SpinState::Spinning {
            log::debug!("Spin requested while spinning, ignoring");
            return false;
        }

        self.listeners.emit(&SpinEvent::SpinStarted);
        let mut session = SpinSession::new(self.reels.len());

        if self.reels.is_empty() {
            self.finish(session);
            return true;
        }

        self.state = SpinState::Spinning;
        let timing = self.config.spin.clone();
        for i in 0..self.reels.len() {
            let extra = self.rng.random_range(0..=timing.max_jitter);
            let target = self.reels[i].position() + timing.travel(i, extra);
            let transition = timing.transition(i, extra);
            log::debug!(
                "Reel {}: {} -> {} over {:?} (jitter {})",
                i,
                self.reels[i].position(),
                target,
                transition.duration,
                extra
            );

            let spec = TweenSpec::new(i, ReelProperty::Position, target, transition);
            if let Some(id) = self.scheduler.create(&self.reels, spec, now) {
                session.tweens.push(id);
            }
        }

        log::info!("Spin started on {} reels", self.reels.len());
        self.session = Some(session);
        true
    }

    /// Advance one frame: move the reels, refresh blur and sprite offsets,
    /// and settle the spin once every reel has stopped.
    pub fn update(&mut self, now: Instant) -> FrameChanges {
        let mut changes = FrameChanges::empty();
        let finished = self.scheduler.tick(&mut self.reels, now);

        let frame_scale = self.frame_scale(now);
        self.last_frame = Some(now);

        // Recomputed every frame, spinning or not
        for reel in self.reels.iter_mut() {
            let previous_blur = reel.blur();
            let blur = reel.update_blur(self.config.blur_factor, frame_scale);
            if blur != 0.0 || previous_blur != 0.0 {
                changes |= FrameChanges::BLUR;
            }
            if reel.relayout() {
                changes |= FrameChanges::MOVED;
            }
        }

        for done in finished {
            if self.reel_stopped(done.id, done.target) {
                changes |= FrameChanges::FINISHED;
            }
        }

        changes
    }

    /// Multiplier that turns per-frame movement into movement per reference
    /// frame, when blur normalisation is enabled
    fn frame_scale(&self, now: Instant) -> f64 {
        let (Some(reference_ms), Some(last)) =
            (self.config.blur_reference_frame_ms, self.last_frame)
        else {
            return 1.0;
        };
        let elapsed_ms = now.saturating_duration_since(last).as_secs_f64() * 1000.0;
        if elapsed_ms > 0.0 {
            reference_ms / elapsed_ms
        } else {
            1.0
        }
    }

    /// Record what reel `reel` landed on. Returns true if this ended the spin.
    fn reel_stopped(&mut self, id: TweenId, reel: usize) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.tweens.contains(&id) {
            return false;
        }

        let symbol = self.reels[reel].symbol_at_row(self.config.win_row);
        session.landed[reel] = Some(symbol);
        log::debug!("Reel {} stopped on {:?}", reel, symbol);
        self.listeners.emit(&SpinEvent::ReelStopped { reel, symbol });

        if !session.is_complete() {
            return false;
        }
        if let Some(session) = self.session.take() {
            self.finish(session);
        }
        true
    }

    fn finish(&mut self, session: SpinSession) {
        self.state = SpinState::Idle;
        let outcome = session.into_outcome();
        log::info!(
            "Spin finished: {} {:?}",
            if outcome.is_win() { "win" } else { "loss" },
            outcome.landed
        );
        self.listeners.emit(&SpinEvent::SpinFinished(outcome.clone()));
        self.last_outcome = Some(outcome);
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state == SpinState::Spinning
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &TweenScheduler<Reel> {
        &self.scheduler
    }

    /// Outcome of the most recent finished spin
    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Tweenable;
    use crate::config::SpinTiming;
    use crate::reel::UniformAtlas;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn atlas() -> UniformAtlas {
        UniformAtlas::new(10, (150, 150))
    }

    fn controller(config: MachineConfig) -> SpinController<StdRng> {
        SpinController::with_rng(config, &atlas(), StdRng::seed_from_u64(7)).unwrap()
    }

    fn strips(strips: &[&[u8]]) -> Vec<Vec<SymbolId>> {
        strips
            .iter()
            .map(|s| s.iter().copied().map(SymbolId).collect())
            .collect()
    }

    #[test]
    fn test_outcome_win_rules() {
        let s = |v: u8| Some(SymbolId(v));
        assert!(SpinOutcome { landed: vec![] }.is_win());
        assert!(SpinOutcome { landed: vec![s(3)] }.is_win());
        assert!(SpinOutcome {
            landed: vec![s(3), s(3), s(3)]
        }
        .is_win());
        assert!(!SpinOutcome {
            landed: vec![s(3), s(4), s(3)]
        }
        .is_win());
        assert!(!SpinOutcome {
            landed: vec![None, None]
        }
        .is_win());
    }

    #[test]
    fn test_start_spin_creates_one_tween_per_reel() {
        let mut controller = controller(MachineConfig::default());
        assert!(controller.start_spin(Instant::now()));
        assert!(controller.is_spinning());
        assert_eq!(controller.scheduler().len(), 5);
    }

    #[test]
    fn test_second_spin_is_ignored() {
        let now = Instant::now();
        let mut controller = controller(MachineConfig::default());
        controller.start_spin(now);
        let ends: Vec<f64> = controller.scheduler().iter().map(|t| t.end_value()).collect();

        assert!(!controller.start_spin(now + Duration::from_millis(10)));
        assert_eq!(controller.scheduler().len(), 5);
        let ends_after: Vec<f64> = controller.scheduler().iter().map(|t| t.end_value()).collect();
        assert_eq!(ends, ends_after);
    }

    #[test]
    fn test_targets_and_durations_follow_stagger() {
        let mut controller = controller(MachineConfig::default());
        controller.start_spin(Instant::now());

        for (i, tween) in controller.scheduler().iter().enumerate() {
            let travel = tween.end_value() - tween.start_value();
            let extra = travel - 10.0 - 5.0 * i as f64;
            assert!([0.0, 1.0, 2.0].contains(&extra), "reel {} jitter {}", i, extra);
            let expected = Duration::from_millis(2500 + 600 * i as u64 + 600 * extra as u64);
            assert_eq!(tween.duration(), expected);
        }
    }

    #[test]
    fn test_idle_frames_still_lay_out() {
        let mut controller = controller(MachineConfig::default());
        let changes = controller.update(Instant::now());
        assert!(changes.is_empty());
        let reel = &controller.reels()[0];
        let ys: Vec<f64> = reel.sprites().iter().map(|s| s.y).collect();
        assert_eq!(ys, reel.layout());
    }

    #[test]
    fn test_spin_runs_to_completion() {
        let start = Instant::now();
        let mut controller = controller(MachineConfig::default());
        controller.start_spin(start);
        let targets: Vec<f64> = controller.scheduler().iter().map(|t| t.end_value()).collect();

        let mut saw_blur = false;
        let mut finished_frames = 0;
        for frame in 1..=500 {
            let changes = controller.update(start + Duration::from_millis(frame * 16));
            saw_blur |= changes.contains(FrameChanges::BLUR);
            if changes.contains(FrameChanges::FINISHED) {
                finished_frames += 1;
            }
        }

        assert!(saw_blur);
        assert_eq!(finished_frames, 1);
        assert!(!controller.is_spinning());
        assert!(controller.scheduler().is_empty());
        for (reel, target) in controller.reels().iter().zip(&targets) {
            assert_eq!(reel.position(), *target);
            assert_eq!(reel.blur(), 0.0);
        }
        assert_eq!(controller.last_outcome().unwrap().landed.len(), 5);
    }

    #[test]
    fn test_outcome_reads_win_row() {
        // Identical strips travel different distances, so compare against
        // what each reel actually shows on the middle row
        let config = MachineConfig::default().strips(strips(&[&[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5]]));
        let start = Instant::now();
        let mut controller = controller(config);
        controller.start_spin(start);
        controller.update(start + Duration::from_secs(10));

        let outcome = controller.last_outcome().unwrap().clone();
        for (reel, landed) in controller.reels().iter().zip(&outcome.landed) {
            let slot = reel.slot_at_row(1).unwrap();
            assert_eq!(reel.sprites()[slot].y, 150.0);
            assert_eq!(*landed, Some(reel.sprites()[slot].symbol));
        }
    }

    #[test]
    fn test_uniform_strips_always_win() {
        let config = MachineConfig::default().strips(strips(&[&[7; 6], &[7; 9], &[7; 4]]));
        let start = Instant::now();
        let mut controller = controller(config);
        controller.start_spin(start);
        controller.update(start + Duration::from_secs(10));
        assert!(controller.last_outcome().unwrap().is_win());
    }

    #[test]
    fn test_events_in_order() {
        let config = MachineConfig::default().strips(strips(&[&[0, 1, 2, 3, 4], &[0, 1, 2, 3, 4]]));
        let start = Instant::now();
        let mut controller = controller(config);
        let events = Rc::new(RefCell::new(Vec::new()));
        controller.subscribe({
            let events = events.clone();
            move |event| events.borrow_mut().push(event.clone())
        });

        controller.start_spin(start);
        controller.update(start + Duration::from_secs(10));

        let events = events.borrow();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], SpinEvent::SpinStarted);
        assert!(matches!(events[1], SpinEvent::ReelStopped { reel: 0, .. }));
        assert!(matches!(events[2], SpinEvent::ReelStopped { reel: 1, .. }));
        assert!(matches!(events[3], SpinEvent::SpinFinished(_)));
    }

    #[test]
    fn test_spin_again_after_finish() {
        let start = Instant::now();
        let mut controller = controller(MachineConfig::default());
        controller.start_spin(start);
        controller.update(start + Duration::from_secs(10));
        let first: Vec<f64> = controller.reels().iter().map(|r| r.position()).collect();

        let later = start + Duration::from_secs(11);
        assert!(controller.start_spin(later));
        for (tween, position) in controller.scheduler().iter().zip(&first) {
            assert_eq!(tween.start_value(), *position);
        }
        controller.update(later + Duration::from_secs(10));
        assert!(!controller.is_spinning());
    }

    #[test]
    fn test_zero_reels_finish_immediately() {
        let mut controller = controller(MachineConfig::default().strips(Vec::new()));
        assert!(controller.start_spin(Instant::now()));
        assert!(!controller.is_spinning());
        assert!(controller.scheduler().is_empty());
        assert!(controller.last_outcome().unwrap().is_win());
    }

    #[test]
    fn test_rejects_configs_that_cannot_spin() {
        let nan_travel = MachineConfig::default().spin(SpinTiming {
            base_travel: f64::NAN,
            ..SpinTiming::default()
        });
        let overflowing = MachineConfig::default().spin(SpinTiming {
            stagger_ms: u64::MAX / 2,
            ..SpinTiming::default()
        });
        for config in [nan_travel, overflowing] {
            let built = SpinController::with_rng(config, &atlas(), StdRng::seed_from_u64(7));
            assert!(matches!(built, Err(crate::Error::Config(_))));
        }
    }

    #[test]
    fn test_single_reel_wins_trivially() {
        let config = MachineConfig::default().strips(strips(&[&[0, 1, 2, 3, 4, 5]]));
        let start = Instant::now();
        let mut controller = controller(config);
        controller.start_spin(start);
        controller.update(start + Duration::from_secs(10));
        assert!(controller.last_outcome().unwrap().is_win());
    }

    #[test]
    fn test_normalised_blur_ignores_frame_rate() {
        let config = MachineConfig::default()
            .strips(strips(&[&[0, 1, 2, 3, 4]]))
            .blur_reference_frame_ms(Some(10.0));
        let start = Instant::now();
        let mut fast = controller(config.clone());
        let mut slow = controller(config);

        fast.update(start);
        slow.update(start);
        // Same speed (0.1 cells per ms), sampled at different frame lengths
        fast.reels[0].set(ReelProperty::Position, 1.0);
        fast.update(start + Duration::from_millis(10));
        fast.reels[0].set(ReelProperty::Position, 2.0);
        fast.update(start + Duration::from_millis(20));
        slow.reels[0].set(ReelProperty::Position, 2.0);
        slow.update(start + Duration::from_millis(20));

        assert!((fast.reels()[0].blur() - 8.0).abs() < 1e-9);
        assert!((slow.reels()[0].blur() - 8.0).abs() < 1e-9);
    }
}
