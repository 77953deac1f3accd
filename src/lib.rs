pub mod animation;
pub mod assets;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod geometry;
pub mod reel;

use std::time::{Duration, Instant};

use rand::rngs::ThreadRng;
use rand::Rng;

pub use config::{MachineConfig, SpinTiming};
pub use controller::{FrameChanges, SpinController, SpinOutcome, SpinState};
pub use error::{Error, Result};
pub use events::SpinEvent;
pub use geometry::MachineGeometry;
use reel::SymbolAtlas;

pub mod prelude {
    pub use crate::animation::{
        Animatable, TimingFunction, Transition, TweenHooks, TweenId, TweenScheduler, TweenSpec,
        Tweenable,
    };
    pub use crate::assets::ImageAtlas;
    pub use crate::reel::{Reel, ReelProperty, SymbolAtlas, SymbolId, SymbolSprite, UniformAtlas};
    pub use crate::{
        FrameChanges, MachineConfig, MachineGeometry, SlotMachine, SpinController, SpinEvent,
        SpinOutcome, SpinState, SpinTiming,
    };
}

/// A callback that gets called after every frame update
pub type FrameCallback<R> = Box<dyn FnMut(&SpinController<R>, FrameChanges)>;

/// Drives a [`SpinController`] from a frame loop and maps pointer input onto
/// the spin button.
pub struct SlotMachine<R: Rng = ThreadRng> {
    controller: SpinController<R>,
    geometry: MachineGeometry,
    frame_interval: Duration,
    on_frame: Option<FrameCallback<R>>,
}

impl SlotMachine<ThreadRng> {
    pub fn new<A: SymbolAtlas + ?Sized>(
        config: MachineConfig,
        atlas: &A,
        screen_width: f64,
        screen_height: f64,
    ) -> Result<Self> {
        let controller = SpinController::new(config, atlas)?;
        Ok(Self::with_controller(controller, screen_width, screen_height))
    }
}

impl<R: Rng> SlotMachine<R> {
    pub fn with_controller(
        controller: SpinController<R>,
        screen_width: f64,
        screen_height: f64,
    ) -> Self {
        let geometry = MachineGeometry::new(screen_width, screen_height, controller.config());
        Self {
            controller,
            geometry,
            frame_interval: Duration::from_millis(16),
            on_frame: None,
        }
    }

    /// Time slept between frames by [`run_until`](Self::run_until)
    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Set a callback that gets called after every frame, e.g. to repaint
    /// sprites when [`FrameChanges::MOVED`] is set.
    pub fn on_frame<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&SpinController<R>, FrameChanges) + 'static,
    {
        self.on_frame = Some(Box::new(callback));
        self
    }

    /// Recompute the screen layout after the window changed size
    pub fn resize(&mut self, screen_width: f64, screen_height: f64) {
        log::info!("Resizing machine to {}x{}", screen_width, screen_height);
        self.geometry = MachineGeometry::new(screen_width, screen_height, self.controller.config());
    }

    /// Handle a pointer press. Presses on the spin button start a spin.
    pub fn pointer_down(&mut self, x: f64, y: f64, now: Instant) -> bool {
        self.geometry.is_spin_button(x, y) && self.controller.start_spin(now)
    }

    /// Run one frame at `now`
    pub fn frame(&mut self, now: Instant) -> FrameChanges {
        let changes = self.controller.update(now);
        if let Some(ref mut callback) = self.on_frame {
            callback(&self.controller, changes);
        }
        changes
    }

    /// Run frames against the wall clock until `done` returns true.
    pub fn run_until<F>(&mut self, mut done: F)
    where
        F: FnMut(&SpinController<R>) -> bool,
    {
        // Another driver may already own the logger
        let _ = env_logger::try_init();

        let mut frames = 0u64;
        loop {
            self.frame(Instant::now());
            frames += 1;
            if done(&self.controller) {
                break;
            }
            std::thread::sleep(self.frame_interval);
        }
        log::debug!("Frame loop stopped after {} frames", frames);
    }

    /// Start a spin and run frames until it settles
    pub fn spin_and_wait(&mut self) -> Option<&SpinOutcome> {
        let _ = env_logger::try_init();
        if !self.controller.start_spin(Instant::now()) {
            return None;
        }
        self.run_until(|controller| !controller.is_spinning());
        self.controller.last_outcome()
    }

    pub fn controller(&self) -> &SpinController<R> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SpinController<R> {
        &mut self.controller
    }

    pub fn geometry(&self) -> &MachineGeometry {
        &self.geometry
    }
}
