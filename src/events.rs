//! Cues emitted by a spin, for audio or any other observer.
//!
//! Listeners are optional. Nothing in the animation depends on whether
//! anyone is subscribed.

use crate::controller::SpinOutcome;
use crate::reel::SymbolId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpinEvent {
    /// A spin request was accepted
    SpinStarted,
    /// A reel's tween completed; `symbol` is what landed on the win line
    ReelStopped {
        reel: usize,
        symbol: Option<SymbolId>,
    },
    /// Every reel stopped and the win check ran
    SpinFinished(SpinOutcome),
}

/// A callback that receives every emitted event
pub type Listener = Box<dyn FnMut(&SpinEvent)>;

#[derive(Default)]
pub struct Listeners {
    listeners: Vec<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F: FnMut(&SpinEvent) + 'static>(&mut self, listener: F) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: &SpinEvent) {
        log::trace!("Emitting {:?} to {} listeners", event, self.listeners.len());
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
