//! A single reel: a strip of symbols scrolled by a continuous position.
//!
//! The reel uses the pre-built full strip: one sprite per strip entry, laid
//! out with wrap-around, and never re-textured while spinning. What lands on
//! the win line is therefore fully determined by the final position.

mod symbol;

pub use symbol::{fit_to_cell, SymbolAtlas, SymbolId, SymbolSprite, UniformAtlas};

use crate::animation::Tweenable;

/// Vertical offset of slot `slot` in a window of `slots` sprites.
///
/// `((position + slot) mod slots) * symbol_size - symbol_size`, using a
/// Euclidean modulo so the result is periodic in `position` with period
/// `slots` for negative positions too.
pub fn slot_offset(position: f64, slot: usize, slots: usize, symbol_size: f64) -> f64 {
    (position + slot as f64).rem_euclid(slots as f64) * symbol_size - symbol_size
}

/// Motion blur derived from how far the reel moved since the previous frame.
/// Zero at rest, larger the faster the reel scrolls.
pub fn blur_strength(position: f64, previous_position: f64, factor: f64) -> f64 {
    (position - previous_position) * factor
}

/// Properties of a [`Reel`] that tweens can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReelProperty {
    Position,
}

#[derive(Clone, Debug)]
pub struct Reel {
    strip: Vec<SymbolId>,
    /// Scroll offset in symbol cells
    position: f64,
    /// Position at the previous frame, only used for blur
    previous_position: f64,
    sprites: Vec<SymbolSprite>,
    blur: f64,
    symbol_size: f64,
}

impl Reel {
    /// Build a reel from its strip, fitting every symbol into a square cell.
    pub fn new<A: SymbolAtlas + ?Sized>(strip: Vec<SymbolId>, atlas: &A, symbol_size: f64) -> Self {
        let sprites = strip
            .iter()
            .map(|&symbol| SymbolSprite::fitted(symbol, atlas, symbol_size))
            .collect();
        let mut reel = Self {
            strip,
            position: 0.0,
            previous_position: 0.0,
            sprites,
            blur: 0.0,
            symbol_size,
        };
        reel.relayout();
        reel
    }

    pub fn strip(&self) -> &[SymbolId] {
        &self.strip
    }

    /// Number of slots in the window (the whole strip)
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn previous_position(&self) -> f64 {
        self.previous_position
    }

    pub fn blur(&self) -> f64 {
        self.blur
    }

    pub fn symbol_size(&self) -> f64 {
        self.symbol_size
    }

    pub fn sprites(&self) -> &[SymbolSprite] {
        &self.sprites
    }

    /// Vertical offset of every slot for the current position
    pub fn layout(&self) -> Vec<f64> {
        let slots = self.sprites.len();
        (0..slots)
            .map(|slot| slot_offset(self.position, slot, slots, self.symbol_size))
            .collect()
    }

    /// Move every sprite to its offset for the current position.
    /// Returns true if any sprite moved.
    pub fn relayout(&mut self) -> bool {
        let slots = self.sprites.len();
        let mut moved = false;
        for (slot, sprite) in self.sprites.iter_mut().enumerate() {
            let y = slot_offset(self.position, slot, slots, self.symbol_size);
            if sprite.y != y {
                sprite.y = y;
                moved = true;
            }
        }
        moved
    }

    /// Recompute blur from the movement since the last call and remember the
    /// current position for the next one.
    ///
    /// `frame_scale` multiplies the raw per-frame delta; `1.0` keeps blur tied
    /// to the frame rate.
    pub fn update_blur(&mut self, factor: f64, frame_scale: f64) -> f64 {
        self.blur = blur_strength(self.position, self.previous_position, factor) * frame_scale;
        self.previous_position = self.position;
        self.blur
    }

    /// Slot whose sprite sits on visible row `row` (0 = top of the window).
    ///
    /// Looked up by index rather than by comparing float offsets, using the
    /// position rounded to the nearest cell.
    pub fn slot_at_row(&self, row: usize) -> Option<usize> {
        let slots = self.sprites.len();
        if row + 1 >= slots {
            return None;
        }
        let slot = (row as f64 + 1.0 - self.position.round()).rem_euclid(slots as f64);
        Some(slot as usize)
    }

    /// Symbol currently shown on visible row `row`
    pub fn symbol_at_row(&self, row: usize) -> Option<SymbolId> {
        self.slot_at_row(row).map(|slot| self.sprites[slot].symbol)
    }
}

impl Tweenable for Reel {
    type Property = ReelProperty;
    type Value = f64;

    fn get(&self, property: ReelProperty) -> f64 {
        match property {
            ReelProperty::Position => self.position,
        }
    }

    fn set(&mut self, property: ReelProperty, value: f64) {
        match property {
            ReelProperty::Position => self.position = value,
        }
    }
}
