//! Screen placement of the machine: reel columns between two covers, with
//! the bottom cover doubling as the spin button.

use crate::config::MachineConfig;
use crate::reel::SymbolSprite;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MachineGeometry {
    /// Top-left corner of the reel container
    pub origin: (f64, f64),
    /// Left edge of every reel column, relative to `origin`
    pub columns: Vec<f64>,
    /// Cover above the visible rows
    pub top_cover: Rect,
    /// Cover below the visible rows; pressing it requests a spin
    pub bottom_cover: Rect,
}

impl MachineGeometry {
    pub fn new(screen_width: f64, screen_height: f64, config: &MachineConfig) -> Self {
        let reels = config.strips.len();
        let window = config.symbol_size * config.visible_rows as f64;
        let margin = ((screen_height - window) / 2.0).max(0.0);
        let origin_x = (screen_width - config.reel_width * reels as f64).round() / 2.0;

        Self {
            origin: (origin_x, margin),
            columns: (0..reels).map(|i| i as f64 * config.reel_width).collect(),
            top_cover: Rect::new(0.0, 0.0, screen_width, margin),
            bottom_cover: Rect::new(0.0, window + margin, screen_width, margin),
        }
    }

    /// Whether a pointer press at (x, y) should start a spin
    pub fn is_spin_button(&self, x: f64, y: f64) -> bool {
        self.bottom_cover.contains(x, y)
    }

    /// Screen position of a sprite on reel `reel`
    pub fn sprite_position(&self, reel: usize, sprite: &SymbolSprite) -> Option<(f64, f64)> {
        let column = self.columns.get(reel)?;
        Some((
            self.origin.0 + column + sprite.x,
            self.origin.1 + sprite.y,
        ))
    }
}
