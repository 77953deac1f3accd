//! Symbol identifiers and sprite placement inside a reel cell.

use serde::{Deserialize, Serialize};

/// Index of a symbol in the machine's symbol set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u8);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for SymbolId {
    fn from(value: u8) -> Self {
        SymbolId(value)
    }
}

/// Resolves symbols to drawables. The core only needs their natural size.
pub trait SymbolAtlas {
    /// Number of symbols the atlas can resolve
    fn len(&self) -> usize;

    /// Natural width and height of a symbol's image, if known
    fn natural_size(&self, symbol: SymbolId) -> Option<(u32, u32)>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Atlas where every symbol has the same natural size.
/// Useful for headless drivers that never load images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformAtlas {
    pub count: usize,
    pub size: (u32, u32),
}

impl UniformAtlas {
    pub fn new(count: usize, size: (u32, u32)) -> Self {
        Self { count, size }
    }
}

impl SymbolAtlas for UniformAtlas {
    fn len(&self) -> usize {
        self.count
    }

    fn natural_size(&self, symbol: SymbolId) -> Option<(u32, u32)> {
        (symbol.index() < self.count).then_some(self.size)
    }
}

/// Scale and horizontal offset that fit an image inside a square cell while
/// preserving its aspect ratio. Unknown or degenerate sizes are treated as a
/// square of the cell size.
pub fn fit_to_cell(natural: Option<(u32, u32)>, cell: f64) -> (f64, f64) {
    let (width, height) = match natural {
        Some((w, h)) if w > 0 && h > 0 => (w as f64, h as f64),
        _ => (cell, cell),
    };
    let scale = (cell / width).min(cell / height);
    let x = ((cell - width * scale) / 2.0).round();
    (scale, x)
}

/// One drawable slot of a reel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolSprite {
    pub symbol: SymbolId,
    /// Horizontal offset inside the cell
    pub x: f64,
    /// Vertical offset inside the reel container
    pub y: f64,
    /// Uniform scale applied to the natural image size
    pub scale: f64,
}

impl SymbolSprite {
    pub fn fitted<A: SymbolAtlas + ?Sized>(symbol: SymbolId, atlas: &A, cell: f64) -> Self {
        let (scale, x) = fit_to_cell(atlas.natural_size(symbol), cell);
        Self {
            symbol,
            x,
            y: 0.0,
            scale,
        }
    }
}
