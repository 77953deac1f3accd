//! Machine configuration.
//!
//! Defaults reproduce the classic five-reel demo machine. Any subset of the
//! fields can be overridden from JSON:
//!
//! ```
//! use reelspin::MachineConfig;
//!
//! let config = MachineConfig::from_json_str(r#"{ "symbol_size": 100.0 }"#).unwrap();
//! assert_eq!(config.symbol_size, 100.0);
//! assert_eq!(config.strips.len(), 5);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{TimingFunction, Transition};
use crate::error::{Error, Result};
use crate::reel::SymbolId;

/// How a spin sends each reel on its way.
///
/// Reel `i` travels `base_travel + i * travel_per_reel + extra` cells in
/// `base_ms + i * stagger_ms + extra * stagger_ms`, with `extra` drawn from
/// `0..=max_jitter` per reel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTiming {
    pub base_ms: u64,
    pub stagger_ms: u64,
    pub base_travel: f64,
    pub travel_per_reel: f64,
    pub max_jitter: u32,
    /// Backout overshoot amount
    pub overshoot: f64,
}

impl SpinTiming {
    /// Distance reel `reel` travels for a given jitter
    pub fn travel(&self, reel: usize, extra: u32) -> f64 {
        self.base_travel + reel as f64 * self.travel_per_reel + extra as f64
    }

    /// Duration of reel `reel`'s tween for a given jitter. Saturates at
    /// `u64::MAX` milliseconds.
    pub fn duration(&self, reel: usize, extra: u32) -> Duration {
        Duration::from_millis(self.duration_ms(reel, extra).unwrap_or(u64::MAX))
    }

    fn duration_ms(&self, reel: usize, extra: u32) -> Option<u64> {
        (reel as u64)
            .checked_add(extra as u64)?
            .checked_mul(self.stagger_ms)?
            .checked_add(self.base_ms)
    }

    /// Transition of reel `reel`'s tween for a given jitter
    pub fn transition(&self, reel: usize, extra: u32) -> Transition {
        Transition::new(
            self.duration(reel, extra),
            TimingFunction::Backout(self.overshoot),
        )
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self {
            base_ms: 2500,
            stagger_ms: 600,
            base_travel: 10.0,
            travel_per_reel: 5.0,
            max_jitter: 2,
            overshoot: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Edge of the square cell every symbol is fitted into
    pub symbol_size: f64,
    /// Horizontal distance between reel columns
    pub reel_width: f64,
    /// Rows visible between the covers
    pub visible_rows: usize,
    /// Visible row read by the win check
    pub win_row: usize,
    /// Blur per cell of movement per frame
    pub blur_factor: f64,
    /// When set, blur is normalised to this frame length instead of
    /// depending on the frame rate
    pub blur_reference_frame_ms: Option<f64>,
    pub spin: SpinTiming,
    /// Symbol strip of each reel, left to right
    pub strips: Vec<Vec<SymbolId>>,
    /// Image of each symbol, indexed by [`SymbolId`]
    pub symbols: Vec<PathBuf>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        let strip = |ids: &[u8]| ids.iter().copied().map(SymbolId).collect::<Vec<_>>();
        Self {
            symbol_size: 150.0,
            reel_width: 160.0,
            visible_rows: 3,
            win_row: 1,
            blur_factor: 8.0,
            blur_reference_frame_ms: None,
            spin: SpinTiming::default(),
            strips: vec![
                strip(&[5, 4, 1, 3, 3, 5, 4, 0, 4, 3]),
                strip(&[5, 5, 1, 4, 2, 0, 2, 3, 5, 5, 3, 1, 2, 4, 0]),
                strip(&[3, 6, 4, 5, 2, 5, 5, 6]),
                strip(&[3, 5, 4, 6, 2, 5, 2, 6, 1, 0]),
                strip(&[1, 1, 6, 4, 1, 3, 2, 0, 3, 3]),
            ],
            symbols: [
                "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
            ]
            .iter()
            .map(|name| PathBuf::from(format!("{}.png", name)))
            .collect(),
        }
    }
}

impl MachineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loading machine config from {}", path.as_ref().display());
        Self::from_json_str(&json)
    }

    pub fn symbol_size(mut self, symbol_size: f64) -> Self {
        self.symbol_size = symbol_size;
        self
    }

    pub fn reel_width(mut self, reel_width: f64) -> Self {
        self.reel_width = reel_width;
        self
    }

    pub fn spin(mut self, spin: SpinTiming) -> Self {
        self.spin = spin;
        self
    }

    pub fn strips(mut self, strips: Vec<Vec<SymbolId>>) -> Self {
        self.strips = strips;
        self
    }

    pub fn blur_reference_frame_ms(mut self, frame_ms: Option<f64>) -> Self {
        self.blur_reference_frame_ms = frame_ms;
        self
    }

    /// Check the config describes a machine the reels can be built from
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::Config(msg));

        let finite = [
            ("symbol_size", self.symbol_size),
            ("reel_width", self.reel_width),
            ("blur_factor", self.blur_factor),
            ("base_travel", self.spin.base_travel),
            ("travel_per_reel", self.spin.travel_per_reel),
            ("overshoot", self.spin.overshoot),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return invalid(format!("{} must be finite, got {}", name, value));
            }
        }
        if self.symbol_size <= 0.0 {
            return invalid(format!("symbol_size must be positive, got {}", self.symbol_size));
        }
        if self.visible_rows == 0 {
            return invalid("visible_rows must be at least 1".into());
        }
        if self.win_row >= self.visible_rows {
            return invalid(format!(
                "win_row {} is outside the {} visible rows",
                self.win_row, self.visible_rows
            ));
        }
        if self.spin.overshoot < 0.0 {
            return invalid(format!(
                "overshoot must not be negative, got {}",
                self.spin.overshoot
            ));
        }
        if let Some(frame_ms) = self.blur_reference_frame_ms {
            if !frame_ms.is_finite() || frame_ms <= 0.0 {
                return invalid(format!(
                    "blur_reference_frame_ms must be positive, got {}",
                    frame_ms
                ));
            }
        }
        if let Some(last) = self.strips.len().checked_sub(1) {
            // The last reel with the most jitter has the longest tween
            let jitter = self.spin.max_jitter;
            if self.spin.duration_ms(last, jitter).is_none() {
                return invalid(format!(
                    "spin of reel {} overflows: base_ms {} + {} * stagger_ms {}",
                    last,
                    self.spin.base_ms,
                    last as u64 + jitter as u64,
                    self.spin.stagger_ms
                ));
            }
            if !self.spin.travel(last, jitter).is_finite() {
                return invalid(format!("travel of reel {} is not finite", last));
            }
        }
        for (reel, strip) in self.strips.iter().enumerate() {
            // The window needs one slot above the top row to wrap through
            if strip.len() <= self.visible_rows {
                return invalid(format!(
                    "strip {} has {} symbols, needs more than {}",
                    reel,
                    strip.len(),
                    self.visible_rows
                ));
            }
            if let Some(symbol) = strip.iter().find(|s| s.index() >= self.symbols.len()) {
                return invalid(format!(
                    "strip {} uses symbol {} but only {} symbols are defined",
                    reel,
                    symbol.0,
                    self.symbols.len()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MachineConfig::default();
        config.validate().unwrap();
        let lengths: Vec<usize> = config.strips.iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![10, 15, 8, 10, 10]);
        assert_eq!(config.symbols[0], PathBuf::from("zero.png"));
        assert_eq!(config.symbols[9], PathBuf::from("nine.png"));
    }

    #[test]
    fn test_timing_stagger() {
        let timing = SpinTiming::default();
        assert_eq!(timing.travel(0, 0), 10.0);
        assert_eq!(timing.travel(4, 2), 32.0);
        assert_eq!(timing.duration(0, 0), Duration::from_millis(2500));
        assert_eq!(timing.duration(2, 1), Duration::from_millis(4300));
        for reel in 0..4 {
            assert!(timing.duration(reel + 1, 0) >= timing.duration(reel, 0));
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MachineConfig::from_json_str(r#"{ "spin": { "base_ms": 1000 } }"#).unwrap();
        assert_eq!(config.spin.base_ms, 1000);
        assert_eq!(config.spin.stagger_ms, 600);
        assert_eq!(config.symbol_size, 150.0);
    }

    #[test]
    fn test_json_strips() {
        let config = MachineConfig::from_json_str(r#"{ "strips": [[0, 1, 2, 3], [3, 2, 1, 0]] }"#)
            .unwrap();
        assert_eq!(config.strips[1][0], SymbolId(3));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = MachineConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_rejects_short_strip() {
        let config = MachineConfig::default().strips(vec![vec![SymbolId(0); 3]]);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_symbol() {
        let config = MachineConfig::default().strips(vec![vec![SymbolId(42); 5]]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("symbol 42"));
    }

    #[test]
    fn test_rejects_win_row_outside_window() {
        let config = MachineConfig {
            win_row: 3,
            ..MachineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_symbol_size() {
        assert!(MachineConfig::default().symbol_size(0.0).validate().is_err());
    }

    #[test]
    fn test_rejects_stagger_that_overflows() {
        let err = MachineConfig::from_json_str(
            r#"{ "spin": { "stagger_ms": 9223372036854775807 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("overflows"));

        let err = MachineConfig::from_json_str(
            r#"{ "spin": { "base_ms": 18446744073709551615, "stagger_ms": 1 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_accepts_largest_stagger_that_fits() {
        // Five reels with jitter 2: the last tween spans base + 6 * stagger
        let spin = SpinTiming {
            base_ms: 0,
            stagger_ms: u64::MAX / 6,
            ..SpinTiming::default()
        };
        MachineConfig::default().spin(spin).validate().unwrap();
    }

    #[test]
    fn test_duration_saturates() {
        let timing = SpinTiming {
            stagger_ms: u64::MAX,
            ..SpinTiming::default()
        };
        assert_eq!(timing.duration(3, 2), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_rejects_non_finite_numbers() {
        let spins = [
            SpinTiming { base_travel: f64::NAN, ..SpinTiming::default() },
            SpinTiming { travel_per_reel: f64::INFINITY, ..SpinTiming::default() },
            SpinTiming { overshoot: f64::NAN, ..SpinTiming::default() },
            SpinTiming {
                base_travel: f64::MAX,
                travel_per_reel: f64::MAX,
                ..SpinTiming::default()
            },
        ];
        for spin in spins {
            let config = MachineConfig::default().spin(spin.clone());
            assert!(
                matches!(config.validate(), Err(Error::Config(_))),
                "accepted {:?}",
                spin
            );
        }

        let configs = [
            MachineConfig { blur_factor: f64::NAN, ..MachineConfig::default() },
            MachineConfig::default().reel_width(f64::NEG_INFINITY),
            MachineConfig::default().symbol_size(f64::INFINITY),
            MachineConfig::default().blur_reference_frame_ms(Some(f64::INFINITY)),
        ];
        for config in configs {
            assert!(config.validate().is_err(), "accepted {:?}", config);
        }
    }
}
