//! Value ranges drawn at resolution time and spawn-condition bounds.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// `[min, max]` pair resolved by a uniform draw.
///
/// Serialized as a two element array, matching how templates store ranges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const ZERO: ValueRange = ValueRange { min: 0.0, max: 0.0 };
    pub const ONE: ValueRange = ValueRange { min: 1.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate range that always yields `value`.
    pub fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Uniform draw in `[min, max)`; a fixed range returns its value without
    /// consuming randomness.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min == self.max {
            return self.min;
        }
        self.min + (self.max - self.min) * rng.random::<f64>()
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<(f64, f64)> for ValueRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

impl From<ValueRange> for (f64, f64) {
    fn from(r: ValueRange) -> Self {
        (r.min, r.max)
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.min, self.max)
    }
}

/// Optional lower/upper bound on a parent value. `None` is unbounded on that
/// side. Both edges are inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Option<f64>, Option<f64>)", into = "(Option<f64>, Option<f64>)")]
pub struct SpawnBound {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SpawnBound {
    pub const UNBOUNDED: SpawnBound = SpawnBound {
        min: None,
        max: None,
    };

    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: f64) -> Self {
        Self::new(None, Some(max))
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |lo| value >= lo) && self.max.map_or(true, |hi| value <= hi)
    }
}

impl From<(Option<f64>, Option<f64>)> for SpawnBound {
    fn from((min, max): (Option<f64>, Option<f64>)) -> Self {
        Self::new(min, max)
    }
}

impl From<SpawnBound> for (Option<f64>, Option<f64>) {
    fn from(b: SpawnBound) -> Self {
        (b.min, b.max)
    }
}
