//! Named keyframe channel.

use serde::{Deserialize, Serialize};

use crate::error::CurveError;
use crate::interp::{Interpolation, KeyInterpolator};
use crate::key::Keyframe;
use crate::sampling::{evaluate_keys, evaluate_with_derivative};

/// An ordered set of keys evaluated as one scalar channel.
///
/// Keys are validated on construction: every field must be finite and times
/// must be non-decreasing. Once built, the key list only changes through
/// operations that produce a new curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRepr")]
pub struct Curve {
    name: String,
    keys: Vec<Keyframe>,
    #[serde(default)]
    interpolation: Interpolation,
    #[serde(default, rename = "ownedByAnalysis")]
    owned_by_analysis: bool,
}

#[derive(Deserialize)]
struct CurveRepr {
    name: String,
    #[serde(default)]
    keys: Vec<Keyframe>,
    #[serde(default)]
    interpolation: Interpolation,
    #[serde(default, rename = "ownedByAnalysis")]
    owned_by_analysis: bool,
}

impl TryFrom<CurveRepr> for Curve {
    type Error = CurveError;

    fn try_from(repr: CurveRepr) -> Result<Self, Self::Error> {
        Ok(Curve::new(repr.name, repr.keys)?
            .with_interpolation(repr.interpolation)
            .owned_by_analysis(repr.owned_by_analysis))
    }
}

impl Curve {
    pub fn new(name: impl Into<String>, keys: Vec<Keyframe>) -> Result<Self, CurveError> {
        let name = name.into();
        validate_keys(&name, &keys)?;
        Ok(Self {
            name,
            keys,
            interpolation: Interpolation::default(),
            owned_by_analysis: false,
        })
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            interpolation: Interpolation::default(),
            owned_by_analysis: false,
        }
    }

    /// Two flat keys at t=0 and t=1 holding `value`. Useful as the body of a
    /// persisting event.
    pub fn one_second(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            keys: vec![Keyframe::flat(0.0, value), Keyframe::flat(1.0, value)],
            interpolation: Interpolation::default(),
            owned_by_analysis: false,
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn owned_by_analysis(mut self, owned: bool) -> Self {
        self.owned_by_analysis = owned;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn is_owned_by_analysis(&self) -> bool {
        self.owned_by_analysis
    }

    /// Time of the first key, or 0.0 for an empty curve.
    pub fn start_time(&self) -> f64 {
        self.keys.first().map(|k| k.time).unwrap_or(0.0)
    }

    /// Time of the last key, or 0.0 for an empty curve.
    pub fn end_time(&self) -> f64 {
        self.keys.last().map(|k| k.time).unwrap_or(0.0)
    }

    /// Insert a key keeping time order. A key whose time equals existing keys
    /// goes after them.
    pub fn insert_key(&mut self, key: Keyframe) -> Result<usize, CurveError> {
        if !key.is_finite() {
            return Err(CurveError::NonFiniteKey {
                curve: self.name.clone(),
                index: self.keys.len(),
            });
        }
        let index = self.keys.partition_point(|k| k.time <= key.time);
        self.keys.insert(index, key);
        Ok(index)
    }

    /// Build a curve with the same metadata and a replacement key list.
    pub fn with_keys(&self, keys: Vec<Keyframe>) -> Result<Self, CurveError> {
        validate_keys(&self.name, &keys)?;
        Ok(Self {
            name: self.name.clone(),
            keys,
            interpolation: self.interpolation,
            owned_by_analysis: self.owned_by_analysis,
        })
    }

    /// Evaluate with this curve's own interpolation.
    pub fn evaluate_at(&self, time: f64) -> f64 {
        evaluate_keys(&self.keys, &self.interpolation, time)
    }

    /// Evaluate with a caller-supplied interpolator.
    pub fn evaluate_with(&self, interp: &dyn KeyInterpolator, time: f64) -> f64 {
        evaluate_keys(&self.keys, interp, time)
    }

    pub fn evaluate_with_derivative(&self, time: f64, eps: f64) -> (f64, Option<f64>) {
        evaluate_with_derivative(&self.keys, &self.interpolation, time, eps)
    }
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Curve: \"{}\" [{} keys, owned by {}]",
            self.name,
            self.keys.len(),
            if self.owned_by_analysis {
                "Analysis"
            } else {
                "User"
            }
        )
    }
}

fn validate_keys(name: &str, keys: &[Keyframe]) -> Result<(), CurveError> {
    let mut previous = f64::NEG_INFINITY;
    for (index, key) in keys.iter().enumerate() {
        if !key.is_finite() {
            return Err(CurveError::NonFiniteKey {
                curve: name.to_string(),
                index,
            });
        }
        if key.time < previous {
            return Err(CurveError::NonMonotonicKeys {
                curve: name.to_string(),
                index,
                time: key.time,
                previous,
            });
        }
        previous = key.time;
    }
    Ok(())
}

/// Evaluate `curve` at `time` (seconds).
pub fn evaluate_curve(curve: &Curve, time: f64) -> f64 {
    curve.evaluate_at(time)
}
