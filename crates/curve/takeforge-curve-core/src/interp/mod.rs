//! Key interpolation strategies.
//!
//! A curve owns an [`Interpolation`] that decides how a bracketed segment is
//! evaluated. Hosts with other needs implement [`KeyInterpolator`] directly
//! and call `Curve::evaluate_with`.

pub mod functions;

use serde::{Deserialize, Serialize};

use crate::key::Keyframe;

/// Evaluates the segment between two keys. `first.time <= time < second.time`.
pub trait KeyInterpolator {
    fn interpolate(&self, first: &Keyframe, second: &Keyframe, time: f64) -> f64;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Segment-scaled cubic Hermite using the key tangents.
    #[default]
    Hermite,
    /// Straight line between key values.
    Linear,
    /// Always 0.0 inside segments; boundary clamping still applies.
    Zero,
}

impl KeyInterpolator for Interpolation {
    #[inline]
    fn interpolate(&self, first: &Keyframe, second: &Keyframe, time: f64) -> f64 {
        match self {
            Interpolation::Hermite => functions::hermite_segment(first, second, time),
            Interpolation::Linear => functions::linear_segment(first, second, time),
            Interpolation::Zero => 0.0,
        }
    }
}

impl<F> KeyInterpolator for F
where
    F: Fn(&Keyframe, &Keyframe, f64) -> f64,
{
    fn interpolate(&self, first: &Keyframe, second: &Keyframe, time: f64) -> f64 {
        self(first, second, time)
    }
}
