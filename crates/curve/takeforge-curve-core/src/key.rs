use serde::{Deserialize, Serialize};

/// A single key on a curve.
///
/// `slope_in` is the tangent arriving at the key and `slope_out` the tangent
/// leaving it. Slopes are per-second values; the Hermite interpolator scales
/// them by the segment length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f64,
    pub value: f64,
    #[serde(default, rename = "slopeIn")]
    pub slope_in: f64,
    #[serde(default, rename = "slopeOut")]
    pub slope_out: f64,
}

impl Keyframe {
    pub fn new(time: f64, value: f64, slope_in: f64, slope_out: f64) -> Self {
        Self {
            time,
            value,
            slope_in,
            slope_out,
        }
    }

    /// Key with both tangents flat.
    pub fn flat(time: f64, value: f64) -> Self {
        Self::new(time, value, 0.0, 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.value.is_finite()
            && self.slope_in.is_finite()
            && self.slope_out.is_finite()
    }

    pub fn with_slopes(self, slope_in: f64, slope_out: f64) -> Self {
        Self {
            slope_in,
            slope_out,
            ..self
        }
    }
}

impl From<(f64, f64, f64, f64)> for Keyframe {
    fn from((time, value, slope_in, slope_out): (f64, f64, f64, f64)) -> Self {
        Self::new(time, value, slope_in, slope_out)
    }
}

impl std::fmt::Display for Keyframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Key: time={}, value={}, slopeIn={}, slopeOut={}",
            self.time, self.value, self.slope_in, self.slope_out
        )
    }
}
