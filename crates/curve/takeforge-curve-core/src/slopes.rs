//! Curve editing tools: segment slope rewriting and frame snapping.
//!
//! Both produce a new [`Curve`]; the edits applied are also returned so a host
//! adapter can mirror them.

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::error::CurveError;
use crate::interp::functions::linear_slope;
use crate::key::Keyframe;

/// How a segment's tangents are recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlopeRule {
    /// Flat tangents.
    Zero,
    /// Rise over run, which makes the Hermite segment a straight line.
    Linear,
}

impl SlopeRule {
    pub fn slope(&self, first: &Keyframe, second: &Keyframe) -> f64 {
        match self {
            SlopeRule::Zero => 0.0,
            SlopeRule::Linear => linear_slope(first, second),
        }
    }
}

/// One key whose tangents were rewritten. `None` means the side was untouched.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlopeEdit {
    pub key_index: usize,
    pub slope_in: Option<f64>,
    pub slope_out: Option<f64>,
}

/// Recompute tangents over a contiguous run of selected keys.
///
/// The first selected key only gets a new `slope_out`, the last only a new
/// `slope_in`; interior keys take the previous segment's slope coming in and
/// the next segment's slope going out. `selection` must be sorted ascending.
pub fn apply_segment_slopes(
    curve: &Curve,
    selection: &[usize],
    rule: SlopeRule,
) -> Result<(Curve, Vec<SlopeEdit>), CurveError> {
    if selection.is_empty() {
        return Ok((curve.clone(), Vec::new()));
    }
    if curve.len() < 2 {
        return Err(CurveError::CurveTooShort {
            curve: curve.name().to_string(),
        });
    }
    if selection.len() == 1 {
        return Err(CurveError::SingleKeySelected {
            curve: curve.name().to_string(),
        });
    }
    for &index in selection {
        if index >= curve.len() {
            return Err(CurveError::KeyIndexOutOfRange {
                curve: curve.name().to_string(),
                index,
                len: curve.len(),
            });
        }
    }
    for pair in selection.windows(2) {
        if pair[1] != pair[0] + 1 {
            return Err(CurveError::SelectionGap {
                curve: curve.name().to_string(),
                after: pair[0],
            });
        }
    }

    let mut keys = curve.keys().to_vec();
    let mut edits = Vec::with_capacity(selection.len());
    let last = selection.len() - 1;
    let mut previous_slope = 0.0;
    for (i, &index) in selection.iter().enumerate() {
        if i == last {
            keys[index].slope_in = previous_slope;
            edits.push(SlopeEdit {
                key_index: index,
                slope_in: Some(previous_slope),
                slope_out: None,
            });
            continue;
        }
        let next_slope = rule.slope(&curve.keys()[index], &curve.keys()[index + 1]);
        keys[index].slope_out = next_slope;
        let slope_in = if i == 0 {
            None
        } else {
            keys[index].slope_in = previous_slope;
            Some(previous_slope)
        };
        edits.push(SlopeEdit {
            key_index: index,
            slope_in,
            slope_out: Some(next_slope),
        });
        previous_slope = next_slope;
    }

    log::debug!(
        "rewrote {} key tangents on curve '{}' ({:?})",
        edits.len(),
        curve.name(),
        rule
    );
    Ok((curve.with_keys(keys)?, edits))
}

/// Round every key time to the nearest frame at `fps` (ties to even).
///
/// Curves owned by analysis are read-only. Rounding is monotonic so key order
/// is preserved, though neighbouring keys may collapse onto the same frame.
pub fn snap_keys_to_frames(curve: &Curve, fps: f64) -> Result<Curve, CurveError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(CurveError::InvalidFrameRate(fps));
    }
    if curve.is_owned_by_analysis() {
        return Err(CurveError::OwnedByAnalysis {
            curve: curve.name().to_string(),
        });
    }
    let keys = curve
        .keys()
        .iter()
        .map(|k| Keyframe {
            time: (k.time * fps).round_ties_even() / fps,
            ..*k
        })
        .collect();
    curve.with_keys(keys)
}
