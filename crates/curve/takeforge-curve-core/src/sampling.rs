//! Key lookup and evaluation over an ordered key slice.
//!
//! Model:
//! - Keys are sorted by time (non-decreasing; duplicates allowed).
//! - Outside the key span the value clamps to the first/last key.
//! - Inside, the first pair with `k[i].time <= t < k[i+1].time` is evaluated by
//!   the interpolator. A zero-length segment never matches, so at a duplicated
//!   time the pair that starts at the later duplicate wins.

use crate::interp::KeyInterpolator;
use crate::key::Keyframe;

pub const DEFAULT_DERIVATIVE_EPSILON: f64 = 1e-3;

/// Where a sample time falls relative to the keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    Empty,
    /// Use the value of this key directly.
    Clamped(usize),
    /// Interpolate between keys `i` and `i + 1`.
    Between(usize),
}

pub fn find_segment(keys: &[Keyframe], time: f64) -> Segment {
    let n = keys.len();
    if n == 0 {
        return Segment::Empty;
    }
    if time <= keys[0].time {
        return Segment::Clamped(0);
    }
    if time >= keys[n - 1].time {
        return Segment::Clamped(n - 1);
    }
    // Linear scan, first match wins.
    for i in 0..(n - 1) {
        if keys[i].time <= time && time < keys[i + 1].time {
            return Segment::Between(i);
        }
    }
    // Only reachable for a NaN time.
    Segment::Clamped(n - 1)
}

/// Evaluate a key slice at `time`. Empty slices evaluate to 0.0.
pub fn evaluate_keys(keys: &[Keyframe], interp: &dyn KeyInterpolator, time: f64) -> f64 {
    match find_segment(keys, time) {
        Segment::Empty => 0.0,
        Segment::Clamped(i) => keys[i].value,
        Segment::Between(i) => interp.interpolate(&keys[i], &keys[i + 1], time),
    }
}

/// Evaluate and estimate the first derivative with a symmetric finite difference.
///
/// The derivative is `None` when fewer than two keys exist or `eps` is not a
/// positive finite number.
pub fn evaluate_with_derivative(
    keys: &[Keyframe],
    interp: &dyn KeyInterpolator,
    time: f64,
    eps: f64,
) -> (f64, Option<f64>) {
    let value = evaluate_keys(keys, interp, time);
    if keys.len() < 2 || !eps.is_finite() || eps <= 0.0 {
        return (value, None);
    }
    let forward = evaluate_keys(keys, interp, time + eps);
    let backward = evaluate_keys(keys, interp, time - eps);
    (value, Some((forward - backward) / (2.0 * eps)))
}
