//! Interpolation helpers:
//! - hermite_segment (segment-scaled cubic Hermite)
//! - lerp / linear_segment (rise over run)

use crate::key::Keyframe;

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Normalized position of `time` inside `[a.time, b.time]`.
#[inline]
fn parametric(a: &Keyframe, b: &Keyframe, time: f64) -> (f64, f64) {
    let dt = b.time - a.time;
    (dt, (time - a.time) / dt)
}

/// Cubic Hermite between two keys with tangents scaled by the segment length.
///
/// Slopes are not normalized to the unit interval, so `m0 = a.slope_out * dt`
/// and `m1 = b.slope_in * dt`. Callers guarantee `a.time < b.time`.
#[inline]
pub fn hermite_segment(a: &Keyframe, b: &Keyframe, time: f64) -> f64 {
    let (dt, u) = parametric(a, b, time);
    let p0 = a.value;
    let p1 = b.value;
    let m0 = a.slope_out * dt;
    let m1 = b.slope_in * dt;

    u * (u * (u * (2.0 * p0 - 2.0 * p1 + m0 + m1) + (-3.0 * p0 + 3.0 * p1 - 2.0 * m0 - m1))
        + m0)
        + p0
}

/// Straight line between the two key values, ignoring tangents.
#[inline]
pub fn linear_segment(a: &Keyframe, b: &Keyframe, time: f64) -> f64 {
    let (_, u) = parametric(a, b, time);
    lerp(a.value, b.value, u)
}

/// Rise over run between two keys; the slope that makes Hermite reduce to a line.
#[inline]
pub fn linear_slope(a: &Keyframe, b: &Keyframe) -> f64 {
    let dt = b.time - a.time;
    if dt == 0.0 {
        return 0.0;
    }
    (b.value - a.value) / dt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hermite_hits_endpoints() {
        let a = Keyframe::new(1.0, 2.0, 0.0, 3.0);
        let b = Keyframe::new(3.0, -1.0, -2.0, 0.0);
        assert!((hermite_segment(&a, &b, 1.0) - 2.0).abs() < 1e-12);
        assert!((hermite_segment(&a, &b, 3.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn linear_slope_handles_zero_width() {
        let a = Keyframe::flat(1.0, 0.0);
        let b = Keyframe::flat(1.0, 5.0);
        assert_eq!(linear_slope(&a, &b), 0.0);
    }
}
