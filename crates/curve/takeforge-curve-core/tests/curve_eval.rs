use takeforge_curve::{
    evaluate_curve,
    interp::{Interpolation, KeyInterpolator},
    Curve, Keyframe,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn mk_curve(keys: &[(f64, f64, f64, f64)]) -> Curve {
    Curve::new("test", keys.iter().map(|&k| Keyframe::from(k)).collect()).expect("valid curve")
}

#[test]
fn empty_curve_evaluates_to_zero() {
    let c = Curve::empty("empty");
    for t in [-10.0, 0.0, 0.5, 1e6] {
        assert_eq!(evaluate_curve(&c, t), 0.0);
    }
}

#[test]
fn single_key_holds_its_value() {
    let c = mk_curve(&[(0.3, 7.5, 1.0, -1.0)]);
    for t in [-1.0, 0.3, 0.31, 100.0] {
        assert_eq!(evaluate_curve(&c, t), 7.5);
    }
}

#[test]
fn evaluation_clamps_outside_key_span() {
    let c = mk_curve(&[(0.5, 2.0, 3.0, 3.0), (1.0, -1.0, 0.0, 0.0), (2.0, 4.0, 9.0, 9.0)]);
    for t in [-3.0, 0.0, 0.5] {
        assert_eq!(evaluate_curve(&c, t), 2.0);
    }
    for t in [2.0, 2.5, 1e9] {
        assert_eq!(evaluate_curve(&c, t), 4.0);
    }
}

#[test]
fn evaluation_is_idempotent() {
    let c = mk_curve(&[(0.0, 0.0, 0.0, 1.3), (0.7, 1.0, -0.4, 0.2), (1.9, 0.2, 0.0, 0.0)]);
    for i in 0..50 {
        let t = i as f64 * 0.04;
        assert_eq!(evaluate_curve(&c, t), evaluate_curve(&c, t));
    }
}

#[test]
fn flat_tangents_make_a_smoothstep() {
    let c = mk_curve(&[(0.0, 0.0, 0.0, 0.0), (1.0, 1.0, 0.0, 0.0)]);
    approx(evaluate_curve(&c, 0.5), 0.5, 1e-12);
    // Eased, so below the line in the first half.
    assert!(evaluate_curve(&c, 0.25) < 0.25);
}

#[test]
fn unit_tangents_reduce_to_linear() {
    let c = mk_curve(&[(0.0, 0.0, 0.0, 1.0), (1.0, 1.0, 1.0, 0.0)]);
    approx(evaluate_curve(&c, 0.25), 0.25, 1e-12);
    approx(evaluate_curve(&c, 0.8), 0.8, 1e-12);
}

#[test]
fn tangents_are_scaled_by_segment_length() {
    // Per-second slope 1 over a 2 s segment still yields a straight line.
    let c = mk_curve(&[(0.0, 0.0, 0.0, 1.0), (2.0, 2.0, 1.0, 0.0)]);
    approx(evaluate_curve(&c, 0.5), 0.5, 1e-12);
    approx(evaluate_curve(&c, 1.5), 1.5, 1e-12);
}

#[test]
fn duplicate_key_times_pick_the_later_segment() {
    let c = mk_curve(&[
        (0.0, 0.0, 0.0, 0.0),
        (1.0, 1.0, 0.0, 0.0),
        (1.0, 5.0, 0.0, 0.0),
        (2.0, 0.0, 0.0, 0.0),
    ]);
    approx(evaluate_curve(&c, 1.0), 5.0, 1e-12);
    // Just before the jump the first segment is still in charge.
    approx(evaluate_curve(&c, 0.999_999), 1.0, 1e-6);
}

#[test]
fn linear_interpolation_ignores_tangents() {
    let c = mk_curve(&[(0.0, 0.0, 0.0, 9.0), (2.0, 4.0, -9.0, 9.0), (4.0, 0.0, 9.0, 0.0)])
        .with_interpolation(Interpolation::Linear);
    approx(evaluate_curve(&c, 1.0), 2.0, 1e-12);
    approx(evaluate_curve(&c, 3.0), 2.0, 1e-12);
}

#[test]
fn zero_interpolation_only_keeps_boundaries() {
    let c = mk_curve(&[(0.0, 3.0, 0.0, 0.0), (2.0, 4.0, 0.0, 0.0)])
        .with_interpolation(Interpolation::Zero);
    assert_eq!(evaluate_curve(&c, 1.0), 0.0);
    assert_eq!(evaluate_curve(&c, -1.0), 3.0);
    assert_eq!(evaluate_curve(&c, 2.0), 4.0);
}

#[test]
fn custom_interpolator_can_be_supplied() {
    let c = mk_curve(&[(0.0, 1.0, 0.0, 0.0), (1.0, 3.0, 0.0, 0.0)]);
    let hold_left = |a: &Keyframe, _b: &Keyframe, _t: f64| a.value;
    assert_eq!(c.evaluate_with(&hold_left, 0.5), 1.0);
    // The built-in strategies are usable the same way.
    let linear: &dyn KeyInterpolator = &Interpolation::Linear;
    approx(c.evaluate_with(linear, 0.5), 2.0, 1e-12);
}

#[test]
fn derivative_of_a_line_is_its_slope() {
    let c = mk_curve(&[(0.0, 0.0, 0.0, 2.0), (1.0, 2.0, 2.0, 0.0)]);
    let (value, derivative) = c.evaluate_with_derivative(0.5, 1e-4);
    approx(value, 1.0, 1e-12);
    approx(derivative.expect("two keys"), 2.0, 1e-6);

    let single = mk_curve(&[(0.0, 1.0, 0.0, 0.0)]);
    assert_eq!(single.evaluate_with_derivative(0.0, 1e-3).1, None);
}
