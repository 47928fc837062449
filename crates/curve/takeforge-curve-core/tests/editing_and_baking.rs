use takeforge_curve::{
    apply_segment_slopes, bake_curve, export_baked_json, snap_keys_to_frames, BakingConfig,
    Curve, CurveError, Keyframe, SlopeEdit, SlopeRule,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn plateau() -> Curve {
    Curve::new(
        "plateau",
        vec![
            Keyframe::new(0.0, 0.0, 5.0, 5.0),
            Keyframe::new(1.0, 2.0, 5.0, 5.0),
            Keyframe::new(3.0, 2.0, 5.0, 5.0),
            Keyframe::new(4.0, 0.0, 5.0, 5.0),
        ],
    )
    .expect("valid curve")
}

#[test]
fn linear_slopes_straighten_selected_segments() {
    let (curve, edits) =
        apply_segment_slopes(&plateau(), &[0, 1, 2], SlopeRule::Linear).expect("edit");
    assert_eq!(
        edits,
        vec![
            SlopeEdit {
                key_index: 0,
                slope_in: None,
                slope_out: Some(2.0)
            },
            SlopeEdit {
                key_index: 1,
                slope_in: Some(2.0),
                slope_out: Some(0.0)
            },
            SlopeEdit {
                key_index: 2,
                slope_in: Some(0.0),
                slope_out: None
            },
        ]
    );
    approx(curve.evaluate_at(0.5), 1.0, 1e-12);
    approx(curve.evaluate_at(2.0), 2.0, 1e-12);
    // Untouched tangents survive.
    assert_eq!(curve.keys()[0].slope_in, 5.0);
    assert_eq!(curve.keys()[2].slope_out, 5.0);
    assert_eq!(curve.keys()[3], plateau().keys()[3]);
}

#[test]
fn zero_slopes_flatten_selected_keys() {
    let (curve, edits) = apply_segment_slopes(&plateau(), &[2, 3], SlopeRule::Zero).expect("edit");
    assert_eq!(edits.len(), 2);
    assert_eq!(curve.keys()[2].slope_out, 0.0);
    assert_eq!(curve.keys()[3].slope_in, 0.0);
    approx(curve.evaluate_at(3.5), 1.0, 1e-12);
}

#[test]
fn slope_selection_rules() {
    let c = plateau();
    assert!(matches!(
        apply_segment_slopes(&c, &[1], SlopeRule::Zero),
        Err(CurveError::SingleKeySelected { .. })
    ));
    assert!(matches!(
        apply_segment_slopes(&c, &[0, 2], SlopeRule::Zero),
        Err(CurveError::SelectionGap { after: 0, .. })
    ));
    assert!(matches!(
        apply_segment_slopes(&c, &[3, 4], SlopeRule::Zero),
        Err(CurveError::KeyIndexOutOfRange { index: 4, len: 4, .. })
    ));
    let short = Curve::new("short", vec![Keyframe::flat(0.0, 1.0)]).expect("valid");
    assert!(matches!(
        apply_segment_slopes(&short, &[0], SlopeRule::Linear),
        Err(CurveError::CurveTooShort { .. })
    ));
    let (same, edits) = apply_segment_slopes(&c, &[], SlopeRule::Linear).expect("no-op");
    assert!(edits.is_empty());
    assert_eq!(same, c);
}

#[test]
fn snapping_rounds_to_frames() {
    let c = Curve::new(
        "snap",
        vec![
            Keyframe::new(0.0166, 1.0, 0.5, 0.25),
            Keyframe::flat(0.51, 2.0),
            Keyframe::flat(1.0, 3.0),
        ],
    )
    .expect("valid");
    let snapped = snap_keys_to_frames(&c, 30.0).expect("snap");
    let times: Vec<f64> = snapped.keys().iter().map(|k| k.time).collect();
    approx(times[0], 0.0, 1e-12);
    approx(times[1], 0.5, 1e-12);
    approx(times[2], 1.0, 1e-12);
    assert_eq!(snapped.keys()[0].slope_in, 0.5);
    assert_eq!(snapped.keys()[0].slope_out, 0.25);
}

#[test]
fn snapping_refuses_analysis_curves_and_bad_rates() {
    let c = plateau().owned_by_analysis(true);
    assert!(matches!(
        snap_keys_to_frames(&c, 30.0),
        Err(CurveError::OwnedByAnalysis { .. })
    ));
    assert_eq!(
        snap_keys_to_frames(&plateau(), 0.0),
        Err(CurveError::InvalidFrameRate(0.0))
    );
}

#[test]
fn bake_samples_inclusive_window() {
    let c = Curve::new(
        "line",
        vec![Keyframe::new(0.0, 0.0, 0.0, 1.0), Keyframe::new(1.0, 1.0, 1.0, 0.0)],
    )
    .expect("valid");
    let baked = bake_curve(
        &c,
        &BakingConfig {
            frame_rate: 4.0,
            ..Default::default()
        },
    );
    assert_eq!(baked.values.len(), 5);
    for (i, v) in baked.values.iter().enumerate() {
        approx(*v, i as f64 * 0.25, 1e-12);
    }
    let json = export_baked_json(&baked);
    assert_eq!(json["name"], "line");
    assert_eq!(json["values"].as_array().map(|a| a.len()), Some(5));
}

#[test]
fn bake_sanitizes_config() {
    let c = plateau();
    let baked = bake_curve(
        &c,
        &BakingConfig {
            frame_rate: -1.0,
            start_time: Some(2.0),
            end_time: Some(1.0),
        },
    );
    assert_eq!(baked.frame_rate, 60.0);
    assert_eq!(baked.start_time, 2.0);
    assert_eq!(baked.end_time, 2.0);
    assert_eq!(baked.values.len(), 1);
}

#[test]
fn bake_clamps_window_to_key_span() {
    let c = plateau();
    let baked = bake_curve(
        &c,
        &BakingConfig {
            frame_rate: 2.0,
            start_time: Some(-10.0),
            end_time: Some(1e300),
        },
    );
    assert_eq!(baked.start_time, 0.0);
    assert_eq!(baked.end_time, 4.0);
    assert_eq!(baked.values.len(), 9);
    approx(baked.values[8], 0.0, 1e-12);
}
