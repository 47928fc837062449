//! takeforge curve core
//!
//! Keyframe curves evaluated with a clamped-boundary, segment-scaled Hermite
//! cubic, plus the editing and baking helpers built on top of evaluation.

pub mod baking;
pub mod curve;
pub mod error;
pub mod interp;
pub mod key;
pub mod sampling;
pub mod slopes;

pub use baking::{bake_curve, export_baked_json, BakedCurve, BakingConfig, FrameWindow};
pub use curve::{evaluate_curve, Curve};
pub use error::CurveError;
pub use interp::{Interpolation, KeyInterpolator};
pub use key::Keyframe;
pub use slopes::{apply_segment_slopes, snap_keys_to_frames, SlopeEdit, SlopeRule};
