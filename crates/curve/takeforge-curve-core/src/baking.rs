//! Baking API: sample a curve at a fixed frame rate over a time window.

use serde::{Deserialize, Serialize};

use crate::curve::Curve;

pub const DEFAULT_FRAME_RATE: f64 = 60.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakingConfig {
    /// Target frame rate (Hz) for baked samples.
    pub frame_rate: f64,
    /// Start time (seconds); if None, uses the start of the sampled span.
    pub start_time: Option<f64>,
    /// End time (seconds); if None, uses the end of the sampled span.
    pub end_time: Option<f64>,
}

impl Default for BakingConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            start_time: None,
            end_time: None,
        }
    }
}

/// Frame times produced by a baking config over a default span.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameWindow {
    pub frame_rate: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub frame_count: usize,
}

impl FrameWindow {
    pub fn time_at(&self, frame: usize) -> f64 {
        self.start_time + frame as f64 / self.frame_rate
    }
}

impl BakingConfig {
    /// Resolve the effective window. Invalid frame rates fall back to the
    /// default; requested start and end times are clamped into the sampled
    /// span, and the end is always included as the final frame.
    pub fn window(&self, span_start: f64, span_end: f64) -> FrameWindow {
        let frame_rate = if self.frame_rate.is_finite() && self.frame_rate > 0.0 {
            self.frame_rate
        } else {
            DEFAULT_FRAME_RATE
        };
        let span_end = span_end.max(span_start);
        let start_time = self
            .start_time
            .filter(|t| t.is_finite())
            .unwrap_or(span_start)
            .clamp(span_start, span_end);
        let end_time = self
            .end_time
            .filter(|t| t.is_finite())
            .unwrap_or(span_end)
            .clamp(start_time, span_end);
        let frames = ((end_time - start_time) * frame_rate).ceil() as usize;
        let frame_count = frames.saturating_add(1); // inclusive of end
        FrameWindow {
            frame_rate,
            start_time,
            end_time,
            frame_count,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BakedCurve {
    pub name: String,
    pub frame_rate: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub values: Vec<f64>,
}

/// Bake a curve over the config window (defaults to the curve's key span).
pub fn bake_curve(curve: &Curve, cfg: &BakingConfig) -> BakedCurve {
    let window = cfg.window(curve.start_time(), curve.end_time());
    let values = (0..window.frame_count)
        .map(|f| curve.evaluate_at(window.time_at(f)))
        .collect();
    BakedCurve {
        name: curve.name().to_string(),
        frame_rate: window.frame_rate,
        start_time: window.start_time,
        end_time: window.end_time,
        values,
    }
}

/// Export baked data as serde_json::Value (stable schema for serialization).
pub fn export_baked_json(baked: &BakedCurve) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}
