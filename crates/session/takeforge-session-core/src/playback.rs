//! Take playback: sample the summed contribution of a take's events on one
//! curve channel.

use takeforge_curve::{BakedCurve, BakingConfig};
use takeforge_events::{Event, EventTake};

use crate::animation::AnimationLibrary;

/// Linear blend ramps applied to an event inside its active span.
fn blend_weight(event: &Event, t: f64, span_start: f64, span_end: f64) -> f64 {
    let scale = if event.blend_unscaled {
        1.0
    } else {
        event.duration_scale
    };
    let blend_in = event.blend_in_time * scale;
    let blend_out = event.blend_out_time * scale;

    let mut w: f64 = 1.0;
    if blend_in > 0.0 && t < span_start + blend_in {
        w = w.min((t - span_start) / blend_in);
    }
    // Persisting events hold their value past the end, so they never ramp out.
    if !event.persist_values && blend_out > 0.0 && t > span_end - blend_out {
        w = w.min((span_end - t) / blend_out);
    }
    w.clamp(0.0, 1.0)
}

/// Reads target curves from a library to play takes back.
#[derive(Clone, Copy, Debug)]
pub struct TakeSampler<'a> {
    library: &'a AnimationLibrary,
}

impl<'a> TakeSampler<'a> {
    pub fn new(library: &'a AnimationLibrary) -> Self {
        Self { library }
    }

    /// Contribution of one event to `curve_name` at take time `t`.
    pub fn sample_event(&self, event: &Event, curve_name: &str, t: f64) -> f64 {
        let Some(curve) = self
            .library
            .get(&event.target)
            .and_then(|a| a.curve(curve_name))
        else {
            return 0.0;
        };
        let ds = event.duration_scale;
        if curve.is_empty() || ds.is_nan() || ds <= 0.0 {
            return 0.0;
        }
        let span_start = event.start_time + curve.start_time() * ds;
        let span_end = event.start_time + curve.end_time() * ds;
        if t < span_start {
            return 0.0;
        }
        if t > span_end {
            return if event.persist_values {
                curve.evaluate_at(curve.end_time()) * event.magnitude_scale
            } else {
                0.0
            };
        }
        let local = (t - event.start_time) / ds;
        curve.evaluate_at(local) * event.magnitude_scale * blend_weight(event, t, span_start, span_end)
    }

    /// Sum of every event's contribution to `curve_name` at `t`.
    pub fn sample(&self, take: &EventTake, curve_name: &str, t: f64) -> f64 {
        take.iter()
            .map(|e| self.sample_event(e, curve_name, t))
            .sum()
    }

    /// Names of every curve the take can drive, in first-seen order.
    pub fn curve_names(&self, take: &EventTake) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for event in take {
            if let Some(anim) = self.library.get(&event.target) {
                for name in anim.curve_names() {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
            }
        }
        names
    }

    /// Bake the named channels over the take's span (or the config window).
    pub fn bake(
        &self,
        take: &EventTake,
        curve_names: &[&str],
        cfg: &BakingConfig,
    ) -> Vec<BakedCurve> {
        let (span_start, span_end) = take.span().unwrap_or((0.0, 0.0));
        let window = cfg.window(span_start, span_end);
        curve_names
            .iter()
            .map(|name| BakedCurve {
                name: (*name).to_string(),
                frame_rate: window.frame_rate,
                start_time: window.start_time,
                end_time: window.end_time,
                values: (0..window.frame_count)
                    .map(|f| self.sample(take, name, window.time_at(f)))
                    .collect(),
            })
            .collect()
    }
}

pub fn bake_take(
    library: &AnimationLibrary,
    take: &EventTake,
    curve_names: &[&str],
    cfg: &BakingConfig,
) -> Vec<BakedCurve> {
    TakeSampler::new(library).bake(take, curve_names, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use takeforge_events::{AnimKey, GroupInstanceId};

    fn event(blend_in: f64, blend_out: f64) -> Event {
        Event {
            target: AnimKey::new("lib", "a"),
            start_time: 1.0,
            duration: 2.0,
            duration_scale: 2.0,
            magnitude_scale: 1.0,
            blend_in_time: blend_in,
            blend_out_time: blend_out,
            persist_values: false,
            blend_unscaled: false,
            custom_payload: String::new(),
            event_id: "e".into(),
            group: GroupInstanceId(0),
            depth: 1,
        }
    }

    #[test]
    fn blend_times_scale_with_duration() {
        let e = event(0.25, 0.25);
        // Ramps last 0.5s once scaled by 2.
        assert!((blend_weight(&e, 1.25, 1.0, 3.0) - 0.5).abs() < 1e-12);
        assert!((blend_weight(&e, 2.0, 1.0, 3.0) - 1.0).abs() < 1e-12);
        assert!((blend_weight(&e, 2.75, 1.0, 3.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unscaled_blend_uses_seconds() {
        let e = Event {
            blend_unscaled: true,
            ..event(0.25, 0.0)
        };
        assert!((blend_weight(&e, 1.125, 1.0, 3.0) - 0.5).abs() < 1e-12);
        assert_eq!(blend_weight(&e, 1.25, 1.0, 3.0), 1.0);
    }
}
