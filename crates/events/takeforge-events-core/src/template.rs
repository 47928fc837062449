//! Event template data model.
//!
//! A template is a list of child event groups. Each group holds weighted
//! candidates; resolution picks at most one candidate per group. Templates are
//! authored once and only read afterwards, so everything here is built through
//! constructors and builders rather than mutated in place.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::ids::AnimKey;
use crate::range::{SpawnBound, ValueRange};

fn default_weight() -> f64 {
    1.0
}

fn default_scale_range() -> ValueRange {
    ValueRange::ONE
}

fn default_revision() -> i64 {
    -1
}

fn new_event_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Inheritance and playback flags on a child event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChildEventFlags {
    /// Multiply the drawn duration scale by the parent's duration scale.
    pub duration_scaled_by_parent: bool,
    /// Multiply the drawn magnitude scale by the parent's magnitude scale.
    pub magnitude_scaled_by_parent: bool,
    /// Blend times are absolute seconds, not scaled with the event duration.
    pub blend_unscaled: bool,
    /// Copy blend times from the parent instead of drawing them.
    pub use_parent_blend_times: bool,
    /// Values stick on the character past the event's egress.
    pub persist_values: bool,
}

impl Default for ChildEventFlags {
    fn default() -> Self {
        Self {
            duration_scaled_by_parent: true,
            magnitude_scaled_by_parent: true,
            blend_unscaled: false,
            use_parent_blend_times: false,
            persist_values: false,
        }
    }
}

/// Predicates on the parent's realized values that gate a candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnConditions {
    /// Bernoulli gate applied after the weighted pick. `None` means always.
    pub probability: Option<f64>,
    pub duration_scale: SpawnBound,
    pub magnitude_scale: SpawnBound,
    pub start_time_offset: SpawnBound,
}

impl SpawnConditions {
    pub fn probability(&self) -> f64 {
        self.probability.unwrap_or(1.0)
    }
}

/// One candidate in a child event group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildEvent {
    pub target: AnimKey,
    #[serde(default)]
    pub start_time: ValueRange,
    #[serde(default = "default_scale_range")]
    pub magnitude: ValueRange,
    #[serde(default = "default_scale_range")]
    pub duration: ValueRange,
    #[serde(default)]
    pub blend_in: ValueRange,
    #[serde(default)]
    pub blend_out: ValueRange,
    #[serde(default)]
    pub custom_payload: String,
    #[serde(default = "new_event_id")]
    pub event_id: String,
    #[serde(default)]
    pub flags: ChildEventFlags,
    #[serde(default)]
    pub conditions: SpawnConditions,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl ChildEvent {
    pub fn builder(target: AnimKey) -> ChildEventBuilder {
        ChildEventBuilder::new(target)
    }

    /// Builder seeded with this event's values and a fresh event id, for
    /// authoring variations of an existing event.
    pub fn rebuild(&self) -> ChildEventBuilder {
        ChildEventBuilder {
            event: ChildEvent {
                event_id: new_event_id(),
                ..self.clone()
            },
        }
    }

    fn validate(&self, group: usize) -> Result<(), TemplateError> {
        if self.target.group.is_empty() || self.target.name.is_empty() {
            return Err(TemplateError::EmptyTarget {
                group,
                event: self.event_id.clone(),
            });
        }
        let ranges = [
            ("startTime", self.start_time, false),
            ("magnitude", self.magnitude, false),
            ("duration", self.duration, true),
            ("blendIn", self.blend_in, true),
            ("blendOut", self.blend_out, true),
        ];
        for (field, range, non_negative) in ranges {
            if !range.is_finite() {
                return Err(TemplateError::NonFiniteRange {
                    group,
                    event: self.event_id.clone(),
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
            if !range.is_ordered() {
                return Err(TemplateError::InvertedRange {
                    group,
                    event: self.event_id.clone(),
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
            if non_negative && range.min < 0.0 {
                return Err(TemplateError::NegativeRange {
                    group,
                    event: self.event_id.clone(),
                    field,
                    min: range.min,
                });
            }
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(TemplateError::InvalidWeight {
                group,
                event: self.event_id.clone(),
                weight: self.weight,
            });
        }
        if let Some(p) = self.conditions.probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(TemplateError::InvalidProbability {
                    group,
                    event: self.event_id.clone(),
                    probability: p,
                });
            }
        }
        let bounds = [
            ("durationScale", self.conditions.duration_scale),
            ("magnitudeScale", self.conditions.magnitude_scale),
            ("startTimeOffset", self.conditions.start_time_offset),
        ];
        for (field, bound) in bounds {
            if let (Some(lo), Some(hi)) = (bound.min, bound.max) {
                if lo > hi {
                    return Err(TemplateError::InvertedSpawnBound {
                        group,
                        event: self.event_id.clone(),
                        field,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Fluent construction of a [`ChildEvent`].
///
/// Defaults: start 0, duration and magnitude scale 1 (inherited from the
/// parent), no blending, probability 1, weight 1.
#[derive(Clone, Debug)]
pub struct ChildEventBuilder {
    event: ChildEvent,
}

impl ChildEventBuilder {
    pub fn new(target: AnimKey) -> Self {
        Self {
            event: ChildEvent {
                target,
                start_time: ValueRange::ZERO,
                magnitude: ValueRange::ONE,
                duration: ValueRange::ONE,
                blend_in: ValueRange::ZERO,
                blend_out: ValueRange::ZERO,
                custom_payload: String::new(),
                event_id: new_event_id(),
                flags: ChildEventFlags::default(),
                conditions: SpawnConditions::default(),
                weight: default_weight(),
            },
        }
    }

    pub fn target(mut self, target: AnimKey) -> Self {
        self.event.target = target;
        self
    }

    pub fn start(mut self, start: impl Into<ValueRange>) -> Self {
        self.event.start_time = start.into();
        self
    }

    pub fn start_at(self, time: f64) -> Self {
        self.start(ValueRange::fixed(time))
    }

    pub fn duration(mut self, duration: impl Into<ValueRange>) -> Self {
        self.event.duration = duration.into();
        self
    }

    pub fn magnitude(mut self, magnitude: impl Into<ValueRange>) -> Self {
        self.event.magnitude = magnitude.into();
        self
    }

    pub fn blend_in(mut self, blend: impl Into<ValueRange>) -> Self {
        self.event.blend_in = blend.into();
        self
    }

    pub fn blend_out(mut self, blend: impl Into<ValueRange>) -> Self {
        self.event.blend_out = blend.into();
        self
    }

    /// Same fixed blend time on both sides.
    pub fn blend(self, seconds: f64) -> Self {
        self.blend_in(ValueRange::fixed(seconds))
            .blend_out(ValueRange::fixed(seconds))
    }

    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.event.custom_payload = payload.into();
        self
    }

    pub fn event_id(mut self, id: impl Into<String>) -> Self {
        self.event.event_id = id.into();
        self
    }

    pub fn inherit_duration(mut self, yes: bool) -> Self {
        self.event.flags.duration_scaled_by_parent = yes;
        self
    }

    pub fn inherit_magnitude(mut self, yes: bool) -> Self {
        self.event.flags.magnitude_scaled_by_parent = yes;
        self
    }

    pub fn blend_unscaled(mut self, yes: bool) -> Self {
        self.event.flags.blend_unscaled = yes;
        self
    }

    pub fn use_parent_blend_times(mut self, yes: bool) -> Self {
        self.event.flags.use_parent_blend_times = yes;
        self
    }

    pub fn persist(mut self, yes: bool) -> Self {
        self.event.flags.persist_values = yes;
        self
    }

    pub fn probability(mut self, p: f64) -> Self {
        self.event.conditions.probability = Some(p);
        self
    }

    pub fn when_duration_scale(mut self, bound: SpawnBound) -> Self {
        self.event.conditions.duration_scale = bound;
        self
    }

    pub fn when_magnitude_scale(mut self, bound: SpawnBound) -> Self {
        self.event.conditions.magnitude_scale = bound;
        self
    }

    pub fn when_start_offset(mut self, bound: SpawnBound) -> Self {
        self.event.conditions.start_time_offset = bound;
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.event.weight = weight;
        self
    }

    pub fn build(self) -> ChildEvent {
        self.event
    }
}

/// Mutually exclusive candidates; at most one spawns per pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildEventGroup {
    pub events: Vec<ChildEvent>,
}

impl ChildEventGroup {
    pub fn new(events: Vec<ChildEvent>) -> Self {
        Self { events }
    }

    pub fn single(event: ChildEvent) -> Self {
        Self::new(vec![event])
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChildEvent> {
        self.events.iter()
    }
}

impl FromIterator<ChildEvent> for ChildEventGroup {
    fn from_iter<I: IntoIterator<Item = ChildEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Declarative description of the sub-events an animation may spawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTemplate {
    /// Authoring revision; -1 for a template that was never saved.
    #[serde(default = "default_revision")]
    pub revision: i64,
    #[serde(default)]
    pub groups: Vec<ChildEventGroup>,
}

impl Default for EventTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl EventTemplate {
    pub fn new() -> Self {
        Self {
            revision: default_revision(),
            groups: Vec::new(),
        }
    }

    pub fn with_revision(mut self, revision: i64) -> Self {
        self.revision = revision;
        self
    }

    pub fn with_group(mut self, group: ChildEventGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Add an event as its own single-candidate group.
    pub fn with_event(self, event: ChildEvent) -> Self {
        self.with_group(ChildEventGroup::single(event))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn child_events(&self) -> impl Iterator<Item = &ChildEvent> {
        self.groups.iter().flat_map(|g| g.events.iter())
    }

    /// Every animation this template can spawn, in authoring order.
    pub fn referenced_animations(&self) -> impl Iterator<Item = &AnimKey> {
        self.child_events().map(|e| &e.target)
    }

    pub fn event_ids(&self) -> Vec<&str> {
        self.child_events().map(|e| e.event_id.as_str()).collect()
    }

    /// Event ids that occur more than once, in first-repeat order.
    pub fn duplicate_event_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut dupes: Vec<&str> = Vec::new();
        for id in self.event_ids() {
            if !seen.insert(id) && !dupes.contains(&id) {
                dupes.push(id);
            }
        }
        dupes
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        for (index, group) in self.groups.iter().enumerate() {
            for event in &group.events {
                event.validate(index)?;
            }
        }
        if let Some(id) = self.duplicate_event_ids().first() {
            return Err(TemplateError::DuplicateEventId((*id).to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blink() -> AnimKey {
        AnimKey::new("_HeadGestureLib", "_Blink")
    }

    #[test]
    fn builder_defaults_match_authoring_defaults() {
        let e = ChildEvent::builder(blink()).build();
        assert_eq!(e.duration, ValueRange::ONE);
        assert_eq!(e.magnitude, ValueRange::ONE);
        assert!(e.flags.duration_scaled_by_parent);
        assert!(e.flags.magnitude_scaled_by_parent);
        assert!(!e.flags.persist_values);
        assert_eq!(e.conditions.probability(), 1.0);
        assert_eq!(e.weight, 1.0);
        assert!(!e.event_id.is_empty());
    }

    #[test]
    fn rebuild_keeps_values_with_fresh_id() {
        let brow = ChildEvent::builder(AnimKey::new("lib", "_Eyebrow Raise"))
            .magnitude((0.3, 0.6))
            .probability(0.7)
            .weight(2.0)
            .build();
        let squint = brow
            .rebuild()
            .target(AnimKey::new("lib", "_Squint"))
            .magnitude((0.3, 0.5))
            .probability(0.5)
            .weight(1.0)
            .build();
        assert_ne!(brow.event_id, squint.event_id);
        assert_eq!(squint.duration, brow.duration);
        assert_eq!(brow.weight, 2.0);
        assert_eq!(squint.magnitude, ValueRange::new(0.3, 0.5));
    }

    #[test]
    fn validation_catches_bad_ranges() {
        let inverted = EventTemplate::new()
            .with_event(ChildEvent::builder(blink()).duration((2.0, 1.0)).build());
        assert!(matches!(
            inverted.validate(),
            Err(TemplateError::InvertedRange { field: "duration", .. })
        ));

        let negative = EventTemplate::new()
            .with_event(ChildEvent::builder(blink()).duration((-1.0, 1.0)).build());
        assert!(matches!(
            negative.validate(),
            Err(TemplateError::NegativeRange { field: "duration", .. })
        ));

        // Negative start offsets and magnitudes are legitimate.
        let ok = EventTemplate::new().with_event(
            ChildEvent::builder(blink())
                .start((-0.3, 0.3))
                .magnitude((-2.5, 2.5))
                .build(),
        );
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn validation_catches_probability_weight_and_bounds() {
        let p = EventTemplate::new()
            .with_event(ChildEvent::builder(blink()).probability(1.5).build());
        assert!(matches!(
            p.validate(),
            Err(TemplateError::InvalidProbability { .. })
        ));
        let w = EventTemplate::new().with_event(ChildEvent::builder(blink()).weight(-1.0).build());
        assert!(matches!(w.validate(), Err(TemplateError::InvalidWeight { .. })));
        let b = EventTemplate::new().with_event(
            ChildEvent::builder(blink())
                .when_magnitude_scale(SpawnBound::between(2.0, 1.0))
                .build(),
        );
        assert!(matches!(
            b.validate(),
            Err(TemplateError::InvertedSpawnBound {
                field: "magnitudeScale",
                ..
            })
        ));
        let t = EventTemplate::new()
            .with_event(ChildEvent::builder(AnimKey::new("", "x")).build());
        assert!(matches!(t.validate(), Err(TemplateError::EmptyTarget { .. })));
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let e = ChildEvent::builder(blink()).event_id("dup").build();
        let t = EventTemplate::new()
            .with_event(e.clone())
            .with_group(ChildEventGroup::new(vec![e.clone(), e]));
        assert_eq!(t.duplicate_event_ids(), vec!["dup"]);
        assert_eq!(
            t.validate(),
            Err(TemplateError::DuplicateEventId("dup".into()))
        );
    }

    #[test]
    fn template_json_uses_defaults() {
        let json = r#"{
            "revision": 3,
            "groups": [[{ "target": { "group": "lib", "name": "_Blink" }, "eventId": "b1", "duration": [1, 1] }]]
        }"#;
        let t: EventTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(t.revision, 3);
        let e = &t.groups[0].events[0];
        assert_eq!(e.event_id, "b1");
        assert_eq!(e.magnitude, ValueRange::ONE);
        assert!(e.flags.duration_scaled_by_parent);
        assert_eq!(e.weight, 1.0);
        assert!(t.validate().is_ok());
    }
}
