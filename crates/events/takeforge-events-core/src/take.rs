//! Resolved takes: concrete, replayable event lists.

use serde::{Deserialize, Serialize};

use crate::ids::{AnimKey, GroupInstanceId};

/// One scheduled occurrence of a sub-animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub target: AnimKey,
    /// Seconds on the take's timeline.
    pub start_time: f64,
    /// Seconds; the target animation's length times `duration_scale`.
    pub duration: f64,
    pub duration_scale: f64,
    pub magnitude_scale: f64,
    pub blend_in_time: f64,
    pub blend_out_time: f64,
    pub persist_values: bool,
    pub blend_unscaled: bool,
    pub custom_payload: String,
    pub event_id: String,
    /// Group pass that spawned this event.
    pub group: GroupInstanceId,
    /// 1 for events spawned by the resolved template's own groups.
    pub depth: usize,
}

impl Event {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {:.3}s for {:.3}s (dur x{:.3}, mag x{:.3}, blend {:.3}/{:.3}{})",
            self.target,
            self.start_time,
            self.duration,
            self.duration_scale,
            self.magnitude_scale,
            self.blend_in_time,
            self.blend_out_time,
            if self.persist_values { ", persist" } else { "" }
        )
    }
}

/// The events produced by one resolution, ordered by start time.
///
/// Takes are never patched; a new one is produced on every resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTake {
    /// Animation whose template produced the take, when known.
    pub source: Option<AnimKey>,
    events: Vec<Event>,
}

impl EventTake {
    /// Build a take, sorting by start time. Equal start times keep input order.
    pub fn new(source: Option<AnimKey>, mut events: Vec<Event>) -> Self {
        events.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        Self { source, events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn events_for(&self, target: &AnimKey) -> impl Iterator<Item = &Event> {
        let target = target.clone();
        self.events.iter().filter(move |e| e.target == target)
    }

    pub fn events_in_group(&self, group: GroupInstanceId) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.group == group)
    }

    /// Start of the earliest event and end of the latest, or None when empty.
    pub fn span(&self) -> Option<(f64, f64)> {
        let start = self.events.first()?.start_time;
        let end = self
            .events
            .iter()
            .map(Event::end_time)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((start, end))
    }
}

impl<'a> IntoIterator for &'a EventTake {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl std::fmt::Display for EventTake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} events:", self.events.len())?;
        for (i, e) in self.events.iter().enumerate() {
            writeln!(f, "  [{i}] {e}")?;
        }
        Ok(())
    }
}
