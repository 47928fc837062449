//! Authored animations and the library that stores them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use takeforge_curve::Curve;
use takeforge_events::{
    AnimKey, AnimationEntry, EventTemplate, LibraryError, TemplateGraph, TemplateSource,
};

/// Curves and an optional event template under one `(group, name)` key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub key: AnimKey,
    #[serde(default)]
    pub curves: Vec<Curve>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<EventTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
}

impl Animation {
    pub fn new(key: AnimKey) -> Self {
        Self {
            key,
            curves: Vec::new(),
            template: None,
            frame_rate: None,
        }
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curves.push(curve);
        self
    }

    pub fn with_template(mut self, template: EventTemplate) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_frame_rate(mut self, fps: f64) -> Self {
        self.frame_rate = Some(fps);
        self
    }

    pub fn curve(&self, name: &str) -> Option<&Curve> {
        self.curves.iter().find(|c| c.name() == name)
    }

    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.curves.iter().map(|c| c.name())
    }

    /// Earliest key time and latest key time over all non-empty curves.
    pub fn span(&self) -> Option<(f64, f64)> {
        self.curves
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| (c.start_time(), c.end_time()))
            .reduce(|(s0, e0), (s1, e1)| (s0.min(s1), e0.max(e1)))
    }

    /// Natural length in seconds. Animations play from local time 0, so this
    /// is the latest key time over all curves (0 without keys).
    pub fn duration(&self) -> f64 {
        self.span().map_or(0.0, |(_, end)| end.max(0.0))
    }

    pub fn has_template(&self) -> bool {
        self.template.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// Insertion-ordered animation store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationLibrary {
    animations: IndexMap<AnimKey, Animation>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous animation under the same key.
    pub fn insert(&mut self, animation: Animation) -> Option<Animation> {
        self.animations.insert(animation.key.clone(), animation)
    }

    pub fn with(mut self, animation: Animation) -> Self {
        self.insert(animation);
        self
    }

    pub fn get(&self, key: &AnimKey) -> Option<&Animation> {
        self.animations.get(key)
    }

    pub fn get_mut(&mut self, key: &AnimKey) -> Option<&mut Animation> {
        self.animations.get_mut(key)
    }

    /// Remove keeping the order of the remaining animations.
    pub fn remove(&mut self, key: &AnimKey) -> Option<Animation> {
        self.animations.shift_remove(key)
    }

    pub fn contains_key(&self, key: &AnimKey) -> bool {
        self.animations.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.animations.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &AnimKey> {
        self.animations.keys()
    }

    /// Distinct group names in first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for key in self.animations.keys() {
            if !groups.contains(&key.group.as_str()) {
                groups.push(&key.group);
            }
        }
        groups
    }

    pub fn graph(&self) -> TemplateGraph {
        TemplateGraph::from_entries(
            self.animations
                .iter()
                .map(|(k, a)| (k.clone(), a.template.as_ref())),
        )
    }

    /// Every template valid and the reference graph acyclic.
    pub fn validate(&self) -> Result<(), LibraryError> {
        for (key, animation) in &self.animations {
            if let Some(template) = &animation.template {
                template.validate().map_err(|source| LibraryError::Template {
                    owner: key.clone(),
                    source,
                })?;
            }
        }
        self.graph().check_acyclic()?;
        Ok(())
    }
}

impl TemplateSource for AnimationLibrary {
    fn lookup(&self, key: &AnimKey) -> Option<AnimationEntry<'_>> {
        self.animations.get(key).map(|a| AnimationEntry {
            duration: a.duration(),
            template: a.template.as_ref(),
        })
    }
}

impl FromIterator<Animation> for AnimationLibrary {
    fn from_iter<I: IntoIterator<Item = Animation>>(iter: I) -> Self {
        let mut lib = AnimationLibrary::new();
        for animation in iter {
            lib.insert(animation);
        }
        lib
    }
}
