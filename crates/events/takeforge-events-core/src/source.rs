//! Storage seam: how resolution looks up the animations a template spawns.

use hashbrown::HashMap;

use crate::error::LibraryError;
use crate::graph::TemplateGraph;
use crate::ids::AnimKey;
use crate::template::EventTemplate;

/// What resolution needs to know about a referenced animation.
#[derive(Clone, Copy, Debug)]
pub struct AnimationEntry<'a> {
    /// Natural length of the animation in seconds.
    pub duration: f64,
    /// Nested template, or None for a leaf animation.
    pub template: Option<&'a EventTemplate>,
}

/// Animation/template storage keyed by `(group, name)`.
pub trait TemplateSource {
    fn lookup(&self, key: &AnimKey) -> Option<AnimationEntry<'_>>;

    fn contains(&self, key: &AnimKey) -> bool {
        self.lookup(key).is_some()
    }

    /// True when the animation exists and carries a non-empty template.
    fn has_template(&self, key: &AnimKey) -> bool {
        self.lookup(key)
            .and_then(|e| e.template)
            .is_some_and(|t| !t.is_empty())
    }
}

impl<T: TemplateSource + ?Sized> TemplateSource for &T {
    fn lookup(&self, key: &AnimKey) -> Option<AnimationEntry<'_>> {
        (**self).lookup(key)
    }
}

#[derive(Clone, Debug)]
struct LibraryItem {
    duration: f64,
    template: Option<EventTemplate>,
}

/// In-memory [`TemplateSource`] for hosts that only need durations and
/// templates.
#[derive(Clone, Debug, Default)]
pub struct TemplateLibrary {
    items: HashMap<AnimKey, LibraryItem>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf animation.
    pub fn insert_leaf(&mut self, key: AnimKey, duration: f64) {
        self.items.insert(
            key,
            LibraryItem {
                duration,
                template: None,
            },
        );
    }

    pub fn insert_template(&mut self, key: AnimKey, duration: f64, template: EventTemplate) {
        self.items.insert(
            key,
            LibraryItem {
                duration,
                template: Some(template),
            },
        );
    }

    pub fn with_leaf(mut self, key: AnimKey, duration: f64) -> Self {
        self.insert_leaf(key, duration);
        self
    }

    pub fn with_template(mut self, key: AnimKey, duration: f64, template: EventTemplate) -> Self {
        self.insert_template(key, duration, template);
        self
    }

    pub fn remove(&mut self, key: &AnimKey) -> bool {
        self.items.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn template(&self, key: &AnimKey) -> Option<&EventTemplate> {
        self.items.get(key).and_then(|i| i.template.as_ref())
    }

    pub fn graph(&self) -> TemplateGraph {
        TemplateGraph::from_entries(
            self.items
                .iter()
                .map(|(k, item)| (k.clone(), item.template.as_ref())),
        )
    }

    /// Validate every template and check that references are acyclic.
    pub fn validate(&self) -> Result<(), LibraryError> {
        for (key, item) in &self.items {
            if let Some(t) = &item.template {
                t.validate().map_err(|source| LibraryError::Template {
                    owner: key.clone(),
                    source,
                })?;
            }
        }
        self.graph().check_acyclic()?;
        Ok(())
    }
}

impl TemplateSource for TemplateLibrary {
    fn lookup(&self, key: &AnimKey) -> Option<AnimationEntry<'_>> {
        self.items.get(key).map(|item| AnimationEntry {
            duration: item.duration,
            template: item.template.as_ref(),
        })
    }
}
