//! Reference graph between animations and the templates that spawn them.
//!
//! An edge `a -> b` means a's template can spawn b. Resolution recurses along
//! these edges, so the graph must be acyclic; stores check it once at load.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::error::GraphError;
use crate::ids::AnimKey;
use crate::template::EventTemplate;

#[derive(Clone, Debug, Default)]
pub struct TemplateGraph {
    /// Owner -> animations its template references (deduplicated).
    refs: HashMap<AnimKey, Vec<AnimKey>>,
}

impl TemplateGraph {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (AnimKey, Option<&'a EventTemplate>)>,
    {
        let mut refs: HashMap<AnimKey, Vec<AnimKey>> = HashMap::new();
        for (key, template) in entries {
            let mut targets: Vec<AnimKey> = Vec::new();
            if let Some(t) = template {
                for target in t.referenced_animations() {
                    if !targets.contains(target) {
                        targets.push(target.clone());
                    }
                }
            }
            refs.insert(key, targets);
        }
        Self { refs }
    }

    pub fn node_count(&self) -> usize {
        self.refs.len()
    }

    pub fn references(&self, key: &AnimKey) -> &[AnimKey] {
        self.refs.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Leaves-first order: every animation comes after everything it spawns.
    /// References to animations outside the graph are ignored here; resolution
    /// reports them.
    pub fn order(&self) -> Result<Vec<AnimKey>, GraphError> {
        let mut indeg: HashMap<&AnimKey, usize> = HashMap::new();
        let mut dependents: HashMap<&AnimKey, Vec<&AnimKey>> = HashMap::new();

        for (owner, targets) in &self.refs {
            indeg.entry(owner).or_insert(0);
            for target in targets {
                if !self.refs.contains_key(target) {
                    continue;
                }
                dependents.entry(target).or_default().push(owner);
                *indeg.entry(owner).or_insert(0) += 1;
            }
        }

        let mut ready: Vec<&AnimKey> = indeg
            .iter()
            .filter(|(_, &d)| d == 0)
            .map(|(k, _)| *k)
            .collect();
        ready.sort();
        let mut queue: VecDeque<&AnimKey> = ready.into();

        let mut order = Vec::with_capacity(indeg.len());
        while let Some(key) = queue.pop_front() {
            order.push(key.clone());
            if let Some(owners) = dependents.get(key) {
                for owner in owners {
                    if let Some(d) = indeg.get_mut(owner) {
                        *d -= 1;
                        if *d == 0 {
                            queue.push_back(owner);
                        }
                    }
                }
            }
        }

        if order.len() != indeg.len() {
            let mut stuck: Vec<AnimKey> = indeg
                .into_iter()
                .filter(|(_, d)| *d > 0)
                .map(|(k, _)| k.clone())
                .collect();
            stuck.sort();
            return Err(GraphError::Cycle(stuck));
        }
        Ok(order)
    }

    pub fn check_acyclic(&self) -> Result<(), GraphError> {
        self.order().map(|_| ())
    }
}
