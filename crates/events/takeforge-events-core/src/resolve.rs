//! Template resolution: turns an [`EventTemplate`] into a concrete [`EventTake`].
//!
//! Each group is picked independently against its parent context: candidates
//! are filtered by spawn conditions, one is drawn by weight, then the pick is
//! gated by its probability. A spawned event whose target carries a template
//! becomes the parent context for that template's groups.

use hashbrown::HashSet;
use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::ResolveConfig;
use crate::error::ResolveError;
use crate::ids::{AnimKey, IdAllocator};
use crate::source::TemplateSource;
use crate::take::{Event, EventTake};
use crate::template::{ChildEvent, ChildEventGroup, EventTemplate};

const ROOT_LABEL: &str = "<root>";

/// Realized values of the event whose template is being resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParentContext {
    pub start_time: f64,
    /// The parent's own drawn offset relative to its parent.
    pub start_offset: f64,
    pub duration_scale: f64,
    pub magnitude_scale: f64,
    pub blend_in_time: f64,
    pub blend_out_time: f64,
}

impl ParentContext {
    pub fn root(start_time: f64) -> Self {
        Self {
            start_time,
            start_offset: 0.0,
            duration_scale: 1.0,
            magnitude_scale: 1.0,
            blend_in_time: 0.0,
            blend_out_time: 0.0,
        }
    }

    fn of(event: &Event, start_offset: f64) -> Self {
        Self {
            start_time: event.start_time,
            start_offset,
            duration_scale: event.duration_scale,
            magnitude_scale: event.magnitude_scale,
            blend_in_time: event.blend_in_time,
            blend_out_time: event.blend_out_time,
        }
    }
}

impl Default for ParentContext {
    fn default() -> Self {
        Self::root(0.0)
    }
}

/// Whether `event`'s spawn conditions accept `parent`.
pub fn accepts(event: &ChildEvent, parent: &ParentContext) -> bool {
    let c = &event.conditions;
    c.duration_scale.contains(parent.duration_scale)
        && c.magnitude_scale.contains(parent.magnitude_scale)
        && c.start_time_offset.contains(parent.start_offset)
}

/// Weighted pick followed by the probability gate. Returns the candidate
/// that spawns, if any.
///
/// Zero-weight candidates never win; a group whose surviving weights sum to
/// zero spawns nothing.
pub fn pick_candidate<'g, R: Rng + ?Sized>(
    group: &'g ChildEventGroup,
    parent: &ParentContext,
    rng: &mut R,
) -> Option<&'g ChildEvent> {
    let survivors: Vec<&ChildEvent> = group
        .iter()
        .filter(|e| e.weight > 0.0 && accepts(e, parent))
        .collect();

    let chosen = match survivors.as_slice() {
        [] => return None,
        [only] => *only,
        many => {
            let total: f64 = many.iter().map(|e| e.weight).sum();
            if total <= 0.0 {
                return None;
            }
            let mut r = rng.random::<f64>() * total;
            let mut chosen = many[many.len() - 1];
            for &candidate in many {
                if r < candidate.weight {
                    chosen = candidate;
                    break;
                }
                r -= candidate.weight;
            }
            chosen
        }
    };

    let p = chosen.conditions.probability();
    if p <= 0.0 {
        return None;
    }
    if p < 1.0 && rng.random::<f64>() >= p {
        return None;
    }
    Some(chosen)
}

/// Resolves templates against a [`TemplateSource`]. Holds only configuration;
/// every call owns its own working state.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    config: ResolveConfig,
}

impl Resolver {
    pub fn new(config: ResolveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    /// Resolve a free-standing template.
    pub fn resolve<S, R>(
        &self,
        template: &EventTemplate,
        source: &S,
        rng: &mut R,
    ) -> Result<EventTake, ResolveError>
    where
        S: TemplateSource + ?Sized,
        R: Rng + ?Sized,
    {
        self.run(None, template, source, rng)
    }

    /// Resolve the template carried by the animation `key`. A leaf animation
    /// yields an empty take.
    pub fn resolve_animation<S, R>(
        &self,
        key: &AnimKey,
        source: &S,
        rng: &mut R,
    ) -> Result<EventTake, ResolveError>
    where
        S: TemplateSource + ?Sized,
        R: Rng + ?Sized,
    {
        let entry = source
            .lookup(key)
            .ok_or_else(|| ResolveError::MissingAnimation {
                parent: ROOT_LABEL.to_string(),
                event: String::new(),
                target: key.clone(),
            })?;
        match entry.template {
            Some(template) => self.run(Some(key), template, source, rng),
            None => Ok(EventTake::new(Some(key.clone()), Vec::new())),
        }
    }

    fn run<S, R>(
        &self,
        owner: Option<&AnimKey>,
        template: &EventTemplate,
        source: &S,
        rng: &mut R,
    ) -> Result<EventTake, ResolveError>
    where
        S: TemplateSource + ?Sized,
        R: Rng + ?Sized,
    {
        let owner_label = owner.map_or_else(|| ROOT_LABEL.to_string(), |k| k.to_string());
        template
            .validate()
            .map_err(|source| ResolveError::InvalidTemplate {
                owner: owner_label.clone(),
                source,
            })?;

        let mut pass = Pass {
            config: &self.config,
            source,
            rng,
            ids: IdAllocator::new(),
            path: owner.into_iter().cloned().collect(),
            validated: HashSet::new(),
            events: Vec::new(),
        };
        let root = ParentContext::root(self.config.root_start_time);
        pass.expand(template, &owner_label, &root, 1)?;

        debug!(
            "resolved {}: {} events from {} group passes",
            owner_label,
            pass.events.len(),
            pass.ids.allocated()
        );
        Ok(EventTake::new(owner.cloned(), pass.events))
    }
}

/// Working state of one resolution.
struct Pass<'a, S: ?Sized, R: ?Sized> {
    config: &'a ResolveConfig,
    source: &'a S,
    rng: &'a mut R,
    ids: IdAllocator,
    /// Animations whose templates are currently being expanded.
    path: Vec<AnimKey>,
    validated: HashSet<AnimKey>,
    events: Vec<Event>,
}

impl<S, R> Pass<'_, S, R>
where
    S: TemplateSource + ?Sized,
    R: Rng + ?Sized,
{
    fn expand(
        &mut self,
        template: &EventTemplate,
        owner: &str,
        parent: &ParentContext,
        depth: usize,
    ) -> Result<(), ResolveError> {
        for group in &template.groups {
            self.spawn_group(group, owner, parent, depth)?;
        }
        Ok(())
    }

    fn spawn_group(
        &mut self,
        group: &ChildEventGroup,
        owner: &str,
        parent: &ParentContext,
        depth: usize,
    ) -> Result<(), ResolveError> {
        let group_id = self.ids.alloc_group();
        let Some(child) = pick_candidate(group, parent, self.rng) else {
            trace!("{owner}: group {} spawned nothing", group_id.0);
            return Ok(());
        };

        let source = self.source;
        let entry = source
            .lookup(&child.target)
            .ok_or_else(|| ResolveError::MissingAnimation {
                parent: owner.to_string(),
                event: child.event_id.clone(),
                target: child.target.clone(),
            })?;
        if !entry.duration.is_finite() || entry.duration < 0.0 {
            return Err(ResolveError::InvalidDuration {
                target: child.target.clone(),
                duration: entry.duration,
            });
        }

        let start_offset = child.start_time.sample(self.rng);
        let mut duration_scale = child.duration.sample(self.rng);
        if child.flags.duration_scaled_by_parent {
            duration_scale *= parent.duration_scale;
        }
        let mut magnitude_scale = child.magnitude.sample(self.rng);
        if child.flags.magnitude_scaled_by_parent {
            magnitude_scale *= parent.magnitude_scale;
        }
        let (blend_in_time, blend_out_time) = if child.flags.use_parent_blend_times {
            (parent.blend_in_time, parent.blend_out_time)
        } else {
            (
                child.blend_in.sample(self.rng),
                child.blend_out.sample(self.rng),
            )
        };

        let event = Event {
            target: child.target.clone(),
            start_time: parent.start_time + start_offset,
            duration: entry.duration * duration_scale,
            duration_scale,
            magnitude_scale,
            blend_in_time,
            blend_out_time,
            persist_values: child.flags.persist_values,
            blend_unscaled: child.flags.blend_unscaled,
            custom_payload: child.custom_payload.clone(),
            event_id: child.event_id.clone(),
            group: group_id,
            depth,
        };
        trace!("{owner}: group {} spawned {event}", group_id.0);

        let context = ParentContext::of(&event, start_offset);
        self.events.push(event);

        let Some(nested) = entry.template.filter(|t| !t.is_empty()) else {
            return Ok(());
        };
        let target = &child.target;
        if self.path.contains(target) {
            let path = self
                .path
                .iter()
                .chain(std::iter::once(target))
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ResolveError::Cycle {
                target: target.clone(),
                path,
            });
        }
        if depth >= self.config.max_depth {
            return Err(ResolveError::DepthExceeded {
                target: target.clone(),
                max_depth: self.config.max_depth,
            });
        }
        if !self.validated.contains(target) {
            nested
                .validate()
                .map_err(|source| ResolveError::InvalidTemplate {
                    owner: target.to_string(),
                    source,
                })?;
            self.validated.insert(target.clone());
        }

        self.path.push(target.clone());
        let label = target.to_string();
        let result = self.expand(nested, &label, &context, depth + 1);
        self.path.pop();
        result
    }
}

/// Resolve `template` with the default [`Resolver`].
pub fn resolve_take<S, R>(
    template: &EventTemplate,
    source: &S,
    rng: &mut R,
) -> Result<EventTake, ResolveError>
where
    S: TemplateSource + ?Sized,
    R: Rng + ?Sized,
{
    Resolver::default().resolve(template, source, rng)
}

/// Resolve with a [`SmallRng`] seeded from `seed`. Equal seeds give equal takes.
pub fn resolve_take_seeded<S>(
    template: &EventTemplate,
    source: &S,
    seed: u64,
) -> Result<EventTake, ResolveError>
where
    S: TemplateSource + ?Sized,
{
    let mut rng = SmallRng::seed_from_u64(seed);
    resolve_take(template, source, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::SpawnBound;

    fn key(name: &str) -> AnimKey {
        AnimKey::new("lib", name)
    }

    #[test]
    fn root_context_is_neutral() {
        let root = ParentContext::root(0.0);
        assert_eq!(root.duration_scale, 1.0);
        assert_eq!(root.magnitude_scale, 1.0);
        assert_eq!(root.start_offset, 0.0);
        assert_eq!(root, ParentContext::default());
    }

    #[test]
    fn bounds_are_inclusive() {
        let e = ChildEvent::builder(key("a"))
            .when_duration_scale(SpawnBound::between(1.0, 2.0))
            .build();
        let mut parent = ParentContext::root(0.0);
        assert!(accepts(&e, &parent));
        parent.duration_scale = 2.0;
        assert!(accepts(&e, &parent));
        parent.duration_scale = 2.0001;
        assert!(!accepts(&e, &parent));
    }

    #[test]
    fn all_zero_weights_spawn_nothing() {
        let group: ChildEventGroup = [
            ChildEvent::builder(key("a")).weight(0.0).build(),
            ChildEvent::builder(key("b")).weight(0.0).build(),
        ]
        .into_iter()
        .collect();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(pick_candidate(&group, &ParentContext::root(0.0), &mut rng).is_none());
        }
    }

    #[test]
    fn filtered_out_candidates_never_win() {
        let group: ChildEventGroup = [
            ChildEvent::builder(key("small"))
                .when_magnitude_scale(SpawnBound::at_most(0.5))
                .build(),
            ChildEvent::builder(key("large"))
                .when_magnitude_scale(SpawnBound::at_least(0.5))
                .build(),
        ]
        .into_iter()
        .collect();
        let mut rng = SmallRng::seed_from_u64(11);
        let parent = ParentContext::root(0.0);
        for _ in 0..200 {
            let picked = pick_candidate(&group, &parent, &mut rng).unwrap();
            assert_eq!(picked.target, key("large"));
        }
    }
}
