//! Take regeneration driven by host signals.

use indexmap::IndexMap;
use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use takeforge_events::{AnimKey, EventTake, Resolver};

use crate::animation::AnimationLibrary;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::signals::HostSignal;

/// Owns a library and the latest take of every animation resolved so far.
///
/// Takes are replaced wholesale. When a regeneration fails the previous take
/// stays in place and the error is returned to the caller.
#[derive(Debug)]
pub struct TakeSession {
    config: SessionConfig,
    library: AnimationLibrary,
    resolver: Resolver,
    rng: SmallRng,
    selected: Option<AnimKey>,
    takes: IndexMap<AnimKey, EventTake>,
}

impl TakeSession {
    /// Validates the library before accepting it.
    pub fn new(library: AnimationLibrary, config: SessionConfig) -> Result<Self, SessionError> {
        library.validate()?;
        Ok(Self {
            resolver: Resolver::new(config.resolve),
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            library,
            selected: None,
            takes: IndexMap::new(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }

    /// Direct access for host edits. Follow edits with the matching signal so
    /// affected takes are regenerated.
    pub fn library_mut(&mut self) -> &mut AnimationLibrary {
        &mut self.library
    }

    /// Swap in a new library. Nothing changes when it fails validation.
    pub fn replace_library(&mut self, library: AnimationLibrary) -> Result<(), SessionError> {
        library.validate()?;
        self.library = library;
        self.selected = None;
        self.takes.clear();
        Ok(())
    }

    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
    }

    pub fn selected(&self) -> Option<&AnimKey> {
        self.selected.as_ref()
    }

    pub fn take(&self, key: &AnimKey) -> Option<&EventTake> {
        self.takes.get(key)
    }

    /// Take of the selected animation.
    pub fn current_take(&self) -> Option<&EventTake> {
        self.selected.as_ref().and_then(|k| self.takes.get(k))
    }

    pub fn takes(&self) -> impl Iterator<Item = (&AnimKey, &EventTake)> {
        self.takes.iter()
    }

    /// React to a host signal. Returns the animations whose takes were
    /// regenerated.
    pub fn handle(&mut self, signal: &HostSignal) -> Result<Vec<AnimKey>, SessionError> {
        match signal {
            HostSignal::ActorLoaded => {
                self.library.validate()?;
                debug!("actor loaded: dropping {} takes", self.takes.len());
                self.takes.clear();
                self.selected = None;
                Ok(Vec::new())
            }
            HostSignal::AnimationSelected(key) => {
                if !self.library.contains_key(key) {
                    return Err(SessionError::UnknownAnimation(key.clone()));
                }
                // A failed regeneration leaves the previous selection in place.
                self.regenerate(key)?;
                self.selected = Some(key.clone());
                Ok(vec![key.clone()])
            }
            HostSignal::TemplateEdited(key) | HostSignal::AnalysisCompleted(key) => {
                if !self.is_tracked(key) {
                    return Ok(Vec::new());
                }
                if !self.library.contains_key(key) {
                    // Deleted by the edit; its take can no longer be replayed.
                    self.takes.shift_remove(key);
                    if self.selected.as_ref() == Some(key) {
                        self.selected = None;
                    }
                    return Ok(Vec::new());
                }
                self.library.validate()?;
                self.regenerate(key)?;
                Ok(vec![key.clone()])
            }
            HostSignal::RenderAssetReloaded => self.regenerate_all(),
        }
    }

    /// Resolve `key` again and replace its take.
    pub fn regenerate(&mut self, key: &AnimKey) -> Result<&EventTake, SessionError> {
        match self
            .resolver
            .resolve_animation(key, &self.library, &mut self.rng)
        {
            Ok(take) => {
                debug!("regenerated take for {key}: {} events", take.len());
                let (index, _) = self.takes.insert_full(key.clone(), take);
                Ok(&self.takes[index])
            }
            Err(err) => {
                warn!("keeping previous take for {key}: {err}");
                Err(err.into())
            }
        }
    }

    /// Regenerate every cached take. Failures keep their previous take; the
    /// first failure is returned after all takes were attempted.
    fn regenerate_all(&mut self) -> Result<Vec<AnimKey>, SessionError> {
        let mut keys: Vec<AnimKey> = self.takes.keys().cloned().collect();
        if let Some(sel) = &self.selected {
            if !keys.contains(sel) {
                keys.push(sel.clone());
            }
        }
        let mut done = Vec::with_capacity(keys.len());
        let mut first_err = None;
        for key in keys {
            match self.regenerate(&key) {
                Ok(_) => done.push(key),
                Err(err) => {
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(done),
        }
    }

    fn is_tracked(&self, key: &AnimKey) -> bool {
        self.takes.contains_key(key) || self.selected.as_ref() == Some(key)
    }
}
