//! Typed host signals and the bus that delivers them to subscribers.
//!
//! A subscription stays registered until [`SignalBus::unsubscribe`] is called
//! with its id or the bus is dropped. Ids are never reused, so a stale id can
//! not remove a newer subscription.

use serde::{Deserialize, Serialize};

use takeforge_events::AnimKey;

/// Something the host reported that may invalidate takes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "animation", rename_all = "camelCase")]
pub enum HostSignal {
    /// A new actor was loaded; everything derived from the old one is stale.
    ActorLoaded,
    AnimationSelected(AnimKey),
    TemplateEdited(AnimKey),
    RenderAssetReloaded,
    /// Audio analysis rewrote the analysis-owned curves of an animation.
    AnalysisCompleted(AnimKey),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    ActorLoaded,
    AnimationSelected,
    TemplateEdited,
    RenderAssetReloaded,
    AnalysisCompleted,
}

impl HostSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            HostSignal::ActorLoaded => SignalKind::ActorLoaded,
            HostSignal::AnimationSelected(_) => SignalKind::AnimationSelected,
            HostSignal::TemplateEdited(_) => SignalKind::TemplateEdited,
            HostSignal::RenderAssetReloaded => SignalKind::RenderAssetReloaded,
            HostSignal::AnalysisCompleted(_) => SignalKind::AnalysisCompleted,
        }
    }

    /// The animation the signal is about, if any.
    pub fn animation(&self) -> Option<&AnimKey> {
        match self {
            HostSignal::AnimationSelected(k)
            | HostSignal::TemplateEdited(k)
            | HostSignal::AnalysisCompleted(k) => Some(k),
            HostSignal::ActorLoaded | HostSignal::RenderAssetReloaded => None,
        }
    }
}

/// Which signals a subscriber receives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SignalFilter {
    #[default]
    All,
    Kinds(Vec<SignalKind>),
}

impl SignalFilter {
    pub fn only(kind: SignalKind) -> Self {
        SignalFilter::Kinds(vec![kind])
    }

    pub fn matches(&self, signal: &HostSignal) -> bool {
        match self {
            SignalFilter::All => true,
            SignalFilter::Kinds(kinds) => kinds.contains(&signal.kind()),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

type Handler = Box<dyn FnMut(&HostSignal)>;

struct Subscription {
    id: SubscriptionId,
    filter: SignalFilter,
    handler: Handler,
}

/// Observer registry. Handlers run synchronously, in subscription order.
#[derive(Default)]
pub struct SignalBus {
    subs: Vec<Subscription>,
    next_id: u64,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, filter: SignalFilter, handler: F) -> SubscriptionId
    where
        F: FnMut(&HostSignal) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subs.push(Subscription {
            id,
            filter,
            handler: Box::new(handler),
        });
        id
    }

    /// Returns false when the id is unknown or was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subs.len();
        self.subs.retain(|s| s.id != id);
        self.subs.len() != before
    }

    /// Deliver `signal` to every matching subscriber; returns how many ran.
    pub fn emit(&mut self, signal: &HostSignal) -> usize {
        let mut delivered = 0;
        for sub in &mut self.subs {
            if sub.filter.matches(signal) {
                (sub.handler)(signal);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

impl std::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBus")
            .field("subscriptions", &self.subs.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
