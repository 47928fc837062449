//! takeforge-events-core: resolves probabilistic, hierarchical event templates
//! into concrete takes.
//!
//! Templates are read-only input; a take is produced fresh on every
//! resolution. Randomness is always injected so tests can pin a seed.

pub mod config;
pub mod error;
pub mod graph;
pub mod ids;
pub mod range;
pub mod resolve;
pub mod source;
pub mod take;
pub mod template;

pub use config::ResolveConfig;
pub use error::{GraphError, LibraryError, ResolveError, TemplateError};
pub use graph::TemplateGraph;
pub use ids::{AnimKey, GroupInstanceId, IdAllocator};
pub use range::{SpawnBound, ValueRange};
pub use resolve::{
    accepts, pick_candidate, resolve_take, resolve_take_seeded, ParentContext, Resolver,
};
pub use source::{AnimationEntry, TemplateLibrary, TemplateSource};
pub use take::{Event, EventTake};
pub use template::{
    ChildEvent, ChildEventBuilder, ChildEventFlags, ChildEventGroup, EventTemplate,
    SpawnConditions,
};
