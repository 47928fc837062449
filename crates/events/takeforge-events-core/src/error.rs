use thiserror::Error;

use crate::ids::AnimKey;

/// A template rule that was broken. `event` is the offending child event's id.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("group {group}, event '{event}': {field} range ({min}, {max}) is not finite")]
    NonFiniteRange {
        group: usize,
        event: String,
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("group {group}, event '{event}': {field} range has min {min} > max {max}")]
    InvertedRange {
        group: usize,
        event: String,
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("group {group}, event '{event}': {field} range must not be negative (min {min})")]
    NegativeRange {
        group: usize,
        event: String,
        field: &'static str,
        min: f64,
    },

    #[error("group {group}, event '{event}': weight {weight} must be finite and >= 0")]
    InvalidWeight {
        group: usize,
        event: String,
        weight: f64,
    },

    #[error("group {group}, event '{event}': probability {probability} is outside [0, 1]")]
    InvalidProbability {
        group: usize,
        event: String,
        probability: f64,
    },

    #[error("group {group}, event '{event}': {field} spawn condition has min > max")]
    InvertedSpawnBound {
        group: usize,
        event: String,
        field: &'static str,
    },

    #[error("group {group}: event '{event}' has an empty animation group or name")]
    EmptyTarget { group: usize, event: String },

    #[error("event id '{0}' appears more than once")]
    DuplicateEventId(String),
}

/// Why a take could not be produced. Nothing partial is returned on error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("event '{event}' in {parent} references missing animation {target}")]
    MissingAnimation {
        parent: String,
        event: String,
        target: AnimKey,
    },

    #[error("invalid template on {owner}: {source}")]
    InvalidTemplate {
        owner: String,
        #[source]
        source: TemplateError,
    },

    #[error("animation {target} references itself through {path}")]
    Cycle { target: AnimKey, path: String },

    #[error("template nesting deeper than {max_depth} at {target}")]
    DepthExceeded { target: AnimKey, max_depth: usize },

    #[error("animation {target} reports an invalid duration {duration}")]
    InvalidDuration { target: AnimKey, duration: f64 },
}

/// Load-time reference graph problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("template references form a cycle through: {}", format_keys(.0))]
    Cycle(Vec<AnimKey>),
}

fn format_keys(keys: &[AnimKey]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load-time validation failure of a whole store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LibraryError {
    #[error("invalid template on {owner}: {source}")]
    Template {
        owner: AnimKey,
        #[source]
        source: TemplateError,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
}
