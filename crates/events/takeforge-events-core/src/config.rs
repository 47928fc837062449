use serde::{Deserialize, Serialize};

/// Resolution settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolveConfig {
    /// Deepest template nesting a take may reach. Top-level events are depth 1.
    pub max_depth: usize,
    /// Start time of the root parent context, in seconds.
    pub root_start_time: f64,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            root_start_time: 0.0,
        }
    }
}
