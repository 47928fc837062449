use serde::{Deserialize, Serialize};

use takeforge_curve::BakingConfig;
use takeforge_events::ResolveConfig;

/// Session settings: the RNG seed plus the resolution and baking knobs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed for the session RNG. Two sessions with the same seed and signal
    /// history produce the same takes.
    pub seed: u64,
    pub resolve: ResolveConfig,
    pub baking: BakingConfig,
}
