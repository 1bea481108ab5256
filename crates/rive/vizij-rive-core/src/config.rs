//! Core configuration for vizij-rive-core.

use serde::{Deserialize, Serialize};

/// Import limits, playback tuning and feature flags.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// State changes a layer may take in one advance before it gives up.
    pub max_state_changes: usize,

    /// Deepest nesting accepted for animation and state machine trees.
    pub max_tree_depth: usize,

    /// Upper bound on objects in a single artboard.
    pub max_objects_per_artboard: usize,

    /// Seed for random transition selection. `None` seeds from entropy.
    pub random_seed: Option<u64>,

    /// Reset buffers retained by the pool once released.
    pub reset_pool_capacity: usize,

    pub features: Features,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Clip drawing to artboard bounds when the artboard asks for it.
    pub honor_clip: bool,
    /// Snapshot properties when entering states flagged for reset.
    pub state_resets: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            honor_clip: true,
            state_resets: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_state_changes: 100,
            max_tree_depth: 8,
            max_objects_per_artboard: 1 << 20,
            random_seed: None,
            reset_pool_capacity: 32,
            features: Features::default(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
