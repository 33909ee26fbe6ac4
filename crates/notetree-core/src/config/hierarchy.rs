//! Folder hierarchy limits.

use serde::{Deserialize, Serialize};

/// Bounds applied by the hierarchy engine to every traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Maximum folder level, and maximum number of frontier levels a single
    /// traversal may visit. Exceeding it fails with `TooDeep`.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> u32 {
    64
}
