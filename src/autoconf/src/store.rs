//! Ordered path configuration store with merge-on-duplicate semantics

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::PathConfig;

/// Mapping from canonical path to its configuration
///
/// The canonical path string is the merge key: at most one entry exists per
/// distinct path, and iteration preserves first-insertion order. Merging is
/// additive; entries seeded from an externally supplied base configuration
/// are never deleted or overwritten.
#[derive(Debug, Default)]
pub struct PathConfigStore {
    configs: Vec<PathConfig>,
    index: HashMap<String, usize>,
}

impl PathConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a pre-existing base configuration
    ///
    /// Base entries keep their position at the front of the iteration order
    /// and obey the ordinary merge rule afterwards.
    pub fn with_base(base: Vec<PathConfig>) -> Self {
        let mut store = Self::new();
        for config in base {
            store.merge(config);
        }
        store
    }

    /// Merge one path config into the store
    ///
    /// A new path inserts as-is. An existing path keeps its `name`, `id` and
    /// `enforcement_mode` and appends the incoming method entries; verbs are
    /// not deduplicated, only paths are.
    pub fn merge(&mut self, incoming: PathConfig) {
        match self.index.get(&incoming.path).copied() {
            Some(position) => {
                self.configs[position].methods.extend(incoming.methods);
            }
            None => {
                self.index.insert(incoming.path.clone(), self.configs.len());
                self.configs.push(incoming);
            }
        }
    }

    /// Look up a config by canonical path
    pub fn get(&self, path: &str) -> Option<&PathConfig> {
        self.index.get(path).map(|&position| &self.configs[position])
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Whether the store holds no paths
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Stored configs in first-insertion order
    pub fn paths(&self) -> &[PathConfig] {
        &self.configs
    }

    /// Iterate configs in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PathConfig> {
        self.configs.iter()
    }

    /// Freeze the store into an immutable post-startup snapshot
    pub fn freeze(self) -> PolicyConfiguration {
        PolicyConfiguration {
            paths: self.configs,
        }
    }
}

/// Immutable snapshot of the compiled policy configuration
///
/// Produced once at the end of the startup pass; safe to share and read
/// concurrently. Mutation requires building a new store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfiguration {
    paths: Vec<PathConfig>,
}

impl PolicyConfiguration {
    /// Path configs in first-insertion order
    pub fn paths(&self) -> &[PathConfig] {
        &self.paths
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the configuration holds no paths
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate configs in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PathConfig> {
        self.paths.iter()
    }
}
