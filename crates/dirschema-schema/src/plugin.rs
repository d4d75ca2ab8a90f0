// SPDX-License-Identifier: MIT OR Apache-2.0

//! The validator plugin registry: `v#NAME://ARG` pseudo-URIs (spec §4.3)
//! dispatch here instead of through the compiled-schema path. A plugin gets
//! the same adapter the evaluator holds, so it can load whatever content it
//! needs (the target file, its companion, sibling paths, ...).

use dirschema_core::adapter::TreeAdapter;
use dirschema_core::error::ValidationError;
use std::collections::HashMap;
use std::sync::Arc;

/// A custom validator, invoked for a `v#NAME://ARG` schema reference.
/// Implementations must be `Send + Sync`: the same registry instance is
/// shared across every path in a run (spec §5).
pub trait ValidatorPlugin: Send + Sync {
    fn validate(&self, target_path: &str, argument: &str, adapter: &dyn TreeAdapter) -> Result<(), ValidationError>;
}

/// Host-populated map from plugin name to implementation. Built once before
/// a run and never mutated while the `Evaluator` is using it.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn ValidatorPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, plugin: Arc<dyn ValidatorPlugin>) {
        self.plugins.insert(name.into(), plugin);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ValidatorPlugin>> {
        self.plugins.get(name)
    }
}
