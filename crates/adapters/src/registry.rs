// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter registry: id -> adapter constructor (spec.md §4.2).

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapter::{ToolAdapter, ToolMetadata};
use crate::builtin::{EsLintAdapter, LizardAdapter, PyrightAdapter, RuffAdapter, TypeScriptAdapter};

/// Maps stable tool ids to their adapter implementation.
///
/// Built with [`ToolRegistry::with_builtins`] for the CLI binary; tests
/// build an empty registry and register [`crate::fake::FakeAdapter`]s.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    adapters: BTreeMap<&'static str, Arc<dyn ToolAdapter>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The five built-in analyzers from `orchestrator.py`'s module table.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TypeScriptAdapter));
        registry.register(Arc::new(EsLintAdapter));
        registry.register(Arc::new(RuffAdapter));
        registry.register(Arc::new(PyrightAdapter));
        registry.register(Arc::new(LizardAdapter));
        registry
    }

    pub fn register(&mut self, adapter: Arc<dyn ToolAdapter>) {
        self.adapters.insert(adapter.id(), adapter);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn ToolAdapter>> {
        self.adapters.get(id).cloned()
    }

    pub fn all_ids(&self) -> Vec<&'static str> {
        self.adapters.keys().copied().collect()
    }

    pub fn all(&self) -> Vec<Arc<dyn ToolAdapter>> {
        self.adapters.values().cloned().collect()
    }

    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        self.adapters.values().map(|a| a.metadata()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_all_five_tools() {
        let registry = ToolRegistry::with_builtins();
        let mut ids = registry.all_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec!["B_Lizard", "B_Pyright", "B_Ruff", "F_ESLint", "F_TypeScript"]);
    }

    #[test]
    fn unknown_id_is_none() {
        let registry = ToolRegistry::with_builtins();
        assert!(registry.get("nope").is_none());
    }
}
