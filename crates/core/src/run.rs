// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run attributes (spec.md §3 "Run") and the report an orchestrator returns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::ModuleId;
use crate::module::ModuleStatus;

/// Whether a run analyzes the whole project tree or a caller-supplied
/// subset of changed files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Full,
    Incremental,
}

/// Terminal status of a run, distinct from [`crate::event::GlobalStatus`]
/// which is the wire spelling ("SUCCESS"/"FAILURE") sent as `GLOBAL_END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Pass,
    Fail,
}

impl From<RunStatus> for crate::event::GlobalStatus {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Pass => crate::event::GlobalStatus::Success,
            RunStatus::Fail => crate::event::GlobalStatus::Failure,
        }
    }
}

/// Selected tool ids for a run. `None` or an empty list both mean "all
/// known tools" (spec.md §3); callers should prefer [`ToolSelection::All`]
/// but the `Option<Vec<ModuleId>>` a transport hands in collapses to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolSelection {
    #[default]
    All,
    Only(Vec<ModuleId>),
}

impl ToolSelection {
    pub fn from_requested(ids: Option<Vec<ModuleId>>) -> Self {
        match ids {
            None => Self::All,
            Some(ids) if ids.is_empty() => Self::All,
            Some(ids) => Self::Only(ids),
        }
    }

    pub fn includes(&self, id: &ModuleId) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.iter().any(|candidate| candidate == id),
        }
    }
}

/// The report an orchestrator's `execute()` returns (spec.md §4.4 step 8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub mode: RunMode,
    pub modules: BTreeMap<ModuleId, ModuleStatus>,
    pub modified_files_count: usize,
}

impl RunReport {
    /// `FAIL` iff any module returned `FAIL`; a run with all `SKIPPED`
    /// modules (or zero modules) is `PASS` (spec.md §4.4 step 6).
    pub fn status_from_modules(modules: &BTreeMap<ModuleId, ModuleStatus>) -> RunStatus {
        if modules.values().any(|s| *s == ModuleStatus::Fail) {
            RunStatus::Fail
        } else {
            RunStatus::Pass
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_none_selection_means_all() {
        assert_eq!(ToolSelection::from_requested(None), ToolSelection::All);
        assert_eq!(ToolSelection::from_requested(Some(vec![])), ToolSelection::All);
    }

    #[test]
    fn nonempty_selection_is_exclusive() {
        let sel = ToolSelection::from_requested(Some(vec![ModuleId::new("B_Ruff")]));
        assert!(sel.includes(&ModuleId::new("B_Ruff")));
        assert!(!sel.includes(&ModuleId::new("F_ESLint")));
    }

    #[test]
    fn all_skipped_modules_is_pass() {
        let mut modules = BTreeMap::new();
        modules.insert(ModuleId::new("B_Ruff"), ModuleStatus::Skipped);
        modules.insert(ModuleId::new("F_ESLint"), ModuleStatus::Skipped);
        assert_eq!(RunReport::status_from_modules(&modules), RunStatus::Pass);
    }

    #[test]
    fn any_fail_makes_run_fail() {
        let mut modules = BTreeMap::new();
        modules.insert(ModuleId::new("B_Ruff"), ModuleStatus::Pass);
        modules.insert(ModuleId::new("F_ESLint"), ModuleStatus::Fail);
        assert_eq!(RunReport::status_from_modules(&modules), RunStatus::Fail);
    }
}
