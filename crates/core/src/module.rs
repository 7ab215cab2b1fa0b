// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime status of one module within a run (spec.md §3 "Module (per run)").

use serde::{Deserialize, Serialize};

/// Lifecycle state of a module.
///
/// Transitions: `Pending -> Running -> (Pass | Fail)`, or `Pending ->
/// Skipped` when the adapter returns an empty command. A module is
/// single-use: once it reaches a terminal state it is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModuleStatus {
    Pending,
    Running,
    Pass,
    Fail,
    Skipped,
}

impl ModuleStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Pass | Self::Fail | Self::Skipped)
    }
}

impl std::fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skipped => "SKIPPED",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pass_fail_skipped_are_terminal() {
        assert!(!ModuleStatus::Pending.is_terminal());
        assert!(!ModuleStatus::Running.is_terminal());
        assert!(ModuleStatus::Pass.is_terminal());
        assert!(ModuleStatus::Fail.is_terminal());
        assert!(ModuleStatus::Skipped.is_terminal());
    }
}
