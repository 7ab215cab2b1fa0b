// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `ToolAdapter` capability set (spec.md §4.2).

use std::path::Path;

/// Result of [`ToolAdapter::build_command`].
///
/// An empty `argv` means "skip this tool for this run" — the Module
/// Runner turns that into a `SKIPPED` module with no events at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildCommandResult {
    pub argv: Vec<String>,
    pub config_warning: Option<String>,
}

impl BuildCommandResult {
    pub fn skip() -> Self {
        Self::default()
    }

    pub fn run(argv: Vec<String>) -> Self {
        Self {
            argv,
            config_warning: None,
        }
    }

    pub fn run_with_warning(argv: Vec<String>, warning: impl Into<String>) -> Self {
        Self {
            argv,
            config_warning: Some(warning.into()),
        }
    }

    pub fn is_skip(&self) -> bool {
        self.argv.is_empty()
    }
}

/// Metadata describing a tool for the `tools` listing (spec.md §4.7/§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMetadata {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub icon: &'static str,
}

/// A tool-specific strategy for building a command and summarising its
/// output. Shared execution machinery (spawning, streaming, batching,
/// cancellation) belongs to the Module Runner, never to an adapter.
pub trait ToolAdapter: Send + Sync {
    /// Stable id this adapter is registered under (matches [`ToolMetadata::id`]).
    fn id(&self) -> &'static str;

    fn metadata(&self) -> ToolMetadata;

    /// File extensions (with leading dot) this adapter's output concerns,
    /// used both to narrow an incremental file list and, by the log
    /// parser, to keep metrics attributed to lines this tool could plausibly
    /// have produced (spec.md §4.6.3).
    fn extensions(&self) -> &'static [&'static str];

    /// Build the argv to execute, or an empty argv to skip this tool for
    /// this run. `files` is `Some` only in incremental mode.
    fn build_command(&self, project_root: &Path, files: Option<&[String]>) -> BuildCommandResult;

    /// Pure function over captured output producing a one-line summary.
    fn summarize(&self, stdout: &str, stderr: &str, exit_code: i32) -> String;
}

/// Narrow an incremental file list to the extensions an adapter declares.
pub(crate) fn filter_relevant<'a>(files: &'a [String], extensions: &[&str]) -> Vec<&'a str> {
    files
        .iter()
        .filter(|f| extensions.iter().any(|ext| f.ends_with(ext)))
        .map(String::as_str)
        .collect()
}
