// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classifies analyzer stdout/stderr into a [`MetricsReport`] (spec.md §4.6).
//!
//! Line-oriented and tool-agnostic: every line is matched against a file-path
//! prefix, optionally filtered by the calling tool's file extensions, then
//! classified into ERROR/WARNING/INFO/COMPLEXITY by the first pattern family
//! that matches. Complexity lines additionally carry a trailing `(N)` CCN.

use std::sync::LazyLock;

use indexmap::IndexMap;
use qgate_core::{ComplexityMetrics, FileIssueCounts, FileMetrics, MetricsReport, TotalIssueCounts};
use regex::Regex;

#[allow(clippy::expect_used)]
static FILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)(?::\d+|\(\d+)").expect("FILE_PATTERN is a fixed valid regex"));

#[allow(clippy::expect_used)]
static CCN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)$").expect("CCN_PATTERN is a fixed valid regex"));

#[allow(clippy::expect_used)]
fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("issue-type patterns are fixed valid regexes"))
        .collect()
}

static COMPLEXITY_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_all(&["Cyclomatic complexity", "CCN"]));

static ERROR_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_all(&[r"\b(error)\b", r"\b(E)\d+", r"\b(F)\d+", r"\b(C)\d+", r"TS\d+"]));

static WARNING_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_all(&[r"\b(warning)\b", r"\b(warn)\b", r"\b(W)\d+"]));

static INFO_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_all(&[r"\b(note)\b", r"\b(info)\b", r"\b(information)\b", r"\b(I)\d+"]));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IssueKind {
    Error,
    Warning,
    Info,
    Complexity,
}

/// File extensions a given tool's output lines are expected to reference.
/// Lines for files outside this set are dropped before classification; the
/// richer per-tool keyword filter the original parser also defined was never
/// wired up (it only ever checked extensions), so only the extension check
/// is reproduced here.
fn tool_extensions(tool_id: &str) -> Option<&'static [&'static str]> {
    match tool_id {
        "F_TypeScript" => Some(&[".ts", ".tsx", ".js", ".jsx"]),
        "F_ESLint" => Some(&[".ts", ".tsx", ".js", ".jsx"]),
        "B_Ruff" => Some(&[".py"]),
        "B_Pyright" => Some(&[".py"]),
        "B_Lizard" => Some(&[".py", ".ts", ".tsx", ".js", ".jsx", ".cpp", ".h"]),
        _ => None,
    }
}

fn determine_issue_kind(line: &str) -> Option<IssueKind> {
    if COMPLEXITY_PATTERNS.iter().any(|re| re.is_match(line)) {
        return Some(IssueKind::Complexity);
    }
    if ERROR_PATTERNS.iter().any(|re| re.is_match(line)) {
        return Some(IssueKind::Error);
    }
    if WARNING_PATTERNS.iter().any(|re| re.is_match(line)) {
        return Some(IssueKind::Warning);
    }
    if INFO_PATTERNS.iter().any(|re| re.is_match(line)) {
        return Some(IssueKind::Info);
    }
    None
}

#[derive(Default)]
struct ModuleEntry {
    metrics: FileIssueCounts,
    complexity_metrics: ComplexityMetrics,
}

/// Parses one module's combined stdout+stderr into a [`MetricsReport`].
///
/// `tool_id` narrows classification to the extensions that tool's adapter
/// declares; pass `None` to classify every recognizable line regardless of
/// extension.
pub fn parse(content: &str, tool_id: Option<&str>) -> MetricsReport {
    let mut total = TotalIssueCounts::default();
    let mut modules: IndexMap<String, ModuleEntry> = IndexMap::new();
    let extensions = tool_id.and_then(tool_extensions);

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(captures) = FILE_PATTERN.captures(line) else {
            continue;
        };
        let file_path = captures[1].trim().to_string();

        if file_path.starts_with("Analysis started") || file_path.starts_with('[') {
            continue;
        }

        if let Some(extensions) = extensions {
            if !extensions.iter().any(|ext| file_path.ends_with(ext)) {
                continue;
            }
        }

        let Some(kind) = determine_issue_kind(line) else {
            continue;
        };

        let ccn = if kind == IssueKind::Complexity {
            CCN_PATTERN
                .captures(line)
                .and_then(|c| c[1].parse::<u32>().ok())
                .unwrap_or(0)
        } else {
            0
        };

        let entry = modules.entry(file_path).or_default();
        match kind {
            IssueKind::Error => {
                total.error += 1;
                entry.metrics.error += 1;
            }
            IssueKind::Warning => {
                total.warning += 1;
                entry.metrics.warning += 1;
            }
            IssueKind::Info => {
                total.info += 1;
                entry.metrics.info += 1;
            }
            IssueKind::Complexity => {
                total.complexity += 1;
                entry.complexity_metrics.complexity += 1;
                entry.complexity_metrics.max_ccn = entry.complexity_metrics.max_ccn.max(ccn);
            }
        }
    }

    let modules = modules
        .into_iter()
        .map(|(file, entry)| FileMetrics {
            file,
            metrics: entry.metrics,
            complexity_metrics: entry.complexity_metrics,
        })
        .collect();

    MetricsReport {
        total_issues: total,
        modules,
    }
}
