// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metrics report shape produced by the Log Parser and streamed as `METRICS`.

use serde::{Deserialize, Serialize};

/// Run-wide counts of issues by severity kind, including complexity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalIssueCounts {
    #[serde(rename = "ERROR")]
    pub error: u32,
    #[serde(rename = "WARNING")]
    pub warning: u32,
    #[serde(rename = "INFO")]
    pub info: u32,
    #[serde(rename = "COMPLEXITY")]
    pub complexity: u32,
}

/// Per-file severity counts. Complexity is tracked separately in
/// [`ComplexityMetrics`], matching spec.md §3's `{ERROR,WARNING,INFO}` shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIssueCounts {
    #[serde(rename = "ERROR")]
    pub error: u32,
    #[serde(rename = "WARNING")]
    pub warning: u32,
    #[serde(rename = "INFO")]
    pub info: u32,
}

/// Complexity-specific counters for a single file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    #[serde(rename = "COMPLEXITY")]
    pub complexity: u32,
    #[serde(rename = "MAX_CCN")]
    pub max_ccn: u32,
}

/// Per-file breakdown within a metrics report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub file: String,
    pub metrics: FileIssueCounts,
    pub complexity_metrics: ComplexityMetrics,
}

/// Output of parsing one module's combined stdout+stderr.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub total_issues: TotalIssueCounts,
    pub modules: Vec<FileMetrics>,
}
