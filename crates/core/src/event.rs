// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types streamed to a session's subscribers.
//!
//! Serializes with `{"type": "KIND", ...fields}`, matching the wire shapes
//! of spec.md §3.

use crate::id::ModuleId;
use crate::metrics::MetricsReport;
use serde::{Deserialize, Serialize};

/// Encoding applied to a `STREAM` event's `data` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamEncoding {
    GzipBase64,
}

/// Terminal status of a run, as reported in `GLOBAL_END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GlobalStatus {
    Success,
    Failure,
}

/// Terminal status of a single module, as reported in `END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModuleOutcome {
    Pass,
    Fail,
}

/// Events emitted on a session's notification channel.
///
/// Unlike the teacher's `Event`, there is no `Custom` fallback variant:
/// every event this core ever emits is one of the kinds spec.md §3 names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "GLOBAL_INIT")]
    GlobalInit,

    #[serde(rename = "GLOBAL_END")]
    GlobalEnd { status: GlobalStatus },

    #[serde(rename = "INIT")]
    Init { module: ModuleId },

    #[serde(rename = "LOG")]
    Log {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<ModuleId>,
        message: String,
    },

    #[serde(rename = "STREAM")]
    Stream {
        module: ModuleId,
        data: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        encoding: Option<StreamEncoding>,
    },

    #[serde(rename = "END")]
    End {
        module: ModuleId,
        status: ModuleOutcome,
        summary: String,
    },

    #[serde(rename = "METRICS")]
    Metrics {
        module: ModuleId,
        report: MetricsReport,
    },

    #[serde(rename = "ERROR")]
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<ModuleId>,
        error: String,
    },
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
