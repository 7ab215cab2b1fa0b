// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::event::{GlobalStatus, ModuleOutcome};
use crate::id::ModuleId;
use crate::metrics::MetricsReport;
use crate::Event;

pub fn init_event(module: &str) -> Event {
    Event::Init {
        module: ModuleId::new(module),
    }
}

pub fn end_event(module: &str, status: ModuleOutcome, summary: &str) -> Event {
    Event::End {
        module: ModuleId::new(module),
        status,
        summary: summary.to_string(),
    }
}

pub fn metrics_event(module: &str, report: MetricsReport) -> Event {
    Event::Metrics {
        module: ModuleId::new(module),
        report,
    }
}

pub fn global_end_event(status: GlobalStatus) -> Event {
    Event::GlobalEnd { status }
}
