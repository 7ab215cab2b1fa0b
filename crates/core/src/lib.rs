// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qgate-core: data model shared by the quality-gate analysis pipeline.
//!
//! Session/run/module identifiers, the tagged `Event` wire shape, the
//! metrics report produced by the log parser, and the error taxonomy of
//! the Session Controller. No I/O, no subprocesses, no filesystem watching
//! lives here — those belong to `qgate-adapters` and `qgate-engine`.

pub mod error;
pub mod event;
pub mod id;
pub mod metrics;
pub mod module;
pub mod run;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{CoreError, CoreResult};
pub use event::{Event, GlobalStatus, ModuleOutcome, StreamEncoding};
pub use id::{ModuleId, RunId, SessionId};
pub use metrics::{ComplexityMetrics, FileIssueCounts, FileMetrics, MetricsReport, TotalIssueCounts};
pub use module::ModuleStatus;
pub use run::{RunMode, RunReport, RunStatus, ToolSelection};
