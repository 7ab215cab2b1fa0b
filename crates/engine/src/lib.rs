// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qgate-engine: the analysis execution pipeline of spec.md §4.
//!
//! Leaves first: [`notifier`] fans events out to a session's subscribers,
//! [`log_parser`] classifies analyzer output into metrics, [`module_runner`]
//! drives one subprocess end to end, [`orchestrator`] runs several modules
//! under a concurrency cap, [`watch`] turns filesystem activity into
//! debounced incremental runs, and [`session_controller`] is the single
//! entry point a transport calls into.

pub mod error;
pub mod log_parser;
pub mod module_runner;
pub mod notifier;
pub mod orchestrator;
pub mod session_controller;
pub mod watch;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::EngineError;
pub use log_parser::parse as parse_log;
pub use module_runner::ModuleRunner;
pub use notifier::{Notifier, ScopedNotifier, Subscriber};
pub use orchestrator::Orchestrator;
pub use session_controller::SessionController;
pub use watch::WatchManager;
