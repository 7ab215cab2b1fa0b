// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qgate-adapters: the pluggable "tool adapter" strategies of spec.md §4.2,
//! plus the built-in registry of five concrete analyzers.
//!
//! An adapter is a capability set, not a base class (spec.md §9): anything
//! implementing [`ToolAdapter`] can be registered and run by the Module
//! Runner in `qgate-engine` without that runner knowing which analyzer it
//! is driving.

pub mod adapter;
pub mod builtin;
pub mod probe;
pub mod registry;
pub mod subprocess;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake as test_support;

pub use adapter::{BuildCommandResult, ToolAdapter, ToolMetadata};
pub use registry::ToolRegistry;
