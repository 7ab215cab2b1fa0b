// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-internal error type. The Session Controller translates these (and
//! `qgate_core::CoreError`) at its boundary; `ToolFailure`/`ToolSkipped`
//! never appear here since spec.md §7 treats them as normal outcomes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}
