// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared across the quality-gate core.

use thiserror::Error;

/// Errors surfaced by the Session Controller and the components it drives.
///
/// `ToolFailure` and `ToolSkipped` are not represented here: per spec they
/// are normal outcomes surfaced only through events and run-result status
/// maps, never as `Result::Err`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("cancelled")]
    Cancelled,
}

pub type CoreResult<T> = Result<T, CoreError>;
