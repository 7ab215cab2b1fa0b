// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in tool adapters (spec.md §1 "specific command-line shape... not
//! part of the core contract, but each file-filtering adapter MUST...").
//!
//! Grounded in `orchestrator.py`'s five-module table and `modules.py`'s
//! `TypeScriptModule`/`ESLintModule`/`RuffModule`/`PyrightModule`/
//! `LizardModule` classes (exercised by `tests/unit/test_modules.py`).

pub mod eslint;
pub mod lizard;
pub mod pyright;
pub mod ruff;
pub mod typescript;

pub use eslint::EsLintAdapter;
pub use lizard::LizardAdapter;
pub use pyright::PyrightAdapter;
pub use ruff::RuffAdapter;
pub use typescript::TypeScriptAdapter;
