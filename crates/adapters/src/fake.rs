// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A scriptable adapter for tests, mirroring the teacher's `Fake*`
//! adapters (e.g. `oj-adapters::agent::fake`). Exposed behind the
//! `test-support` feature so `qgate-engine` can depend on it as a
//! dev-dependency without pulling test code into release builds.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::adapter::{BuildCommandResult, ToolAdapter, ToolMetadata};

/// Builds commands and summaries from closures supplied by the test, with
/// a call counter so tests can assert how many times each hook ran.
pub struct FakeAdapter {
    id: &'static str,
    extensions: &'static [&'static str],
    build: Box<dyn Fn(&Path, Option<&[String]>) -> BuildCommandResult + Send + Sync>,
    summarize: Box<dyn Fn(&str, &str, i32) -> String + Send + Sync>,
    build_calls: Arc<Mutex<u32>>,
}

impl FakeAdapter {
    /// A fake that always runs `argv` and summarizes to a fixed string.
    pub fn new(id: &'static str, argv: Vec<String>, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        Self {
            id,
            extensions: &[],
            build: Box::new(move |_, _| BuildCommandResult::run(argv.clone())),
            summarize: Box::new(move |_, _, _| summary.clone()),
            build_calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_extensions(mut self, extensions: &'static [&'static str]) -> Self {
        self.extensions = extensions;
        self
    }

    /// A fake whose argv is empty regardless of input — always `SKIPPED`.
    pub fn always_skip(id: &'static str) -> Self {
        Self {
            id,
            extensions: &[],
            build: Box::new(|_, _| BuildCommandResult::skip()),
            summarize: Box::new(|_, _, _| String::new()),
            build_calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn build_call_count(&self) -> u32 {
        *self.build_calls.lock()
    }
}

impl ToolAdapter for FakeAdapter {
    fn id(&self) -> &'static str {
        self.id
    }

    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            id: self.id,
            title: self.id,
            subtitle: "fake",
            icon: "fake",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn build_command(&self, project_root: &Path, files: Option<&[String]>) -> BuildCommandResult {
        *self.build_calls.lock() += 1;
        (self.build)(project_root, files)
    }

    fn summarize(&self, stdout: &str, stderr: &str, exit_code: i32) -> String {
        (self.summarize)(stdout, stderr, exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_records_build_calls() {
        let fake = FakeAdapter::new("T", vec!["echo".to_string(), "hi".to_string()], "ok");
        let dir = std::env::temp_dir();
        let _ = fake.build_command(&dir, None);
        let _ = fake.build_command(&dir, None);
        assert_eq!(fake.build_call_count(), 2);
    }

    #[test]
    fn always_skip_returns_empty_argv() {
        let fake = FakeAdapter::always_skip("T");
        let dir = std::env::temp_dir();
        assert!(fake.build_command(&dir, None).is_skip());
    }
}
