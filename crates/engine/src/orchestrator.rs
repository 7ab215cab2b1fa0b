// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator: per-run coordination of several [`ModuleRunner`]s under a
//! fixed concurrency cap (spec.md §4.4).

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use qgate_adapters::ToolAdapter;
use qgate_core::{GlobalStatus, ModuleId, ModuleStatus, RunMode, RunReport, RunStatus, ToolSelection};
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::module_runner::ModuleRunner;
use crate::notifier::ScopedNotifier;

/// At most this many module subprocesses run concurrently per run (spec.md §5).
pub const MAX_CONCURRENT_ANALYSIS: usize = 3;

/// Coordinates one activation of the analysis pipeline across the selected
/// tool adapters (spec.md §4.4). A fresh `Orchestrator` is built per run; it
/// is not reused once `execute` returns.
pub struct Orchestrator {
    project_root: PathBuf,
    mode: RunMode,
    notifier: ScopedNotifier,
    adapters: Vec<Arc<dyn ToolAdapter>>,
}

impl Orchestrator {
    pub fn new(
        project_root: PathBuf,
        mode: RunMode,
        notifier: ScopedNotifier,
        all_adapters: Vec<Arc<dyn ToolAdapter>>,
        selection: &ToolSelection,
    ) -> Self {
        let adapters = all_adapters
            .into_iter()
            .filter(|a| selection.includes(&ModuleId::new(a.id())))
            .collect();
        Self {
            project_root,
            mode,
            notifier,
            adapters,
        }
    }

    /// Runs §4.4 steps 1-8: emits `GLOBAL_INIT`, resolves the file list,
    /// launches one [`ModuleRunner`] per selected adapter under a fixed
    /// semaphore, collects results, and emits `GLOBAL_END`.
    ///
    /// Cancelling the returned future cancels every outstanding module task
    /// and awaits their cleanup (the process-reap invariant of §4.3 step 12)
    /// before the cancellation propagates to the caller.
    pub async fn execute(&self, files: Option<Vec<String>>, cancel: CancellationToken) -> RunReport {
        self.notifier.send_global_init().await;

        let resolved_files = self.resolve_files(files).await;
        let modified_files_count = resolved_files.as_ref().map_or(0, Vec::len);

        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_ANALYSIS));
        let mut tasks = JoinSet::new();

        for adapter in &self.adapters {
            let runner = ModuleRunner::new(adapter.clone(), self.notifier.clone(), self.project_root.clone());
            let module_id = runner.module_id();
            let files = resolved_files.clone();
            let semaphore = semaphore.clone();
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire().await;
                let status = runner.run(files.as_deref(), cancel).await;
                (module_id, status)
            });
        }

        // Cancellation must never `abort_all` the module tasks: an aborted
        // task is dropped at its suspension point without further polling,
        // which would skip `ModuleRunner::execute`'s `ensure_child_exited`
        // reap and orphan the child process. Every module task already
        // shares this `CancellationToken` and reaps its own child on that
        // path, so on cancel we just stop re-entering this branch and keep
        // draining `join_next` until every task has finished tearing down.
        let mut modules: BTreeMap<ModuleId, ModuleStatus> = BTreeMap::new();
        let mut cancel_seen = false;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled(), if !cancel_seen && !tasks.is_empty() => {
                    cancel_seen = true;
                }
                joined = tasks.join_next() => {
                    match joined {
                        Some(Ok((module_id, status))) => {
                            modules.insert(module_id, status);
                        }
                        Some(Err(join_err)) => {
                            tracing::error!(error = %join_err, "module task panicked");
                        }
                        None => break,
                    }
                }
            }
        }

        let status = RunReport::status_from_modules(&modules);
        self.notifier.send_global_end(GlobalStatus::from(status)).await;

        RunReport {
            status,
            mode: self.mode,
            modules,
            modified_files_count,
        }
    }

    /// Resolves the incremental file list (spec.md §4.4 step 2), logging
    /// which of the three causes produced an empty list so the stream can
    /// distinguish them even though they share one downstream code path
    /// (SPEC_FULL.md §1's resolution of the incremental-fallback question).
    async fn resolve_files(&self, files: Option<Vec<String>>) -> Option<Vec<String>> {
        if self.mode == RunMode::Full {
            self.notifier.send_log(None, "🔍 Full analysis mode").await;
            return None;
        }

        if let Some(files) = files {
            if files.is_empty() {
                self.notifier
                    .send_log(None, "explicit empty file list; no modules will run")
                    .await;
            } else {
                self.notifier
                    .send_log(None, format!("🔍 Incremental mode: analyzing {} modified file(s)", files.len()))
                    .await;
            }
            return Some(files);
        }

        match self.git_diff_files().await {
            Ok(files) if files.is_empty() => {
                self.notifier
                    .send_log(None, "no modified files from git diff, analyzing nothing")
                    .await;
                Some(files)
            }
            Ok(files) => {
                self.notifier
                    .send_log(None, format!("🔍 Incremental mode: analyzing {} modified file(s)", files.len()))
                    .await;
                Some(files)
            }
            Err(err) => {
                self.notifier
                    .send_log(None, format!("git diff unavailable/failed ({err}); analyzing nothing"))
                    .await;
                Some(Vec::new())
            }
        }
    }

    async fn git_diff_files(&self) -> Result<Vec<String>, String> {
        let output = Command::new("git")
            .args(["diff", "--name-only", "HEAD"])
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| e.to_string())?;

        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgate_adapters::test_support::FakeAdapter;
    use qgate_core::SessionId;
    use crate::notifier::Notifier;
    use crate::test_support::RecordingSubscriber;

    async fn scoped_with_recorder() -> (ScopedNotifier, Arc<RecordingSubscriber>) {
        let notifier = Arc::new(Notifier::new());
        let recorder = Arc::new(RecordingSubscriber::new());
        let session_id = SessionId::new("test");
        notifier.attach(session_id.clone(), recorder.clone()).await;
        (ScopedNotifier::new(notifier, session_id), recorder)
    }

    #[tokio::test]
    async fn full_run_with_all_pass_adapters_is_pass() {
        let (notifier, recorder) = scoped_with_recorder().await;
        let adapters: Vec<Arc<dyn ToolAdapter>> = vec![
            Arc::new(FakeAdapter::new("A", vec!["true".to_string()], "ok")),
            Arc::new(FakeAdapter::new("B", vec!["true".to_string()], "ok")),
        ];
        let orchestrator = Orchestrator::new(
            std::env::temp_dir(),
            RunMode::Full,
            notifier,
            adapters,
            &ToolSelection::All,
        );

        let report = orchestrator.execute(None, CancellationToken::new()).await;

        assert_eq!(report.status, RunStatus::Pass);
        assert_eq!(report.modules.len(), 2);
        let events = recorder.events();
        assert!(matches!(events.first(), Some(qgate_core::Event::GlobalInit)));
        assert!(matches!(events.last(), Some(qgate_core::Event::GlobalEnd { status: GlobalStatus::Success })));
    }

    #[tokio::test]
    async fn any_failing_adapter_fails_the_run() {
        let (notifier, _recorder) = scoped_with_recorder().await;
        let adapters: Vec<Arc<dyn ToolAdapter>> = vec![
            Arc::new(FakeAdapter::new("A", vec!["true".to_string()], "ok")),
            Arc::new(FakeAdapter::new("B", vec!["false".to_string()], "bad")),
        ];
        let orchestrator = Orchestrator::new(
            std::env::temp_dir(),
            RunMode::Full,
            notifier,
            adapters,
            &ToolSelection::All,
        );

        let report = orchestrator.execute(None, CancellationToken::new()).await;
        assert_eq!(report.status, RunStatus::Fail);
    }

    #[tokio::test]
    async fn incremental_with_no_matching_files_skips_everything_and_passes() {
        let (notifier, _recorder) = scoped_with_recorder().await;
        let adapters: Vec<Arc<dyn ToolAdapter>> =
            vec![Arc::new(FakeAdapter::always_skip("B_Ruff"))];
        let orchestrator = Orchestrator::new(
            std::env::temp_dir(),
            RunMode::Incremental,
            notifier,
            adapters,
            &ToolSelection::All,
        );

        let report = orchestrator
            .execute(Some(vec!["README.md".to_string()]), CancellationToken::new())
            .await;

        assert_eq!(report.status, RunStatus::Pass);
        assert_eq!(report.modules.get(&ModuleId::new("B_Ruff")), Some(&ModuleStatus::Skipped));
    }

    #[tokio::test]
    async fn selected_tools_excludes_unselected_adapters() {
        let (notifier, _recorder) = scoped_with_recorder().await;
        let adapters: Vec<Arc<dyn ToolAdapter>> = vec![
            Arc::new(FakeAdapter::new("A", vec!["true".to_string()], "ok")),
            Arc::new(FakeAdapter::new("B", vec!["true".to_string()], "ok")),
        ];
        let selection = ToolSelection::Only(vec![ModuleId::new("A")]);
        let orchestrator = Orchestrator::new(std::env::temp_dir(), RunMode::Full, notifier, adapters, &selection);

        let report = orchestrator.execute(None, CancellationToken::new()).await;

        assert_eq!(report.modules.len(), 1);
        assert!(report.modules.contains_key(&ModuleId::new("A")));
    }

    #[tokio::test]
    async fn cancellation_yields_fail_end_for_in_flight_module() {
        let (notifier, recorder) = scoped_with_recorder().await;
        let adapters: Vec<Arc<dyn ToolAdapter>> =
            vec![Arc::new(FakeAdapter::new("A", vec!["sleep".to_string(), "5".to_string()], "n/a"))];
        let orchestrator = Orchestrator::new(std::env::temp_dir(), RunMode::Full, notifier, adapters, &ToolSelection::All);

        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        let report = orchestrator.execute(None, cancel).await;
        let _ = report.status;
        let events = recorder.events();
        // The orchestrator never aborts module tasks on cancel; it waits for
        // each one's own cleanup, so the module's "cancelled" END must always
        // land before GLOBAL_END, never be skipped by an abort race.
        assert!(events
            .iter()
            .any(|e| matches!(e, qgate_core::Event::End { summary, .. } if summary == "cancelled")));
        assert!(matches!(events.last(), Some(qgate_core::Event::GlobalEnd { .. })));
    }
}
