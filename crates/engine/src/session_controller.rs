// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session Controller: the single entry point a transport calls into
//! (spec.md §4.7). Accepts `start`/`stop`/`list_tools`, tracks active
//! one-shot runs and watchers per session, and enforces the conflict rules
//! of spec.md §3.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex as SyncMutex;
use qgate_adapters::{ToolAdapter, ToolMetadata, ToolRegistry};
use qgate_core::{CoreError, CoreResult, ModuleId, RunMode, SessionId, ToolSelection};
use tokio_util::sync::CancellationToken;

use crate::notifier::{Notifier, ScopedNotifier};
use crate::orchestrator::Orchestrator;
use crate::watch::WatchManager;

/// Result of a successful `start` request (spec.md §6 `run-analysis`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartAccepted {
    pub mode: &'static str,
}

/// Result of a `stop` request (spec.md §6 `stop-analysis`/`stop-watch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotFound,
}

struct ActiveRun {
    cancel: CancellationToken,
}

/// Tracks active one-shot runs and watchers per session, behind a single
/// mutex: this state is touched only by the cooperative scheduler, so (per
/// spec.md §9) it needs no further locking discipline beyond the mutex
/// itself.
#[derive(Default)]
struct SessionState {
    active_runs: HashMap<SessionId, ActiveRun>,
    active_watchers: HashMap<SessionId, Arc<WatchManager>>,
}

/// Accepts start/stop/tools commands from the inbound transport and drives
/// the orchestrator/watch manager in the background (spec.md §4.7).
///
/// Methods that launch background work take `self: &Arc<Self>` so the
/// spawned task can hold its own `Arc` clone back to the controller for
/// cleanup on completion, matching `WatchManager::run`'s `Arc<Self>`
/// convention rather than reaching for raw pointers or `'static` leaks.
pub struct SessionController {
    notifier: Arc<Notifier>,
    registry: ToolRegistry,
    state: SyncMutex<SessionState>,
}

impl SessionController {
    pub fn new(notifier: Arc<Notifier>, registry: ToolRegistry) -> Self {
        Self {
            notifier,
            registry,
            state: SyncMutex::new(SessionState::default()),
        }
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        self.registry.list_tools()
    }

    /// Validates the request, then launches the run or watcher as a
    /// background task (spec.md §4.7 `start`).
    pub async fn start(
        self: &Arc<Self>,
        session_id: SessionId,
        project_path: PathBuf,
        mode: RunMode,
        watch: bool,
        selected_tools: Option<Vec<ModuleId>>,
    ) -> CoreResult<StartAccepted> {
        if project_path.as_os_str().is_empty() || !project_path.is_dir() {
            return Err(CoreError::InvalidInput(format!(
                "project_path does not exist or is not a directory: {}",
                project_path.display()
            )));
        }

        let selection = ToolSelection::from_requested(selected_tools);
        let adapters: Vec<Arc<dyn ToolAdapter>> = self.registry.all();

        if watch {
            self.start_watch(session_id, project_path, adapters, selection).await;
            return Ok(StartAccepted { mode: "watch" });
        }

        let cancel = CancellationToken::new();
        {
            let mut state = self.state.lock();
            if state.active_runs.contains_key(&session_id) {
                return Err(CoreError::Conflict(format!("session {session_id} already has a run in flight")));
            }
            state.active_runs.insert(session_id.clone(), ActiveRun { cancel: cancel.clone() });
        }

        self.spawn_run(session_id, project_path, mode, adapters, selection, cancel);

        Ok(StartAccepted {
            mode: match mode {
                RunMode::Full => "full",
                RunMode::Incremental => "incremental",
            },
        })
    }

    async fn start_watch(
        self: &Arc<Self>,
        session_id: SessionId,
        project_path: PathBuf,
        adapters: Vec<Arc<dyn ToolAdapter>>,
        selection: ToolSelection,
    ) {
        let existing = self.state.lock().active_watchers.remove(&session_id);
        if let Some(old) = existing {
            old.stop().await;
        }

        let scoped = ScopedNotifier::new(self.notifier.clone(), session_id.clone());
        let watcher = Arc::new(WatchManager::new(project_path, scoped, adapters, selection));
        self.state.lock().active_watchers.insert(session_id, watcher.clone());

        tokio::spawn(watcher.run());
    }

    fn spawn_run(
        self: &Arc<Self>,
        session_id: SessionId,
        project_path: PathBuf,
        mode: RunMode,
        adapters: Vec<Arc<dyn ToolAdapter>>,
        selection: ToolSelection,
        cancel: CancellationToken,
    ) {
        let scoped = ScopedNotifier::new(self.notifier.clone(), session_id.clone());
        let controller = self.clone();

        tokio::spawn(async move {
            let orchestrator = Orchestrator::new(project_path, mode, scoped, adapters, &selection);
            orchestrator.execute(None, cancel).await;
            controller.state.lock().active_runs.remove(&session_id);
        });
    }

    /// Stops a session's watcher (if any), or reports `not_found`. One-shot
    /// runs are not individually cancellable through this surface per
    /// spec.md §4.7 — only watchers are named as stoppable there.
    pub async fn stop(&self, session_id: &SessionId) -> StopOutcome {
        let watcher = self.state.lock().active_watchers.remove(session_id);
        match watcher {
            Some(watcher) => {
                watcher.stop().await;
                StopOutcome::Stopped
            }
            None => StopOutcome::NotFound,
        }
    }
}
