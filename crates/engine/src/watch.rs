// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch Manager + Debouncer: turns filesystem activity into debounced
//! incremental runs (spec.md §4.5).
//!
//! Uses a polling observer rather than kernel inotify since the watched
//! tree may live on a network/share-like mount (spec.md §4.5). The
//! observer runs its own OS thread; the only things that thread may touch
//! are the mutex-protected pending-files set and the captured
//! [`tokio::runtime::Handle`] used to submit the debounce coroutine back
//! onto the scheduler (spec.md §9 "Debouncer thread/scheduler bridge").

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use parking_lot::Mutex as SyncMutex;
use qgate_adapters::ToolAdapter;
use qgate_core::{RunMode, ToolSelection};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::notifier::ScopedNotifier;
use crate::orchestrator::Orchestrator;

const DEBOUNCE_DELAY: Duration = Duration::from_millis(100);
const POLL_INTERVAL: Duration = Duration::from_millis(500);
const OBSERVER_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

const IGNORED_SEGMENTS: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    ".venv",
    "venv",
    "dist",
    "build",
    ".next",
    ".cache",
    "coverage",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    "htmlcov",
    "eggs",
    ".eggs",
    "tmp",
    "temp",
    ".tmp",
    ".swp",
    ".swo",
    "~",
];
const ALLOWED_HIDDEN_SEGMENTS: &[&str] = &[".github", ".gitlab"];
const RELEVANT_EXTENSIONS: &[&str] = &[".py", ".js", ".jsx", ".ts", ".tsx", ".json", ".yaml", ".yml", ".toml"];

struct Shared {
    project_root: PathBuf,
    notifier: ScopedNotifier,
    adapters: Vec<Arc<dyn ToolAdapter>>,
    selection: ToolSelection,
    pending_files: SyncMutex<HashSet<String>>,
    is_analyzing: AtomicBool,
    debounce_task: SyncMutex<Option<tokio::task::JoinHandle<()>>>,
    current_run: SyncMutex<Option<CancellationToken>>,
    stop: CancellationToken,
}

/// Long-lived filesystem observer that converts change bursts into
/// debounced incremental orchestrator runs (spec.md §4.5, §3 "Watcher").
pub struct WatchManager {
    shared: Arc<Shared>,
    observer: SyncMutex<Option<ObserverHandle>>,
}

struct ObserverHandle {
    stop_tx: std::sync::mpsc::Sender<()>,
    join: std::thread::JoinHandle<()>,
}

impl WatchManager {
    pub fn new(
        project_root: PathBuf,
        notifier: ScopedNotifier,
        adapters: Vec<Arc<dyn ToolAdapter>>,
        selection: ToolSelection,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                project_root,
                notifier,
                adapters,
                selection,
                pending_files: SyncMutex::new(HashSet::new()),
                is_analyzing: AtomicBool::new(false),
                debounce_task: SyncMutex::new(None),
                current_run: SyncMutex::new(None),
                stop: CancellationToken::new(),
            }),
            observer: SyncMutex::new(None),
        }
    }

    /// Starts watching: marks running, spawns the polling observer, runs an
    /// initial full analysis, then blocks until [`WatchManager::stop`] is
    /// called (spec.md §4.5 "Startup"). Intended to be driven as a
    /// background task by the Session Controller.
    pub async fn run(self: Arc<Self>) {
        self.shared.notifier.send_log(None, "👁️ Live Watch Mode ACTIVATED").await;

        let handle = Handle::current();
        let observer = spawn_observer(self.shared.clone(), handle);
        *self.observer.lock() = Some(observer);

        self.shared.notifier.send_log(None, "🚀 Running initial full scan...").await;
        self.shared.is_analyzing.store(true, Ordering::SeqCst);
        let cancel = CancellationToken::new();
        *self.shared.current_run.lock() = Some(cancel.clone());
        let orchestrator = Orchestrator::new(
            self.shared.project_root.clone(),
            RunMode::Full,
            self.shared.notifier.clone(),
            self.shared.adapters.clone(),
            &self.shared.selection,
        );
        orchestrator.execute(None, cancel).await;
        *self.shared.current_run.lock() = None;
        self.shared.is_analyzing.store(false, Ordering::SeqCst);

        self.shared.stop.cancelled().await;
    }

    /// Stops watching: cancels any running orchestrator task, stops and
    /// joins the observer thread (5 s timeout), and marks deactivated.
    /// Idempotent (spec.md §4.5 "Stop").
    pub async fn stop(&self) {
        if self.shared.stop.is_cancelled() {
            return;
        }

        if let Some(cancel) = self.shared.current_run.lock().take() {
            cancel.cancel();
        }
        if let Some(task) = self.shared.debounce_task.lock().take() {
            task.abort();
        }

        if let Some(observer) = self.observer.lock().take() {
            let _ = observer.stop_tx.send(());
            let join_result = tokio::task::spawn_blocking(move || observer.join.join());
            if tokio::time::timeout(OBSERVER_JOIN_TIMEOUT, join_result).await.is_err() {
                tracing::warn!("observer thread did not join within timeout");
            }
        }

        self.shared.notifier.send_log(None, "🛑 Live Watch Mode DEACTIVATED").await;
        self.shared.stop.cancel();
    }
}

fn spawn_observer(shared: Arc<Shared>, handle: Handle) -> ObserverHandle {
    let (stop_tx, stop_rx) = std::sync::mpsc::channel::<()>();
    let project_root = shared.project_root.clone();

    let join = std::thread::spawn(move || {
        let cb_shared = shared.clone();
        let cb_handle = handle.clone();
        let config = Config::default().with_poll_interval(POLL_INTERVAL);
        let mut watcher = match notify::PollWatcher::new(
            move |res: notify::Result<NotifyEvent>| on_notify_event(res, &cb_shared, &cb_handle),
            config,
        ) {
            Ok(w) => w,
            Err(err) => {
                tracing::error!(error = %err, "failed to create polling observer");
                return;
            }
        };

        if let Err(err) = watcher.watch(&project_root, RecursiveMode::Recursive) {
            tracing::error!(error = %err, "failed to start polling observer");
            return;
        }

        let _ = stop_rx.recv();
        let _ = watcher.unwatch(&project_root);
    });

    ObserverHandle { stop_tx, join }
}

/// Runs on the observer's own thread. Filters the event, then (under the
/// pending-files mutex) either queues it for the in-flight cycle or
/// rearms the debounce timer.
fn on_notify_event(res: notify::Result<NotifyEvent>, shared: &Arc<Shared>, handle: &Handle) {
    let event = match res {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(error = %err, "observer error");
            return;
        }
    };

    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return;
    }

    for path in &event.paths {
        if path.is_dir() {
            continue;
        }
        let Ok(rel) = path.strip_prefix(&shared.project_root) else {
            continue;
        };
        if !is_relevant(rel) {
            continue;
        }
        let rel_str = rel.to_string_lossy().into_owned();
        handle_change(shared, handle, rel_str);
    }
}

fn is_relevant(rel: &Path) -> bool {
    for segment in rel.iter() {
        let segment = segment.to_string_lossy();
        if IGNORED_SEGMENTS.contains(&segment.as_ref()) {
            return false;
        }
        if segment.starts_with('.') && !ALLOWED_HIDDEN_SEGMENTS.contains(&segment.as_ref()) {
            return false;
        }
    }
    match rel.extension().and_then(|e| e.to_str()) {
        Some(ext) => RELEVANT_EXTENSIONS.iter().any(|allowed| *allowed == format!(".{ext}")),
        None => false,
    }
}

fn handle_change(shared: &Arc<Shared>, handle: &Handle, rel_path: String) {
    let mut pending = shared.pending_files.lock();
    pending.insert(rel_path);

    if shared.is_analyzing.load(Ordering::SeqCst) {
        return;
    }

    if let Some(old) = shared.debounce_task.lock().take() {
        old.abort();
    }

    let shared_for_task = shared.clone();
    let task = handle.spawn(debounce_cycle(shared_for_task));
    *shared.debounce_task.lock() = Some(task);
}

/// Sleeps the debounce delay, then snapshots-and-clears pending files and
/// runs one incremental orchestrator pass, looping to absorb stragglers
/// that arrived mid-run (spec.md §4.5 "Debounce cycle").
async fn debounce_cycle(shared: Arc<Shared>) {
    tokio::time::sleep(DEBOUNCE_DELAY).await;

    loop {
        let snapshot: Vec<String> = {
            let mut pending = shared.pending_files.lock();
            if pending.is_empty() {
                break;
            }
            shared.is_analyzing.store(true, Ordering::SeqCst);
            pending.drain().collect()
        };

        if snapshot.is_empty() {
            break;
        }

        shared
            .notifier
            .send_log(None, format!("🔄 Auto-triggering analysis for {} modified file(s)", snapshot.len()))
            .await;

        let cancel = CancellationToken::new();
        *shared.current_run.lock() = Some(cancel.clone());
        let orchestrator = Orchestrator::new(
            shared.project_root.clone(),
            RunMode::Incremental,
            shared.notifier.clone(),
            shared.adapters.clone(),
            &shared.selection,
        );
        orchestrator.execute(Some(snapshot), cancel).await;
        *shared.current_run.lock() = None;

        shared.is_analyzing.store(false, Ordering::SeqCst);

        let more_pending = !shared.pending_files.lock().is_empty();
        if !more_pending {
            break;
        }
        tokio::time::sleep(DEBOUNCE_DELAY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_hidden_segments_except_allowlisted() {
        assert!(!is_relevant(Path::new(".venv/lib/foo.py")));
        assert!(!is_relevant(Path::new(".hidden/app.py")));
        assert!(is_relevant(Path::new(".github/workflows/ci.yml")));
    }

    #[test]
    fn ignores_known_noise_directories() {
        assert!(!is_relevant(Path::new("node_modules/pkg/index.js")));
        assert!(!is_relevant(Path::new("dist/bundle.js")));
        assert!(!is_relevant(Path::new("__pycache__/mod.pyc")));
    }

    #[test]
    fn accepts_relevant_source_extensions() {
        assert!(is_relevant(Path::new("src/app.py")));
        assert!(is_relevant(Path::new("src/app.tsx")));
        assert!(is_relevant(Path::new("config.toml")));
    }

    #[test]
    fn rejects_unrecognized_extensions() {
        assert!(!is_relevant(Path::new("README.md")));
        assert!(!is_relevant(Path::new("image.png")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn start_then_stop_is_idempotent_and_settles() {
        use qgate_core::SessionId;
        use std::sync::Arc as StdArc;

        let dir = tempfile::tempdir().expect("tempdir");
        let notifier = StdArc::new(crate::notifier::Notifier::new());
        let session = SessionId::new("watch-test");
        let scoped = ScopedNotifier::new(notifier, session);

        let watcher = StdArc::new(WatchManager::new(
            dir.path().to_path_buf(),
            scoped,
            Vec::new(),
            ToolSelection::All,
        ));

        let run_handle = tokio::spawn(watcher.clone().run());
        tokio::time::sleep(Duration::from_millis(50)).await;

        watcher.stop().await;
        watcher.stop().await;

        let _ = tokio::time::timeout(Duration::from_secs(5), run_handle).await;
    }
}
