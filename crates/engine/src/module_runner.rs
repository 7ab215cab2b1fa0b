// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module Runner: drives one tool adapter's subprocess end to end
//! (spec.md §4.3). The finally-path invariant — the child process must be
//! verified exited before `run` returns, on every path — is the whole
//! point of this module; everything else is plumbing around it.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use flate2::write::GzEncoder;
use flate2::Compression;
use parking_lot::Mutex as SyncMutex;
use qgate_adapters::ToolAdapter;
use qgate_core::{ModuleId, ModuleOutcome, ModuleStatus, StreamEncoding};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::log_parser;
use crate::notifier::ScopedNotifier;

const READER_CHUNK_SIZE: usize = 8 * 1024;
const CAPTURE_CAP: usize = 64 * 1024;
const STREAM_FLUSH_SIZE: usize = 32 * 1024;
const STREAM_FLUSH_INTERVAL: Duration = Duration::from_millis(100);
const GZIP_THRESHOLD: usize = 1024;
const TERMINATE_GRACE: Duration = Duration::from_secs(2);
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs one [`ToolAdapter`]'s command against a project, reporting progress
/// through a [`ScopedNotifier`].
pub struct ModuleRunner {
    adapter: Arc<dyn ToolAdapter>,
    notifier: ScopedNotifier,
    project_root: PathBuf,
}

enum Outcome {
    Ran {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
    Cancelled,
}

enum ExitReason {
    Exited,
    Cancelled,
}

impl ModuleRunner {
    pub fn new(adapter: Arc<dyn ToolAdapter>, notifier: ScopedNotifier, project_root: PathBuf) -> Self {
        Self {
            adapter,
            notifier,
            project_root,
        }
    }

    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(self.adapter.id())
    }

    /// Builds, runs, and reports on this module's command. Returns the
    /// single-use terminal status (`Pass`/`Fail`) or `Skipped` if the
    /// adapter declined to build a command at all.
    pub async fn run(&self, files: Option<&[String]>, cancel: CancellationToken) -> ModuleStatus {
        let module_id = self.module_id();
        let build = self.adapter.build_command(&self.project_root, files);
        if build.is_skip() {
            return ModuleStatus::Skipped;
        }

        self.notifier.send_init(module_id.clone()).await;
        if let Some(warning) = build.config_warning.clone() {
            self.notifier.send_log(Some(module_id.clone()), warning).await;
        }
        self.notifier
            .send_log(Some(module_id.clone()), format!("$ {}", build.argv.join(" ")))
            .await;

        match self.execute(&module_id, &build.argv, &cancel).await {
            Ok(Outcome::Ran {
                exit_code,
                stdout,
                stderr,
            }) => {
                let status = if exit_code == 0 { ModuleStatus::Pass } else { ModuleStatus::Fail };
                let summary = self.adapter.summarize(&stdout, &stderr, exit_code);

                let combined = format!("{stdout}\n{stderr}");
                let report = log_parser::parse(&combined, Some(self.adapter.id()));
                self.notifier.send_metrics(module_id.clone(), report).await;

                let outcome = if status == ModuleStatus::Pass {
                    ModuleOutcome::Pass
                } else {
                    ModuleOutcome::Fail
                };
                self.notifier.send_end(module_id.clone(), outcome, summary).await;
                status
            }
            Ok(Outcome::Cancelled) => {
                self.notifier
                    .send_end(module_id.clone(), ModuleOutcome::Fail, "cancelled")
                    .await;
                // The CancellationToken stays cancelled; the caller already
                // holds the handle that triggered it and observes this same
                // state, so there is nothing further to re-raise here.
                ModuleStatus::Fail
            }
            Err(err) => {
                self.notifier.send_error(Some(module_id.clone()), err.to_string()).await;
                self.notifier
                    .send_end(module_id.clone(), ModuleOutcome::Fail, format!("Exception: {err}"))
                    .await;
                ModuleStatus::Fail
            }
        }
    }

    async fn execute(
        &self,
        module_id: &ModuleId,
        argv: &[String],
        cancel: &CancellationToken,
    ) -> Result<Outcome, EngineError> {
        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Hard backstop for the process-reap invariant: if this `Child`
            // is ever dropped before `ensure_child_exited` runs (a task
            // abort, a panic unwinding past this frame), tokio kills the
            // process instead of leaving it to run unattended.
            .kill_on_drop(true);

        let mut child = command.spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Internal("child stdout was not piped".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::Internal("child stderr was not piped".to_string()))?;

        let stdout_capture = Arc::new(SyncMutex::new(String::new()));
        let stderr_capture = Arc::new(SyncMutex::new(String::new()));
        let (tx, rx) = mpsc::unbounded_channel::<String>();

        let mut readers = JoinSet::new();
        readers.spawn(read_stream(stdout, stdout_capture.clone(), tx.clone()));
        readers.spawn(read_stream(stderr, stderr_capture.clone(), tx.clone()));

        let sender_handle = tokio::spawn(run_sender(rx, self.notifier.clone(), module_id.clone()));

        let reason = wait_with_cancellation(&mut child, &mut readers, cancel).await;
        let exit_status = ensure_child_exited(&mut child).await;

        if tokio::time::timeout(READER_DRAIN_TIMEOUT, drain(&mut readers))
            .await
            .is_err()
        {
            tracing::warn!(%module_id, "reader tasks did not drain in time, aborting");
            readers.abort_all();
        }

        // Dropping our clone releases the last sender reference once both
        // reader tasks have (by now) dropped theirs, which closes `rx` and
        // lets the sender task's own loop end and flush.
        drop(tx);
        let _ = sender_handle.await;

        match reason {
            ExitReason::Cancelled => Ok(Outcome::Cancelled),
            ExitReason::Exited => {
                let exit_code = exit_status.and_then(|s| s.code()).unwrap_or(-1);
                let stdout = stdout_capture.lock().clone();
                let stderr = stderr_capture.lock().clone();
                Ok(Outcome::Ran {
                    exit_code,
                    stdout,
                    stderr,
                })
            }
        }
    }
}

async fn drain(readers: &mut JoinSet<std::io::Result<()>>) {
    while readers.join_next().await.is_some() {}
}

/// Races the child's exit against cancellation, logging (but not acting on)
/// readers that finish early — a reader finishing cleanly while the process
/// still runs is expected, not an end condition.
async fn wait_with_cancellation(
    child: &mut Child,
    readers: &mut JoinSet<std::io::Result<()>>,
    cancel: &CancellationToken,
) -> ExitReason {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return ExitReason::Cancelled,
            status = child.wait() => {
                if let Err(err) = status {
                    tracing::warn!(error = %err, "error waiting for child process");
                }
                return ExitReason::Exited;
            }
            joined = readers.join_next(), if !readers.is_empty() => {
                match joined {
                    Some(Ok(Err(err))) => tracing::warn!(error = %err, "reader task failed"),
                    Some(Err(join_err)) => tracing::warn!(error = %join_err, "reader task panicked"),
                    _ => {}
                }
            }
        }
    }
}

/// The finally-path invariant: whatever reason we stopped waiting for, make
/// sure the child is actually gone. Terminate, give it a grace window, then
/// kill outright.
async fn ensure_child_exited(child: &mut Child) -> Option<std::process::ExitStatus> {
    if let Ok(Some(status)) = child.try_wait() {
        return Some(status);
    }

    #[cfg(unix)]
    if let Some(pid) = child.id() {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;
        let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
    }
    #[cfg(not(unix))]
    {
        let _ = child.start_kill();
    }

    match tokio::time::timeout(TERMINATE_GRACE, child.wait()).await {
        Ok(Ok(status)) => Some(status),
        _ => {
            let _ = child.start_kill();
            child.wait().await.ok()
        }
    }
}

async fn read_stream<R>(mut reader: R, capture: Arc<SyncMutex<String>>, tx: mpsc::UnboundedSender<String>) -> std::io::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READER_CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
        {
            let mut captured = capture.lock();
            for ch in chunk.chars() {
                if captured.len() + ch.len_utf8() > CAPTURE_CAP {
                    break;
                }
                captured.push(ch);
            }
        }
        let _ = tx.send(chunk);
    }
    Ok(())
}

/// Batches queued chunks and flushes them as `STREAM` events: whichever
/// comes first of the 32 KiB size threshold or the 100 ms quiet window.
async fn run_sender(mut rx: mpsc::UnboundedReceiver<String>, notifier: ScopedNotifier, module_id: ModuleId) {
    let mut batch = String::new();
    let mut deadline: Option<tokio::time::Instant> = None;

    loop {
        let sleep = async {
            match deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            chunk = rx.recv() => {
                match chunk {
                    Some(c) => {
                        if batch.is_empty() {
                            deadline = Some(tokio::time::Instant::now() + STREAM_FLUSH_INTERVAL);
                        }
                        batch.push_str(&c);
                        if batch.len() >= STREAM_FLUSH_SIZE {
                            flush_batch(&notifier, &module_id, &mut batch).await;
                            deadline = None;
                        }
                    }
                    None => {
                        if !batch.is_empty() {
                            flush_batch(&notifier, &module_id, &mut batch).await;
                        }
                        break;
                    }
                }
            }
            _ = sleep => {
                if !batch.is_empty() {
                    flush_batch(&notifier, &module_id, &mut batch).await;
                }
                deadline = None;
            }
        }
    }
}

async fn flush_batch(notifier: &ScopedNotifier, module_id: &ModuleId, batch: &mut String) {
    let data = std::mem::take(batch);
    if data.len() > GZIP_THRESHOLD {
        match gzip_base64(&data) {
            Ok(encoded) => {
                notifier
                    .send_stream(module_id.clone(), encoded, Some(StreamEncoding::GzipBase64))
                    .await;
                return;
            }
            Err(err) => tracing::warn!(error = %err, "gzip encoding of stream batch failed, sending raw"),
        }
    }
    notifier.send_stream(module_id.clone(), data, None).await;
}

fn gzip_base64(data: &str) -> std::io::Result<String> {
    use std::io::Write;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(BASE64.encode(compressed))
}
