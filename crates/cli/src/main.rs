// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! qgate - local quality-gate service CLI.
//!
//! Stands in for "the transport" of spec.md §1/§6 purely so the core is
//! runnable and testable end to end: a stdout [`Subscriber`] plays the role
//! of the push channel, and subcommands map directly onto
//! [`SessionController`]'s `start`/`stop`/`list_tools` operations. Routing,
//! HTTP framing, CORS, and the project registry are explicit non-goals of
//! the core and are not built here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use qgate_adapters::ToolRegistry;
use qgate_core::{Event, ModuleId, RunMode, SessionId};
use qgate_engine::{Notifier, SessionController, Subscriber};

#[derive(Parser)]
#[command(name = "qgate", version, about = "Local quality-gate service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run analyzers over a project and stream results to stdout.
    Run(RunArgs),
    /// List the registered analyzer tools.
    Tools,
}

#[derive(Parser)]
struct RunArgs {
    /// Absolute path to the project tree to analyze.
    project_path: PathBuf,

    /// Which mode to run in.
    #[arg(long, value_enum, default_value_t = ModeArg::Full)]
    mode: ModeArg,

    /// Restrict to these tool ids (comma-separated); default is all known tools.
    #[arg(long, value_delimiter = ',')]
    tools: Vec<String>,

    /// Session id to scope events under; a fresh one is generated if omitted.
    #[arg(long)]
    session_id: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Full,
    Incremental,
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tools => run_tools(),
        Commands::Run(args) => run_analysis(args).await,
    }
}

fn run_tools() -> Result<()> {
    let registry = ToolRegistry::with_builtins();
    for tool in registry.list_tools() {
        println!("{:<14} {:<28} {}", tool.id, tool.title, tool.subtitle);
    }
    Ok(())
}

async fn run_analysis(args: RunArgs) -> Result<()> {
    if !args.project_path.is_dir() {
        bail!("project path does not exist or is not a directory: {}", args.project_path.display());
    }

    let notifier = Arc::new(Notifier::new());
    let registry = ToolRegistry::with_builtins();
    let controller = Arc::new(SessionController::new(notifier.clone(), registry));

    let session_id = SessionId::new(args.session_id.unwrap_or_else(default_session_id));
    let (done_tx, done_rx) = tokio::sync::mpsc::unbounded_channel();
    notifier
        .attach(session_id.clone(), Arc::new(StdoutSubscriber { done: done_tx }))
        .await;

    let selected = if args.tools.is_empty() {
        None
    } else {
        Some(args.tools.into_iter().map(ModuleId::new).collect())
    };

    let (mode, watch) = match args.mode {
        ModeArg::Full => (RunMode::Full, false),
        ModeArg::Incremental => (RunMode::Incremental, false),
        ModeArg::Watch => (RunMode::Full, true),
    };

    controller
        .start(session_id.clone(), args.project_path, mode, watch, selected)
        .await
        .context("failed to start analysis")?;

    if watch {
        tokio::signal::ctrl_c().await.context("failed to wait for ctrl-c")?;
        controller.stop(&session_id).await;
    } else {
        // Hold the process open until the stdout subscriber has observed
        // `GLOBAL_END`; a real transport would instead keep the push-channel
        // connection open for as long as the client stays attached.
        wait_for_global_end(done_rx).await;
    }

    Ok(())
}

async fn wait_for_global_end(mut done_rx: tokio::sync::mpsc::UnboundedReceiver<()>) {
    let _ = done_rx.recv().await;
}

fn default_session_id() -> String {
    format!("cli-{}", std::process::id())
}

/// Writes every event as a JSON line to stdout, matching spec.md §6's
/// outbound wire shape, and signals `done` once `GLOBAL_END` arrives.
struct StdoutSubscriber {
    done: tokio::sync::mpsc::UnboundedSender<()>,
}

#[async_trait]
impl Subscriber for StdoutSubscriber {
    async fn send(&self, event: &Event) -> Result<(), String> {
        let line = serde_json::to_string(event).map_err(|e| e.to_string())?;
        println!("{line}");
        if matches!(event, Event::GlobalEnd { .. }) {
            let _ = self.done.send(());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_id_embeds_pid() {
        let id = default_session_id();
        assert!(id.starts_with("cli-"));
        assert_eq!(id, format!("cli-{}", std::process::id()));
    }

    #[yare::parameterized(
        full = { ModeArg::Full, RunMode::Full, false },
        incremental = { ModeArg::Incremental, RunMode::Incremental, false },
        watch = { ModeArg::Watch, RunMode::Full, true },
    )]
    fn mode_arg_maps_to_run_mode_and_watch_flag(arg: ModeArg, expected_mode: RunMode, expected_watch: bool) {
        let (mode, watch) = match arg {
            ModeArg::Full => (RunMode::Full, false),
            ModeArg::Incremental => (RunMode::Incremental, false),
            ModeArg::Watch => (RunMode::Full, true),
        };
        assert_eq!(mode, expected_mode);
        assert_eq!(watch, expected_watch);
    }

    #[tokio::test]
    async fn run_analysis_rejects_nonexistent_project_path() {
        let args = RunArgs {
            project_path: PathBuf::from("/definitely/not/a/real/qgate/path"),
            mode: ModeArg::Full,
            tools: Vec::new(),
            session_id: None,
        };
        let result = run_analysis(args).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn run_analysis_rejects_a_file_as_project_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file_path = dir.path().join("not_a_dir.txt");
        std::fs::write(&file_path, "x").expect("write scratch file");

        let args = RunArgs {
            project_path: file_path,
            mode: ModeArg::Full,
            tools: Vec::new(),
            session_id: None,
        };
        let result = run_analysis(args).await;
        assert!(result.is_err());
    }
}
