// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ESLint-style JS/TS linter adapter (`F_ESLint`), grounded in
//! `ESLintModule` / `test_eslint_module*`.

use std::path::Path;

use crate::adapter::{filter_relevant, BuildCommandResult, ToolAdapter, ToolMetadata};
use crate::probe::{find_config_dir, ConfigLocation};

const EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];
const CONFIG_NAMES: &[&str] = &[
    ".eslintrc.json",
    ".eslintrc.js",
    ".eslintrc.yml",
    ".eslintrc.yaml",
    ".eslintrc",
    "eslint.config.js",
    "eslint.config.mjs",
];

#[derive(Debug, Default)]
pub struct EsLintAdapter;

impl ToolAdapter for EsLintAdapter {
    fn id(&self) -> &'static str {
        "F_ESLint"
    }

    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            id: "F_ESLint",
            title: "ESLint Quality",
            subtitle: "eslint --format json",
            icon: "eslint",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn build_command(&self, project_root: &Path, files: Option<&[String]>) -> BuildCommandResult {
        let base = vec![
            "npx".to_string(),
            "eslint".to_string(),
            "--format".to_string(),
            "json".to_string(),
            "--no-error-on-unmatched-pattern".to_string(),
            "--ext".to_string(),
            ".js,.jsx,.ts,.tsx".to_string(),
        ];

        let config = find_config_dir(project_root, CONFIG_NAMES);
        if config == ConfigLocation::Missing {
            return BuildCommandResult {
                argv: vec![],
                config_warning: Some("no ESLint configuration found; skipping".to_string()),
            };
        }

        let mut argv = base;
        if let Some(files) = files {
            let relevant = filter_relevant(files, EXTENSIONS);
            if relevant.is_empty() {
                return BuildCommandResult::skip();
            }
            argv.extend(relevant.into_iter().map(str::to_string));
        } else {
            let target = if project_root.join("src").is_dir() {
                "src/"
            } else {
                "."
            };
            argv.push(target.to_string());
        }

        match config {
            ConfigLocation::Subdir(rel) => BuildCommandResult::run_with_warning(
                argv,
                format!("ESLint config not found at project root; using {}", rel.display()),
            ),
            _ => BuildCommandResult::run(argv),
        }
    }

    fn summarize(&self, stdout: &str, _stderr: &str, _exit_code: i32) -> String {
        let Ok(entries) = serde_json::from_str::<serde_json::Value>(stdout) else {
            return "❌ ESLint check failed".to_string();
        };
        let Some(entries) = entries.as_array() else {
            return "❌ ESLint check failed".to_string();
        };

        let mut errors = 0u64;
        let mut warnings = 0u64;
        for entry in entries {
            errors += entry.get("errorCount").and_then(serde_json::Value::as_u64).unwrap_or(0);
            warnings += entry
                .get("warningCount")
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(0);
        }

        if errors == 0 && warnings == 0 {
            "✅ No linting issues".to_string()
        } else {
            format!("❌ {errors} error(s), {warnings} warning(s)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn adapter_with_config() -> (tempfile::TempDir, EsLintAdapter) {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join(".eslintrc.json"), "{}").unwrap();
        (dir, EsLintAdapter)
    }

    #[test]
    fn full_mode_targets_src_directory() {
        let (dir, adapter) = adapter_with_config();
        let result = adapter.build_command(dir.path(), None);
        assert_eq!(
            result.argv,
            vec![
                "npx",
                "eslint",
                "--format",
                "json",
                "--no-error-on-unmatched-pattern",
                "--ext",
                ".js,.jsx,.ts,.tsx",
                "src/",
            ]
        );
    }

    #[test]
    fn incremental_mode_keeps_only_relevant_files() {
        let (dir, adapter) = adapter_with_config();
        let cmd = adapter.build_command(
            dir.path(),
            Some(&["file1.ts".to_string(), "file2.js".to_string(), "readme.md".to_string()]),
        );
        assert!(cmd.argv.contains(&"file1.ts".to_string()));
        assert!(cmd.argv.contains(&"file2.js".to_string()));
        assert!(!cmd.argv.contains(&"readme.md".to_string()));
    }

    #[test]
    fn skips_when_no_relevant_files() {
        let (dir, adapter) = adapter_with_config();
        let cmd = adapter.build_command(dir.path(), Some(&["readme.md".to_string()]));
        assert!(cmd.is_skip());
    }

    #[test]
    fn skips_when_config_missing() {
        let dir = tempdir().unwrap();
        let adapter = EsLintAdapter;
        let cmd = adapter.build_command(dir.path(), None);
        assert!(cmd.is_skip());
        assert!(cmd.config_warning.is_some());
    }

    #[test]
    fn summary_counts_errors_and_warnings() {
        let adapter = EsLintAdapter;
        assert_eq!(adapter.summarize("[]", "", 0), "✅ No linting issues");
        assert_eq!(adapter.summarize("Not JSON", "", 1), "❌ ESLint check failed");
        let json = serde_json::json!([{"errorCount": 1, "warningCount": 0}]).to_string();
        assert_eq!(adapter.summarize(&json, "", 1), "❌ 1 error(s), 0 warning(s)");
    }
}
