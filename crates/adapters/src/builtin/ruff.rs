// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Python linter adapter (`B_Ruff`), grounded in `RuffModule` /
//! `test_ruff_module`.

use std::path::Path;

use crate::adapter::{filter_relevant, BuildCommandResult, ToolAdapter, ToolMetadata};
use crate::probe::{find_config_dir, ConfigLocation};

const EXTENSIONS: &[&str] = &[".py"];

#[derive(Debug, Default)]
pub struct RuffAdapter;

impl ToolAdapter for RuffAdapter {
    fn id(&self) -> &'static str {
        "B_Ruff"
    }

    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            id: "B_Ruff",
            title: "Ruff Lint & Format",
            subtitle: "ruff check .",
            icon: "ruff",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn build_command(&self, project_root: &Path, files: Option<&[String]>) -> BuildCommandResult {
        if let Some(files) = files {
            let relevant = filter_relevant(files, EXTENSIONS);
            if relevant.is_empty() {
                return BuildCommandResult::skip();
            }
            let mut argv = vec!["ruff".to_string(), "check".to_string()];
            argv.extend(relevant.into_iter().map(str::to_string));
            return BuildCommandResult::run(argv);
        }

        let argv = vec!["ruff".to_string(), "check".to_string(), ".".to_string()];
        match find_config_dir(project_root, &["pyproject.toml", "ruff.toml", ".ruff.toml"]) {
            ConfigLocation::Root => BuildCommandResult::run(argv),
            ConfigLocation::Subdir(rel) => BuildCommandResult::run_with_warning(
                argv,
                format!("pyproject.toml not found at project root; Ruff config may live in {}", rel.display()),
            ),
            ConfigLocation::Missing => {
                BuildCommandResult::run_with_warning(argv, "no pyproject.toml found; running ruff with defaults")
            }
        }
    }

    fn summarize(&self, stdout: &str, _stderr: &str, exit_code: i32) -> String {
        if exit_code == 0 {
            return "✅ No linting issues".to_string();
        }

        match extract_found_count(stdout) {
            Some(count) => format!("❌ {count} issue(s) found"),
            None => "❌ Ruff check failed".to_string(),
        }
    }
}

/// Parses the digits following a case-insensitive "found" in the output,
/// e.g. "Found 2 errors." -> `Some(2)`. No regex needed for this one shape.
fn extract_found_count(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    let after = lower.split("found ").nth(1)?;
    let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn build_command_is_static_in_full_mode() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pyproject.toml"), "").unwrap();
        let adapter = RuffAdapter;
        let result = adapter.build_command(dir.path(), None);
        assert_eq!(result.argv, vec!["ruff", "check", "."]);
    }

    #[test]
    fn incremental_mode_lists_python_files() {
        let dir = tempdir().unwrap();
        let adapter = RuffAdapter;
        let result = adapter.build_command(dir.path(), Some(&["a.py".to_string(), "b.ts".to_string()]));
        assert_eq!(result.argv, vec!["ruff", "check", "a.py"]);
    }

    #[test]
    fn summary_matches_found_count() {
        let adapter = RuffAdapter;
        assert_eq!(adapter.summarize("Found 2 errors.", "", 1), "❌ 2 issue(s) found");
        assert_eq!(adapter.summarize("", "", 0), "✅ No linting issues");
    }
}
