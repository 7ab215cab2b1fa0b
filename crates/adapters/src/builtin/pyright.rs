// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Python strict type checker adapter (`B_Pyright`), grounded in
//! `PyrightModule` / `test_pyright_module`.

use std::path::Path;

use crate::adapter::{filter_relevant, BuildCommandResult, ToolAdapter, ToolMetadata};
use crate::probe::{find_config_dir, ConfigLocation};
use crate::subprocess::unbuffer_python;

const EXTENSIONS: &[&str] = &[".py"];

#[derive(Debug, Default)]
pub struct PyrightAdapter;

impl ToolAdapter for PyrightAdapter {
    fn id(&self) -> &'static str {
        "B_Pyright"
    }

    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            id: "B_Pyright",
            title: "Pyright Strict Types",
            subtitle: "python -m pyright",
            icon: "pyright",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn build_command(&self, project_root: &Path, files: Option<&[String]>) -> BuildCommandResult {
        let target: Vec<String> = if let Some(files) = files {
            let relevant = filter_relevant(files, EXTENSIONS);
            if relevant.is_empty() {
                return BuildCommandResult::skip();
            }
            relevant.into_iter().map(str::to_string).collect()
        } else {
            vec![".".to_string()]
        };

        let mut argv = vec!["python3".to_string(), "-m".to_string(), "pyright".to_string()];
        argv.extend(target);
        unbuffer_python(&mut argv);

        match find_config_dir(project_root, &["pyproject.toml", "pyrightconfig.json"]) {
            ConfigLocation::Root => BuildCommandResult::run(argv),
            ConfigLocation::Subdir(rel) => BuildCommandResult::run_with_warning(
                argv,
                format!("pyright config not found at project root; found in {}", rel.display()),
            ),
            ConfigLocation::Missing => {
                BuildCommandResult::run_with_warning(argv, "no pyright config found; running in basic mode")
            }
        }
    }

    fn summarize(&self, stdout: &str, _stderr: &str, exit_code: i32) -> String {
        if exit_code == 0 {
            return "✅ No type errors (strict mode)".to_string();
        }

        match extract_error_count(stdout) {
            Some(count) => format!("❌ {count} type error(s) found"),
            None => "❌ Type checking failed".to_string(),
        }
    }
}

/// Parses "N errors, M warnings"-shaped pyright summary lines.
fn extract_error_count(text: &str) -> Option<u32> {
    let (before, _) = text.split_once(" error")?;
    let digits: String = before
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn build_command_adds_unbuffered_flag() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pyproject.toml"), "").unwrap();
        let adapter = PyrightAdapter;
        let result = adapter.build_command(dir.path(), None);
        assert_eq!(result.argv, vec!["python3", "-u", "-m", "pyright", "."]);
    }

    #[test]
    fn summary_counts_errors() {
        let adapter = PyrightAdapter;
        assert_eq!(
            adapter.summarize("2 errors, 0 warnings", "", 1),
            "❌ 2 type error(s) found"
        );
        assert_eq!(adapter.summarize("", "", 0), "✅ No type errors (strict mode)");
    }
}
