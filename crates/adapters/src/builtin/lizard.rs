// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-language complexity checker adapter (`B_Lizard`), grounded in
//! `LizardModule` / `test_lizard_module`.

use std::path::Path;

use crate::adapter::{filter_relevant, BuildCommandResult, ToolAdapter, ToolMetadata};
use crate::subprocess::unbuffer_python;

const EXTENSIONS: &[&str] = &[".py", ".ts", ".tsx", ".js", ".jsx", ".cpp", ".h"];
const CCN_THRESHOLD: &str = "15";

#[derive(Debug, Default)]
pub struct LizardAdapter;

impl ToolAdapter for LizardAdapter {
    fn id(&self) -> &'static str {
        "B_Lizard"
    }

    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            id: "B_Lizard",
            title: "Lizard Complexity",
            subtitle: "lizard --CCN 15",
            icon: "lizard",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn build_command(&self, _project_root: &Path, files: Option<&[String]>) -> BuildCommandResult {
        let target: Vec<String> = if let Some(files) = files {
            let relevant = filter_relevant(files, EXTENSIONS);
            if relevant.is_empty() {
                return BuildCommandResult::skip();
            }
            relevant.into_iter().map(str::to_string).collect()
        } else {
            vec![".".to_string()]
        };

        let mut argv = vec![
            "python3".to_string(),
            "-m".to_string(),
            "lizard".to_string(),
            "--CCN".to_string(),
            CCN_THRESHOLD.to_string(),
        ];
        argv.extend(target);
        unbuffer_python(&mut argv);

        // Lizard needs no configuration file; it always runs.
        BuildCommandResult::run(argv)
    }

    fn summarize(&self, stdout: &str, _stderr: &str, exit_code: i32) -> String {
        if exit_code == 0 && stdout.trim().is_empty() {
            return format!("✅ All functions under complexity {CCN_THRESHOLD}");
        }

        let exceeding = stdout
            .lines()
            .filter(|line| line.trim_start().starts_with("warning") || line.trim_start().starts_with("!!"))
            .count();

        if exceeding > 0 {
            format!("❌ {exceeding} function(s) exceed complexity {CCN_THRESHOLD}")
        } else {
            format!("✅ All functions under complexity {CCN_THRESHOLD}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn build_command_has_ccn_threshold() {
        let dir = tempdir().unwrap();
        let adapter = LizardAdapter;
        let result = adapter.build_command(dir.path(), None);
        assert!(result.argv.contains(&"python3".to_string()));
        assert!(result.argv.contains(&"-m".to_string()));
        assert!(result.argv.contains(&"lizard".to_string()));
        assert!(result.argv.contains(&"--CCN".to_string()));
        assert!(result.argv.contains(&"15".to_string()));
    }

    #[test]
    fn summary_counts_exceeding_functions() {
        let adapter = LizardAdapter;
        let output = "warning: function too complex\n!! another complex function";
        assert_eq!(
            adapter.summarize(output, "", 1),
            "❌ 2 function(s) exceed complexity 15"
        );
        assert_eq!(adapter.summarize("", "", 0), "✅ All functions under complexity 15");
    }
}
