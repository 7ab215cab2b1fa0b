// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TypeScript compiler adapter (`F_TypeScript`), grounded in
//! `TypeScriptModule` from `modules.py` / `test_typescript_module`.

use std::path::Path;

use crate::adapter::{filter_relevant, BuildCommandResult, ToolAdapter, ToolMetadata};
use crate::probe::{find_config_dir, ConfigLocation};

const EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];

#[derive(Debug, Default)]
pub struct TypeScriptAdapter;

impl ToolAdapter for TypeScriptAdapter {
    fn id(&self) -> &'static str {
        "F_TypeScript"
    }

    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            id: "F_TypeScript",
            title: "TypeScript Type Check",
            subtitle: "tsc --noEmit",
            icon: "typescript",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn build_command(&self, project_root: &Path, files: Option<&[String]>) -> BuildCommandResult {
        if let Some(files) = files {
            if filter_relevant(files, EXTENSIONS).is_empty() {
                return BuildCommandResult::skip();
            }
        }

        let mut argv = vec!["npx".to_string(), "tsc".to_string(), "--noEmit".to_string()];

        match find_config_dir(project_root, &["tsconfig.json"]) {
            ConfigLocation::Root => BuildCommandResult::run(argv),
            ConfigLocation::Subdir(rel) => {
                let project_flag = rel.join("tsconfig.json").to_string_lossy().into_owned();
                argv.push("-p".to_string());
                argv.push(project_flag);
                BuildCommandResult::run_with_warning(
                    argv,
                    format!("tsconfig.json not found at project root; using {}", rel.display()),
                )
            }
            ConfigLocation::Missing => BuildCommandResult::run_with_warning(
                argv,
                "tsconfig.json not found; running tsc with defaults",
            ),
        }
    }

    fn summarize(&self, stdout: &str, stderr: &str, exit_code: i32) -> String {
        if exit_code == 0 {
            return "✅ No type errors found".to_string();
        }

        let combined = format!("{stdout}\n{stderr}");
        let error_count = combined
            .lines()
            .filter(|line| line.contains("error TS"))
            .count();

        if error_count > 0 {
            format!("❌ {error_count} type error(s) found")
        } else {
            "❌ Type checking failed".to_string()
        }
    }
}
