// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration-file probing with monorepo fallback (spec.md §4.2).
//!
//! Adapters call [`find_config_dir`] to locate their well-known config
//! file. If it isn't at the project root, the first immediate
//! subdirectory that has one is used instead ("monorepo fallback"); the
//! adapter is expected to turn that into a `config_warning` describing
//! where it found (or failed to find) configuration.

use std::path::{Path, PathBuf};

/// Where an adapter's configuration file was found, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Found directly in the project root.
    Root,
    /// Found in this immediate subdirectory of the project root (relative).
    Subdir(PathBuf),
    /// None of the candidate file names exist at the root or in any
    /// immediate subdirectory.
    Missing,
}

/// Probe `project_root` and its immediate subdirectories for any of
/// `file_names`. Root is checked first; subdirectories are visited in
/// directory-listing order (not sorted — this mirrors a plain `os.listdir`
/// scan, and the contract only promises "first one found").
pub fn find_config_dir(project_root: &Path, file_names: &[&str]) -> ConfigLocation {
    if file_names.iter().any(|f| project_root.join(f).is_file()) {
        return ConfigLocation::Root;
    }

    let Ok(entries) = std::fs::read_dir(project_root) else {
        return ConfigLocation::Missing;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() && file_names.iter().any(|f| path.join(f).is_file()) {
            let rel = path
                .strip_prefix(project_root)
                .unwrap_or(&path)
                .to_path_buf();
            return ConfigLocation::Subdir(rel);
        }
    }

    ConfigLocation::Missing
}
