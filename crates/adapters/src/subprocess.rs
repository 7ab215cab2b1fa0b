// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter-level subprocess command helpers.

/// Insert Python's `-u` (unbuffered stdout/stderr) flag right after the
/// interpreter, for adapters whose command starts with `python`/`python3`.
///
/// Grounded in `base_module.py`'s unconditional insertion (SPEC_FULL §3.3);
/// here it's opt-in per adapter rather than baked into the generic Module
/// Runner, so an adapter that already assembled `-u` itself never gets it
/// twice.
pub fn unbuffer_python(argv: &mut Vec<String>) {
    if matches!(argv.first().map(String::as_str), Some("python") | Some("python3")) {
        argv.insert(1, "-u".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_dash_u_after_interpreter() {
        let mut argv = vec!["python3".to_string(), "-m".to_string(), "pyright".to_string()];
        unbuffer_python(&mut argv);
        assert_eq!(argv, vec!["python3", "-u", "-m", "pyright"]);
    }

    #[test]
    fn leaves_non_python_commands_untouched() {
        let mut argv = vec!["ruff".to_string(), "check".to_string()];
        unbuffer_python(&mut argv);
        assert_eq!(argv, vec!["ruff", "check"]);
    }
}
