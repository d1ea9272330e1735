//! # History File Management
//!
//! Resolves where interactive history is kept. By default it lives in
//! `~/.bayeslite_history`.
//!
//! ## Configuration
//!
//! The location can be overridden with the `BAYESLITE_HISTORY` environment
//! variable:
//!
//! ```bash
//! export BAYESLITE_HISTORY=/custom/path/history
//! bayeslite ./mydb.bdb
//! ```
//!
//! Setting it to an empty string disables history persistence.
//!
//! The path is resolved once at startup and handed to rustyline, which does
//! the file I/O.

use crate::config::{DEFAULT_HISTORY_FILE, HISTORY_ENV_VAR};
use std::env;
use std::path::PathBuf;

pub fn history_path() -> Option<PathBuf> {
    if let Ok(custom_path) = env::var(HISTORY_ENV_VAR) {
        if custom_path.is_empty() {
            return None;
        }
        return Some(PathBuf::from(custom_path));
    }

    home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE))
}

pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test touches the variable so parallel tests never race on it.
    #[test]
    fn history_path_follows_env_override() {
        env::remove_var(HISTORY_ENV_VAR);
        if let Some(path) = history_path() {
            assert!(path.to_string_lossy().ends_with(".bayeslite_history"));
        }

        env::set_var(HISTORY_ENV_VAR, "/custom/path");
        assert_eq!(history_path(), Some(PathBuf::from("/custom/path")));

        env::set_var(HISTORY_ENV_VAR, "");
        assert_eq!(history_path(), None);

        env::remove_var(HISTORY_ENV_VAR);
    }
}
