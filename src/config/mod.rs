//! # Shell Configuration
//!
//! `ShellConfig` collects everything a session can be started with: the
//! prompts, the debug and quiet switches, and where the init and history
//! files live. The binary fills it from command-line arguments; tests build
//! it directly with the `with_*` helpers.
//!
//! ## Init File
//!
//! The init file is an ordinary script run before the first prompt:
//!
//! | `InitFile`        | Behavior                                        |
//! |-------------------|-------------------------------------------------|
//! | `Disabled`        | nothing is run (`--no-init-file`)               |
//! | `Default`         | `~/.bayesliterc` if it exists, silently skipped |
//! | `Path(p)`         | `p`, which must exist                           |
//!
//! ## Module Organization
//!
//! - [`constants`]: prompts, markers and limits

pub mod constants;
pub use constants::*;

use crate::cli::history::home_dir;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitFile {
    Disabled,
    Default,
    Path(PathBuf),
}

impl InitFile {
    /// Returns the file to run and whether a missing file is an error.
    pub fn resolve(&self) -> Option<(PathBuf, bool)> {
        match self {
            InitFile::Disabled => None,
            InitFile::Default => home_dir().map(|home| (home.join(DEFAULT_INIT_FILE), false)),
            InitFile::Path(path) => Some((path.clone(), true)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub prompt: String,
    pub continuation_prompt: String,
    /// Prints the `.read` completion marker and full error chains.
    pub debug: bool,
    pub quiet: bool,
    pub init_file: InitFile,
    pub history_file: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: PRIMARY_PROMPT.to_string(),
            continuation_prompt: CONTINUATION_PROMPT.to_string(),
            debug: false,
            quiet: false,
            init_file: InitFile::Default,
            history_file: None,
        }
    }
}

impl ShellConfig {
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_init_file(mut self, init_file: InitFile) -> Self {
        self.init_file = init_file;
        self
    }

    pub fn with_history_file(mut self, history_file: Option<PathBuf>) -> Self {
        self.history_file = history_file;
        self
    }
}
