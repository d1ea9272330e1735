//! # Shell Errors
//!
//! Every failure that can happen while handling one input unit is a
//! `ShellError`. The dispatcher never lets one escape: it is rendered as a
//! single `Error: …` line (or `Usage: …` for usage errors) and the shell
//! reads the next line.
//!
//! ## Taxonomy
//!
//! | Variant             | Raised when                                      |
//! |---------------------|--------------------------------------------------|
//! | `UnknownCommand`    | a directive name is not registered               |
//! | `Usage`             | a directive got the wrong number of arguments    |
//! | `UnknownArgument`   | a directive argument is not one of its choices   |
//! | `Domain`            | the engine reported a failure                    |
//! | `DuplicateCommand`  | a registration collides with an existing name    |
//! | `InvalidHook`       | a hook source fails validation                   |
//! | `Io`                | a script or hook file cannot be read             |
//! | `ReadDepthExceeded` | `.read` scripts nest too deeply                  |
//! | `Output`            | writing to the output sink failed                |
//! | `Internal`          | the shell reached a state it should not          |
//!
//! An incomplete statement is not an error; the accumulator simply keeps it.

use crate::engine::EngineError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Unknown command: .{0}. Type .help for available commands.")]
    UnknownCommand(String),

    #[error("Usage: {usage}")]
    Usage { usage: String },

    #[error("Unknown argument to .{command}: {argument}")]
    UnknownArgument { command: String, argument: String },

    #[error(transparent)]
    Domain(#[from] EngineError),

    #[error("Command already registered: .{0}")]
    DuplicateCommand(String),

    #[error("Invalid hook file {}: {reason}", path.display())]
    InvalidHook { path: PathBuf, reason: String },

    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(".read nesting exceeds {0} levels")]
    ReadDepthExceeded(usize),

    #[error("Output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShellError {
    pub fn usage(usage: impl Into<String>) -> Self {
        ShellError::Usage {
            usage: usage.into(),
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, ShellError::Usage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_displays_usage_line() {
        let err = ShellError::usage(".csv <table> </path/to/data.csv>");
        assert_eq!(err.to_string(), "Usage: .csv <table> </path/to/data.csv>");
        assert!(err.is_usage());
    }

    #[test]
    fn domain_error_is_transparent() {
        let err = ShellError::from(EngineError::NoSuchGenerator("dha".to_string()));
        assert_eq!(err.to_string(), "No such generator: dha");
    }
}
