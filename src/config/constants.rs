//! # Shell Constants
//!
//! Fixed strings and limits shared by the REPL, the script runner and the
//! binary. Anything a user can override at startup lives in
//! [`ShellConfig`](super::ShellConfig) instead and merely defaults to these.
//!
//! ## Line Protocol
//!
//! ```text
//! bayeslite> SELECT name
//!     ...>   FROM t;          ← continuation prompt while a query is pending
//! bayeslite> .help            ← directive marker
//! ```

pub const PRIMARY_PROMPT: &str = "bayeslite> ";
pub const CONTINUATION_PROMPT: &str = "    ...> ";

pub const DIRECTIVE_MARKER: char = '.';
pub const COMMENT_MARKER: &str = "--";
pub const STATEMENT_TERMINATOR: char = ';';

pub const WELCOME_LINES: [&str; 2] = ["Welcome to the Bayeslite shell.", "Type `.help' for help."];
pub const HELP_TRAILER: &str = "Type `.help <cmd>' for help on the command <cmd>.";
pub const READ_COMPLETE_MARKER: &str = "--DEBUG: .read complete";
pub const TRACE_PREFIX: &str = "--> ";

/// Nested `.read` directives beyond this depth fail instead of recursing.
pub const MAX_READ_DEPTH: usize = 16;

pub const DEFAULT_INIT_FILE: &str = ".bayesliterc";
pub const INIT_FILE_ENV_VAR: &str = "BAYESLITE_INIT_FILE";
pub const DEBUG_ENV_VAR: &str = "BAYESLITE_DEBUG";
pub const DEFAULT_HISTORY_FILE: &str = ".bayeslite_history";
pub const HISTORY_ENV_VAR: &str = "BAYESLITE_HISTORY";
