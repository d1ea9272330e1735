//! # Bayeslite Shell
//!
//! The interactive shell and script runner in front of a BayesDB-style
//! [`Engine`](crate::engine::Engine). It supports:
//!
//! - Multi-line query entry terminated by `;`
//! - Dot directives (`.csv`, `.describe`, `.read`, ...) dispatched through a
//!   registry that hook files can extend at runtime
//! - Right-aligned tabular output for query results
//! - Script files that keep going past failing units
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CLI Entry Point                        │
//! │                   (bin/bayeslite.rs)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │        REPL (rustyline)     │     Script Runner (.read)     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 Shell: accumulate → dispatch                │
//! ├──────────────────┬──────────────────┬───────────────────────┤
//! │ CommandRegistry  │ ExecutionContext │ Renderer / Formatter  │
//! │ built-ins, hooks │ engine, trace    │ tables, errors        │
//! └──────────────────┴──────────────────┴───────────────────────┘
//! ```
//!
//! ## Table Display
//!
//! ```text
//!       NAME
//! ----------
//! Alabama AL
//!  Alaska AK
//! ```
//!
//! ## Module Organization
//!
//! - `accumulator`: groups raw lines into directives and queries
//! - `registry`: command specs and the help table
//! - `commands`: built-in directives
//! - `hook`: TOML hook files that add directives
//! - `context`: per-session engine handle and flags
//! - `dispatch`: routes units to handlers or the engine
//! - `render` / `table`: turns results and errors into lines
//! - `script`: runs files through the pipeline
//! - `shell`: the session object tying it together
//! - `repl`: the interactive loop
//! - `history`: history file path resolution

pub mod accumulator;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod history;
pub mod hook;
pub mod registry;
pub mod render;
pub mod repl;
pub mod script;
pub mod shell;
pub mod table;

pub use accumulator::{InputAccumulator, InputUnit};
pub use context::{ExecutionContext, TraceFlags, TraceTarget};
pub use hook::{HookFile, HookSource};
pub use registry::{CommandRegistry, CommandResult, CommandSpec};
pub use render::{render, render_error, Outcome, Renderable, Rendered};
pub use repl::Repl;
pub use script::{RunSummary, ScriptOptions};
pub use shell::Shell;
