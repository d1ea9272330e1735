//! # Bayeslite Shell
//!
//! An interactive command shell and batch script runner for a BayesDB-style
//! probabilistic database. Users type queries, which run against the
//! engine, and dot directives, which load data, describe entities and
//! control the session.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bayeslite_shell::{Shell, ShellConfig, SqliteEngine};
//!
//! let engine = SqliteEngine::open_in_memory()?;
//! let mut shell = Shell::new(Box::new(engine), ShellConfig::default(), Box::new(std::io::stdout()))?;
//!
//! shell.feed_line(".csv dha data/dha.csv")?;
//! shell.feed_line("SELECT name FROM dha")?;
//! shell.feed_line("    LIMIT 2;")?;
//! ```
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     bin/bayeslite (clap, tracing)    │
//! ├─────────────────────────────────────┤
//! │   cli: REPL, scripts, dispatch       │
//! ├─────────────────────────────────────┤
//! │   engine: Engine trait + SQLite      │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`cli`]: accumulator, registry, directives, renderer, REPL
//! - [`engine`]: the `Engine` trait, values and result sets
//! - [`config`]: session configuration and constants
//! - [`error`]: the `ShellError` taxonomy

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;

pub use cli::{Repl, Shell};
pub use config::{InitFile, ShellConfig};
pub use engine::{Engine, EngineError, ResultSet, SqliteEngine, Value};
pub use error::ShellError;
