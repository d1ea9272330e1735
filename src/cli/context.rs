//! # Execution Context
//!
//! Per-session state: the engine handle, trace switches, the directory
//! relative paths resolve against, and the debug flag. One `Shell` owns one
//! context; nothing here is global, so independent sessions can coexist in
//! the same process (the integration tests rely on that).
//!
//! Directive handlers are the only writers. The dispatcher reads the trace
//! flags; the renderer reads the debug flag.

use crate::config::MAX_READ_DEPTH;
use crate::engine::Engine;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceTarget {
    /// Query-language statements as typed.
    Bql,
    /// SQL the engine issues underneath.
    Sql,
}

impl TraceTarget {
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "bql" => Some(Self::Bql),
            "sql" => Some(Self::Sql),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceFlags {
    pub bql: bool,
    pub sql: bool,
}

pub struct ExecutionContext {
    engine: Box<dyn Engine>,
    trace: TraceFlags,
    cwd: PathBuf,
    debug: bool,
    read_depth: usize,
}

impl ExecutionContext {
    pub fn new(engine: Box<dyn Engine>) -> Self {
        Self {
            engine,
            trace: TraceFlags::default(),
            cwd: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            debug: false,
            read_depth: 0,
        }
    }

    pub fn engine(&mut self) -> &mut dyn Engine {
        self.engine.as_mut()
    }

    pub fn trace(&self) -> TraceFlags {
        self.trace
    }

    pub fn set_trace(&mut self, target: TraceTarget, enabled: bool) {
        match target {
            TraceTarget::Bql => self.trace.bql = enabled,
            TraceTarget::Sql => {
                self.trace.sql = enabled;
                self.engine.set_sql_trace(enabled);
            }
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn set_cwd(&mut self, cwd: impl Into<PathBuf>) {
        self.cwd = cwd.into();
    }

    /// Resolves a user-supplied path: `~/` expands to `$HOME`, relative
    /// paths join onto the context's working directory.
    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        if let Some(rest) = raw.strip_prefix("~/") {
            if let Some(home) = crate::cli::history::home_dir() {
                return home.join(rest);
            }
        }
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn read_depth(&self) -> usize {
        self.read_depth
    }

    pub(crate) fn enter_read(&mut self) -> bool {
        if self.read_depth >= MAX_READ_DEPTH {
            return false;
        }
        self.read_depth += 1;
        true
    }

    pub(crate) fn exit_read(&mut self) {
        self.read_depth = self.read_depth.saturating_sub(1);
    }
}
