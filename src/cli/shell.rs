//! # Shell Session
//!
//! `Shell` ties the pipeline together for one session:
//!
//! ```text
//! feed_line ─▶ InputAccumulator ─▶ InputUnit ─▶ dispatch ─▶ render ─▶ out
//!                                                  │
//!                                      CommandRegistry / Engine
//! ```
//!
//! The interactive REPL, the script runner and the tests all drive a shell
//! through the same [`Shell::feed_line`] / [`Shell::process_unit`] entry
//! points; only the source of lines differs.
//!
//! ## Output
//!
//! The shell writes rendered lines to the sink it was built with (stdout in
//! the binary, an in-memory buffer in tests) and flushes after each unit.
//! A failing sink is the only error that escapes a unit.

use crate::cli::accumulator::{InputAccumulator, InputUnit};
use crate::cli::commands::register_builtins;
use crate::cli::context::ExecutionContext;
use crate::cli::registry::{CommandRegistry, CommandSpec};
use crate::cli::render::{render, Rendered};
use crate::config::{ShellConfig, WELCOME_LINES};
use crate::engine::Engine;
use crate::error::ShellError;
use std::io::{self, Write};

pub struct Shell {
    pub(crate) ctx: ExecutionContext,
    pub(crate) registry: CommandRegistry,
    accumulator: InputAccumulator,
    config: ShellConfig,
    out: Box<dyn Write>,
}

impl Shell {
    pub fn new(
        engine: Box<dyn Engine>,
        config: ShellConfig,
        out: Box<dyn Write>,
    ) -> Result<Self, ShellError> {
        let mut ctx = ExecutionContext::new(engine);
        ctx.set_debug(config.debug);

        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry)?;

        Ok(Self {
            ctx,
            registry,
            accumulator: InputAccumulator::new(),
            config,
            out,
        })
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut ExecutionContext {
        &mut self.ctx
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn register(&mut self, spec: CommandSpec) -> Result<(), ShellError> {
        self.registry.register(spec)
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn prompt(&self) -> &str {
        if self.accumulator.is_pending() {
            &self.config.continuation_prompt
        } else {
            &self.config.prompt
        }
    }

    pub fn is_pending(&self) -> bool {
        self.accumulator.is_pending()
    }

    pub fn reset_input(&mut self) {
        self.accumulator.reset();
    }

    /// Feeds one raw input line. Returns the rendered result when the line
    /// completed a unit.
    pub fn feed_line(&mut self, line: &str) -> io::Result<Option<Rendered>> {
        match self.accumulator.feed(line) {
            Some(unit) => self.process_unit(&unit).map(Some),
            None => Ok(None),
        }
    }

    /// Ends interactive input, dropping any incomplete statement.
    pub fn finish_input(&mut self) -> usize {
        let discarded = self.accumulator.finish();
        if discarded > 0 {
            tracing::debug!(lines = discarded, "discarded incomplete statement at end of input");
        }
        discarded
    }

    pub fn process_unit(&mut self, unit: &InputUnit) -> io::Result<Rendered> {
        let result = self.dispatch(unit);
        let rendered = render(&result, self.ctx.debug());
        if rendered.is_failure() {
            tracing::debug!(unit = %unit.text(), "unit failed");
        }
        self.emit(&rendered.lines)?;
        Ok(rendered)
    }

    pub fn emit<S: AsRef<str>>(&mut self, lines: &[S]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{}", line.as_ref())?;
        }
        self.out.flush()
    }

    pub fn print_welcome(&mut self) -> io::Result<()> {
        self.emit(&WELCOME_LINES)
    }
}
