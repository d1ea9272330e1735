//! # Dispatcher
//!
//! Routes a completed [`InputUnit`]:
//!
//! ```text
//! directive ".csv dha /data/dha.csv"
//!      │   split at first whitespace
//!      ▼
//!   ("csv", "dha /data/dha.csv") ──▶ registry lookup ──▶ handler(shell, tail)
//!
//! query "SELECT name FROM dha;"
//!      │   forwarded verbatim
//!      ▼
//!   Engine::execute ──▶ ResultSet ──▶ Renderable::Table
//! ```
//!
//! Dispatch makes exactly one attempt per unit. Whatever error comes back is
//! the unit's outcome; the caller renders it and moves on.
//!
//! ## Tracing
//!
//! With BQL tracing on, a query is echoed as `--> <text>` before it runs.
//! With SQL tracing on, the SQL the engine recorded during the unit is
//! printed after the call returns, whether or not it succeeded.

use crate::cli::accumulator::InputUnit;
use crate::cli::registry::CommandResult;
use crate::cli::render::Renderable;
use crate::cli::Shell;
use crate::config::{DIRECTIVE_MARKER, TRACE_PREFIX};
use crate::error::ShellError;

impl Shell {
    pub fn dispatch(&mut self, unit: &InputUnit) -> CommandResult {
        let text = unit.text();
        if unit.is_directive() {
            self.dispatch_directive(&text)
        } else {
            self.dispatch_query(&text)
        }
    }

    fn dispatch_directive(&mut self, line: &str) -> CommandResult {
        let (name, args) = split_directive(line);
        let spec = self
            .registry
            .lookup(name)
            .ok_or_else(|| ShellError::UnknownCommand(name.to_string()))?;

        tracing::debug!(command = spec.name(), args, "dispatching directive");
        let result = spec.invoke(self, args);
        self.flush_sql_trace()?;
        result
    }

    pub(crate) fn dispatch_query(&mut self, text: &str) -> CommandResult {
        if self.ctx.trace().bql {
            self.emit(&[format!("{}{}", TRACE_PREFIX, text.trim())])?;
        }

        tracing::debug!(statement = text, "executing statement");
        let result = self.ctx.engine().execute(text);
        self.flush_sql_trace()?;
        Ok(Renderable::from(result?))
    }

    fn flush_sql_trace(&mut self) -> Result<(), ShellError> {
        if !self.ctx.trace().sql {
            return Ok(());
        }
        let lines: Vec<String> = self
            .ctx
            .engine()
            .drain_sql_trace()
            .into_iter()
            .map(|sql| format!("{}{}", TRACE_PREFIX, sql))
            .collect();
        self.emit(&lines)?;
        Ok(())
    }
}

/// Splits a directive line into its command name and raw argument tail.
pub fn split_directive(line: &str) -> (&str, &str) {
    let line = line.trim();
    let body = line.strip_prefix(DIRECTIVE_MARKER).unwrap_or(line);
    match body.find(char::is_whitespace) {
        Some(end) => (&body[..end], body[end..].trim()),
        None => (body, ""),
    }
}
