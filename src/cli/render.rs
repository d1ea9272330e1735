//! # Result Renderer
//!
//! Turns the outcome of one input unit into output lines.
//!
//! | Input                  | Output                                    |
//! |------------------------|-------------------------------------------|
//! | `Renderable::Table`    | fixed-width grid (see `table`)            |
//! | `Renderable::Text`     | one line per line of text                 |
//! | `Renderable::Silent`   | nothing                                   |
//! | `ShellError::Usage`    | `Usage: <usage line>`                     |
//! | any other `ShellError` | `Error: <message>`                        |
//!
//! Tools driving the shell over a pipe detect failure by looking for the
//! `error` marker in the text. In-process callers get the same information
//! as [`Outcome`] on every [`Rendered`] value.
//!
//! With debug enabled, each `source()` in an error's chain adds an indented
//! `caused by:` line.

use crate::cli::registry::CommandResult;
use crate::cli::table::TableFormatter;
use crate::engine::{ResultSet, Value};
use crate::error::ShellError;
use std::error::Error as _;

#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    Table(ResultSet),
    Text(String),
    Silent,
}

impl From<ResultSet> for Renderable {
    fn from(result: ResultSet) -> Self {
        if result.has_columns() {
            Renderable::Table(result)
        } else {
            Renderable::Silent
        }
    }
}

impl From<Value> for Renderable {
    fn from(value: Value) -> Self {
        Renderable::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub lines: Vec<String>,
    pub outcome: Outcome,
}

impl Rendered {
    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Failure
    }
}

pub fn render(result: &CommandResult, debug: bool) -> Rendered {
    match result {
        Ok(renderable) => Rendered {
            lines: render_success(renderable),
            outcome: Outcome::Success,
        },
        Err(err) => Rendered {
            lines: render_error(err, debug),
            outcome: Outcome::Failure,
        },
    }
}

pub fn render_success(renderable: &Renderable) -> Vec<String> {
    match renderable {
        Renderable::Table(result) => TableFormatter::new(result).render(),
        Renderable::Text(text) => text.lines().map(str::to_string).collect(),
        Renderable::Silent => Vec::new(),
    }
}

pub fn render_error(err: &ShellError, debug: bool) -> Vec<String> {
    let message = if err.is_usage() {
        err.to_string()
    } else {
        format!("Error: {}", err)
    };
    let mut lines: Vec<String> = message.lines().map(str::to_string).collect();

    if debug {
        let mut source = err.source();
        while let Some(cause) = source {
            lines.push(format!("  caused by: {}", cause));
            source = cause.source();
        }
    }

    lines
}
