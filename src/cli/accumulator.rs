//! # Input Accumulator
//!
//! Buffers raw input lines until they form a complete [`InputUnit`].
//!
//! ## Boundary Rules
//!
//! ```text
//! nothing pending ──▶ blank / "--" comment ──▶ dropped
//!        │
//!        ├──────────▶ starts with '.' ─────────▶ directive unit (one line)
//!        │
//!        └──────────▶ anything else ──┐
//!                                     ▼
//!                         pending query lines ◀── continuation lines
//!                                     │           (blank, comment, '.'
//!                                     │            lines included)
//!                     line ends with ';' after trimming
//!                                     ▼
//!                               query unit
//! ```
//!
//! Indentation never matters; only the terminator on the last line does.
//! The lines of a query unit are forwarded joined by `\n`, exactly as typed.
//!
//! ## End of Input
//!
//! A query still pending when input ends is dropped by [`InputAccumulator::finish`]
//! without being dispatched. That is not an error.

use crate::config::{COMMENT_MARKER, DIRECTIVE_MARKER, STATEMENT_TERMINATOR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputUnit {
    lines: Vec<String>,
    is_directive: bool,
}

impl InputUnit {
    pub fn directive(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            is_directive: true,
        }
    }

    pub fn query(lines: Vec<String>) -> Self {
        Self {
            lines,
            is_directive: false,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_directive(&self) -> bool {
        self.is_directive
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Default)]
pub struct InputAccumulator {
    pending: Vec<String>,
}

impl InputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) -> Option<InputUnit> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();

        if self.pending.is_empty() {
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
                return None;
            }
            if trimmed.starts_with(DIRECTIVE_MARKER) {
                return Some(InputUnit::directive(trimmed));
            }
        }

        self.pending.push(line.to_string());

        if trimmed.ends_with(STATEMENT_TERMINATOR) {
            Some(InputUnit::query(std::mem::take(&mut self.pending)))
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Drops any incomplete query, returning how many lines it held.
    pub fn finish(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        discarded
    }
}
