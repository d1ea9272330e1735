//! # Fixed-Width Table Formatter
//!
//! Renders a [`ResultSet`] as a right-aligned text grid:
//!
//! ```text
//! cid |        name |    type
//! ----+-------------+--------
//!   0 |     tabname |    TEXT
//!   1 |       colno | INTEGER
//! ```
//!
//! ## Column Width Calculation
//!
//! Each column is as wide as the larger of its header and its widest cell,
//! measured in characters. NULL cells render as `None` and count as four.
//!
//! ## Layout
//!
//! - header and data cells are right-aligned and joined by `" | "`
//! - the separator is one dash run per column, joined by `"-+-"`, so it
//!   lines up exactly under the header
//! - column order is the order the engine returned
//!
//! The formatter makes two passes: the first renders every cell to a string
//! and measures it, the second pads and joins.

use crate::engine::ResultSet;

const CELL_SEPARATOR: &str = " | ";
const RULE_SEPARATOR: &str = "-+-";

pub struct TableFormatter {
    headers: Vec<String>,
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl TableFormatter {
    pub fn new(result: &ResultSet) -> Self {
        let headers: Vec<String> = result.columns().to_vec();
        let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();

        let rows: Vec<Vec<String>> = result
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, value)| {
                        let formatted = value.to_string();
                        widths[i] = widths[i].max(display_width(&formatted));
                        formatted
                    })
                    .collect()
            })
            .collect();

        Self {
            headers,
            widths,
            rows,
        }
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.aligned_row(&self.headers));
        lines.push(self.separator());
        for row in &self.rows {
            lines.push(self.aligned_row(row));
        }
        lines
    }

    fn separator(&self) -> String {
        self.widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(RULE_SEPARATOR)
    }

    fn aligned_row(&self, cells: &[String]) -> String {
        cells
            .iter()
            .zip(&self.widths)
            .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(CELL_SEPARATOR)
    }
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}
