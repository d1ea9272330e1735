//! # Script Runner
//!
//! Runs a file (or any text) through the same accumulate → dispatch →
//! render pipeline as interactive input.
//!
//! ## Resilience
//!
//! A unit that fails is rendered like any other and the runner continues
//! with the next one:
//!
//! ```text
//! .csv dha                 → Usage: .csv <table> </path/to/data.csv>
//! .csv dha data/dha.csv    → (silent)
//! SELECT name FROM dha     ┐
//!     LIMIT 2;             ┘ → table
//! SELECT name FROM        → discarded at end of file, no output
//! ```
//!
//! Only a failing output sink stops a run. Each script gets its own
//! accumulator, so a half-typed interactive statement and a script never
//! share buffered lines.
//!
//! ## Nesting
//!
//! Scripts may `.read` other scripts up to `MAX_READ_DEPTH` levels deep.
//! Hook `script` actions count against the same limit.

use crate::cli::accumulator::{InputAccumulator, InputUnit};
use crate::cli::Shell;
use crate::error::ShellError;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Echo each unit after the prompt before its output.
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub units: usize,
    pub failures: usize,
    pub discarded_lines: usize,
}

impl Shell {
    pub fn run_script(
        &mut self,
        source: &str,
        options: ScriptOptions,
    ) -> Result<RunSummary, ShellError> {
        let mut accumulator = InputAccumulator::new();
        let mut summary = RunSummary::default();

        for line in source.lines() {
            let Some(unit) = accumulator.feed(line) else {
                continue;
            };
            if options.verbose {
                self.echo_unit(&unit)?;
            }
            let rendered = self.process_unit(&unit)?;
            summary.units += 1;
            if rendered.is_failure() {
                summary.failures += 1;
            }
        }

        summary.discarded_lines = accumulator.finish();
        if summary.discarded_lines > 0 {
            tracing::debug!(
                lines = summary.discarded_lines,
                "discarded incomplete statement at end of script"
            );
        }
        Ok(summary)
    }

    pub fn read_file(&mut self, path: &Path, options: ScriptOptions) -> Result<RunSummary, ShellError> {
        let source = fs::read_to_string(path).map_err(|source| ShellError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "reading script");
        let summary = self.run_nested_script(&source, options)?;
        tracing::info!(
            path = %path.display(),
            units = summary.units,
            failures = summary.failures,
            "script complete"
        );
        Ok(summary)
    }

    /// Runs `source` one nesting level deeper. Scripts started from inside
    /// another unit (`.read`, hook scripts) go through here so that a script
    /// reaching itself stops at `MAX_READ_DEPTH`.
    pub(crate) fn run_nested_script(
        &mut self,
        source: &str,
        options: ScriptOptions,
    ) -> Result<RunSummary, ShellError> {
        if !self.ctx.enter_read() {
            return Err(ShellError::ReadDepthExceeded(self.ctx.read_depth()));
        }
        let result = self.run_script(source, options);
        self.ctx.exit_read();
        result
    }

    /// Runs the configured init file, if there is one. A missing default
    /// init file is not an error; a missing explicit one is.
    pub fn run_init_file(&mut self) -> Result<Option<RunSummary>, ShellError> {
        let Some((path, required)) = self.config().init_file.resolve() else {
            return Ok(None);
        };
        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no init file");
            return Ok(None);
        }
        self.read_file(&path, ScriptOptions::default()).map(Some)
    }

    fn echo_unit(&mut self, unit: &InputUnit) -> Result<(), ShellError> {
        let lines: Vec<String> = unit
            .lines()
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let prompt = if i == 0 {
                    &self.config().prompt
                } else {
                    &self.config().continuation_prompt
                };
                format!("{}{}", prompt, line)
            })
            .collect();
        self.emit(&lines)?;
        Ok(())
    }
}
