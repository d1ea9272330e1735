//! # REPL - Read-Eval-Print Loop
//!
//! The interactive front end. It reads lines with rustyline and hands each
//! one to [`Shell::feed_line`]; everything after that (accumulation,
//! dispatch, rendering) is the shell's job.
//!
//! ## Input Handling
//!
//! The prompt comes from the shell: `bayeslite> ` when nothing is pending,
//! `    ...> ` while a statement is still missing its `;`.
//!
//! ## Execution Flow
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Read Line (shell.prompt())               │
//! └──────────────────────────────────────────────────────────┘
//!           │ Ok(line)          │ Ctrl-C            │ Ctrl-D
//!           ▼                   ▼                   ▼
//! ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────┐
//! │ shell.feed_line  │ │ reset_input, ^C  │ │ finish_input     │
//! └──────────────────┘ └──────────────────┘ └──────────────────┘
//!           │                   │                   │
//!           ▼                   ▼                   ▼
//!        [Loop]              [Loop]          save history, exit
//! ```
//!
//! ## Error Handling
//!
//! Command and query errors are rendered by the shell and never end the
//! loop. Only a failing output sink or a broken terminal does.

use crate::cli::Shell;
use eyre::{Result, WrapErr};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub struct Repl {
    shell: Shell,
    editor: DefaultEditor,
}

impl Repl {
    pub fn new(shell: Shell) -> Result<Self> {
        let mut editor = DefaultEditor::new().wrap_err("failed to initialize line editor")?;

        if let Some(history_file) = &shell.config().history_file {
            if let Err(err) = editor.load_history(history_file) {
                tracing::debug!(path = %history_file.display(), %err, "no history loaded");
            }
        }

        Ok(Self { shell, editor })
    }

    pub fn shell(&mut self) -> &mut Shell {
        &mut self.shell
    }

    pub fn run(&mut self) -> Result<()> {
        if !self.shell.config().quiet {
            self.shell
                .print_welcome()
                .wrap_err("failed to write welcome banner")?;
        }

        loop {
            let prompt = self.shell.prompt().to_string();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        self.editor.add_history_entry(line.as_str()).ok();
                    }
                    self.shell
                        .feed_line(&line)
                        .wrap_err("failed to write output")?;
                }
                Err(ReadlineError::Interrupted) => {
                    self.shell.reset_input();
                    self.shell.emit(&["^C"]).wrap_err("failed to write output")?;
                }
                Err(ReadlineError::Eof) => {
                    self.shell.finish_input();
                    break;
                }
                Err(err) => {
                    self.save_history();
                    return Err(err).wrap_err("error reading input");
                }
            }
        }

        self.save_history();
        Ok(())
    }

    fn save_history(&mut self) {
        if let Some(history_file) = &self.shell.config().history_file {
            if let Err(err) = self.editor.save_history(history_file) {
                tracing::warn!(path = %history_file.display(), %err, "could not save history");
            }
        }
    }
}
