//! # Command Registry
//!
//! Maps directive names to [`CommandSpec`]s. Built-in commands are registered
//! when a [`Shell`] is created; hook files append more at runtime.
//!
//! ## Names
//!
//! Names are stored without the leading `.` and are case-sensitive.
//! [`CommandRegistry::lookup`] accepts either spelling, so `.help myhook`
//! and `.help .myhook` resolve the same spec.
//!
//! ## Collisions
//!
//! Registering a name that already exists fails with
//! [`ShellError::DuplicateCommand`] and leaves the existing spec in place.
//! Loading the same hook file twice therefore fails the same way every time.
//!
//! ## Help Table
//!
//! ```text
//!      .codebook    load codebook for table
//!           .csv    create table from CSV file
//!  .legacymodels    load legacy models
//! Type `.help <cmd>' for help on the command <cmd>.
//! ```
//!
//! Dotted names are right-aligned to the longest one plus a leading space,
//! then four spaces separate the summary.

use crate::cli::render::Renderable;
use crate::cli::Shell;
use crate::config::{DIRECTIVE_MARKER, HELP_TRAILER};
use crate::error::ShellError;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub type CommandResult = Result<Renderable, ShellError>;
pub type Handler = Rc<dyn Fn(&mut Shell, &str) -> CommandResult>;

#[derive(Clone)]
pub struct CommandSpec {
    name: String,
    help: String,
    usage: String,
    handler: Handler,
}

impl CommandSpec {
    pub fn new<F>(name: &str, help: &str, usage: &str, handler: F) -> Self
    where
        F: Fn(&mut Shell, &str) -> CommandResult + 'static,
    {
        Self {
            name: bare_name(name).to_string(),
            help: help.to_string(),
            usage: usage.to_string(),
            handler: Rc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn usage_error(&self) -> ShellError {
        ShellError::usage(self.usage.clone())
    }

    pub fn invoke(&self, shell: &mut Shell, args: &str) -> CommandResult {
        (self.handler)(shell, args)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Rc<CommandSpec>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: CommandSpec) -> Result<(), ShellError> {
        if self.commands.contains_key(spec.name()) {
            return Err(ShellError::DuplicateCommand(spec.name().to_string()));
        }
        self.commands.insert(spec.name().to_string(), Rc::new(spec));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Rc<CommandSpec>> {
        self.commands.get(bare_name(name)).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(bare_name(name))
    }

    /// All specs, sorted by name.
    pub fn all(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values().map(|spec| spec.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn help_table(&self) -> String {
        let width = self
            .all()
            .map(|spec| spec.name().chars().count() + 1)
            .max()
            .unwrap_or(0);

        let mut lines: Vec<String> = self
            .all()
            .map(|spec| {
                let dotted = format!("{}{}", DIRECTIVE_MARKER, spec.name());
                format!(" {:>width$}    {}", dotted, spec.help(), width = width)
            })
            .collect();
        lines.push(HELP_TRAILER.to_string());
        lines.join("\n")
    }
}

pub(crate) fn bare_name(name: &str) -> &str {
    name.strip_prefix(DIRECTIVE_MARKER).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent(name: &str, help: &str) -> CommandSpec {
        CommandSpec::new(name, help, &format!(".{} <arg>", name), |_, _| {
            Ok(Renderable::Silent)
        })
    }

    #[test]
    fn register_then_lookup_with_or_without_marker() {
        let mut registry = CommandRegistry::new();
        registry.register(silent("guess", "guess data generator")).unwrap();

        assert_eq!(registry.lookup("guess").unwrap().help(), "guess data generator");
        assert!(registry.lookup(".guess").is_some());
        assert!(registry.lookup("Guess").is_none());
    }

    #[test]
    fn leading_marker_is_stripped_from_names() {
        let spec = silent(".myhook", "myhook help string");
        assert_eq!(spec.name(), "myhook");
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(silent("sql", "first")).unwrap();

        let err = registry.register(silent("sql", "second")).unwrap_err();
        assert!(matches!(err, ShellError::DuplicateCommand(ref name) if name == "sql"));
        assert_eq!(registry.lookup("sql").unwrap().help(), "first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn all_is_sorted_by_name() {
        let mut registry = CommandRegistry::new();
        for name in ["trace", "csv", "help", "codebook"] {
            registry.register(silent(name, name)).unwrap();
        }

        let names: Vec<&str> = registry.all().map(|spec| spec.name()).collect();
        assert_eq!(names, vec!["codebook", "csv", "help", "trace"]);
    }

    #[test]
    fn help_table_right_aligns_names() {
        let mut registry = CommandRegistry::new();
        registry.register(silent("csv", "create table from CSV file")).unwrap();
        registry.register(silent("legacymodels", "load legacy models")).unwrap();

        let table = registry.help_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(
            lines,
            vec![
                "          .csv    create table from CSV file",
                " .legacymodels    load legacy models",
                "Type `.help <cmd>' for help on the command <cmd>.",
            ]
        );
    }

    #[test]
    fn debug_output_omits_handler() {
        let spec = silent("read", "read a file of shell commands");
        let debug = format!("{:?}", spec);
        assert!(debug.contains("read a file of shell commands"));
        assert!(debug.contains(".."));
    }
}
