//! # Hook Files
//!
//! Hooks add directives at runtime. A hook file is TOML with one
//! `[[command]]` table per directive:
//!
//! ```toml
//! [[command]]
//! name = "myhook"
//! help = "myhook help string"
//! usage = ".myhook <string>"
//! echo = "john {args}"
//!
//! [[command]]
//! name = "peek"
//! help = "first rows of a table"
//! usage = ".peek <table> <n>"
//! query = "SELECT * FROM {1} LIMIT {2};"
//! ```
//!
//! ## Actions
//!
//! Each table carries exactly one action:
//!
//! | Key      | Runs                                        | Output  |
//! |----------|---------------------------------------------|---------|
//! | `echo`   | nothing, the expanded template is printed   | text    |
//! | `query`  | the expanded template as a query            | table   |
//! | `script` | the expanded template through the runner    | per unit|
//!
//! A script action nests like `.read`, so a hook whose script invokes
//! itself fails with a depth error instead of recursing forever.
//!
//! ## Templates
//!
//! `{args}` expands to the whole argument tail and `{1}` to `{9}` to
//! whitespace-separated positional arguments. Referencing a positional
//! argument that was not given is a usage error. Any other braces are
//! left as written.
//!
//! ## Loading
//!
//! [`Shell::load_hooks`] checks every name against the registry and against
//! the rest of the file before registering anything, so a rejected file
//! leaves the registry as it was.

use crate::cli::registry::{bare_name, CommandResult, CommandSpec};
use crate::cli::render::Renderable;
use crate::cli::script::ScriptOptions;
use crate::cli::Shell;
use crate::config::DIRECTIVE_MARKER;
use crate::error::ShellError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Anything that can hand the shell a batch of new directives.
pub trait HookSource {
    fn commands(&self) -> Result<Vec<CommandSpec>, ShellError>;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HookDocument {
    #[serde(default, rename = "command")]
    commands: Vec<HookDefinition>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HookDefinition {
    pub name: String,
    pub help: String,
    pub usage: Option<String>,
    pub echo: Option<String>,
    pub query: Option<String>,
    pub script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HookAction {
    Echo(String),
    Query(String),
    Script(String),
}

#[derive(Debug, Clone)]
pub struct HookFile {
    path: PathBuf,
    definitions: Vec<HookDefinition>,
}

impl HookFile {
    pub fn load(path: &Path) -> Result<Self, ShellError> {
        let contents = fs::read_to_string(path).map_err(|source| ShellError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    pub fn parse(path: &Path, contents: &str) -> Result<Self, ShellError> {
        let document: HookDocument =
            toml::from_str(contents).map_err(|err| invalid(path, err.to_string()))?;

        for definition in &document.commands {
            validate(path, definition)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            definitions: document.commands,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn definitions(&self) -> &[HookDefinition] {
        &self.definitions
    }
}

impl HookSource for HookFile {
    fn commands(&self) -> Result<Vec<CommandSpec>, ShellError> {
        self.definitions
            .iter()
            .map(|definition| build_spec(&self.path, definition))
            .collect()
    }
}

fn invalid(path: &Path, reason: impl Into<String>) -> ShellError {
    ShellError::InvalidHook {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn validate(path: &Path, definition: &HookDefinition) -> Result<(), ShellError> {
    let name = bare_name(&definition.name);
    if name.is_empty() {
        return Err(invalid(path, "command name must not be empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid(
            path,
            format!("command name must not contain whitespace: {:?}", definition.name),
        ));
    }
    action_of(path, definition).map(|_| ())
}

fn action_of(path: &Path, definition: &HookDefinition) -> Result<HookAction, ShellError> {
    let actions: Vec<HookAction> = [
        definition.echo.clone().map(HookAction::Echo),
        definition.query.clone().map(HookAction::Query),
        definition.script.clone().map(HookAction::Script),
    ]
    .into_iter()
    .flatten()
    .collect();

    match <[HookAction; 1]>::try_from(actions) {
        Ok([action]) => Ok(action),
        Err(actions) => Err(invalid(
            path,
            format!(
                "command .{} must have exactly one of echo, query or script (found {})",
                bare_name(&definition.name),
                actions.len()
            ),
        )),
    }
}

fn build_spec(path: &Path, definition: &HookDefinition) -> Result<CommandSpec, ShellError> {
    let action = action_of(path, definition)?;
    let name = bare_name(&definition.name);
    let usage = definition
        .usage
        .clone()
        .unwrap_or_else(|| format!("{}{}", DIRECTIVE_MARKER, name));

    let handler_usage = usage.clone();
    Ok(CommandSpec::new(name, &definition.help, &usage, move |shell, args| {
        run_action(shell, &action, args, &handler_usage)
    }))
}

fn run_action(shell: &mut Shell, action: &HookAction, args: &str, usage: &str) -> CommandResult {
    match action {
        HookAction::Echo(template) => Ok(Renderable::Text(expand(template, args, usage)?)),
        HookAction::Query(template) => {
            let statement = expand(template, args, usage)?;
            shell.dispatch_query(&statement)
        }
        HookAction::Script(template) => {
            let script = expand(template, args, usage)?;
            shell.run_nested_script(&script, ScriptOptions::default())?;
            Ok(Renderable::Silent)
        }
    }
}

/// Expands `{args}` and `{N}` placeholders in a hook template.
pub fn expand(template: &str, args: &str, usage: &str) -> Result<String, ShellError> {
    let words: Vec<&str> = args.split_whitespace().collect();
    let mut out = String::with_capacity(template.len() + args.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return Ok(out);
        };

        let key = &after[..close];
        match key {
            "args" => out.push_str(args),
            _ => match key.parse::<usize>() {
                Ok(n @ 1..=9) => {
                    let word = words
                        .get(n - 1)
                        .ok_or_else(|| ShellError::usage(usage))?;
                    out.push_str(word);
                }
                _ => {
                    out.push('{');
                    out.push_str(key);
                    out.push('}');
                }
            },
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

impl Shell {
    /// Registers every command from `source`. Returns the new names in
    /// definition order.
    pub fn load_hooks(&mut self, source: &dyn HookSource) -> Result<Vec<String>, ShellError> {
        let specs = source.commands()?;

        let mut seen = HashSet::new();
        for spec in &specs {
            if self.registry.contains(spec.name()) || !seen.insert(spec.name().to_string()) {
                return Err(ShellError::DuplicateCommand(spec.name().to_string()));
            }
        }

        let mut added = Vec::with_capacity(specs.len());
        for spec in specs {
            added.push(spec.name().to_string());
            self.registry.register(spec)?;
        }

        tracing::info!(commands = ?added, "loaded hooks");
        Ok(added)
    }
}
