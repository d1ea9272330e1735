//! # Built-in Directives
//!
//! The directives every shell starts with. Each one is a plain function
//! registered as a [`CommandSpec`] with its help summary and usage line.
//!
//! ## Supported Commands
//!
//! | Command                                   | Description                      |
//! |-------------------------------------------|----------------------------------|
//! | `.codebook <table> <path>`                | load codebook for table          |
//! | `.csv <table> <path>`                     | create table from CSV file       |
//! | `.describe <kind> [<name>...]`            | describe BayesDB entities        |
//! | `.guess <generator> <table>`              | guess data generator             |
//! | `.help [<cmd>]`                           | show help for commands           |
//! | `.hook <path>`                            | add custom commands from a file  |
//! | `.legacymodels <generator> <table> <path>`| load legacy models               |
//! | `.python <expression>`                    | evaluate an expression           |
//! | `.read <path> [-v]`                       | read a file of shell commands    |
//! | `.sql <query>`                            | execute a SQL query              |
//! | `.trace [bql\|sql]` / `.untrace [bql\|sql]` | toggle query tracing           |
//!
//! ## Parsing
//!
//! Arguments are whitespace-separated, except for `.sql` and `.python`
//! which take their whole tail verbatim. A wrong argument count is a usage
//! error that renders the command's usage line. Relative paths resolve
//! against the session's working directory.

use crate::cli::context::TraceTarget;
use crate::cli::hook::HookFile;
use crate::cli::registry::{CommandRegistry, CommandResult, CommandSpec};
use crate::cli::render::Renderable;
use crate::cli::script::ScriptOptions;
use crate::cli::Shell;
use crate::config::READ_COMPLETE_MARKER;
use crate::engine::DescribeKind;
use crate::error::ShellError;

const CODEBOOK_USAGE: &str = ".codebook <table> </path/to/codebook.csv>";
const CSV_USAGE: &str = ".csv <table> </path/to/data.csv>";
const DESCRIBE_USAGE: &str = ".describe <tables|generators|columns|models> [<name>...]";
const GUESS_USAGE: &str = ".guess <generator> <table>";
const HELP_USAGE: &str = ".help [<cmd>]";
const HOOK_USAGE: &str = ".hook </path/to/hook/file>";
const LEGACY_MODELS_USAGE: &str = ".legacymodels <generator> <table> </path/to/models>";
const PYTHON_USAGE: &str = ".python <expression>";
const READ_USAGE: &str = ".read </path/to/file> [-v]";
const SQL_USAGE: &str = ".sql <query>";
const TRACE_USAGE: &str = ".trace [bql|sql]";
const UNTRACE_USAGE: &str = ".untrace [bql|sql]";

pub fn builtin_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("codebook", "load codebook for table", CODEBOOK_USAGE, codebook),
        CommandSpec::new("csv", "create table from CSV file", CSV_USAGE, csv),
        CommandSpec::new("describe", "describe BayesDB entities", DESCRIBE_USAGE, describe),
        CommandSpec::new("guess", "guess data generator", GUESS_USAGE, guess),
        CommandSpec::new("help", "show help for commands", HELP_USAGE, help),
        CommandSpec::new(
            "hook",
            "add custom commands from a python source file",
            HOOK_USAGE,
            hook,
        ),
        CommandSpec::new(
            "legacymodels",
            "load legacy models",
            LEGACY_MODELS_USAGE,
            legacy_models,
        ),
        CommandSpec::new("python", "evaluate a Python expression", PYTHON_USAGE, python),
        CommandSpec::new("read", "read a file of shell commands", READ_USAGE, read),
        CommandSpec::new("sql", "execute a SQL query", SQL_USAGE, sql),
        CommandSpec::new("trace", "trace queries", TRACE_USAGE, |shell, args| {
            set_trace(shell, args, true)
        }),
        CommandSpec::new("untrace", "untrace queries", UNTRACE_USAGE, |shell, args| {
            set_trace(shell, args, false)
        }),
    ]
}

pub fn register_builtins(registry: &mut CommandRegistry) -> Result<(), ShellError> {
    for spec in builtin_commands() {
        registry.register(spec)?;
    }
    Ok(())
}

fn exact_args<'a, const N: usize>(args: &'a str, usage: &str) -> Result<[&'a str; N], ShellError> {
    let words: Vec<&str> = args.split_whitespace().collect();
    words.try_into().map_err(|_| ShellError::usage(usage))
}

fn required_tail<'a>(args: &'a str, usage: &str) -> Result<&'a str, ShellError> {
    if args.is_empty() {
        Err(ShellError::usage(usage))
    } else {
        Ok(args)
    }
}

fn codebook(shell: &mut Shell, args: &str) -> CommandResult {
    let [table, path] = exact_args(args, CODEBOOK_USAGE)?;
    let path = shell.ctx.resolve_path(path);
    shell.ctx.engine().load_codebook(table, &path)?;
    Ok(Renderable::Silent)
}

fn csv(shell: &mut Shell, args: &str) -> CommandResult {
    let [table, path] = exact_args(args, CSV_USAGE)?;
    let path = shell.ctx.resolve_path(path);
    shell.ctx.engine().import_csv(table, &path)?;
    Ok(Renderable::Silent)
}

fn describe(shell: &mut Shell, args: &str) -> CommandResult {
    let mut words = args.split_whitespace();
    let kind_word = words.next().ok_or_else(|| ShellError::usage(DESCRIBE_USAGE))?;
    let kind = DescribeKind::parse(kind_word).ok_or_else(|| ShellError::UnknownArgument {
        command: "describe".to_string(),
        argument: kind_word.to_string(),
    })?;
    let targets: Vec<&str> = words.collect();
    if kind.needs_single_target() && targets.len() != 1 {
        return Err(ShellError::usage(DESCRIBE_USAGE));
    }

    let result = shell.ctx.engine().describe(kind, &targets)?;
    Ok(Renderable::from(result))
}

fn guess(shell: &mut Shell, args: &str) -> CommandResult {
    let [generator, table] = exact_args(args, GUESS_USAGE)?;
    shell.ctx.engine().guess_generator(generator, table)?;
    Ok(Renderable::Silent)
}

fn help(shell: &mut Shell, args: &str) -> CommandResult {
    let words: Vec<&str> = args.split_whitespace().collect();
    match words.as_slice() {
        [] => Ok(Renderable::Text(shell.registry.help_table())),
        [name] => shell
            .registry
            .lookup(name)
            .map(|spec| Renderable::Text(spec.usage().to_string()))
            .ok_or_else(|| {
                ShellError::UnknownCommand(crate::cli::registry::bare_name(name).to_string())
            }),
        _ => Err(ShellError::usage(HELP_USAGE)),
    }
}

fn hook(shell: &mut Shell, args: &str) -> CommandResult {
    let [path] = exact_args(args, HOOK_USAGE)?;
    let path = shell.ctx.resolve_path(path);
    let source = HookFile::load(&path)?;
    let added = shell.load_hooks(&source)?;

    let lines: Vec<String> = added
        .iter()
        .map(|name| format!("added command \".{}\"", name))
        .collect();
    Ok(Renderable::Text(lines.join("\n")))
}

fn legacy_models(shell: &mut Shell, args: &str) -> CommandResult {
    let [generator, table, path] = exact_args(args, LEGACY_MODELS_USAGE)?;
    let path = shell.ctx.resolve_path(path);
    shell.ctx.engine().load_legacy_models(generator, table, &path)?;
    Ok(Renderable::Silent)
}

fn python(shell: &mut Shell, args: &str) -> CommandResult {
    let expression = required_tail(args, PYTHON_USAGE)?;
    let value = shell.ctx.engine().evaluate(expression)?;
    Ok(Renderable::from(value))
}

fn read(shell: &mut Shell, args: &str) -> CommandResult {
    let mut options = ScriptOptions::default();
    let mut path = None;
    for word in args.split_whitespace() {
        match word {
            "-v" | "--verbose" => options.verbose = true,
            flag if flag.starts_with('-') => {
                return Err(ShellError::UnknownArgument {
                    command: "read".to_string(),
                    argument: flag.to_string(),
                })
            }
            file if path.is_none() => path = Some(file),
            _ => return Err(ShellError::usage(READ_USAGE)),
        }
    }
    let path = path.ok_or_else(|| ShellError::usage(READ_USAGE))?;
    let path = shell.ctx.resolve_path(path);

    shell.read_file(&path, options)?;

    if shell.config().debug {
        Ok(Renderable::Text(READ_COMPLETE_MARKER.to_string()))
    } else {
        Ok(Renderable::Silent)
    }
}

fn sql(shell: &mut Shell, args: &str) -> CommandResult {
    let statement = required_tail(args, SQL_USAGE)?;
    let result = shell.ctx.engine().sql(statement)?;
    Ok(Renderable::from(result))
}

fn set_trace(shell: &mut Shell, args: &str, enabled: bool) -> CommandResult {
    let (command, usage) = if enabled {
        ("trace", TRACE_USAGE)
    } else {
        ("untrace", UNTRACE_USAGE)
    };
    let words: Vec<&str> = args.split_whitespace().collect();
    let target = match words.as_slice() {
        [] => TraceTarget::Bql,
        [word] => TraceTarget::parse(word).ok_or_else(|| ShellError::UnknownArgument {
            command: command.to_string(),
            argument: word.to_string(),
        })?,
        _ => return Err(ShellError::usage(usage)),
    };

    shell.ctx.set_trace(target, enabled);
    Ok(Renderable::Silent)
}
