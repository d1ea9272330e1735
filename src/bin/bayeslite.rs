//! # Bayeslite Shell Entry Point
//!
//! Binary entry point for the interactive shell.
//!
//! ## Usage
//!
//! ```bash
//! # In-memory session
//! bayeslite
//!
//! # Open (or create) a database file
//! bayeslite ./dha.bdb
//!
//! # Run scripts, then exit
//! bayeslite -b -f setup.bql -f report.bql ./dha.bdb
//!
//! # Verbose logging on stderr
//! RUST_LOG=bayeslite_shell=debug bayeslite --debug
//! ```

use bayeslite_shell::cli::history::history_path;
use bayeslite_shell::cli::{render_error, Repl, ScriptOptions, Shell};
use bayeslite_shell::config::{DEBUG_ENV_VAR, INIT_FILE_ENV_VAR};
use bayeslite_shell::{InitFile, ShellConfig, SqliteEngine};
use clap::Parser;
use eyre::{Result, WrapErr};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bayeslite", version, about = "Interactive shell for Bayeslite databases")]
struct Cli {
    /// SQLite database file; an in-memory database when omitted
    database: Option<PathBuf>,

    /// Script to run after the init file (repeatable)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Exit after running the scripts instead of starting the prompt
    #[arg(short, long)]
    batch: bool,

    /// Skip the welcome banner
    #[arg(short, long)]
    quiet: bool,

    /// Print `.read` completion markers, error chains and debug logs
    #[arg(long, env = DEBUG_ENV_VAR)]
    debug: bool,

    /// Do not run `~/.bayesliterc`
    #[arg(long)]
    no_init_file: bool,

    /// Run this init file instead of `~/.bayesliterc`
    #[arg(long, env = INIT_FILE_ENV_VAR, value_name = "PATH", conflicts_with = "no_init_file")]
    init_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> ShellConfig {
        let init_file = match (&self.init_file, self.no_init_file) {
            (_, true) => InitFile::Disabled,
            (Some(path), false) => InitFile::Path(path.clone()),
            (None, false) => InitFile::Default,
        };

        ShellConfig::default()
            .with_debug(self.debug)
            .with_quiet(self.quiet || self.batch)
            .with_init_file(init_file)
            .with_history_file(history_path())
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let engine = match &cli.database {
        Some(path) => SqliteEngine::open(path)
            .wrap_err_with(|| format!("failed to open database at {:?}", path))?,
        None => SqliteEngine::open_in_memory().wrap_err("failed to open in-memory database")?,
    };

    let mut shell = Shell::new(Box::new(engine), cli.config(), Box::new(io::stdout()))
        .wrap_err("failed to start shell")?;

    if let Err(err) = shell.run_init_file() {
        report(&mut shell, &err)?;
    }

    for file in &cli.files {
        let path = shell.context().resolve_path(&file.to_string_lossy());
        if let Err(err) = shell.read_file(&path, ScriptOptions::default()) {
            report(&mut shell, &err)?;
        }
    }

    if cli.batch {
        return Ok(());
    }

    let mut repl = Repl::new(shell)?;
    repl.run()?;

    Ok(())
}

fn report(shell: &mut Shell, err: &bayeslite_shell::ShellError) -> Result<()> {
    let lines = render_error(err, shell.config().debug);
    shell.emit(&lines).wrap_err("failed to write output")
}
