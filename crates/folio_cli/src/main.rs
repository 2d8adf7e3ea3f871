//! `folio`: admin command line for portfolio content.
//!
//! # Responsibility
//! - Resolve storage and logging settings from flags and environment.
//! - Run one content command and map failures to a non-zero exit code.

mod args;
mod commands;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use commands::ActionResponse;
use folio_core::db::open_db;
use folio_core::{default_log_level, init_logging, LogSettings, MemoryStore, SqliteStore};
use log::error;
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match execute(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=command module=cli status=error error={err:#}");
            if json {
                let response = ActionResponse::failure(format!("{err:#}"));
                if let Ok(encoded) = serde_json::to_string_pretty(&response) {
                    let _ = writeln!(out, "{encoded}");
                }
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    setup_logging(&cli)?;

    if cli.memory {
        let store = MemoryStore::new();
        return commands::run(&store, cli.command, cli.json, out);
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open store `{}`", cli.db.display()))?;
    let store = SqliteStore::new(&conn);
    commands::run(&store, cli.command, cli.json, out)
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let Some(log_dir) = cli.log_dir.as_deref() else {
        return Ok(());
    };
    let log_dir = std::path::absolute(log_dir)
        .with_context(|| format!("failed to resolve log dir `{}`", log_dir.display()))?;
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());

    let settings = LogSettings::new(level, log_dir)?;
    init_logging(&settings)?;
    Ok(())
}
