mod commands;
mod error;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use roster_client::ApiClient;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{serve, students, tui, Context};
use crate::error::{exit_code_for, report_error};
use roster_config as config;

#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "Student roster server and client")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base URL of the roster API, overrides `client.api_url`.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve(serve::ServeArgs),
    /// Create a student record
    Add(students::AddArgs),
    /// List student records, newest first
    List,
    /// Replace the fields of a student record
    Edit(students::EditArgs),
    /// Delete a student record
    Delete(students::DeleteArgs),
    /// Open the terminal UI
    Tui,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let default_level = match (&cli.command, verbose) {
        (_, true) => "debug",
        (Command::Serve(_), false) => "info",
        _ => "warn",
    };
    init_logging(default_level);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        api_url,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Tui = command {
        return tui::launch(config_path, api_url, verbose);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }

    if let Command::Serve(args) = command {
        return serve::serve(&app_config, args);
    }

    let base = match api_url {
        Some(raw) => config::parse_api_url(&raw)?,
        None => app_config.client.api_url.clone(),
    };
    debug!(url = %base, "using api");
    let client = ApiClient::new(base).with_context(|| "build http client")?;
    let ctx = Context {
        client: &client,
        json,
    };

    match command {
        Command::Add(args) => students::add_student(&ctx, args),
        Command::List => students::list_students(&ctx),
        Command::Edit(args) => students::edit_student(&ctx, args),
        Command::Delete(args) => students::delete_student(&ctx, args),
        Command::Serve(_) | Command::Tui => {
            unreachable!("serve and tui are handled before the client is built")
        }
    }
}

fn init_logging(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
