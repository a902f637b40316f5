mod commands;
mod error;
mod menu;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{contacts, import, Context};
use crate::error::{exit_code_for, report_error};
use dialbook_config as config;
use dialbook_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "dialbook", version, about = "dialbook contact manager")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive menu (the default when no command is given)
    Menu,
    /// Import contacts from a JSON file
    Import(import::ImportArgs),
    Add(contacts::AddArgs),
    List,
    Search(contacts::SearchArgs),
    #[command(name = "update-phone")]
    UpdatePhone(contacts::UpdatePhoneArgs),
    Delete(contacts::DeleteArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
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
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let db_path = paths::resolve_db_path(
        db_path.or_else(|| app_config.database.path.clone()),
        &app_config.database.name,
    )
    .with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store = Store::open(&db_path)
        .with_context(|| format!("connect to database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command.unwrap_or(Command::Menu) {
        Command::Menu => menu::run(&ctx, io::stdin().lock(), io::stdout().lock()),
        Command::Import(args) => import::import_contacts(&ctx, args),
        Command::Add(args) => contacts::add_contact(&ctx, args),
        Command::List => contacts::list_contacts(&ctx),
        Command::Search(args) => contacts::search_contacts(&ctx, args),
        Command::UpdatePhone(args) => contacts::update_phone(&ctx, args),
        Command::Delete(args) => contacts::delete_contact(&ctx, args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
