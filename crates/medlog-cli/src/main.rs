use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use medlog_cli::commands::{history, label, log, serve, status};
use medlog_cli::{Backend, Cli, Commands, Config, open_database};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let tz = config.timezone()?;
    let now = Utc::now().with_timezone(&tz);
    let locale = config.locale();
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Log(args)) => match Backend::open(&config)? {
            Backend::Local(mut db) => log::run(&mut stdout, &mut db, args, &now)?,
            Backend::Remote(mut remote) => log::run(&mut stdout, &mut remote, args, &now)?,
        },
        Some(Commands::History(args)) => match Backend::open(&config)? {
            Backend::Local(db) => history::run(&mut stdout, &db, args, &now, &locale)?,
            Backend::Remote(remote) => history::run(&mut stdout, &remote, args, &now, &locale)?,
        },
        Some(Commands::Label(args)) => {
            label::run(&mut stdout, args, &now, &locale)?;
        }
        Some(Commands::Serve(args)) => {
            serve::run(&config, args)?;
        }
        Some(Commands::Status) => {
            let db = open_database(&config)?;
            status::run(&mut stdout, &db, &config.database_path, &now, &locale)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
