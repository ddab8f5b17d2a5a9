//! Main CLI application structure

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::output::{Output, OutputFormat};
use super::session::{Access, Session};
use super::{item, list, user};
use crate::domain::ListId;
use crate::storage::{Config, LogConfig, LogFormat};

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "NEST_LOG";

#[derive(Parser)]
#[command(name = "nest")]
#[command(author, version, about = "Task lists with arbitrarily nested items")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Database file
    #[arg(long, global = true, env = "NEST_DB")]
    pub db: Option<PathBuf>,

    /// Email of the user to act as
    #[arg(long, global = true, env = "NEST_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the database and a config file if none exists
    Init,

    /// Manage users
    #[command(subcommand)]
    User(user::UserCommands),

    /// Manage your lists
    #[command(subcommand)]
    List(list::ListCommands),

    /// Manage items inside a list
    #[command(subcommand)]
    Item(item::ItemCommands),

    /// Check stored items against the hierarchy rules
    Check {
        /// Only check this list
        #[arg(long)]
        list: Option<ListId>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    init_tracing(&config.global.log, cli.verbose);

    let format = cli
        .format
        .unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format);

    tracing::debug!(command = ?cli.command, config = ?config.path, "nest starting");

    let mut session = Session::open(config, cli.db.as_deref(), cli.user.as_deref())?;

    match cli.command {
        Commands::Init => init(&mut session, &output)?,
        Commands::User(cmd) => user::run(cmd, &mut session, &output)?,
        Commands::List(cmd) => list::run(cmd, &mut session, &output)?,
        Commands::Item(cmd) => item::run(cmd, &mut session, &output)?,
        Commands::Check { list } => check(&mut session, &output, list)?,
    }

    tracing::debug!("command completed");
    Ok(())
}

/// Installs the stderr log subscriber.
///
/// `NEST_LOG` wins over the config file; `--verbose` turns on debug output
/// for the crate when `NEST_LOG` is unset.
fn init_tracing(log: &LogConfig, verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let directive = match (&log.filter, verbose) {
            (_, true) => "nestlist=debug",
            (Some(filter), false) => filter.as_str(),
            (None, false) => "nestlist=warn",
        };
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("nestlist=warn"))
    });

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match log.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(io::stderr))
            .try_init(),
    };

    if let Err(e) = installed {
        eprintln!("Warning: logging disabled: {}", e);
    }
}

fn init(session: &mut Session, output: &Output) -> Result<()> {
    let db_path = session.db_path().display().to_string();

    let config = &session.config;
    let config_created = match &config.path {
        Some(path) if !path.exists() => {
            config.save()?;
            Some(path.display().to_string())
        }
        _ => None,
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "database": db_path,
            "config_created": config_created,
        }));
    } else {
        output.success(&format!("Initialized database at {}", db_path));
        if let Some(path) = config_created {
            output.success(&format!("Wrote default config to {}", path));
        }
    }

    Ok(())
}

fn check(session: &mut Session, output: &Output, list: Option<ListId>) -> Result<()> {
    if let Some(list_id) = list {
        session.owned_list(list_id, Access::ViewList)?;
    }

    let issues = session.service().check_integrity(list)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "healthy": issues.is_empty(),
            "issues": issues,
        }));
    } else if issues.is_empty() {
        output.success("No integrity issues found");
    } else {
        for issue in &issues {
            println!("{}", issue);
        }
    }

    if !issues.is_empty() {
        bail!("{} integrity issue(s) found", issues.len());
    }
    Ok(())
}
