//! pwsync - change one account password on every configured directory
//!
//! The password is applied to each backend in the order the configuration
//! declares them. If any backend refuses, the backends already changed are
//! put back to the old password.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;
mod logging;

use config::AppConfig;
use error::CliResult;

/// Synchronized LDAP / Active Directory password change
#[derive(Parser)]
#[command(name = "pwsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to $CONF_FILE, then ./settings.yaml)
    #[arg(long, short, global = true, env = config::CONFIG_ENV, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Change a password on every configured backend
    Change(commands::change::ChangeArgs),

    /// Validate the configuration and list backends in apply order
    Check(commands::check::CheckArgs),

    /// Test a candidate password against the strength policy
    Strength(commands::strength::StrengthArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let path = AppConfig::config_path(cli.config);
    let config = AppConfig::load(&path)?;
    logging::init_logging(&config.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting pwsync");
    config.validate()?;

    match cli.command {
        Commands::Change(args) => commands::change::execute(args, &config).await,
        Commands::Check(args) => commands::check::execute(args, &config, &path),
        Commands::Strength(args) => commands::strength::execute(args, &config),
    }
}
