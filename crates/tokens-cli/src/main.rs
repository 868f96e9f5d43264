//! Design token variables CLI
//!
//! Imports DTCG token documents into a JSON-persisted variable store.

mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use config::Config;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        println!("{} Design token variables CLI", "tokens".green().bold());
        println!();
        println!("Run {} for available commands.", "tokens --help".cyan());
        return Ok(());
    };

    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd, cli.config.as_deref())?;

    match command {
        Commands::Import { source, dry_run } => {
            commands::run_import(&cwd, &config, &source, dry_run).await
        }
        Commands::Diff { source } => commands::run_diff(&cwd, &config, &source).await,
        Commands::Inspect { store, json } => {
            commands::run_inspect(&cwd, &config, store.as_deref(), json)
        }
    }
}

/// Log to stderr so stdout stays clean for `--json`.
///
/// `RUST_LOG` wins when set; otherwise engine logs are shown at info, or
/// debug with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "tokens=debug" } else { "tokens=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_cli_error_user() {
        let error = crate::error::CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }
}
