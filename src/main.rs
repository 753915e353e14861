//! Waveplay CLI
//!
//! Command-line interface for the Waveplay waveform player control.

use clap::Parser;
use env_logger::Env;
use log::info;

use waveplay::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Waveplay v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Waveplay v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Resolve { attrs, file, json } => {
            commands::resolve_attributes(file.as_deref(), &attrs, json)?
        }
        Commands::Simulate { path, json } => commands::simulate(&path, json)?,
    }
    Ok(())
}
