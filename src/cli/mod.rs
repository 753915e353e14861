//! CLI Module
//!
//! Command-line interface for resolving widget attributes and replaying
//! interaction scenarios.

pub mod commands;
pub mod scenario;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Waveplay - waveform player control toolkit
#[derive(Parser, Debug)]
#[command(name = "waveplay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve element attributes into an instance config
    #[command(name = "resolve")]
    Resolve {
        /// Attribute as name=value (repeatable)
        #[arg(short, long = "attr", value_parser = parse_attribute)]
        attrs: Vec<(String, String)>,

        /// JSON file with an attribute map; --attr values override it
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Replay a scenario file against a simulated transport
    #[command(name = "simulate")]
    Simulate {
        /// Path to the scenario JSON
        path: PathBuf,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parse `name=value`
pub fn parse_attribute(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty attribute name in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}
