//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use log::info;

use crate::cli::scenario::{run_scenario, Scenario};
use crate::config::{resolve, Attributes, InstanceConfig};
use crate::error::Result;

/// Build the attribute map from an optional JSON file plus overrides.
pub fn collect_attributes(
    file: Option<&Path>,
    overrides: &[(String, String)],
) -> Result<Attributes> {
    let mut attrs = match file {
        Some(path) => {
            info!("Reading attributes from: {}", path.display());
            let content = fs::read_to_string(path)?;
            serde_json::from_str::<Attributes>(&content)?
        }
        None => Attributes::new(),
    };
    for (name, value) in overrides {
        attrs.insert(name, value.clone());
    }
    Ok(attrs)
}

/// Resolve attributes and print the instance config.
pub fn resolve_attributes(
    file: Option<&Path>,
    overrides: &[(String, String)],
    json: bool,
) -> Result<()> {
    let attrs = collect_attributes(file, overrides)?;
    let config = resolve(&attrs)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print_config(&config);
    }
    Ok(())
}

fn print_config(config: &InstanceConfig) {
    let mode = config
        .interaction_mode
        .map(|mode| mode.to_string())
        .unwrap_or_else(|| "unset (inferred at ready)".to_string());

    println!("Audio URL:      {}", config.audio_url);
    println!("Play mode:      {}", mode);
    println!("Wave color:     {}", config.wave_color);
    println!("Progress color: {}", config.progress_color);
    println!("Size:           {} x {}", config.width, config.height);
    println!(
        "Bars:           width {} / gap {} / radius {}",
        config.style.bar_width, config.style.bar_gap, config.style.bar_radius
    );
    println!(
        "Cursor:         {} ({}px)",
        config.style.cursor_color, config.style.cursor_width
    );
    println!("Capture:        {:?}", config.policy.capture);
    println!("Restart seek:   {:?}", config.policy.restart_seek);
    match config.policy.double_activation_window_ms {
        Some(window) => println!("Double click:   restart within {}ms", window),
        None => println!("Double click:   off"),
    }
}

/// Replay a scenario file and print the per-step report.
pub fn simulate(path: &Path, json: bool) -> Result<()> {
    info!("Simulating scenario: {}", path.display());

    let scenario = Scenario::load(path)?;
    let report = run_scenario(&scenario)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Scenario: {} ({} steps)", path.display(), report.steps.len());
    println!("{:-<60}", "");
    let setup = report
        .setup_commands
        .iter()
        .map(|command| command.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("[--] setup                  commands: {}", setup);
    for step in &report.steps {
        println!("{}", step);
    }

    Ok(())
}
