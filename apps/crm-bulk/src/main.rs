//! crm-bulk binary
//!
//! Replays selection gestures and prints the resulting bulk request payload.

use std::fs;

use clap::Parser;
use crm_selection::{SelectionConfig, TargetResource};
use tracing_subscriber::EnvFilter;

mod cli;
mod script;

use cli::{Cli, Command, ReplayArgs};
use script::{replay, Script};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Replay(args) => run_replay(&args),
        Command::Resources => {
            for resource in TargetResource::ALL {
                let fields = resource.id_fields();
                println!(
                    "{:<12} {:<16} {}",
                    resource.to_string(),
                    fields.include,
                    fields.exclude
                );
            }
            Ok(())
        }
    }
}

fn run_replay(args: &ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let resource = TargetResource::from_name(&args.resource)
        .ok_or_else(|| format!("unknown resource: {}", args.resource))?;

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let is_toml = path.extension().is_some_and(|ext| ext == "toml");
            if is_toml {
                SelectionConfig::from_toml_for(resource, &text)?
            } else {
                SelectionConfig::from_json_for(resource, &text)?
            }
        }
        None => SelectionConfig::for_resource(resource),
    };

    let text = fs::read_to_string(&args.script)?;
    let script = Script::from_json(&text)?;
    let outcome = replay(&script, &config)?;

    tracing::info!(
        resource = %resource,
        mode = ?outcome.state.mode(),
        effective_count = outcome.state.effective_count(args.total),
        noop = outcome.request.is_noop(),
        "replayed {} steps",
        script.steps.len()
    );

    let payload = outcome.request.to_json(&config.id_fields)?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
