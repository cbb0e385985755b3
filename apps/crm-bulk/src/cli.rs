//! CLI argument definitions for crm-bulk.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "crm-bulk",
    version,
    about = "Replay table selection gestures and print the bulk request they produce"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a JSON gesture script against an empty selection.
    Replay(ReplayArgs),

    /// List the tables and the id keys their bulk endpoints expect.
    Resources,
}

#[derive(Parser)]
pub struct ReplayArgs {
    /// Path to the gesture script (JSON array of steps).
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Selection config file (.json or .toml).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Table the selection belongs to.
    #[arg(long, default_value = "customers")]
    pub resource: String,

    /// Server-reported row count for the active filters.
    #[arg(long, default_value_t = 0)]
    pub total: u64,
}
