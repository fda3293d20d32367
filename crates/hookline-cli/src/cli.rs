use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hookline",
    about = "Hookline: inspect and exercise prioritized listener plans",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show listeners per event in dispatch order
    Plan(PlanArgs),
    /// Dispatch a trace event and report which listeners ran
    Dispatch(DispatchArgs),
}

#[derive(Args)]
pub struct PlanArgs {
    /// Path to the TOML listener plan
    pub file: PathBuf,
    /// Only show this event
    #[arg(short, long)]
    pub event: Option<String>,
}

#[derive(Args)]
pub struct DispatchArgs {
    /// Path to the TOML listener plan
    pub file: PathBuf,
    /// Event name to dispatch
    pub event: String,
    /// Dispatch through a read-only view of the registry
    #[arg(long)]
    pub frozen: bool,
    /// Keep running listeners after one fails
    #[arg(long)]
    pub continue_on_error: bool,
}
