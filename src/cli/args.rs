//! Command-line argument types.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Podar: dynamic weight pruning for convolution layers
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "podar")]
#[command(author = "PAIML")]
#[command(version)]
#[command(about = "Inspect and validate dynamic mask pruning schedules")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate a pruner configuration file
    Validate(ValidateArgs),

    /// Print every scheduled mask update for a configuration
    Schedule(ScheduleArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML or JSON configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show the parsed configuration
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the schedule command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ScheduleArgs {
    /// Path to YAML or JSON configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Number of weight elements the mask covers
    #[arg(short, long)]
    pub elements: usize,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for the schedule command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("Unknown output format: {s}. Valid formats: text, json, yaml")),
        }
    }
}
