//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Silverflow - bronze-to-silver validation and conformance runs
#[derive(Parser, Debug)]
#[command(name = "svf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the warehouse database file
    #[arg(short, long, global = true, default_value = "warehouse.duckdb")]
    pub target: String,

    /// Path to a pipeline YAML file (default: built-in food-delivery pipeline)
    #[arg(short, long, global = true)]
    pub pipeline: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild, validate, and deduplicate the silver tables
    Run(RunArgs),

    /// Load CSV files into the bronze schema
    Seed(SeedArgs),

    /// Show recent entries from the rejection audit log
    Rejections(RejectionsArgs),
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: RunOutput,
}

/// Run output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutput {
    /// Per-table lines plus a summary
    Table,
    /// Full run summary as JSON
    Json,
}

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Directory to scan for CSV files
    #[arg(default_value = "seeds")]
    pub dir: String,

    /// Seed names to load (comma-separated, default: all)
    #[arg(short, long)]
    pub seeds: Option<String>,
}

/// Arguments for the rejections command
#[derive(Args, Debug)]
pub struct RejectionsArgs {
    /// Maximum number of entries to show, newest first
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Only show entries for one silver table
    #[arg(long)]
    pub table: Option<String>,

    /// Print entries as JSON lines
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
