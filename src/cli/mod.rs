//! Policy Reports CLI - query Kubewarden policy reports from the command line
//!
//! ## Commands
//! - `summary`: per-resource outcome counts
//! - `reports`: list reports of one level, optionally filtered by resource type
//! - `compat`: show which report schemas a controller/engine pair exposes

pub mod commands;
mod context;
mod output;

pub use context::CliContext;
pub use output::{OutputFormat, OutputWriter};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Policy Reports - cached, aggregated view over Kubewarden policy reports
#[derive(Parser, Debug)]
#[command(
    name = "policy-reports",
    version,
    about = "Aggregate Kubewarden policy reports from a Kubernetes cluster",
    long_about = "Reads legacy (wgpolicyk8s.io) and current (openreports.io) policy reports, \
                  caches them per report type and folds them into per-resource outcome counts."
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, env = "POLICY_REPORTS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show per-resource outcome counts
    #[command(visible_alias = "s")]
    Summary(commands::summary::SummaryArgs),

    /// List policy reports
    #[command(visible_alias = "r")]
    Reports(commands::reports::ReportsArgs),

    /// Resolve which report schemas to read for a controller/engine pair
    Compat(commands::compat::CompatArgs),
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
    context: CliContext,
}

impl CliApp {
    /// Parse arguments, load configuration and initialize logging
    pub fn new() -> anyhow::Result<Self> {
        let cli = Cli::parse();
        let context = CliContext::new(&cli)?;
        Ok(Self { cli, context })
    }

    /// Run the CLI application
    pub async fn run(self) -> anyhow::Result<i32> {
        let exit_code = match self.cli.command {
            Commands::Summary(ref args) => {
                commands::summary::run(&self.context, &self.cli, args).await
            }
            Commands::Reports(ref args) => {
                commands::reports::run(&self.context, &self.cli, args).await
            }
            Commands::Compat(ref args) => commands::compat::run(&self.context, &self.cli, args),
        }?;

        Ok(exit_code)
    }
}

/// Process exit codes
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// Every report fetch failed
    pub const FETCH_FAILED: i32 = 1;
    /// Configuration or input error
    pub const CONFIG_ERROR: i32 = 2;
    /// The cluster could not be reached
    pub const NETWORK_ERROR: i32 = 3;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = 99;
}
