//! CLI Context - configuration and output shared by every command
//!
//! The report engine is created on demand; commands that never touch the
//! cluster (such as `compat`) do not need a reachable API server.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use policy_reports_core::{Config, ReportEngine, init_tracing};

use crate::app::create_engine;
use crate::cli::Cli;
use crate::cli::output::OutputWriter;

/// Lightweight context for CLI operations
pub struct CliContext {
    /// Application configuration
    pub config: Arc<Config>,

    /// Output writer configured based on CLI flags
    pub output: OutputWriter,
}

impl CliContext {
    /// Create a new CLI context from parsed CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = Self::load_config(cli.config.as_deref())?;

        init_tracing(&config.logging)
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

        Ok(Self {
            config: Arc::new(config),
            output: OutputWriter::new(cli.format, cli.quiet),
        })
    }

    fn load_config(path: Option<&Path>) -> Result<Config> {
        Config::load_with(path).with_context(|| match path {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Failed to load configuration".to_string(),
        })
    }

    /// Connect to the cluster and build a report engine
    pub async fn engine(&self) -> Result<ReportEngine> {
        create_engine(&self.config).await
    }
}
