//! Engine wiring against the configured Kubernetes API server

use std::sync::Arc;

use anyhow::{Context, Result};
use policy_reports_core::infrastructure::KubeApiGateway;
use policy_reports_core::{Config, ReportEngine};

/// Build a report engine backed by the cluster named in `config`.
///
/// Runs API discovery first so that report types the cluster does not serve
/// are treated as empty instead of failing.
pub async fn create_engine(config: &Config) -> Result<ReportEngine> {
    let gateway = KubeApiGateway::new(&config.gateway)
        .context("Failed to create Kubernetes API gateway")?;

    let served = gateway
        .discover()
        .await
        .with_context(|| format!("API discovery against {} failed", config.gateway.base_url))?;
    tracing::debug!(count = served.len(), "Report types served by cluster");

    let engine = ReportEngine::from_config(Arc::new(gateway), config)
        .context("Failed to resolve report schema selection")?;
    Ok(engine)
}
