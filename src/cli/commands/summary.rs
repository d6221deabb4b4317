//! Summary Command - per-resource outcome counts
//!
//! Fetches every selected report type of both levels, rebuilds the summary
//! index and prints it, or the counts of a single resource.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

use policy_reports_core::ReportEngine;
use policy_reports_core::application::{ReportsError, SummaryIndexBuilder};
use policy_reports_core::domain::reports::{
    GatewayError, ReportLevel, ReportRecord, ReportType, ResultCounts,
};

use crate::cli::Cli;
use crate::cli::context::CliContext;
use crate::cli::exit_codes;
use crate::cli::output::OutputFormat;

const NO_REPORTS: &[ReportRecord] = &[];

/// Arguments for the summary command
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Only fetch cluster-level reports
    #[arg(long)]
    pub cluster: bool,

    /// Only count reports about this resource type (e.g. "pod", "apps.deployment")
    #[arg(long)]
    pub resource_type: Option<String>,

    /// Show a single resource (`<namespace>/<name>` or `<name>`)
    #[arg(long)]
    pub resource: Option<String>,
}

/// One summary row for JSON output
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub resource: String,
    #[serde(flatten)]
    pub counts: ResultCounts,
}

/// Run the summary command
pub async fn run(ctx: &CliContext, _cli: &Cli, args: &SummaryArgs) -> Result<i32> {
    let engine = match ctx.engine().await {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            return Ok(exit_codes::NETWORK_ERROR);
        }
    };
    let rows = match collect(&engine, args).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            return Ok(exit_codes::FETCH_FAILED);
        }
    };

    if let Some(resource) = &args.resource {
        if rows.is_empty() {
            ctx.output.info(&format!("No Kubewarden reports for {}", resource));
            return Ok(exit_codes::SUCCESS);
        }
    }

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&rows)?,
        OutputFormat::Table => {
            ctx.output.header("Policy Report Summary");
            ctx.output.table(
                &["RESOURCE", "PASS", "FAIL", "WARN", "ERROR", "SKIP"],
                &table_rows(&rows),
            );
        }
    }

    Ok(exit_codes::SUCCESS)
}

/// Fetch the selected levels and read the rows the arguments ask for.
///
/// Fails only when every requested report type failed; a level whose
/// fetches all failed otherwise contributes nothing.
pub async fn collect(
    engine: &ReportEngine,
    args: &SummaryArgs,
) -> Result<Vec<SummaryRow>, ReportsError> {
    let summary = if args.cluster {
        let records = engine
            .get_reports(ReportLevel::Cluster, args.resource_type.as_deref())
            .await?;
        Arc::new(SummaryIndexBuilder::build(&records, NO_REPORTS))
    } else if let Some(resource_type) = args.resource_type.as_deref() {
        let (resource, cluster) = tokio::join!(
            engine.get_reports(ReportLevel::Namespaced, Some(resource_type)),
            engine.get_reports(ReportLevel::Cluster, Some(resource_type)),
        );

        let mut failures = Vec::new();
        let resource = level_records(resource, &mut failures)?;
        let cluster = level_records(cluster, &mut failures)?;
        if resource.is_none() && cluster.is_none() {
            return Err(ReportsError::AllFetchesFailed { failures });
        }

        Arc::new(SummaryIndexBuilder::build(
            resource.as_deref().unwrap_or(NO_REPORTS),
            cluster.as_deref().unwrap_or(NO_REPORTS),
        ))
    } else {
        let failures = engine.refresh_all().await;
        if !failures.is_empty() && failures.len() == engine.report_types().len() {
            return Err(ReportsError::AllFetchesFailed { failures });
        }
        engine.summary()
    };

    let rows = match &args.resource {
        Some(resource) => summary
            .get(resource)
            .map(|counts| SummaryRow {
                resource: resource.clone(),
                counts: *counts,
            })
            .into_iter()
            .collect(),
        None => summary
            .iter()
            .map(|(resource, counts)| SummaryRow {
                resource: resource.to_string(),
                counts: *counts,
            })
            .collect(),
    };
    Ok(rows)
}

/// Records of one level, or `None` when every fetch of that level failed
fn level_records(
    result: Result<Vec<ReportRecord>, ReportsError>,
    failures: &mut Vec<(ReportType, GatewayError)>,
) -> Result<Option<Vec<ReportRecord>>, ReportsError> {
    match result {
        Ok(records) => Ok(Some(records)),
        Err(ReportsError::AllFetchesFailed { failures: level }) => {
            failures.extend(level);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn table_rows(rows: &[SummaryRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            vec![
                row.resource.clone(),
                row.counts.pass.to_string(),
                row.counts.fail.to_string(),
                row.counts.warn.to_string(),
                row.counts.error.to_string(),
                row.counts.skip.to_string(),
            ]
        })
        .collect()
}
