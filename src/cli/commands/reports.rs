//! Reports Command - list policy reports of one level

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use policy_reports_core::ReportEngine;
use policy_reports_core::domain::reports::{ReportLevel, ReportRecord, RouteIdentity};

use crate::cli::Cli;
use crate::cli::context::CliContext;
use crate::cli::exit_codes;
use crate::cli::output::OutputFormat;

/// Arguments for the reports command
#[derive(Args, Debug)]
pub struct ReportsArgs {
    /// List cluster-level reports instead of namespaced ones
    #[arg(long)]
    pub cluster: bool,

    /// Only list reports about this resource type (e.g. "pod", "apps.deployment")
    #[arg(long)]
    pub resource_type: Option<String>,
}

/// Report listing entry for JSON output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListing {
    #[serde(flatten)]
    pub record: ReportRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_link: Option<RouteIdentity>,
    pub policy_links: Vec<Option<RouteIdentity>>,
}

/// Run the reports command
pub async fn run(ctx: &CliContext, _cli: &Cli, args: &ReportsArgs) -> Result<i32> {
    let engine = match ctx.engine().await {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            return Ok(exit_codes::NETWORK_ERROR);
        }
    };
    let level = ReportLevel::from_cluster_flag(args.cluster);

    let records = match engine
        .get_reports(level, args.resource_type.as_deref())
        .await
    {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            return Ok(exit_codes::FETCH_FAILED);
        }
    };

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&listings(&engine, records))?,
        OutputFormat::Table => {
            ctx.output.header(match level {
                ReportLevel::Namespaced => "Policy Reports",
                ReportLevel::Cluster => "Cluster Policy Reports",
            });
            if records.is_empty() {
                ctx.output.info("No reports found");
            } else {
                ctx.output.table(
                    &["TYPE", "NAME", "NAMESPACE", "RESOURCE", "RESULTS", "MANAGED-BY"],
                    &table_rows(&records),
                );
            }
        }
    }

    Ok(exit_codes::SUCCESS)
}

/// Attach resource and policy links to each record
pub fn listings(engine: &ReportEngine, records: Vec<ReportRecord>) -> Vec<ReportListing> {
    records
        .into_iter()
        .map(|record| {
            let resource_link = engine.resolve_resource_link(&record);
            let policy_links = record
                .results()
                .iter()
                .map(|result| engine.resolve_policy_link(&record, result))
                .collect();
            ReportListing {
                record,
                resource_link,
                policy_links,
            }
        })
        .collect()
}

fn table_rows(records: &[ReportRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| {
            let body = record.body();
            vec![
                body.report_type.kind().to_string(),
                body.name.clone(),
                body.namespace.clone().unwrap_or_else(|| "-".to_string()),
                record
                    .resource_id()
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                body.results.len().to_string(),
                body.managed_by.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}
