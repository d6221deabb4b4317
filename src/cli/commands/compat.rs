//! Compat Command - report schema selection for a controller/engine pair

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use policy_reports_core::application::{CompatibilityResolver, SchemaSelection};
use policy_reports_core::domain::reports::{ReportLevel, ReportType};

use crate::cli::Cli;
use crate::cli::context::CliContext;
use crate::cli::exit_codes;
use crate::cli::output::OutputFormat;

/// Arguments for the compat command
#[derive(Args, Debug)]
pub struct CompatArgs {
    /// Kubewarden controller version (e.g. "1.11.0")
    #[arg(long)]
    pub controller: String,

    /// Policy engine version (e.g. "1.4.0")
    #[arg(long)]
    pub engine: String,
}

/// Selection plus the report types it implies, for JSON output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatInfo {
    #[serde(flatten)]
    pub selection: SchemaSelection,
    pub report_types: Vec<String>,
}

impl From<SchemaSelection> for CompatInfo {
    fn from(selection: SchemaSelection) -> Self {
        let report_types = [ReportLevel::Namespaced, ReportLevel::Cluster]
            .into_iter()
            .flat_map(|level| selection.report_types(level))
            .map(|report_type: ReportType| report_type.type_name())
            .collect();
        Self {
            selection,
            report_types,
        }
    }
}

/// Run the compat command
pub fn run(ctx: &CliContext, _cli: &Cli, args: &CompatArgs) -> Result<i32> {
    let selection = match CompatibilityResolver::resolve_str(&args.controller, &args.engine) {
        Ok(selection) => selection,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let info = CompatInfo::from(selection);

    match ctx.output.format() {
        OutputFormat::Json => ctx.output.json(&info)?,
        OutputFormat::Table => {
            ctx.output.header("Report Schema Selection");
            ctx.output.table(
                &["SCHEMA", "QUERIED"],
                &[
                    vec![
                        "legacy (wgpolicyk8s.io)".to_string(),
                        info.selection.use_legacy_schema.to_string(),
                    ],
                    vec![
                        "current (openreports.io)".to_string(),
                        info.selection.use_current_schema.to_string(),
                    ],
                ],
            );
        }
    }

    Ok(exit_codes::SUCCESS)
}
