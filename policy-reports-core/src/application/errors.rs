//! Application error types

use thiserror::Error;

use crate::domain::reports::{GatewayError, ReportType};

/// Rejection of (part of) an ingestion slice
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("{rejected} record(s) without identity were not committed")]
    MissingIdentity { rejected: usize },
}

/// Unparsable controller or engine version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid {component} version '{input}': {reason}")]
    Invalid {
        component: &'static str,
        input: String,
        reason: String,
    },
}

/// Errors surfaced by the report engine
#[derive(Error, Debug, Clone)]
pub enum ReportsError {
    /// Every selected report type failed to fetch
    #[error("all report fetches failed: {}", describe_failures(.failures))]
    AllFetchesFailed {
        failures: Vec<(ReportType, GatewayError)>,
    },

    #[error(transparent)]
    Version(#[from] VersionError),
}

fn describe_failures(failures: &[(ReportType, GatewayError)]) -> String {
    failures
        .iter()
        .map(|(report_type, error)| format!("{}: {}", report_type, error))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fetches_failed_lists_every_type() {
        let error = ReportsError::AllFetchesFailed {
            failures: vec![
                (ReportType::Report, GatewayError::http("boom", Some(500))),
                (ReportType::PolicyReport, GatewayError::Other("down".into())),
            ],
        };
        let message = error.to_string();
        assert!(message.contains("openreports.io.report"));
        assert!(message.contains("wgpolicyk8s.io.policyreport"));
        assert!(message.contains("status=Some(500)"));
    }
}
