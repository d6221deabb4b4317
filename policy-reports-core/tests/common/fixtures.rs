//! Test fixtures for policy-reports-core

#![allow(dead_code)]

use policy_reports_core::domain::reports::{
    MANAGED_BY_KUBEWARDEN, POLICY_NAME_PROPERTY, POLICY_NAMESPACE_PROPERTY, ReportBody,
    ReportRecord, ReportResult, ReportScope, ReportType,
};

/// Scope naming a core `Pod`
pub fn pod_scope(namespace: &str, name: &str) -> ReportScope {
    ReportScope {
        api_version: Some("v1".to_string()),
        kind: Some("Pod".to_string()),
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        uid: None,
    }
}

/// Scope naming a cluster-scoped `Namespace`
pub fn namespace_scope(name: &str) -> ReportScope {
    ReportScope {
        api_version: Some("v1".to_string()),
        kind: Some("Namespace".to_string()),
        name: Some(name.to_string()),
        namespace: None,
        uid: None,
    }
}

/// Scope naming a `Deployment` of the `apps` group
pub fn deployment_scope(namespace: &str, name: &str) -> ReportScope {
    ReportScope {
        api_version: Some("apps/v1".to_string()),
        kind: Some("Deployment".to_string()),
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        uid: None,
    }
}

/// Kubewarden-owned report with one result per outcome in `outcomes`
pub fn kubewarden_report(
    report_type: ReportType,
    identity: &str,
    scope: ReportScope,
    outcomes: &[&str],
) -> ReportRecord {
    let mut body = ReportBody::new(report_type, identity);
    body.namespace = scope.namespace.clone();
    body.managed_by = Some(MANAGED_BY_KUBEWARDEN.to_string());
    body.scope = Some(scope);
    body.results = outcomes
        .iter()
        .map(|outcome| {
            ReportResult::new(outcome, "p1")
                .with_property(POLICY_NAME_PROPERTY, "p1")
                .with_property(POLICY_NAMESPACE_PROPERTY, "ns1")
        })
        .collect();
    ReportRecord::from_body(body)
}

/// Report produced by some other tool
pub fn foreign_report(
    report_type: ReportType,
    identity: &str,
    scope: ReportScope,
    outcomes: &[&str],
) -> ReportRecord {
    let mut record = kubewarden_report(report_type, identity, scope, outcomes);
    match &mut record {
        ReportRecord::Legacy(body) | ReportRecord::Current(body) => {
            body.managed_by = Some("kyverno".to_string());
        }
    }
    record
}

/// `count` Kubewarden reports about distinct pods in `ns1`
pub fn pod_reports(report_type: ReportType, count: usize) -> Vec<ReportRecord> {
    (0..count)
        .map(|i| {
            kubewarden_report(
                report_type,
                &format!("report-{}", i),
                pod_scope("ns1", &format!("pod-{}", i)),
                &["pass"],
            )
        })
        .collect()
}
