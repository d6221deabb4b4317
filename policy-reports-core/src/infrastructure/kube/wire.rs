//! Wire shapes of the Kubernetes list and discovery responses
//!
//! Both report generations share the same `metadata`/`scope`/`results`
//! layout, so one set of types decodes either.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::domain::reports::{
    MANAGED_BY_LABEL, ReportBody, ReportRecord, ReportResult, ReportScope, ReportType,
};

/// `APIResourceList` returned by `GET /apis/{group}/{version}`
#[derive(Debug, Deserialize)]
pub(super) struct ApiResourceList {
    #[serde(default)]
    pub resources: Vec<ApiResource>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiResource {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListMeta {
    #[serde(rename = "continue", default)]
    pub continue_token: Option<String>,
}

/// One page of a report list
#[derive(Debug, Deserialize)]
pub(super) struct ReportList {
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub items: Vec<WireReport>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireReport {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub scope: Option<ReportScope>,
    #[serde(default)]
    pub results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireResult {
    #[serde(default)]
    pub policy: String,
    #[serde(default)]
    pub rule: Option<String>,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl WireReport {
    /// Identity is the object uid, falling back to `<namespace>/<name>`
    fn identity(&self) -> String {
        if let Some(uid) = self.metadata.uid.as_deref().filter(|uid| !uid.is_empty()) {
            return uid.to_string();
        }
        match self.metadata.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            Some(namespace) => format!("{}/{}", namespace, self.metadata.name),
            None => self.metadata.name.clone(),
        }
    }

    pub fn into_record(self, report_type: ReportType) -> ReportRecord {
        let identity = self.identity();
        let WireReport {
            mut metadata,
            scope,
            results,
        } = self;

        let body = ReportBody {
            identity,
            report_type,
            managed_by: metadata.labels.remove(MANAGED_BY_LABEL),
            name: metadata.name,
            namespace: metadata.namespace,
            scope,
            results: results.into_iter().map(WireResult::into_result).collect(),
        };
        ReportRecord::from_body(body)
    }
}

impl WireResult {
    fn into_result(self) -> ReportResult {
        let mut result = ReportResult::new(&self.result, self.policy);
        result.rule = self.rule;
        result.message = self.message;
        result.severity = self.severity;
        result.properties = self.properties;
        result
    }
}
