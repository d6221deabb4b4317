//! Report entities
//!
//! A report record is modelled as a sum type over the two schema generations
//! instead of optional-field probing, so every consumer that cares about the
//! difference has to say so with a `match`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value_objects::{ReportLevel, ReportType, ResourceId, ResultKind, SchemaFlavor};

/// Value of the ownership label on reports produced by the Kubewarden controller
pub const MANAGED_BY_KUBEWARDEN: &str = "kubewarden";

/// Label carrying report ownership
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Property carrying the originating policy name (current schema)
pub const POLICY_NAME_PROPERTY: &str = "policy-name";

/// Property carrying the originating policy namespace (current schema)
pub const POLICY_NAMESPACE_PROPERTY: &str = "policy-namespace";

/// The resource a report is about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl ReportScope {
    /// Summary-index key for this scope, if it names a resource
    pub fn resource_id(&self) -> Option<ResourceId> {
        let name = self.name.as_deref().filter(|name| !name.is_empty())?;
        Some(ResourceId::new(self.namespace.as_deref(), name))
    }
}

/// One policy evaluation inside a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    /// Lower-cased outcome as received; may be outside the recognized vocabulary
    pub result: String,
    pub policy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl ReportResult {
    pub fn new(result: &str, policy: impl Into<String>) -> Self {
        Self {
            result: result.trim().to_lowercase(),
            policy: policy.into(),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn kind(&self) -> Option<ResultKind> {
        ResultKind::parse(&self.result)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Schema-independent content of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBody {
    /// Stable key within the report-type collection
    pub identity: String,
    pub report_type: ReportType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ReportScope>,
    #[serde(default)]
    pub results: Vec<ReportResult>,
}

impl ReportBody {
    pub fn new(report_type: ReportType, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            identity: name.clone(),
            report_type,
            name,
            namespace: None,
            managed_by: None,
            scope: None,
            results: Vec::new(),
        }
    }
}

/// A report in one of the two schema generations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "lowercase")]
pub enum ReportRecord {
    Legacy(ReportBody),
    Current(ReportBody),
}

impl ReportRecord {
    /// Wrap a body, tagging it by the schema of its report type
    pub fn from_body(body: ReportBody) -> Self {
        match body.report_type.schema() {
            SchemaFlavor::Legacy => Self::Legacy(body),
            SchemaFlavor::Current => Self::Current(body),
        }
    }

    pub fn body(&self) -> &ReportBody {
        match self {
            Self::Legacy(body) | Self::Current(body) => body,
        }
    }

    pub fn schema(&self) -> SchemaFlavor {
        match self {
            Self::Legacy(_) => SchemaFlavor::Legacy,
            Self::Current(_) => SchemaFlavor::Current,
        }
    }

    pub fn identity(&self) -> &str {
        &self.body().identity
    }

    pub fn report_type(&self) -> ReportType {
        self.body().report_type
    }

    pub fn level(&self) -> ReportLevel {
        self.report_type().level()
    }

    pub fn scope(&self) -> Option<&ReportScope> {
        self.body().scope.as_ref()
    }

    pub fn results(&self) -> &[ReportResult] {
        &self.body().results
    }

    pub fn managed_by(&self) -> Option<&str> {
        self.body().managed_by.as_deref()
    }

    /// Ownership filter: only Kubewarden-produced reports are aggregated
    pub fn is_managed_by_kubewarden(&self) -> bool {
        self.managed_by() == Some(MANAGED_BY_KUBEWARDEN)
    }

    pub fn resource_id(&self) -> Option<ResourceId> {
        self.scope().and_then(ReportScope::resource_id)
    }
}
