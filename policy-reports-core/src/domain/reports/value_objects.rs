//! Report value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a report is about a namespaced resource or about the cluster as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Namespaced,
    Cluster,
}

impl ReportLevel {
    pub fn from_cluster_flag(is_cluster_level: bool) -> Self {
        if is_cluster_level {
            Self::Cluster
        } else {
            Self::Namespaced
        }
    }
}

/// Report schema generation
///
/// `Legacy` is the `wgpolicyk8s.io` PolicyReport shape, `Current` is the
/// `openreports.io` Report shape that newer controllers emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFlavor {
    Legacy,
    Current,
}

impl SchemaFlavor {
    pub fn api_group(&self) -> &'static str {
        match self {
            Self::Legacy => "wgpolicyk8s.io",
            Self::Current => "openreports.io",
        }
    }

    pub fn api_version(&self) -> &'static str {
        match self {
            Self::Legacy => "v1alpha2",
            Self::Current => "v1alpha1",
        }
    }
}

/// Report-type key: one per (schema, level) pair.
///
/// This is the unit of caching and of ingestion; a fetch always returns every
/// record of exactly one report type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReportType {
    PolicyReport,
    ClusterPolicyReport,
    Report,
    ClusterReport,
}

impl ReportType {
    pub const ALL: [ReportType; 4] = [
        Self::PolicyReport,
        Self::ClusterPolicyReport,
        Self::Report,
        Self::ClusterReport,
    ];

    pub fn of(schema: SchemaFlavor, level: ReportLevel) -> Self {
        match (schema, level) {
            (SchemaFlavor::Legacy, ReportLevel::Namespaced) => Self::PolicyReport,
            (SchemaFlavor::Legacy, ReportLevel::Cluster) => Self::ClusterPolicyReport,
            (SchemaFlavor::Current, ReportLevel::Namespaced) => Self::Report,
            (SchemaFlavor::Current, ReportLevel::Cluster) => Self::ClusterReport,
        }
    }

    pub fn schema(&self) -> SchemaFlavor {
        match self {
            Self::PolicyReport | Self::ClusterPolicyReport => SchemaFlavor::Legacy,
            Self::Report | Self::ClusterReport => SchemaFlavor::Current,
        }
    }

    pub fn level(&self) -> ReportLevel {
        match self {
            Self::PolicyReport | Self::Report => ReportLevel::Namespaced,
            Self::ClusterPolicyReport | Self::ClusterReport => ReportLevel::Cluster,
        }
    }

    /// Kubernetes kind as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PolicyReport => "PolicyReport",
            Self::ClusterPolicyReport => "ClusterPolicyReport",
            Self::Report => "Report",
            Self::ClusterReport => "ClusterReport",
        }
    }

    /// Plural resource name used in API paths
    pub fn plural(&self) -> &'static str {
        match self {
            Self::PolicyReport => "policyreports",
            Self::ClusterPolicyReport => "clusterpolicyreports",
            Self::Report => "reports",
            Self::ClusterReport => "clusterreports",
        }
    }

    /// Registry-style type name, e.g. `wgpolicyk8s.io.policyreport`
    pub fn type_name(&self) -> String {
        format!(
            "{}.{}",
            self.schema().api_group(),
            self.kind().to_lowercase()
        )
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Outcome of a single policy evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Pass,
    Fail,
    Warn,
    Error,
    Skip,
}

impl ResultKind {
    /// Every outcome the aggregation counts. Anything else is ignored.
    pub const RECOGNIZED: [ResultKind; 5] = [
        Self::Pass,
        Self::Fail,
        Self::Warn,
        Self::Error,
        Self::Skip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Skip => "skip",
        }
    }

    /// Case-insensitive lookup; unknown outcomes yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase();
        Self::RECOGNIZED
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-resource outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultCounts {
    pub pass: u64,
    pub fail: u64,
    pub warn: u64,
    pub error: u64,
    pub skip: u64,
}

impl ResultCounts {
    pub fn record(&mut self, kind: ResultKind) {
        match kind {
            ResultKind::Pass => self.pass += 1,
            ResultKind::Fail => self.fail += 1,
            ResultKind::Warn => self.warn += 1,
            ResultKind::Error => self.error += 1,
            ResultKind::Skip => self.skip += 1,
        }
    }

    pub fn get(&self, kind: ResultKind) -> u64 {
        match kind {
            ResultKind::Pass => self.pass,
            ResultKind::Fail => self.fail,
            ResultKind::Warn => self.warn,
            ResultKind::Error => self.error,
            ResultKind::Skip => self.skip,
        }
    }

    pub fn total(&self) -> u64 {
        self.pass + self.fail + self.warn + self.error + self.skip
    }
}

/// Key of the summary index: `<namespace>/<name>` or bare `<name>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        match namespace.filter(|ns| !ns.is_empty()) {
            Some(namespace) => Self(format!("{}/{}", namespace, name)),
            None => Self(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The two Kubewarden policy kinds a report result can point back to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    AdmissionPolicy,
    ClusterAdmissionPolicy,
}

impl PolicyKind {
    /// UI resource type for this kind
    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::AdmissionPolicy => "policies.kubewarden.io.admissionpolicy",
            Self::ClusterAdmissionPolicy => "policies.kubewarden.io.clusteradmissionpolicy",
        }
    }
}

/// Named UI routes a link can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteName {
    /// `c-cluster-product-resource-namespace-id`
    NamespacedResource,
    /// `c-cluster-product-resource-id`
    ClusterResource,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NamespacedResource => "c-cluster-product-resource-namespace-id",
            Self::ClusterResource => "c-cluster-product-resource-id",
        }
    }
}

/// A resolved, UI-addressable link target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteIdentity {
    pub route: RouteName,
    pub cluster: String,
    pub product: String,
    pub resource: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl RouteIdentity {
    /// Path form of the route, as the UI router would render it
    pub fn path(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!(
                "/c/{}/{}/{}/{}/{}",
                self.cluster, self.product, self.resource, namespace, self.id
            ),
            None => format!(
                "/c/{}/{}/{}/{}",
                self.cluster, self.product, self.resource, self.id
            ),
        }
    }
}
