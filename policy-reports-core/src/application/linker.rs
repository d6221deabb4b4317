//! Link resolution from reports back to policies and resources
//!
//! Every resolver answers `None` when the report does not carry enough to
//! build a link. That is a display concern (render plain text), never an error.

use crate::domain::reports::{
    POLICY_NAME_PROPERTY, POLICY_NAMESPACE_PROPERTY, PolicyKind, ReportRecord, ReportResult,
    ReportScope, RouteIdentity, RouteName,
};

/// Kinds served by the core API group. Their UI type is the bare lower-cased kind.
///
/// Must stay in sync with the UI resource registry.
pub const CORE_KINDS: &[&str] = &[
    "Pod",
    "Service",
    "Namespace",
    "Node",
    "ConfigMap",
    "Secret",
    "ServiceAccount",
    "PersistentVolume",
    "PersistentVolumeClaim",
    "ReplicationController",
    "Endpoints",
    "Event",
    "LimitRange",
    "ResourceQuota",
];

const LEGACY_CLUSTERWIDE_PREFIX: &str = "clusterwide-";
const LEGACY_NAMESPACED_PREFIX: &str = "namespaced-";

pub const DEFAULT_CLUSTER_ID: &str = "local";
pub const DEFAULT_PRODUCT: &str = "explorer";

/// Resolves route identities for report results and report scopes
#[derive(Debug, Clone)]
pub struct ReportLinker {
    cluster: String,
    product: String,
}

impl ReportLinker {
    pub fn new(cluster: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            product: product.into(),
        }
    }

    /// Policy link from the `policy-name` / `policy-namespace` properties.
    ///
    /// A `policy-namespace` property makes it an AdmissionPolicy; without one
    /// it is a ClusterAdmissionPolicy.
    pub fn resolve_policy_link(&self, result: &ReportResult) -> Option<RouteIdentity> {
        let name = result.property(POLICY_NAME_PROPERTY)?;
        match result.property(POLICY_NAMESPACE_PROPERTY) {
            Some(namespace) => Some(self.policy_route(
                PolicyKind::AdmissionPolicy,
                name,
                Some(namespace),
            )),
            None => Some(self.policy_route(PolicyKind::ClusterAdmissionPolicy, name, None)),
        }
    }

    /// Policy link for a result in the context of its report.
    ///
    /// Current-schema reports only use the properties. Legacy reports fall back
    /// to the policy-server naming in `policy` when the properties are absent.
    pub fn resolve_policy_link_in(
        &self,
        record: &ReportRecord,
        result: &ReportResult,
    ) -> Option<RouteIdentity> {
        match record {
            ReportRecord::Current(_) => self.resolve_policy_link(result),
            ReportRecord::Legacy(_) => self.resolve_policy_link(result).or_else(|| {
                let namespace = record.scope().and_then(|scope| scope.namespace.as_deref());
                self.resolve_legacy_policy_name(&result.policy, namespace)
            }),
        }
    }

    /// Link to the resource a report is about
    pub fn resolve_resource_link(&self, record: &ReportRecord) -> Option<RouteIdentity> {
        let scope = record.scope()?;
        let name = scope.name.as_deref().filter(|name| !name.is_empty())?;
        let resource = Self::resource_type(scope)?;
        let namespace = scope
            .namespace
            .as_deref()
            .filter(|namespace| !namespace.is_empty());

        Some(self.route(resource, name, namespace))
    }

    /// UI resource type for a scope: the lower-cased kind for core kinds,
    /// `<group>.<kind>` otherwise.
    pub fn resource_type(scope: &ReportScope) -> Option<String> {
        let kind = scope.kind.as_deref().filter(|kind| !kind.is_empty())?;
        let kind_lower = kind.to_lowercase();

        if CORE_KINDS.contains(&kind) {
            return Some(kind_lower);
        }

        let api_version = scope.api_version.as_deref()?;
        match api_version.split_once('/') {
            Some((group, _version)) if !group.is_empty() => {
                Some(format!("{}.{}", group, kind_lower))
            }
            _ => Some(kind_lower),
        }
    }

    fn resolve_legacy_policy_name(
        &self,
        policy: &str,
        scope_namespace: Option<&str>,
    ) -> Option<RouteIdentity> {
        if let Some(name) = policy.strip_prefix(LEGACY_CLUSTERWIDE_PREFIX) {
            return (!name.is_empty())
                .then(|| self.policy_route(PolicyKind::ClusterAdmissionPolicy, name, None));
        }

        // A namespaced policy only evaluates resources in its own namespace,
        // so the report scope tells where the namespace ends in the name.
        let rest = policy.strip_prefix(LEGACY_NAMESPACED_PREFIX)?;
        let namespace = scope_namespace.filter(|namespace| !namespace.is_empty())?;
        let name = rest
            .strip_prefix(namespace)
            .and_then(|rest| rest.strip_prefix('-'))
            .filter(|name| !name.is_empty())?;

        Some(self.policy_route(PolicyKind::AdmissionPolicy, name, Some(namespace)))
    }

    fn policy_route(&self, kind: PolicyKind, name: &str, namespace: Option<&str>) -> RouteIdentity {
        self.route(kind.resource_type().to_string(), name, namespace)
    }

    fn route(&self, resource: String, id: &str, namespace: Option<&str>) -> RouteIdentity {
        RouteIdentity {
            route: if namespace.is_some() {
                RouteName::NamespacedResource
            } else {
                RouteName::ClusterResource
            },
            cluster: self.cluster.clone(),
            product: self.product.clone(),
            resource,
            id: id.to_string(),
            namespace: namespace.map(str::to_string),
        }
    }
}

impl Default for ReportLinker {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTER_ID, DEFAULT_PRODUCT)
    }
}
