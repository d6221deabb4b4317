//! Kubernetes API server gateway

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::wire::{ApiResourceList, ReportList};
use crate::config::GatewayConfig;
use crate::domain::reports::{GatewayError, RemoteGateway, ReportRecord, ReportType, SchemaFlavor};

const USER_AGENT: &str = concat!("policy-reports/", env!("CARGO_PKG_VERSION"));

/// Upper bound on list pages followed for one report type
const MAX_PAGES: usize = 10_000;

/// Reads report lists straight from the Kubernetes API server.
///
/// Which report types exist is learned once through API discovery
/// ([`KubeApiGateway::discover`]); until then no type is considered served.
pub struct KubeApiGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
    page_limit: u32,
    served: RwLock<HashSet<ReportType>>,
}

impl KubeApiGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| GatewayError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|token| !token.is_empty()),
            page_limit: config.page_limit,
            served: RwLock::new(HashSet::new()),
        })
    }

    /// Query API discovery for both report groups and remember which report
    /// types are served. A group the server does not know is not an error.
    pub async fn discover(&self) -> Result<HashSet<ReportType>, GatewayError> {
        let mut served = HashSet::new();

        for schema in [SchemaFlavor::Legacy, SchemaFlavor::Current] {
            let url = format!(
                "{}/apis/{}/{}",
                self.base_url,
                schema.api_group(),
                schema.api_version()
            );
            let response = self.send(self.client.get(&url)).await?;

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                debug!(group = schema.api_group(), "Report API group not served");
                continue;
            }

            let resources: ApiResourceList = Self::decode(response).await?;
            let plurals: HashSet<&str> =
                resources.resources.iter().map(|r| r.name.as_str()).collect();
            served.extend(
                ReportType::ALL
                    .into_iter()
                    .filter(|report_type| report_type.schema() == schema)
                    .filter(|report_type| plurals.contains(report_type.plural())),
            );
        }

        info!(served = ?served, "Discovered report types");
        *self.served.write().unwrap_or_else(PoisonError::into_inner) = served.clone();
        Ok(served)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        self.authorized(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| GatewayError::http(e.to_string(), e.status().map(|s| s.as_u16())))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::http(
                format!("unexpected status {}: {}", status, body.trim()),
                Some(status.as_u16()),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn list_url(&self, report_type: ReportType) -> String {
        let schema = report_type.schema();
        format!(
            "{}/apis/{}/{}/{}",
            self.base_url,
            schema.api_group(),
            schema.api_version(),
            report_type.plural()
        )
    }
}

#[async_trait]
impl RemoteGateway for KubeApiGateway {
    async fn fetch_all(&self, report_type: ReportType) -> Result<Vec<ReportRecord>, GatewayError> {
        let url = self.list_url(report_type);
        let limit = self.page_limit.to_string();
        let mut continue_token: Option<String> = None;
        let mut records = Vec::new();
        let mut pages = 0usize;

        loop {
            let mut request = self.client.get(&url).query(&[("limit", limit.as_str())]);
            if let Some(token) = continue_token.as_deref() {
                request = request.query(&[("continue", token)]);
            }

            let page: ReportList = Self::decode(self.send(request).await?).await?;
            pages += 1;
            records.extend(
                page.items
                    .into_iter()
                    .map(|item| item.into_record(report_type)),
            );

            match page.metadata.continue_token.filter(|token| !token.is_empty()) {
                Some(token) => continue_token = Some(token),
                None => break,
            }

            if pages >= MAX_PAGES {
                warn!(report_type = %report_type, "Pagination did not terminate, stopping");
                break;
            }
        }

        debug!(report_type = %report_type, pages, records = records.len(), "Listed reports");
        Ok(records)
    }

    fn schema_exists(&self, report_type: ReportType) -> bool {
        self.served
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&report_type)
    }
}
