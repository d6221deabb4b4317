//! Report engine: fetch, cache, ingest and aggregate
//!
//! ```text
//! get_reports -> TtlRequestCache (per report type) -> RemoteGateway::fetch_all
//!                                                 -> BatchIngestor -> ReportStore
//!             -> (all selected types settled) -> SummaryIndexBuilder -> SummaryIndex
//! ```
//!
//! The cached future for a report type covers fetch *and* ingestion, so a
//! cache hit neither refetches nor re-ingests. The summary is rebuilt once per
//! request round, after every selected report type has settled.

use futures::future::join_all;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::compatibility::SchemaSelection;
use super::errors::ReportsError;
use super::ingest::{BatchIngestor, IngestStats};
use super::linker::ReportLinker;
use super::request_cache::{DEFAULT_REQUEST_TTL, SharedFetch, TtlRequestCache};
use super::store::{ReportStore, StagedPartition};
use super::summary::{SummaryIndex, SummaryIndexBuilder};
use crate::config::Config;
use crate::domain::reports::{
    GatewayError, RemoteGateway, ReportLevel, ReportRecord, ReportResult, ReportType,
    ResultCounts, RouteIdentity,
};

/// Entry point for UI-facing report queries.
///
/// One instance per application session; it owns the request cache, both
/// report collections and the current summary index.
pub struct ReportEngine {
    gateway: Arc<dyn RemoteGateway>,
    cache: TtlRequestCache<ReportType, IngestStats, GatewayError>,
    store: Arc<ReportStore>,
    ingestor: BatchIngestor,
    linker: ReportLinker,
    selection: SchemaSelection,
    summary: RwLock<Arc<SummaryIndex>>,
}

impl ReportEngine {
    pub fn new(gateway: Arc<dyn RemoteGateway>, selection: SchemaSelection) -> Self {
        Self {
            gateway,
            cache: TtlRequestCache::new(DEFAULT_REQUEST_TTL),
            store: Arc::new(ReportStore::new()),
            ingestor: BatchIngestor::default(),
            linker: ReportLinker::default(),
            selection,
            summary: RwLock::new(Arc::new(SummaryIndex::default())),
        }
    }

    /// Build an engine with cache, ingestion, link and compatibility settings
    /// taken from `config`
    pub fn from_config(
        gateway: Arc<dyn RemoteGateway>,
        config: &Config,
    ) -> Result<Self, ReportsError> {
        let selection = config.compatibility.selection()?;
        info!(
            controller_version = %config.compatibility.controller_version,
            engine_version = %config.compatibility.engine_version,
            use_legacy_schema = selection.use_legacy_schema,
            use_current_schema = selection.use_current_schema,
            "Resolved report schema selection"
        );

        Ok(Self::new(gateway, selection)
            .with_request_ttl(Duration::from_secs(config.cache.ttl_seconds))
            .with_ingestor(BatchIngestor::new(
                config.ingest.chunk_size,
                config.ingest.scheduler(),
            ))
            .with_linker(ReportLinker::new(
                config.links.cluster_id.clone(),
                config.links.product.clone(),
            )))
    }

    pub fn with_request_ttl(mut self, ttl: Duration) -> Self {
        self.cache = TtlRequestCache::new(ttl);
        self
    }

    pub fn with_ingestor(mut self, ingestor: BatchIngestor) -> Self {
        self.ingestor = ingestor;
        self
    }

    pub fn with_linker(mut self, linker: ReportLinker) -> Self {
        self.linker = linker;
        self
    }

    pub fn selection(&self) -> SchemaSelection {
        self.selection
    }

    pub fn linker(&self) -> &ReportLinker {
        &self.linker
    }

    /// Reports of one level, optionally restricted to scopes of `resource_type`.
    ///
    /// Every selected report type is fetched (or served from cache) and
    /// ingested; the summary index is rebuilt once all of them have settled.
    /// A report type whose fetch failed contributes no records. Only when
    /// every selected type failed is an error returned.
    pub async fn get_reports(
        &self,
        level: ReportLevel,
        resource_type: Option<&str>,
    ) -> Result<Vec<ReportRecord>, ReportsError> {
        let report_types = self.selection.report_types(level);
        let outcomes = self.settle(&report_types).await;
        self.rebuild_summary();

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for (report_type, outcome) in report_types.iter().copied().zip(outcomes) {
            match outcome {
                Ok(_) => records.extend(self.store.records_of(report_type)),
                Err(e) => {
                    warn!(report_type = %report_type, "Report fetch failed: {}", e);
                    failures.push((report_type, e));
                }
            }
        }

        if !report_types.is_empty() && failures.len() == report_types.len() {
            return Err(ReportsError::AllFetchesFailed { failures });
        }

        if let Some(resource_type) = resource_type {
            records.retain(|record| {
                record
                    .scope()
                    .and_then(ReportLinker::resource_type)
                    .is_some_and(|scope_type| scope_type == resource_type)
            });
        }

        Ok(records)
    }

    /// Fetch and ingest every selected report type of both levels, then
    /// rebuild the summary once. Returns the types that failed.
    pub async fn refresh_all(&self) -> Vec<(ReportType, GatewayError)> {
        let report_types = self.report_types();
        let outcomes = self.settle(&report_types).await;
        self.rebuild_summary();

        report_types
            .into_iter()
            .zip(outcomes)
            .filter_map(|(report_type, outcome)| outcome.err().map(|e| (report_type, e)))
            .collect()
    }

    /// Every selected report type of both levels
    pub fn report_types(&self) -> Vec<ReportType> {
        [ReportLevel::Namespaced, ReportLevel::Cluster]
            .into_iter()
            .flat_map(|level| self.selection.report_types(level))
            .collect()
    }

    /// Wait for every listed report type's (possibly cached) fetch to settle
    pub async fn settle(
        &self,
        report_types: &[ReportType],
    ) -> Vec<Result<IngestStats, GatewayError>> {
        join_all(
            report_types
                .iter()
                .map(|report_type| self.fetch_report_type(*report_type)),
        )
        .await
    }

    /// The cached fetch-and-ingest future for one report type
    pub fn fetch_report_type(
        &self,
        report_type: ReportType,
    ) -> SharedFetch<IngestStats, GatewayError> {
        let gateway = Arc::clone(&self.gateway);
        let store = Arc::clone(&self.store);
        let ingestor = self.ingestor.clone();

        self.cache.get_or_fetch(report_type, move || {
            let generation = store.begin_cycle();
            async move {
                if !gateway.schema_exists(report_type) {
                    debug!(report_type = %report_type, "Report type not served, treating as empty");
                    store.replace(report_type, generation, Vec::new());
                    return Ok(IngestStats::default());
                }

                let records = gateway.fetch_all(report_type).await?;
                let mut staged = StagedPartition::with_capacity(records.len());
                let stats = ingestor
                    .ingest(&records, |slice| staged.commit(slice))
                    .await;
                let committed = staged.len();
                if !store.replace(report_type, generation, staged.into_records()) {
                    warn!(
                        report_type = %report_type,
                        generation,
                        "A newer fetch was published first, dropping these records"
                    );
                    return Ok(stats);
                }

                info!(
                    report_type = %report_type,
                    fetched = stats.records,
                    committed,
                    chunks = stats.chunks,
                    failed_chunks = stats.failed_chunks,
                    "Ingested reports"
                );
                Ok(stats)
            }
        })
    }

    /// Recompute the summary index from both collections and publish it
    pub fn rebuild_summary(&self) -> Arc<SummaryIndex> {
        let index = Arc::new(self.store.read_both(|resource, cluster| {
            SummaryIndexBuilder::build(resource.iter(), cluster.iter())
        }));
        debug!(resources = index.len(), "Rebuilt summary index");

        *self.summary.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&index);
        index
    }

    /// Outcome counts for one resource id (`<namespace>/<name>` or `<name>`)
    pub fn query_summary(&self, resource_id: &str) -> Option<ResultCounts> {
        self.summary().get(resource_id).copied()
    }

    /// The current summary index snapshot
    pub fn summary(&self) -> Arc<SummaryIndex> {
        let current = self.summary.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    /// Records of one level currently held, without fetching
    pub fn cached_records(&self, level: ReportLevel) -> Vec<ReportRecord> {
        self.store.records(level)
    }

    pub fn resolve_policy_link(
        &self,
        record: &ReportRecord,
        result: &ReportResult,
    ) -> Option<RouteIdentity> {
        self.linker.resolve_policy_link_in(record, result)
    }

    pub fn resolve_resource_link(&self, record: &ReportRecord) -> Option<RouteIdentity> {
        self.linker.resolve_resource_link(record)
    }

    /// Discard every cached fetch. Test hook.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
