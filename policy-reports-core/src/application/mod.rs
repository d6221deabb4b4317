//! Application Layer - Report caching, ingestion and aggregation

pub mod compatibility;
pub mod engine;
pub mod errors;
pub mod ingest;
pub mod linker;
pub mod request_cache;
pub mod store;
pub mod summary;

pub use compatibility::{CompatibilityResolver, SchemaSelection, parse_version};
pub use engine::ReportEngine;
pub use errors::*;
pub use ingest::{
    BatchIngestor, DEFAULT_CHUNK_SIZE, IngestStats, Scheduler, TaskYieldScheduler, TimerScheduler,
};
pub use linker::ReportLinker;
pub use request_cache::{DEFAULT_REQUEST_TTL, SharedFetch, TtlRequestCache};
pub use store::{ReportCollection, ReportStore, StagedPartition};
pub use summary::{SummaryIndex, SummaryIndexBuilder};
