//! Policy Reports Core - caching and aggregation engine for Kubewarden policy reports
//!
//! Policy reports are read from the Kubernetes API in two schema generations
//! (the legacy `wgpolicyk8s.io` reports and the current `openreports.io`
//! reports), ingested in slices and folded into a per-resource summary.
//!
//! # Modules
//!
//! - [`config`] — Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] — Report records, value objects and the gateway contract
//! - [`application`] — Request cache, ingestion, summary, links and compatibility
//! - [`infrastructure`] — Kubernetes API gateway
//! - [`logging`] — Structured logging with tracing
//!
//! # Architecture
//!
//! ```text
//! policy-reports-core/
//! ├── domain/           # Report model and RemoteGateway trait
//! ├── application/      # Engine, cache, ingestor, summary, linker, resolver
//! ├── infrastructure/   # Kubernetes API client
//! └── config/           # Configuration management
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use policy_reports_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `POLICY_REPORTS` prefix with double underscore separators:
//!
//! ```bash
//! POLICY_REPORTS__CACHE__TTL_SECONDS=120
//! POLICY_REPORTS__INGEST__CHUNK_SIZE=500
//! ```
//!
//! # Logging
//!
//! ```rust,ignore
//! use policy_reports_core::init_tracing;
//!
//! init_tracing(&config.logging)?;
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::ReportEngine;
pub use config::Config;
pub use logging::init_tracing;
