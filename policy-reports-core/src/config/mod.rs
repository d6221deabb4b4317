//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::application::compatibility::{CompatibilityResolver, SchemaSelection};
use crate::application::errors::VersionError;
use crate::application::ingest::{
    DEFAULT_CHUNK_SIZE, Scheduler, TaskYieldScheduler, TimerScheduler,
};
use crate::application::linker::{DEFAULT_CLUSTER_ID, DEFAULT_PRODUCT};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub cache: CacheConfig,
    pub ingest: IngestConfig,
    pub compatibility: CompatibilityConfig,
    pub links: LinksConfig,
    pub logging: LoggingConfig,
}

/// Kubernetes API access
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// API server URL (e.g., "https://127.0.0.1:6443")
    pub base_url: String,
    /// Bearer token sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub timeout_seconds: u64,
    /// Items requested per list page
    pub page_limit: u32,
    /// Skip TLS verification (development clusters with self-signed certificates)
    pub accept_invalid_certs: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://127.0.0.1:6443".to_string(),
            token: None,
            timeout_seconds: 30,
            page_limit: 500,
            accept_invalid_certs: false,
        }
    }
}

/// Request cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Freshness window of a cached report fetch
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300, // 5 minutes
        }
    }
}

/// How ingestion hands control back between slices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldStrategy {
    /// Re-queue the task and resume on the next poll
    #[default]
    Task,
    /// Resume after `yield_delay_ms`
    Timer,
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub chunk_size: usize,
    pub yield_strategy: YieldStrategy,
    pub yield_delay_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            yield_strategy: YieldStrategy::Task,
            yield_delay_ms: 0,
        }
    }
}

impl IngestConfig {
    pub fn scheduler(&self) -> Arc<dyn Scheduler> {
        match self.yield_strategy {
            YieldStrategy::Task => Arc::new(TaskYieldScheduler),
            YieldStrategy::Timer => {
                Arc::new(TimerScheduler::new(Duration::from_millis(self.yield_delay_ms)))
            }
        }
    }
}

/// Installed versions that decide which report schemas are read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityConfig {
    pub controller_version: String,
    pub engine_version: String,
}

impl Default for CompatibilityConfig {
    fn default() -> Self {
        Self {
            controller_version: "1.11.0".to_string(),
            engine_version: "1.4.0".to_string(),
        }
    }
}

impl CompatibilityConfig {
    pub fn selection(&self) -> Result<SchemaSelection, VersionError> {
        CompatibilityResolver::resolve_str(&self.controller_version, &self.engine_version)
    }
}

/// Link target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub cluster_id: String,
    pub product: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            cluster_id: DEFAULT_CLUSTER_ID.to_string(),
            product: DEFAULT_PRODUCT.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.gateway.validate()?;
        self.cache.validate()?;
        self.ingest.validate()?;
        self.compatibility.validate()?;
        self.links.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_with(None)
    }

    /// Load configuration, layering `explicit_file` (if any) over the
    /// `config/` files and under the environment
    pub fn load_with(explicit_file: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder = builder.add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = explicit_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        // Environment variables last (highest priority)
        builder = builder.add_source(
            config::Environment::with_prefix("POLICY_REPORTS").separator("__"),
        );

        let mut config: Config = builder.build()?.try_deserialize()?;

        // Conventional in-cluster token variable
        if config.gateway.token.is_none() {
            if let Ok(token) = std::env::var("KUBE_TOKEN") {
                config.gateway.token = Some(token);
            }
        }

        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
