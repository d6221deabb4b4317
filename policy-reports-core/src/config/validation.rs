//! Configuration validation module

use crate::application::compatibility::parse_version;
use crate::config::{
    CacheConfig, CompatibilityConfig, GatewayConfig, IngestConfig, LinksConfig, LoggingConfig,
};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Gateway configuration error: {message}")]
    Gateway { message: String },

    #[error("Cache configuration error: {message}")]
    Cache { message: String },

    #[error("Ingest configuration error: {message}")]
    Ingest { message: String },

    #[error("Compatibility configuration error: {message}")]
    Compatibility { message: String },

    #[error("Links configuration error: {message}")]
    Links { message: String },

    #[error("Logging configuration error: {message}")]
    Logging { message: String },
}

impl ValidationError {
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn ingest(message: impl Into<String>) -> Self {
        Self::Ingest {
            message: message.into(),
        }
    }

    pub fn compatibility(message: impl Into<String>) -> Self {
        Self::Compatibility {
            message: message.into(),
        }
    }

    pub fn links(message: impl Into<String>) -> Self {
        Self::Links {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::gateway(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(ValidationError::gateway(
                "Gateway timeout must be greater than 0 seconds",
            ));
        }

        if self.page_limit == 0 {
            return Err(ValidationError::gateway(
                "Gateway page_limit must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_seconds == 0 {
            return Err(ValidationError::cache(
                "Cache TTL must be greater than 0 seconds",
            ));
        }

        Ok(())
    }
}

impl Validate for IngestConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.chunk_size == 0 {
            return Err(ValidationError::ingest(
                "Ingest chunk_size must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Validate for CompatibilityConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        parse_version("controller", &self.controller_version)
            .map_err(|e| ValidationError::compatibility(e.to_string()))?;
        parse_version("engine", &self.engine_version)
            .map_err(|e| ValidationError::compatibility(e.to_string()))?;
        Ok(())
    }
}

impl Validate for LinksConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.cluster_id.is_empty() {
            return Err(ValidationError::links("cluster_id cannot be empty"));
        }
        if self.product.is_empty() {
            return Err(ValidationError::links("product cannot be empty"));
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(ValidationError::logging(format!(
                "Unknown logging format '{}', expected 'text' or 'json'",
                other
            ))),
        }
    }
}
