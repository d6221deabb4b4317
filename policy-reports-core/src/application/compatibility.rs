//! Report schema selection by controller and engine version

use semver::Version;
use serde::Serialize;

use super::errors::VersionError;
use crate::domain::reports::{ReportLevel, ReportType, SchemaFlavor};

/// Engine release that introduced the current report schema
pub const CURRENT_SCHEMA_ENGINE_VERSION: Version = Version::new(1, 4, 0);

/// Last controller release that still writes legacy reports. Legacy reports
/// are read only from controllers up to and including this release, whatever
/// the engine version.
pub const LEGACY_SCHEMA_CONTROLLER_VERSION: Version = Version::new(1, 10, 100);

/// Which report schemas to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSelection {
    pub use_legacy_schema: bool,
    pub use_current_schema: bool,
}

impl SchemaSelection {
    pub fn includes(&self, schema: SchemaFlavor) -> bool {
        match schema {
            SchemaFlavor::Legacy => self.use_legacy_schema,
            SchemaFlavor::Current => self.use_current_schema,
        }
    }

    /// Report types to query for `level`, legacy first
    pub fn report_types(&self, level: ReportLevel) -> Vec<ReportType> {
        [SchemaFlavor::Legacy, SchemaFlavor::Current]
            .into_iter()
            .filter(|schema| self.includes(*schema))
            .map(|schema| ReportType::of(schema, level))
            .collect()
    }
}

/// Decides which report schemas a controller/engine pair exposes
#[derive(Debug, Default, Clone, Copy)]
pub struct CompatibilityResolver;

impl CompatibilityResolver {
    pub fn resolve(controller_version: &Version, engine_version: &Version) -> SchemaSelection {
        let controller_writes_legacy = *controller_version <= LEGACY_SCHEMA_CONTROLLER_VERSION;

        if *engine_version >= CURRENT_SCHEMA_ENGINE_VERSION {
            SchemaSelection {
                use_legacy_schema: controller_writes_legacy,
                use_current_schema: true,
            }
        } else {
            SchemaSelection {
                use_legacy_schema: true,
                use_current_schema: controller_writes_legacy,
            }
        }
    }

    /// Parse both versions (a leading `v` is accepted) and resolve
    pub fn resolve_str(
        controller_version: &str,
        engine_version: &str,
    ) -> Result<SchemaSelection, VersionError> {
        let controller = parse_version("controller", controller_version)?;
        let engine = parse_version("engine", engine_version)?;
        Ok(Self::resolve(&controller, &engine))
    }
}

/// Parse a release version such as `1.11.0` or `v1.11.0`
pub fn parse_version(component: &'static str, input: &str) -> Result<Version, VersionError> {
    let trimmed = input.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).map_err(|e| VersionError::Invalid {
        component,
        input: input.to_string(),
        reason: e.to_string(),
    })
}
