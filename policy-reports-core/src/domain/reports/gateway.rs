//! Inbound port to the remote report source

use async_trait::async_trait;

use super::entities::ReportRecord;
use super::errors::GatewayError;
use super::value_objects::ReportType;

/// Source of report records.
///
/// Implementations own transport, pagination and wire decoding; callers only
/// ever see complete collections of one report type.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetch every record of `report_type`
    async fn fetch_all(&self, report_type: ReportType) -> Result<Vec<ReportRecord>, GatewayError>;

    /// Whether the remote serves `report_type` at all.
    ///
    /// A `false` answer is a normal condition: the type is treated as empty and
    /// `fetch_all` is never called for it.
    fn schema_exists(&self, report_type: ReportType) -> bool;
}
