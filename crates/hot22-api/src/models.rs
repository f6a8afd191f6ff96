// Wire models for the HOT22 REST API.
//
// Field names follow the server: HOT file element codes (`AGTN`, `TRNN`,
// `TDNR`, ...) for record-derived entities, camelCase for everything else.
// Every entity keeps unknown fields in `extra` so CLI JSON output is lossless.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ── Pagination ──────────────────────────────────────────────────────

/// Server-side pagination block. Never computed client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_records: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: u32,
}

impl Pagination {
    /// Index for zero-based table widgets.
    pub fn zero_based_page(&self) -> u32 {
        self.current_page.saturating_sub(1)
    }
}

/// A paginated list response: `{ data: [...], pagination: {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            pagination: Pagination::default(),
        }
    }
}

/// Strip a `{ success, data }` wrapper. Paginated bodies keep their
/// top-level shape because `pagination` sits beside `data`.
pub(crate) fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map)
            if map.contains_key("success")
                && map.contains_key("data")
                && !map.contains_key("pagination") =>
        {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

// ── Offices ─────────────────────────────────────────────────────────

/// A travel agency office, keyed by its IATA agent code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    #[serde(rename = "AGTN")]
    pub agent_code: String,
    #[serde(default, alias = "officeName")]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_transactions: Option<u64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub last_activity: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Passengers ──────────────────────────────────────────────────────

/// A ticketed passenger transaction, keyed by transaction number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    #[serde(rename = "TRNN")]
    pub transaction_number: String,
    #[serde(rename = "AGTN", default)]
    pub agent_code: Option<String>,
    #[serde(rename = "PXNM", default)]
    pub passenger_name: Option<String>,
    #[serde(rename = "TDNR", default)]
    pub ticket_number: Option<String>,
    #[serde(rename = "DAIS", default)]
    pub issue_date: Option<String>,
    #[serde(rename = "TRNC", default)]
    pub transaction_code: Option<String>,
    #[serde(rename = "CUTP", default)]
    pub currency: Option<String>,
    #[serde(rename = "TDAM", default)]
    pub amount: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One record in a passenger's transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    #[serde(default)]
    pub record_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Analytics ───────────────────────────────────────────────────────

/// Analytics report families, one endpoint each.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    AsRefStr, EnumIter, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AnalyticsReport {
    Revenue,
    Commission,
    Performance,
    TravelPatterns,
}

/// Aggregation bucket for time-series reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GroupBy {
    Day,
    Week,
    Month,
    Year,
}

// ── Search ──────────────────────────────────────────────────────────

/// A heterogeneous global-search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "title")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Quick-lookup key types (`/api/lookup/{type}/{value}`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LookupKind {
    Ticket,
    Transaction,
    Agent,
    Passenger,
}

// ── Error logs ──────────────────────────────────────────────────────

/// Processing log for one uploaded HOT22 file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLog {
    pub upload_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub record_type: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub has_errors: Option<bool>,
    #[serde(default)]
    pub error_count: Option<u64>,
    #[serde(default)]
    pub total_records: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorLogStats {
    pub total_logs: u64,
    pub total_errors: u64,
    pub error_rate: Option<f64>,
    pub by_record_type: BTreeMap<String, u64>,
    pub by_error_type: BTreeMap<String, u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Live monitor payload (`/api/error-logs/monitor/realtime`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealtimeSnapshot {
    pub recent_errors: Vec<ErrorLog>,
    pub errors_last_hour: u64,
    pub active_uploads: u64,
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BulkOperation {
    Delete,
    Export,
}

/// Body of `POST /api/error-logs/bulk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub upload_ids: Vec<String>,
    pub operation: BulkOperation,
}

/// Outcome of a bulk or cleanup operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationResult {
    #[serde(alias = "deletedCount", alias = "processed")]
    pub affected: Option<u64>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Files ───────────────────────────────────────────────────────────

/// Response of `POST /upload-hot22`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadResult {
    pub upload_id: Option<String>,
    pub file_name: Option<String>,
    pub total_records: Option<u64>,
    pub processed_records: Option<u64>,
    pub error_count: Option<u64>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Record counts across the processed HOT22 collections (`/stats`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileStats {
    pub total_records: u64,
    pub by_record_type: BTreeMap<String, u64>,
    pub last_upload: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Health ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthStatus {
    pub status: String,
    pub uptime: Option<f64>,
    pub timestamp: Option<String>,
    pub database: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionHealth {
    pub name: String,
    pub count: u64,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionsReport {
    pub collections: Vec<CollectionHealth>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_is_stripped_for_detail_bodies() {
        let body = json!({ "success": true, "data": { "AGTN": "1234567" } });
        let office: Office = serde_json::from_value(unwrap_envelope(body)).unwrap();
        assert_eq!(office.agent_code, "1234567");
    }

    #[test]
    fn paginated_bodies_keep_pagination() {
        let body = json!({
            "success": true,
            "data": [],
            "pagination": { "currentPage": 3, "totalPages": 4, "totalRecords": 180 }
        });
        let page: Page<Office> = serde_json::from_value(unwrap_envelope(body)).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.current_page, 3);
        assert_eq!(page.pagination.zero_based_page(), 2);
    }

    #[test]
    fn analytics_report_paths_are_kebab_case() {
        assert_eq!(AnalyticsReport::TravelPatterns.to_string(), "travel-patterns");
        assert_eq!(
            "commission".parse::<AnalyticsReport>().unwrap(),
            AnalyticsReport::Commission
        );
    }

    #[test]
    fn unknown_fields_are_kept() {
        let log: ErrorLog = serde_json::from_value(json!({
            "uploadId": "u-1",
            "recordType": "BKS24",
            "lineNumber": 42
        }))
        .unwrap();
        assert_eq!(log.record_type.as_deref(), Some("BKS24"));
        assert_eq!(log.extra["lineNumber"], 42);
    }
}
