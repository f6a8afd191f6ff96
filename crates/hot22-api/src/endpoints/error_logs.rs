// Error-log endpoints
//
// Processing logs are keyed by `uploadId`. Besides list/detail this
// covers aggregates (stats, dashboard, realtime monitor), CSV export,
// bulk operations, and age-based cleanup.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::client::{ApiClient, Endpoint};
use crate::error::Error;
use crate::models::{
    BulkOperation, BulkRequest, ErrorLog, ErrorLogStats, OperationResult, Page, RealtimeSnapshot,
};
use crate::params::QueryParams;

fn error_logs() -> Endpoint {
    Endpoint::new("/api/error-logs")
}

impl ApiClient {
    /// `GET /api/error-logs`
    pub async fn list_error_logs(&self, params: &QueryParams) -> Result<Page<ErrorLog>, Error> {
        debug!(params = params.len(), "listing error logs");
        self.get_json(&error_logs(), params).await
    }

    /// `GET /api/error-logs/{uploadId}`
    pub async fn get_error_log(&self, upload_id: &str) -> Result<ErrorLog, Error> {
        self.get_json(&error_logs().segment(upload_id), &QueryParams::new())
            .await
    }

    /// `GET /api/error-logs/stats/summary`
    pub async fn error_log_stats(&self, params: &QueryParams) -> Result<ErrorLogStats, Error> {
        self.get_json(&Endpoint::new("/api/error-logs/stats/summary"), params)
            .await
    }

    /// Download the CSV export into `dest_dir/filename`.
    ///
    /// `GET /api/error-logs/export`
    pub async fn export_error_logs(
        &self,
        params: &QueryParams,
        dest_dir: &Path,
        filename: &str,
    ) -> Result<PathBuf, Error> {
        debug!(filename, "exporting error logs");
        self.download_file(
            &Endpoint::new("/api/error-logs/export"),
            params,
            dest_dir,
            filename,
        )
        .await
    }

    /// `GET /api/error-logs/search`
    pub async fn search_error_logs(&self, params: &QueryParams) -> Result<Page<ErrorLog>, Error> {
        self.get_json(&Endpoint::new("/api/error-logs/search"), params)
            .await
    }

    /// Dashboard aggregate; its shape is server-defined.
    ///
    /// `GET /api/error-logs/dashboard`
    pub async fn error_log_dashboard(&self) -> Result<serde_json::Value, Error> {
        self.get_json(&Endpoint::new("/api/error-logs/dashboard"), &QueryParams::new())
            .await
    }

    /// `GET /api/error-logs/monitor/realtime`
    pub async fn error_log_realtime(&self) -> Result<RealtimeSnapshot, Error> {
        self.get_json(
            &Endpoint::new("/api/error-logs/monitor/realtime"),
            &QueryParams::new(),
        )
        .await
    }

    /// `GET /api/error-logs/by-type/{type}`
    pub async fn error_logs_by_type(
        &self,
        error_type: &str,
        params: &QueryParams,
    ) -> Result<Page<ErrorLog>, Error> {
        let endpoint = Endpoint::new("/api/error-logs/by-type").segment(error_type);
        self.get_json(&endpoint, params).await
    }

    /// Apply `operation` to every listed upload.
    ///
    /// `POST /api/error-logs/bulk` with `{"uploadIds": [...], "operation": "delete"}`
    pub async fn bulk_error_logs(
        &self,
        upload_ids: &[String],
        operation: BulkOperation,
    ) -> Result<OperationResult, Error> {
        debug!(count = upload_ids.len(), %operation, "bulk error-log operation");
        let body = BulkRequest {
            upload_ids: upload_ids.to_vec(),
            operation,
        };
        self.post_json(&Endpoint::new("/api/error-logs/bulk"), &body)
            .await
    }

    /// Delete logs older than `days_old` days. `None` uses the server default.
    ///
    /// `DELETE /api/error-logs/cleanup`
    pub async fn cleanup_error_logs(&self, days_old: Option<u32>) -> Result<OperationResult, Error> {
        debug!(?days_old, "cleaning up error logs");
        let params = QueryParams::new().value("daysOld", days_old);
        self.delete_json(&Endpoint::new("/api/error-logs/cleanup"), &params)
            .await
    }
}
