// HOT22 file endpoints
//
// These live outside `/api`: upload, collection stats, and the raw
// per-record-type collections.

use std::path::Path;

use tracing::debug;

use crate::client::{ApiClient, Endpoint};
use crate::error::Error;
use crate::models::{FileStats, OperationResult, Page, UploadResult};
use crate::params::QueryParams;

// Multipart field name expected by the upload endpoint.
const UPLOAD_FIELD: &str = "file";

impl ApiClient {
    /// Upload a HOT22 file for processing.
    ///
    /// `POST /upload-hot22` (multipart, field `file`)
    pub async fn upload_hot22<F>(&self, file_path: &Path, on_progress: F) -> Result<UploadResult, Error>
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        debug!(path = %file_path.display(), "uploading HOT22 file");
        self.upload_file(&Endpoint::new("/upload-hot22"), file_path, UPLOAD_FIELD, on_progress)
            .await
    }

    /// `GET /stats`
    pub async fn file_stats(&self) -> Result<FileStats, Error> {
        self.get_json(&Endpoint::new("/stats"), &QueryParams::new())
            .await
    }

    /// Raw records of one HOT22 record type (`BKS24`, `BKS30`, ...).
    ///
    /// `GET /records/{type}`
    pub async fn records(
        &self,
        record_type: &str,
        params: &QueryParams,
    ) -> Result<Page<serde_json::Value>, Error> {
        let endpoint = Endpoint::new("/records").segment(record_type);
        self.get_json(&endpoint, params).await
    }

    /// Purge every processed record.
    ///
    /// `DELETE /records/all`
    pub async fn delete_all_records(&self) -> Result<OperationResult, Error> {
        debug!("deleting all records");
        self.delete_json(&Endpoint::new("/records/all"), &QueryParams::new())
            .await
    }
}
