// Health endpoints.

use crate::client::{ApiClient, Endpoint};
use crate::error::Error;
use crate::models::{CollectionsReport, HealthStatus};
use crate::params::QueryParams;

impl ApiClient {
    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        self.get_json(&Endpoint::new("/health"), &QueryParams::new())
            .await
    }

    /// `GET /api/health/collections`
    pub async fn collection_health(&self) -> Result<CollectionsReport, Error> {
        self.get_json(&Endpoint::new("/api/health/collections"), &QueryParams::new())
            .await
    }
}
