// Analytics endpoints
//
// One path per report family. Report payloads vary by family and are
// kept as raw JSON for the caller to render.

use tracing::debug;

use crate::client::{ApiClient, Endpoint};
use crate::error::Error;
use crate::models::AnalyticsReport;
use crate::params::QueryParams;

impl ApiClient {
    /// `GET /api/analytics/{revenue|commission|performance|travel-patterns}`
    pub async fn analytics_report(
        &self,
        report: AnalyticsReport,
        params: &QueryParams,
    ) -> Result<serde_json::Value, Error> {
        debug!(%report, "fetching analytics report");
        let endpoint = Endpoint::new("/api/analytics").segment(report.to_string());
        self.get_json(&endpoint, params).await
    }
}
