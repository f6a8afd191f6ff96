// Search endpoints: global search and quick lookup.

use tracing::debug;

use crate::client::{ApiClient, Endpoint};
use crate::error::Error;
use crate::models::{LookupKind, Page, SearchResult};
use crate::params::QueryParams;

impl ApiClient {
    /// `GET /api/search`
    pub async fn global_search(&self, params: &QueryParams) -> Result<Page<SearchResult>, Error> {
        debug!(q = params.get("q"), "global search");
        self.get_json(&Endpoint::new("/api/search"), params).await
    }

    /// Exact lookup of one ticket, transaction, agent or passenger.
    ///
    /// `GET /api/lookup/{type}/{value}`
    pub async fn lookup(&self, kind: LookupKind, value: &str) -> Result<serde_json::Value, Error> {
        debug!(%kind, value, "quick lookup");
        let endpoint = Endpoint::new("/api/lookup")
            .segment(kind.to_string())
            .segment(value);
        self.get_json(&endpoint, &QueryParams::new()).await
    }
}
