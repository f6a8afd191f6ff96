// Office endpoints
//
// Offices are keyed by their IATA agent code (`AGTN`).

use tracing::debug;

use crate::client::{ApiClient, Endpoint};
use crate::error::Error;
use crate::models::{Office, Page};
use crate::params::QueryParams;

impl ApiClient {
    /// List offices.
    ///
    /// `GET /api/offices`
    pub async fn list_offices(&self, params: &QueryParams) -> Result<Page<Office>, Error> {
        debug!(params = params.len(), "listing offices");
        self.get_json(&Endpoint::new("/api/offices"), params).await
    }

    /// `GET /api/offices/{agentCode}`
    pub async fn get_office(&self, agent_code: &str) -> Result<Office, Error> {
        let endpoint = Endpoint::new("/api/offices").segment(agent_code);
        self.get_json(&endpoint, &QueryParams::new()).await
    }
}
