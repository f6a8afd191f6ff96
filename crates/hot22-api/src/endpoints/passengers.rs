// Passenger endpoints
//
// Passengers are keyed by transaction number (`TRNN`).

use tracing::debug;

use crate::client::{ApiClient, Endpoint};
use crate::error::Error;
use crate::models::{HistoryRecord, Page, Passenger};
use crate::params::QueryParams;

impl ApiClient {
    /// List passenger transactions.
    ///
    /// `GET /api/passengers`
    pub async fn list_passengers(&self, params: &QueryParams) -> Result<Page<Passenger>, Error> {
        debug!(params = params.len(), "listing passengers");
        self.get_json(&Endpoint::new("/api/passengers"), params).await
    }

    /// `GET /api/passengers/{transactionNumber}`
    pub async fn get_passenger(&self, transaction_number: &str) -> Result<Passenger, Error> {
        let endpoint = Endpoint::new("/api/passengers").segment(transaction_number);
        self.get_json(&endpoint, &QueryParams::new()).await
    }

    /// Transaction history for one passenger record.
    ///
    /// `GET /api/passengers/{transactionNumber}/history`
    pub async fn passenger_history(
        &self,
        transaction_number: &str,
    ) -> Result<Vec<HistoryRecord>, Error> {
        let endpoint = Endpoint::new("/api/passengers")
            .segment(transaction_number)
            .segment("history");
        self.get_json(&endpoint, &QueryParams::new()).await
    }
}
