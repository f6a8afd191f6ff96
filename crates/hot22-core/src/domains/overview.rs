// Overview store: error-log statistics, service health, and collection
// health shown on the landing page.

use hot22_api::{CollectionsReport, ErrorLogStats, HealthStatus};

use crate::query::QueryKey;
use crate::store::{FetchSlice, Reducer, RequestToken, Settled, StaleTracking};

#[derive(Debug, Clone, Default)]
pub struct OverviewState {
    pub stats: FetchSlice<Option<ErrorLogStats>>,
    pub health: FetchSlice<Option<HealthStatus>>,
    pub collections: FetchSlice<Option<CollectionsReport>>,
}

impl OverviewState {
    /// `None` until health has been fetched at least once.
    pub fn is_healthy(&self) -> Option<bool> {
        self.health.data.as_ref().map(HealthStatus::is_healthy)
    }

    pub fn is_loading(&self) -> bool {
        self.stats.loading || self.health.loading || self.collections.loading
    }
}

#[derive(Debug, Clone)]
pub enum OverviewAction {
    StatsPending(RequestToken),
    StatsSettled(RequestToken, Settled<ErrorLogStats>),
    HealthPending(RequestToken),
    HealthSettled(RequestToken, Settled<HealthStatus>),
    CollectionsPending(RequestToken),
    CollectionsSettled(RequestToken, Settled<CollectionsReport>),
}

impl Reducer for OverviewState {
    type Action = OverviewAction;

    fn reduce(&mut self, action: OverviewAction) {
        match action {
            OverviewAction::StatsPending(token) => self.stats.begin(token),
            OverviewAction::StatsSettled(token, settled) => {
                self.stats.settle(token, settled, |s| Some(s.clone()));
            }
            OverviewAction::HealthPending(token) => self.health.begin(token),
            OverviewAction::HealthSettled(token, settled) => {
                self.health.settle(token, settled, |h| Some(h.clone()));
            }
            OverviewAction::CollectionsPending(token) => self.collections.begin(token),
            OverviewAction::CollectionsSettled(token, settled) => {
                self.collections.settle(token, settled, |c| Some(c.clone()));
            }
        }
    }
}

impl StaleTracking for OverviewState {
    fn mark_stale(&mut self, keys: &[QueryKey]) -> bool {
        let flags = [
            self.stats.mark_stale_if(keys),
            self.health.mark_stale_if(keys),
            self.collections.mark_stale_if(keys),
        ];
        flags.contains(&true)
    }
}
