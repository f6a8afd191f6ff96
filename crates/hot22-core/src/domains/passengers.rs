// Passengers: resource slice keyed by `TRNN` plus per-passenger history.

use hot22_api::{HistoryRecord, Passenger};

use crate::filters::PassengerFilters;
use crate::query::QueryKey;
use crate::store::{
    FetchSlice, Keyed, Reducer, RequestToken, ResourceAction, ResourceState, Settled,
    StaleTracking,
};

impl Keyed for Passenger {
    fn key(&self) -> &str {
        &self.transaction_number
    }
}

pub type PassengerResource = ResourceState<Passenger, PassengerFilters, Passenger>;
pub type PassengerResourceAction = ResourceAction<Passenger, PassengerFilters, Passenger>;

#[derive(Debug, Clone, Default)]
pub struct PassengersState {
    pub resource: PassengerResource,
    /// History of the passenger named in `history_for`.
    pub history: FetchSlice<Vec<HistoryRecord>>,
    pub history_for: Option<String>,
}

#[derive(Debug, Clone)]
pub enum PassengersAction {
    Resource(PassengerResourceAction),
    HistoryPending(RequestToken, String),
    HistorySettled(RequestToken, Settled<Vec<HistoryRecord>>),
    ClearHistory,
}

impl From<PassengerResourceAction> for PassengersAction {
    fn from(action: PassengerResourceAction) -> Self {
        Self::Resource(action)
    }
}

impl Reducer for PassengersState {
    type Action = PassengersAction;

    fn reduce(&mut self, action: PassengersAction) {
        match action {
            PassengersAction::Resource(action) => self.resource.reduce(action),
            PassengersAction::HistoryPending(token, trnn) => {
                if self.history_for.as_deref() != Some(trnn.as_str()) {
                    self.history.data.clear();
                }
                self.history_for = Some(trnn);
                self.history.begin(token);
            }
            PassengersAction::HistorySettled(token, settled) => {
                self.history.settle(token, settled, Clone::clone);
            }
            PassengersAction::ClearHistory => {
                self.history.reset();
                self.history_for = None;
            }
        }
    }
}

impl StaleTracking for PassengersState {
    fn mark_stale(&mut self, keys: &[QueryKey]) -> bool {
        let resource = self.resource.mark_stale(keys);
        let history = self.history.mark_stale_if(keys);
        resource || history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorInfo;

    #[test]
    fn switching_passenger_drops_previous_history() {
        let mut state = PassengersState::default();
        state.history.data.push(HistoryRecord {
            record_type: Some("BKS24".into()),
            created_at: None,
            extra: serde_json::Map::new(),
        });
        state.history_for = Some("TX1".into());

        let token = RequestToken::next();
        state.reduce(PassengersAction::HistoryPending(token, "TX2".into()));
        assert!(state.history.data.is_empty());
        assert!(state.history.loading);

        state.reduce(PassengersAction::HistorySettled(token, Err(ErrorInfo::new("gone"))));
        assert!(!state.history.loading);
        assert_eq!(state.history_for.as_deref(), Some("TX2"));
    }
}
