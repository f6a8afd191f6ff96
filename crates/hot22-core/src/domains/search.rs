// ── Search store ──
//
// Global search (paginated results) and quick lookup (single hit), each
// with its own bounded history.

use hot22_api::{LookupKind, Page, Pagination, SearchResult};

use crate::query::QueryKey;
use crate::store::{
    BoundedHistory, FetchSlice, Reducer, RequestToken, SearchHistoryEntry, Settled, StaleTracking,
};

pub const DEFAULT_SEARCH_HISTORY: usize = 10;
pub const DEFAULT_LOOKUP_HISTORY: usize = 20;

/// Kind recorded in history for an untyped global search.
pub const ANY_KIND: &str = "all";

#[derive(Debug, Clone)]
pub struct SearchState {
    pub query: String,
    pub kind: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub results: FetchSlice<Vec<SearchResult>>,
    pub pagination: Pagination,
    pub lookup: FetchSlice<Option<serde_json::Value>>,
    pub lookup_target: Option<(LookupKind, String)>,
    pub history: BoundedHistory<SearchHistoryEntry>,
    pub lookup_history: BoundedHistory<SearchHistoryEntry>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            kind: None,
            page: 1,
            limit: crate::filters::DEFAULT_PAGE_SIZE,
            results: FetchSlice::default(),
            pagination: Pagination::default(),
            lookup: FetchSlice::default(),
            lookup_target: None,
            history: BoundedHistory::new(DEFAULT_SEARCH_HISTORY),
            lookup_history: BoundedHistory::new(DEFAULT_LOOKUP_HISTORY),
        }
    }
}

impl SearchState {
    pub fn params(&self) -> hot22_api::QueryParams {
        hot22_api::QueryParams::new()
            .text("q", Some(&self.query))
            .text("type", self.kind.as_deref())
            .value("page", Some(self.page))
            .value("limit", Some(self.limit))
    }
}

#[derive(Debug, Clone)]
pub enum SearchAction {
    /// New query text; resets the page.
    SetQuery(String),
    SetKind(Option<String>),
    SetPage(u32),
    SetLimit(u32),
    SearchPending(RequestToken),
    SearchSettled(RequestToken, Settled<Page<SearchResult>>),
    LookupPending(RequestToken, LookupKind, String),
    LookupSettled(RequestToken, Settled<serde_json::Value>),
    ClearResults,
    ClearHistory,
    ClearLookupHistory,
    SetHistoryLimits { search: usize, lookup: usize },
    RestoreHistory {
        search: Vec<SearchHistoryEntry>,
        lookup: Vec<SearchHistoryEntry>,
    },
}

impl Reducer for SearchState {
    type Action = SearchAction;

    fn reduce(&mut self, action: SearchAction) {
        match action {
            SearchAction::SetQuery(query) => {
                self.query = query.trim().to_owned();
                self.page = 1;
            }
            SearchAction::SetKind(kind) => {
                self.kind = crate::filters::normalize(kind);
                self.page = 1;
            }
            SearchAction::SetPage(page) => self.page = page.max(1),
            SearchAction::SetLimit(limit) => self.limit = limit.max(1),
            SearchAction::SearchPending(token) => {
                if !self.query.is_empty() {
                    let kind = self.kind.clone().unwrap_or_else(|| ANY_KIND.to_owned());
                    self.history
                        .push(SearchHistoryEntry::new(self.query.clone(), kind));
                }
                self.results.begin(token);
            }
            SearchAction::SearchSettled(token, settled) => {
                let mut pagination = None;
                let applied = self.results.settle(token, settled, |page: &Page<SearchResult>| {
                    pagination = Some(page.pagination.clone());
                    page.data.clone()
                });
                if let (true, Some(p)) = (applied, pagination) {
                    self.pagination = p;
                }
            }
            SearchAction::LookupPending(token, kind, value) => {
                self.lookup_history
                    .push(SearchHistoryEntry::new(value.clone(), kind.to_string()));
                self.lookup_target = Some((kind, value));
                self.lookup.begin(token);
            }
            SearchAction::LookupSettled(token, settled) => {
                self.lookup.settle(token, settled, |v| Some(v.clone()));
            }
            SearchAction::ClearResults => {
                self.results.reset();
                self.pagination = Pagination::default();
                self.lookup.reset();
                self.lookup_target = None;
            }
            SearchAction::ClearHistory => self.history.clear(),
            SearchAction::ClearLookupHistory => self.lookup_history.clear(),
            SearchAction::SetHistoryLimits { search, lookup } => {
                self.history.set_capacity(search);
                self.lookup_history.set_capacity(lookup);
            }
            SearchAction::RestoreHistory { search, lookup } => {
                self.history.restore(search);
                self.lookup_history.restore(lookup);
            }
        }
    }
}

impl StaleTracking for SearchState {
    fn mark_stale(&mut self, keys: &[QueryKey]) -> bool {
        let results = self.results.mark_stale_if(keys);
        let lookup = self.lookup.mark_stale_if(keys);
        results || lookup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn searching_records_history_newest_first() {
        let mut state = SearchState::default();
        for q in ["madrid", "lisboa", "madrid"] {
            state.reduce(SearchAction::SetQuery(q.into()));
            state.reduce(SearchAction::SearchPending(RequestToken::next()));
        }
        let values: Vec<&str> = state.history.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["madrid", "lisboa"]);
        assert_eq!(state.history.newest().map(|e| e.kind.as_str()), Some(ANY_KIND));
    }

    #[test]
    fn blank_query_is_not_recorded() {
        let mut state = SearchState::default();
        state.reduce(SearchAction::SetQuery("   ".into()));
        state.reduce(SearchAction::SearchPending(RequestToken::next()));
        assert!(state.history.is_empty());
        assert!(state.params().get("q").is_none());
    }

    #[test]
    fn lookup_history_is_capped_separately() {
        let mut state = SearchState::default();
        state.reduce(SearchAction::SetHistoryLimits { search: 10, lookup: 2 });
        for v in ["a", "b", "c"] {
            state.reduce(SearchAction::LookupPending(
                RequestToken::next(),
                LookupKind::Ticket,
                v.into(),
            ));
        }
        assert_eq!(state.lookup_history.len(), 2);
        assert!(state.history.is_empty());
    }

    #[test]
    fn new_query_resets_page() {
        let mut state = SearchState::default();
        state.reduce(SearchAction::SetPage(5));
        state.reduce(SearchAction::SetQuery("1234567".into()));
        assert_eq!(state.page, 1);
    }
}
