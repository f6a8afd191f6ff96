// ── Generic resource slice ──
//
// List + detail + filters + selection + view state for one paginated
// resource. Offices, passengers, and error logs are instances of this,
// differing only in entity, filter, and detail types.

use hot22_api::{Page, Pagination};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::{FetchSlice, Reducer, RequestToken, Selection, Settled, StaleTracking};
use crate::filters::Filters;
use crate::query::QueryKey;

/// An entity with a stable primary key.
pub trait Keyed {
    fn key(&self) -> &str;
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ViewMode {
    #[default]
    Table,
    #[strum(serialize = "cards", serialize = "grid")]
    Cards,
}

/// Transient view state shared by every resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub view_mode: ViewMode,
    pub active_tab: usize,
    pub show_filters: bool,
    /// Mirrors "selection is non-empty".
    pub show_bulk_actions: bool,
}

#[derive(Debug, Clone)]
pub struct ResourceState<R, F, D> {
    pub list: FetchSlice<Vec<R>>,
    pub pagination: Pagination,
    pub detail: FetchSlice<Option<D>>,
    pub filters: F,
    pub selection: Selection,
    pub view: ViewState,
}

impl<R, F: Default, D> Default for ResourceState<R, F, D> {
    fn default() -> Self {
        Self {
            list: FetchSlice::default(),
            pagination: Pagination::default(),
            detail: FetchSlice::default(),
            filters: F::default(),
            selection: Selection::default(),
            view: ViewState::default(),
        }
    }
}

impl<R: Keyed, F, D> ResourceState<R, F, D> {
    /// Loaded rows that are currently selected.
    pub fn selected(&self) -> impl Iterator<Item = &R> {
        self.list
            .data
            .iter()
            .filter(|r| self.selection.contains(r.key()))
    }

    pub fn find(&self, key: &str) -> Option<&R> {
        self.list.data.iter().find(|r| r.key() == key)
    }

    fn sync_bulk_actions(&mut self) {
        self.view.show_bulk_actions = !self.selection.is_empty();
    }
}

impl<R, F, D> StaleTracking for ResourceState<R, F, D> {
    fn mark_stale(&mut self, keys: &[QueryKey]) -> bool {
        let list = self.list.mark_stale_if(keys);
        let detail = self.detail.mark_stale_if(keys);
        list || detail
    }
}

/// Every state change a resource slice accepts.
#[derive(Debug, Clone)]
pub enum ResourceAction<R, F: Filters, D> {
    // ── Lifecycle ────────────────────────────────────────────────────
    ListPending(RequestToken),
    ListSettled(RequestToken, Settled<Page<R>>),
    DetailPending(RequestToken),
    DetailSettled(RequestToken, Settled<D>),

    // ── Filters and paging ───────────────────────────────────────────
    /// Any filter other than page/limit; resets `page` to 1.
    SetFilter(F::Change),
    SetPage(u32),
    SetLimit(u32),
    ResetFilters,

    // ── Selection ────────────────────────────────────────────────────
    Toggle(String),
    /// Select every row of the loaded page.
    SelectAll,
    ClearSelection,

    // ── View ─────────────────────────────────────────────────────────
    SetViewMode(ViewMode),
    SetActiveTab(usize),
    ToggleFilters,

    // ── Data ─────────────────────────────────────────────────────────
    /// Drop rows after a confirmed server-side delete.
    RemoveItems(Vec<String>),
    ClearList,
    ClearDetail,
}

impl<R, F, D> Reducer for ResourceState<R, F, D>
where
    R: Keyed + Clone,
    F: Filters,
    D: Clone,
{
    type Action = ResourceAction<R, F, D>;

    fn reduce(&mut self, action: Self::Action) {
        match action {
            ResourceAction::ListPending(token) => self.list.begin(token),
            ResourceAction::ListSettled(token, settled) => {
                let mut pagination = None;
                let applied = self.list.settle(token, settled, |page: &Page<R>| {
                    pagination = Some(page.pagination.clone());
                    page.data.clone()
                });
                if let (true, Some(p)) = (applied, pagination) {
                    self.pagination = p;
                }
            }
            ResourceAction::DetailPending(token) => self.detail.begin(token),
            ResourceAction::DetailSettled(token, settled) => {
                self.detail.settle(token, settled, |d: &D| Some(d.clone()));
            }

            ResourceAction::SetFilter(change) => {
                self.filters.apply(change);
                self.filters.set_page(1);
            }
            ResourceAction::SetPage(page) => self.filters.set_page(page.max(1)),
            ResourceAction::SetLimit(limit) => self.filters.set_limit(limit.max(1)),
            ResourceAction::ResetFilters => {
                let limit = self.filters.limit();
                self.filters = F::default();
                self.filters.set_limit(limit);
            }

            ResourceAction::Toggle(id) => {
                self.selection.toggle(&id);
                self.sync_bulk_actions();
            }
            ResourceAction::SelectAll => {
                let ids: Vec<String> = self.list.data.iter().map(|r| r.key().to_owned()).collect();
                self.selection.select_all(ids);
                self.sync_bulk_actions();
            }
            ResourceAction::ClearSelection => {
                self.selection.clear();
                self.sync_bulk_actions();
            }

            ResourceAction::SetViewMode(mode) => self.view.view_mode = mode,
            ResourceAction::SetActiveTab(tab) => self.view.active_tab = tab,
            ResourceAction::ToggleFilters => self.view.show_filters = !self.view.show_filters,

            ResourceAction::RemoveItems(ids) => {
                self.list.data.retain(|r| !ids.iter().any(|id| id == r.key()));
                for id in &ids {
                    self.selection.remove(id);
                }
                self.sync_bulk_actions();
            }
            ResourceAction::ClearList => {
                self.list.reset();
                self.pagination = Pagination::default();
                self.selection.clear();
                self.sync_bulk_actions();
            }
            ResourceAction::ClearDetail => self.detail.reset(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::filters::{ErrorLogFilter, ErrorLogFilters};
    use crate::store::Fetched;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(&'static str);

    impl Keyed for Row {
        fn key(&self) -> &str {
            self.0
        }
    }

    type State = ResourceState<Row, ErrorLogFilters, Row>;
    type Action = ResourceAction<Row, ErrorLogFilters, Row>;

    fn loaded(rows: &[&'static str]) -> State {
        let mut state = State::default();
        let token = RequestToken::next();
        state.reduce(Action::ListPending(token));
        state.reduce(Action::ListSettled(
            token,
            Ok(Fetched {
                value: Arc::new(Page {
                    data: rows.iter().copied().map(Row).collect(),
                    pagination: Pagination {
                        current_page: 1,
                        total_pages: 1,
                        total_records: u64::try_from(rows.len()).unwrap(),
                        ..Pagination::default()
                    },
                }),
                key: QueryKey::new("rows", "{}"),
            }),
        ));
        state
    }

    #[test]
    fn filter_change_resets_page() {
        let mut state = State::default();
        state.reduce(Action::SetPage(4));
        state.reduce(Action::SetFilter(ErrorLogFilter::RecordType(Some("BKS24".into()))));
        assert_eq!(state.filters.page, 1);
        assert_eq!(state.filters.record_type.as_deref(), Some("BKS24"));
    }

    #[test]
    fn page_and_limit_keep_other_filters() {
        let mut state = State::default();
        state.reduce(Action::SetFilter(ErrorLogFilter::Status(Some("failed".into()))));
        state.reduce(Action::SetPage(3));
        state.reduce(Action::SetLimit(25));
        assert_eq!(state.filters.page, 3);
        assert_eq!(state.filters.limit, 25);
        assert_eq!(state.filters.status.as_deref(), Some("failed"));
    }

    #[test]
    fn reset_filters_keeps_page_size() {
        let mut state = State::default();
        state.reduce(Action::SetLimit(100));
        state.reduce(Action::SetFilter(ErrorLogFilter::HasErrors(Some(true))));
        state.reduce(Action::ResetFilters);
        assert_eq!(state.filters.limit, 100);
        assert_eq!(state.filters.has_errors, None);
    }

    #[test]
    fn select_all_covers_loaded_page_only() {
        let mut state = loaded(&["a", "b", "c"]);
        state.reduce(Action::SelectAll);
        assert_eq!(state.selection.len(), 3);
        assert!(state.view.show_bulk_actions);
        assert_eq!(state.selected().count(), 3);
    }

    #[test]
    fn bulk_panel_follows_selection() {
        let mut state = loaded(&["a", "b"]);
        state.reduce(Action::Toggle("a".into()));
        assert!(state.view.show_bulk_actions);
        state.reduce(Action::Toggle("a".into()));
        assert!(!state.view.show_bulk_actions);
    }

    #[test]
    fn remove_items_updates_list_and_selection() {
        let mut state = loaded(&["id1", "id2", "id3"]);
        state.reduce(Action::Toggle("id1".into()));
        state.reduce(Action::Toggle("id2".into()));

        state.reduce(Action::RemoveItems(vec!["id1".into(), "id2".into()]));

        assert_eq!(state.list.data, vec![Row("id3")]);
        assert!(state.selection.is_empty());
        assert!(!state.view.show_bulk_actions);
    }

    #[test]
    fn settle_replaces_pagination() {
        let state = loaded(&["a"]);
        assert_eq!(state.pagination.total_records, 1);
        assert_eq!(state.pagination.current_page, 1);
        assert!(!state.list.loading);
    }
}
