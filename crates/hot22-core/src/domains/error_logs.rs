// ── Error-log store ──
//
// Resource slice keyed by `uploadId`, plus the aggregate slices
// (stats, dashboard, realtime snapshot), export status, and the
// real-time toggle.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use hot22_api::{ErrorLog, ErrorLogStats, RealtimeSnapshot};

use crate::error::ErrorInfo;
use crate::filters::ErrorLogFilters;
use crate::query::QueryKey;
use crate::store::{
    FetchSlice, Keyed, Reducer, RequestToken, ResourceAction, ResourceState, Settled,
    StaleTracking,
};

impl Keyed for ErrorLog {
    fn key(&self) -> &str {
        &self.upload_id
    }
}

pub type ErrorLogResource = ResourceState<ErrorLog, ErrorLogFilters, ErrorLog>;
pub type ErrorLogResourceAction = ResourceAction<ErrorLog, ErrorLogFilters, ErrorLog>;

/// Export filename: `{resource}-{recordType}-{errorType}-{isoDate}.csv`,
/// with `all` for unset parts. Path separators in the filter values
/// become `_` so the name stays inside the download directory.
pub fn export_filename(
    resource: &str,
    record_type: Option<&str>,
    error_type: Option<&str>,
    date: NaiveDate,
) -> String {
    let part = |v: Option<&str>| {
        v.map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("all")
            .replace(['/', '\\'], "_")
    };
    format!(
        "{}-{}-{}-{}.csv",
        resource,
        part(record_type),
        part(error_type),
        date.format(hot22_api::DATE_FORMAT)
    )
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportStatus {
    pub exporting: bool,
    pub last_file: Option<PathBuf>,
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealtimeSettings {
    pub enabled: bool,
    pub interval: Duration,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ErrorLogsState {
    pub resource: ErrorLogResource,
    pub stats: FetchSlice<Option<ErrorLogStats>>,
    pub dashboard: FetchSlice<Option<serde_json::Value>>,
    pub realtime: FetchSlice<Option<RealtimeSnapshot>>,
    pub export: ExportStatus,
    pub realtime_settings: RealtimeSettings,
}

impl ErrorLogsState {
    /// Filename for exporting the current filter set on `date`.
    pub fn export_filename(&self, date: NaiveDate) -> String {
        let f = &self.resource.filters;
        export_filename(
            "error-logs",
            f.record_type.as_deref(),
            f.error_type.as_deref(),
            date,
        )
    }

    pub fn has_active_filters(&self) -> bool {
        !self.resource.filters.criteria().is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum ErrorLogsAction {
    Resource(ErrorLogResourceAction),

    StatsPending(RequestToken),
    StatsSettled(RequestToken, Settled<ErrorLogStats>),
    DashboardPending(RequestToken),
    DashboardSettled(RequestToken, Settled<serde_json::Value>),
    RealtimePending(RequestToken),
    RealtimeSettled(RequestToken, Settled<RealtimeSnapshot>),

    /// Confirmed server-side delete: drop rows, clear selection.
    BulkDeleted(Vec<String>),

    ExportStarted,
    ExportFinished(Result<PathBuf, ErrorInfo>),

    SetRealtime(RealtimeSettings),
}

impl From<ErrorLogResourceAction> for ErrorLogsAction {
    fn from(action: ErrorLogResourceAction) -> Self {
        Self::Resource(action)
    }
}

impl Reducer for ErrorLogsState {
    type Action = ErrorLogsAction;

    fn reduce(&mut self, action: ErrorLogsAction) {
        match action {
            ErrorLogsAction::Resource(action) => self.resource.reduce(action),

            ErrorLogsAction::StatsPending(token) => self.stats.begin(token),
            ErrorLogsAction::StatsSettled(token, settled) => {
                self.stats.settle(token, settled, |s| Some(s.clone()));
            }
            ErrorLogsAction::DashboardPending(token) => self.dashboard.begin(token),
            ErrorLogsAction::DashboardSettled(token, settled) => {
                self.dashboard.settle(token, settled, |d| Some(d.clone()));
            }
            ErrorLogsAction::RealtimePending(token) => self.realtime.begin(token),
            ErrorLogsAction::RealtimeSettled(token, settled) => {
                self.realtime.settle(token, settled, |r| Some(r.clone()));
            }

            ErrorLogsAction::BulkDeleted(ids) => {
                self.resource.reduce(ResourceAction::RemoveItems(ids));
                self.resource.reduce(ResourceAction::ClearSelection);
            }

            ErrorLogsAction::ExportStarted => {
                self.export.exporting = true;
                self.export.error = None;
            }
            ErrorLogsAction::ExportFinished(result) => {
                self.export.exporting = false;
                match result {
                    Ok(path) => self.export.last_file = Some(path),
                    Err(error) => self.export.error = Some(error),
                }
            }

            ErrorLogsAction::SetRealtime(settings) => self.realtime_settings = settings,
        }
    }
}

impl StaleTracking for ErrorLogsState {
    fn mark_stale(&mut self, keys: &[QueryKey]) -> bool {
        let flags = [
            self.resource.mark_stale(keys),
            self.stats.mark_stale_if(keys),
            self.dashboard.mark_stale_if(keys),
            self.realtime.mark_stale_if(keys),
        ];
        flags.contains(&true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use hot22_api::{Page, Pagination};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::filters::ErrorLogFilter;
    use crate::store::Fetched;

    fn log(id: &str) -> ErrorLog {
        serde_json::from_value(serde_json::json!({ "uploadId": id })).unwrap()
    }

    fn with_rows(ids: &[&str]) -> ErrorLogsState {
        let mut state = ErrorLogsState::default();
        let token = RequestToken::next();
        state.reduce(ResourceAction::ListPending(token).into());
        state.reduce(
            ResourceAction::ListSettled(
                token,
                Ok(Fetched {
                    value: Arc::new(Page {
                        data: ids.iter().map(|id| log(id)).collect(),
                        pagination: Pagination::default(),
                    }),
                    key: QueryKey::new("errorLogs.list", "[]"),
                }),
            )
            .into(),
        );
        state
    }

    #[test]
    fn export_filename_substitutes_all() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            export_filename("error-logs", Some("BKS24"), None, date),
            "error-logs-BKS24-all-2024-03-07.csv"
        );
        assert_eq!(
            export_filename("error-logs", Some(" "), Some("FORMAT"), date),
            "error-logs-all-FORMAT-2024-03-07.csv"
        );
    }

    #[test]
    fn export_filename_flattens_path_separators() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            export_filename("error-logs", Some("BKS/24"), Some(r"..\x"), date),
            "error-logs-BKS_24-.._x-2024-03-07.csv"
        );
    }

    #[test]
    fn bulk_deleted_removes_rows_and_hides_panel() {
        let mut state = with_rows(&["id1", "id2", "id3"]);
        state.reduce(ResourceAction::Toggle("id1".into()).into());
        state.reduce(ResourceAction::Toggle("id2".into()).into());
        assert!(state.resource.view.show_bulk_actions);

        state.reduce(ErrorLogsAction::BulkDeleted(vec!["id1".into(), "id2".into()]));

        let remaining: Vec<&str> = state.resource.list.data.iter().map(|l| l.upload_id.as_str()).collect();
        assert_eq!(remaining, vec!["id3"]);
        assert!(state.resource.selection.is_empty());
        assert!(!state.resource.view.show_bulk_actions);
    }

    #[test]
    fn export_status_tracks_outcome() {
        let mut state = ErrorLogsState::default();
        state.reduce(ErrorLogsAction::ExportStarted);
        assert!(state.export.exporting);
        state.reduce(ErrorLogsAction::ExportFinished(Err(ErrorInfo::new("HTTP 500"))));
        assert!(!state.export.exporting);
        assert!(state.export.error.is_some());
    }

    #[test]
    fn active_filters_ignore_paging() {
        let mut state = ErrorLogsState::default();
        state.reduce(ResourceAction::SetPage(3).into());
        assert!(!state.has_active_filters());
        state.reduce(ResourceAction::SetFilter(ErrorLogFilter::HasErrors(Some(true))).into());
        assert!(state.has_active_filters());
    }
}
