// ── Dashboard facade ──
//
// Owns the query cache and every feature store. Each coordinator reads
// the current criteria from its store, dispatches `pending`, fetches
// through the cache, and dispatches the settle. Mutations additionally
// mark every slice loaded from an invalidated key as stale.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use hot22_api::{
    AnalyticsReport, ApiClient, BulkOperation, ErrorLog, ErrorLogStats, FileStats, HistoryRecord,
    LookupKind, Office, OperationResult, Page, Passenger, QueryParams, RealtimeSnapshot,
    SearchResult, UploadResult,
};
use strum::IntoEnumIterator;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::domains::analytics::{AnalyticsAction, AnalyticsState};
use crate::domains::error_logs::{ErrorLogsAction, ErrorLogsState, RealtimeSettings};
use crate::domains::files::{FilesAction, FilesState};
use crate::domains::offices::OfficesState;
use crate::domains::overview::{OverviewAction, OverviewState};
use crate::domains::passengers::{PassengersAction, PassengersState};
use crate::domains::search::{SearchAction, SearchState};
use crate::domains::ui::{NotificationLevel, UiAction, UiState};
use crate::error::{CoreError, ErrorInfo};
use crate::filters::Filters;
use crate::query::endpoints::{
    self, BulkArgs, BulkErrorLogs, CleanupErrorLogs, DeleteAllRecords, UploadArgs, UploadHot22,
};
use crate::query::{QueryCache, QueryEndpoint, QueryKey, Subscription};
use crate::realtime::{MIN_INTERVAL, RealtimeMonitor};
use crate::store::{
    Fetched, Reducer, RequestToken, ResourceAction, SearchHistoryEntry, Settled, Store,
};

/// Handle to one dashboard session.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Dropping the last clone
/// stops every poll loop and the real-time monitor.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    cache: QueryCache,
    offices: Store<OfficesState>,
    passengers: Store<PassengersState>,
    error_logs: Store<ErrorLogsState>,
    analytics: Store<AnalyticsState>,
    search: Store<SearchState>,
    files: Store<FilesState>,
    overview: Store<OverviewState>,
    ui: Store<UiState>,
    monitor: Mutex<Option<RealtimeMonitor>>,
    cancel: CancellationToken,
}

impl Drop for DashboardInner {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.cache.shutdown();
    }
}

impl Dashboard {
    /// Build the HTTP client and empty stores. Performs no I/O.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.base_url.clone(), &config.transport())?;
        Ok(Self::with_api(config, api))
    }

    /// Use an existing client (custom headers, shared connection pool).
    pub fn with_api(config: DashboardConfig, api: ApiClient) -> Self {
        let cache = QueryCache::new(api, config.cache_keep_unused);
        let mut offices = OfficesState::default();
        offices.reduce(ResourceAction::SetLimit(config.page_size));
        let mut passengers = PassengersState::default();
        passengers.reduce(PassengersAction::Resource(ResourceAction::SetLimit(config.page_size)));
        let mut error_logs = ErrorLogsState::default();
        error_logs.reduce(ErrorLogsAction::Resource(ResourceAction::SetLimit(config.page_size)));
        error_logs.reduce(ErrorLogsAction::SetRealtime(RealtimeSettings {
            enabled: false,
            interval: config.realtime_interval,
        }));
        let mut search = SearchState::default();
        search.reduce(SearchAction::SetLimit(config.page_size));
        search.reduce(SearchAction::SetHistoryLimits {
            search: config.search_history_limit,
            lookup: config.lookup_history_limit,
        });

        info!(base_url = %config.base_url, "dashboard ready");
        Self {
            inner: Arc::new(DashboardInner {
                config,
                cache,
                offices: Store::new(offices),
                passengers: Store::new(passengers),
                error_logs: Store::new(error_logs),
                analytics: Store::default(),
                search: Store::new(search),
                files: Store::default(),
                overview: Store::default(),
                ui: Store::default(),
                monitor: Mutex::new(None),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    pub fn api(&self) -> &ApiClient {
        self.inner.cache.api()
    }

    // ── Stores ───────────────────────────────────────────────────────

    pub fn offices(&self) -> &Store<OfficesState> {
        &self.inner.offices
    }

    pub fn passengers(&self) -> &Store<PassengersState> {
        &self.inner.passengers
    }

    pub fn error_logs(&self) -> &Store<ErrorLogsState> {
        &self.inner.error_logs
    }

    pub fn analytics(&self) -> &Store<AnalyticsState> {
        &self.inner.analytics
    }

    pub fn search(&self) -> &Store<SearchState> {
        &self.inner.search
    }

    pub fn files(&self) -> &Store<FilesState> {
        &self.inner.files
    }

    pub fn overview(&self) -> &Store<OverviewState> {
        &self.inner.overview
    }

    pub fn ui(&self) -> &Store<UiState> {
        &self.inner.ui
    }

    // ── Offices ──────────────────────────────────────────────────────

    /// `GET /api/offices` with the store's current filters.
    pub async fn load_offices(&self) -> Result<Arc<Page<Office>>, CoreError> {
        let params = self.offices().read(|s| s.filters.to_params());
        coordinate::<endpoints::OfficeList, _>(
            self.cache(),
            self.offices(),
            params,
            ResourceAction::ListPending,
            ResourceAction::ListSettled,
        )
        .await
    }

    pub async fn load_office(&self, agent_code: &str) -> Result<Arc<Office>, CoreError> {
        coordinate::<endpoints::OfficeDetail, _>(
            self.cache(),
            self.offices(),
            agent_code.trim().to_owned(),
            ResourceAction::DetailPending,
            ResourceAction::DetailSettled,
        )
        .await
    }

    // ── Passengers ───────────────────────────────────────────────────

    pub async fn load_passengers(&self) -> Result<Arc<Page<Passenger>>, CoreError> {
        let params = self.passengers().read(|s| s.resource.filters.to_params());
        coordinate::<endpoints::PassengerList, _>(
            self.cache(),
            self.passengers(),
            params,
            |t| PassengersAction::Resource(ResourceAction::ListPending(t)),
            |t, s| PassengersAction::Resource(ResourceAction::ListSettled(t, s)),
        )
        .await
    }

    pub async fn load_passenger(&self, trnn: &str) -> Result<Arc<Passenger>, CoreError> {
        coordinate::<endpoints::PassengerDetail, _>(
            self.cache(),
            self.passengers(),
            trnn.trim().to_owned(),
            |t| PassengersAction::Resource(ResourceAction::DetailPending(t)),
            |t, s| PassengersAction::Resource(ResourceAction::DetailSettled(t, s)),
        )
        .await
    }

    pub async fn load_passenger_history(
        &self,
        trnn: &str,
    ) -> Result<Arc<Vec<HistoryRecord>>, CoreError> {
        let trnn = trnn.trim().to_owned();
        let owner = trnn.clone();
        coordinate::<endpoints::PassengerHistory, _>(
            self.cache(),
            self.passengers(),
            trnn,
            move |t| PassengersAction::HistoryPending(t, owner),
            PassengersAction::HistorySettled,
        )
        .await
    }

    // ── Error logs ───────────────────────────────────────────────────

    /// List error logs. A search term routes to `/api/error-logs/search`.
    pub async fn load_error_logs(&self) -> Result<Arc<Page<ErrorLog>>, CoreError> {
        let (params, searching) = self.error_logs().read(|s| {
            let f = &s.resource.filters;
            (f.to_params(), f.search.is_some())
        });
        let pending = |t| ErrorLogsAction::Resource(ResourceAction::ListPending(t));
        let settled = |t, s| ErrorLogsAction::Resource(ResourceAction::ListSettled(t, s));
        if searching {
            coordinate::<endpoints::ErrorLogSearch, _>(
                self.cache(),
                self.error_logs(),
                params,
                pending,
                settled,
            )
            .await
        } else {
            coordinate::<endpoints::ErrorLogList, _>(
                self.cache(),
                self.error_logs(),
                params,
                pending,
                settled,
            )
            .await
        }
    }

    pub async fn load_error_logs_by_type(
        &self,
        error_type: &str,
    ) -> Result<Arc<Page<ErrorLog>>, CoreError> {
        let params = self.error_logs().read(|s| s.resource.filters.to_params());
        coordinate::<endpoints::ErrorLogsByType, _>(
            self.cache(),
            self.error_logs(),
            (error_type.trim().to_owned(), params),
            |t| ErrorLogsAction::Resource(ResourceAction::ListPending(t)),
            |t, s| ErrorLogsAction::Resource(ResourceAction::ListSettled(t, s)),
        )
        .await
    }

    pub async fn load_error_log(&self, upload_id: &str) -> Result<Arc<ErrorLog>, CoreError> {
        coordinate::<endpoints::ErrorLogDetail, _>(
            self.cache(),
            self.error_logs(),
            upload_id.trim().to_owned(),
            |t| ErrorLogsAction::Resource(ResourceAction::DetailPending(t)),
            |t, s| ErrorLogsAction::Resource(ResourceAction::DetailSettled(t, s)),
        )
        .await
    }

    /// Statistics for the current error-log criteria.
    pub async fn load_error_log_stats(&self) -> Result<Arc<ErrorLogStats>, CoreError> {
        let params = self.error_logs().read(|s| s.resource.filters.criteria());
        coordinate::<endpoints::ErrorLogStatsSummary, _>(
            self.cache(),
            self.error_logs(),
            params,
            ErrorLogsAction::StatsPending,
            ErrorLogsAction::StatsSettled,
        )
        .await
    }

    pub async fn load_error_log_dashboard(&self) -> Result<Arc<serde_json::Value>, CoreError> {
        coordinate::<endpoints::ErrorLogDashboard, _>(
            self.cache(),
            self.error_logs(),
            (),
            ErrorLogsAction::DashboardPending,
            ErrorLogsAction::DashboardSettled,
        )
        .await
    }

    /// Live snapshot. Always hits the network.
    pub async fn load_realtime(&self) -> Result<Arc<RealtimeSnapshot>, CoreError> {
        coordinate_fresh::<endpoints::ErrorLogRealtime, _>(
            self.cache(),
            self.error_logs(),
            (),
            ErrorLogsAction::RealtimePending,
            ErrorLogsAction::RealtimeSettled,
        )
        .await
    }

    /// Delete the given logs. On success the rows leave the loaded page
    /// and the selection is cleared; on failure nothing changes except
    /// an error notification.
    pub async fn bulk_delete_error_logs(
        &self,
        upload_ids: Vec<String>,
    ) -> Result<OperationResult, CoreError> {
        if upload_ids.is_empty() {
            return Err(CoreError::Validation {
                message: "no error logs selected".into(),
            });
        }
        let args = BulkArgs {
            upload_ids: upload_ids.clone(),
            operation: BulkOperation::Delete,
        };
        match self.cache().mutate::<BulkErrorLogs>(args).await {
            Ok(outcome) => {
                let count = upload_ids.len();
                self.error_logs().dispatch(ErrorLogsAction::BulkDeleted(upload_ids));
                self.notify(NotificationLevel::Success, format!("Deleted {count} error log(s)"));
                self.mark_stale(&outcome.invalidated);
                Ok(outcome.output)
            }
            Err(err) => {
                self.notify_failure("Bulk delete failed", &err);
                Err(err)
            }
        }
    }

    /// [`bulk_delete_error_logs`](Self::bulk_delete_error_logs) over the
    /// current selection.
    pub async fn bulk_delete_selected(&self) -> Result<OperationResult, CoreError> {
        let ids = self.error_logs().read(|s| s.resource.selection.ids());
        self.bulk_delete_error_logs(ids).await
    }

    /// Server-side bulk export of the given logs. Invalidates nothing.
    pub async fn bulk_export_error_logs(
        &self,
        upload_ids: Vec<String>,
    ) -> Result<OperationResult, CoreError> {
        let args = BulkArgs {
            upload_ids,
            operation: BulkOperation::Export,
        };
        let outcome = self.cache().mutate::<BulkErrorLogs>(args).await.inspect_err(|err| {
            self.notify_failure("Bulk export failed", err);
        })?;
        Ok(outcome.output)
    }

    /// Delete logs older than `days_old` (server default when `None`).
    pub async fn cleanup_error_logs(
        &self,
        days_old: Option<u32>,
    ) -> Result<OperationResult, CoreError> {
        match self.cache().mutate::<CleanupErrorLogs>(days_old).await {
            Ok(outcome) => {
                let message = match outcome.output.affected {
                    Some(n) => format!("Cleaned up {n} error log(s)"),
                    None => "Cleanup finished".to_owned(),
                };
                self.notify(NotificationLevel::Success, message);
                self.mark_stale(&outcome.invalidated);
                Ok(outcome.output)
            }
            Err(err) => {
                self.notify_failure("Cleanup failed", &err);
                Err(err)
            }
        }
    }

    /// Download the CSV export for the current criteria into `dest_dir`
    /// (the configured download directory when `None`).
    pub async fn export_error_logs(&self, dest_dir: Option<&Path>) -> Result<PathBuf, CoreError> {
        let (params, filename) = self.error_logs().read(|s| {
            (
                s.resource.filters.criteria(),
                s.export_filename(Utc::now().date_naive()),
            )
        });
        let dir = dest_dir.unwrap_or(self.inner.config.download_dir.as_path());

        self.error_logs().dispatch(ErrorLogsAction::ExportStarted);
        let result = self
            .api()
            .export_error_logs(&params, dir, &filename)
            .await
            .map_err(CoreError::from);
        match &result {
            Ok(path) => {
                self.error_logs()
                    .dispatch(ErrorLogsAction::ExportFinished(Ok(path.clone())));
                self.notify(NotificationLevel::Success, format!("Exported {filename}"));
            }
            Err(err) => {
                self.error_logs()
                    .dispatch(ErrorLogsAction::ExportFinished(Err(ErrorInfo::from(err))));
                self.notify_failure("Export failed", err);
            }
        }
        result
    }

    // ── Real-time mode ───────────────────────────────────────────────

    /// Toggle real-time mode. Enabling starts (or restarts) the monitor
    /// that reloads the live snapshot and statistics every `interval`;
    /// disabling stops it.
    pub async fn set_realtime(&self, enabled: bool, interval: Option<Duration>) {
        let interval = interval
            .unwrap_or(self.inner.config.realtime_interval)
            .max(MIN_INTERVAL);
        self.error_logs()
            .dispatch(ErrorLogsAction::SetRealtime(RealtimeSettings { enabled, interval }));

        let mut slot = self.inner.monitor.lock().await;
        if let Some(previous) = slot.take() {
            previous.stop();
        }
        if !enabled {
            info!("real-time monitoring off");
            return;
        }

        info!(?interval, "real-time monitoring on");
        let weak: Weak<DashboardInner> = Arc::downgrade(&self.inner);
        *slot = Some(RealtimeMonitor::start(interval, &self.inner.cancel, move || {
            let weak = weak.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let dashboard = Dashboard { inner };
                let (realtime, stats) =
                    tokio::join!(dashboard.load_realtime(), dashboard.refresh_error_log_stats());
                if let Err(e) = realtime.and(stats.map(|_| ())) {
                    debug!(error = %e, "real-time refresh failed");
                }
            }
        }));
    }

    pub async fn realtime_running(&self) -> bool {
        self.inner
            .monitor
            .lock()
            .await
            .as_ref()
            .is_some_and(RealtimeMonitor::is_running)
    }

    async fn refresh_error_log_stats(&self) -> Result<Arc<ErrorLogStats>, CoreError> {
        let params = self.error_logs().read(|s| s.resource.filters.criteria());
        coordinate_fresh::<endpoints::ErrorLogStatsSummary, _>(
            self.cache(),
            self.error_logs(),
            params,
            ErrorLogsAction::StatsPending,
            ErrorLogsAction::StatsSettled,
        )
        .await
    }

    // ── Analytics ────────────────────────────────────────────────────

    pub async fn load_analytics(
        &self,
        report: AnalyticsReport,
    ) -> Result<Arc<serde_json::Value>, CoreError> {
        let params = self.analytics().read(|s| s.filters.to_params());
        coordinate::<endpoints::Analytics, _>(
            self.cache(),
            self.analytics(),
            (report, params),
            move |t| AnalyticsAction::ReportPending(report, t),
            move |t, s| AnalyticsAction::ReportSettled(report, t, s),
        )
        .await
    }

    /// Load every report family concurrently. Returns the first failure
    /// after all of them have settled.
    pub async fn load_all_analytics(&self) -> Result<(), CoreError> {
        let results =
            futures_util::future::join_all(AnalyticsReport::iter().map(|r| self.load_analytics(r)))
                .await;
        first_error(results)
    }

    // ── Search ───────────────────────────────────────────────────────

    /// Run a global search for `query`, recording it in the history.
    pub async fn global_search(
        &self,
        query: &str,
        kind: Option<String>,
    ) -> Result<Arc<Page<SearchResult>>, CoreError> {
        self.search().dispatch(SearchAction::SetQuery(query.to_owned()));
        self.search().dispatch(SearchAction::SetKind(kind));
        self.run_search().await
    }

    /// Re-run the current search on another page.
    pub async fn search_page(&self, page: u32) -> Result<Arc<Page<SearchResult>>, CoreError> {
        self.search().dispatch(SearchAction::SetPage(page));
        self.run_search().await
    }

    async fn run_search(&self) -> Result<Arc<Page<SearchResult>>, CoreError> {
        let (params, empty) = self.search().read(|s| (s.params(), s.query.is_empty()));
        if empty {
            return Err(CoreError::Validation {
                message: "search query is empty".into(),
            });
        }
        coordinate::<endpoints::GlobalSearch, _>(
            self.cache(),
            self.search(),
            params,
            SearchAction::SearchPending,
            SearchAction::SearchSettled,
        )
        .await
    }

    pub async fn lookup(
        &self,
        kind: LookupKind,
        value: &str,
    ) -> Result<Arc<serde_json::Value>, CoreError> {
        let value = value.trim().to_owned();
        if value.is_empty() {
            return Err(CoreError::Validation {
                message: format!("{kind} lookup needs a value"),
            });
        }
        let target = value.clone();
        coordinate::<endpoints::Lookup, _>(
            self.cache(),
            self.search(),
            (kind, value),
            move |t| SearchAction::LookupPending(t, kind, target),
            SearchAction::LookupSettled,
        )
        .await
    }

    /// Search and lookup history, newest first.
    pub fn search_history(&self) -> (Vec<SearchHistoryEntry>, Vec<SearchHistoryEntry>) {
        self.search()
            .read(|s| (s.history.to_vec(), s.lookup_history.to_vec()))
    }

    pub fn restore_search_history(
        &self,
        search: Vec<SearchHistoryEntry>,
        lookup: Vec<SearchHistoryEntry>,
    ) {
        self.search()
            .dispatch(SearchAction::RestoreHistory { search, lookup });
    }

    // ── Files ────────────────────────────────────────────────────────

    /// Upload a HOT22 file. Progress lands in the files store as it
    /// streams; `on_progress` is called too, for a progress bar.
    pub async fn upload_hot22(
        &self,
        path: &Path,
        on_progress: Option<endpoints::ProgressFn>,
    ) -> Result<UploadResult, CoreError> {
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.files().dispatch(FilesAction::UploadStarted(file_name.clone()));

        let weak = Arc::downgrade(&self.inner);
        let sink: endpoints::ProgressFn = Arc::new(move |pct| {
            if let Some(inner) = weak.upgrade() {
                inner.files.dispatch(FilesAction::UploadProgress(pct));
            }
            if let Some(extra) = &on_progress {
                extra(pct);
            }
        });
        let args = UploadArgs {
            path: path.to_path_buf(),
            on_progress: sink,
        };

        match self.cache().mutate::<UploadHot22>(args).await {
            Ok(outcome) => {
                self.files()
                    .dispatch(FilesAction::UploadFinished(Ok(outcome.output.clone())));
                self.notify(NotificationLevel::Success, format!("Uploaded {file_name}"));
                self.mark_stale(&outcome.invalidated);
                Ok(outcome.output)
            }
            Err(err) => {
                self.files()
                    .dispatch(FilesAction::UploadFinished(Err(ErrorInfo::from(&err))));
                self.notify_failure("Upload failed", &err);
                Err(err)
            }
        }
    }

    pub async fn load_file_stats(&self) -> Result<Arc<FileStats>, CoreError> {
        coordinate::<endpoints::HotFileStats, _>(
            self.cache(),
            self.files(),
            (),
            FilesAction::StatsPending,
            FilesAction::StatsSettled,
        )
        .await
    }

    /// One page of processed records of `record_type`.
    pub async fn load_records(
        &self,
        record_type: &str,
        page: u32,
    ) -> Result<Arc<Page<serde_json::Value>>, CoreError> {
        let record_type = record_type.trim().to_owned();
        self.files()
            .dispatch(FilesAction::SetRecordType(Some(record_type.clone())));
        let params = QueryParams::new()
            .value("page", Some(page.max(1)))
            .value("limit", Some(self.inner.config.page_size));
        let (pending_type, settled_type) = (record_type.clone(), record_type.clone());
        coordinate::<endpoints::Records, _>(
            self.cache(),
            self.files(),
            (record_type, params),
            move |t| FilesAction::RecordsPending(pending_type, t),
            move |t, s| FilesAction::RecordsSettled(settled_type, t, s),
        )
        .await
    }

    pub async fn delete_all_records(&self) -> Result<OperationResult, CoreError> {
        match self.cache().mutate::<DeleteAllRecords>(()).await {
            Ok(outcome) => {
                self.files().dispatch(FilesAction::RecordsCleared);
                self.notify(NotificationLevel::Success, "Deleted all processed records");
                self.mark_stale(&outcome.invalidated);
                Ok(outcome.output)
            }
            Err(err) => {
                self.notify_failure("Delete failed", &err);
                Err(err)
            }
        }
    }

    /// Poll `/stats` through the cache every `interval` while the
    /// returned subscription is alive.
    pub async fn watch_file_stats(
        &self,
        interval: Duration,
    ) -> Result<Subscription<endpoints::HotFileStats>, CoreError> {
        self.cache()
            .subscribe::<endpoints::HotFileStats>((), Some(interval))
            .await
    }

    // ── Overview ─────────────────────────────────────────────────────

    /// Overall statistics, service health, and collection health,
    /// fetched concurrently. Returns the first failure.
    pub async fn load_overview(&self) -> Result<(), CoreError> {
        let stats = coordinate::<endpoints::ErrorLogStatsSummary, _>(
            self.cache(),
            self.overview(),
            QueryParams::new(),
            OverviewAction::StatsPending,
            OverviewAction::StatsSettled,
        );
        let collections = coordinate::<endpoints::CollectionHealth, _>(
            self.cache(),
            self.overview(),
            (),
            OverviewAction::CollectionsPending,
            OverviewAction::CollectionsSettled,
        );
        let (stats, health, collections) = tokio::join!(stats, self.load_health(), collections);
        stats.and(health.map(|_| ())).and(collections.map(|_| ()))
    }

    /// `GET /health`, always fresh.
    pub async fn load_health(&self) -> Result<Arc<hot22_api::HealthStatus>, CoreError> {
        coordinate_fresh::<endpoints::ServiceHealth, _>(
            self.cache(),
            self.overview(),
            (),
            OverviewAction::HealthPending,
            OverviewAction::HealthSettled,
        )
        .await
    }

    // ── Notifications ────────────────────────────────────────────────

    pub fn dismiss_notification(&self, id: u64) {
        self.ui().dispatch(UiAction::Dismiss(id));
    }

    /// Drop notifications older than the configured TTL.
    pub fn prune_notifications(&self) {
        self.ui().dispatch(UiAction::Prune {
            ttl: self.inner.config.notification_ttl,
            now: Utc::now(),
        });
    }

    fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.ui().dispatch(UiAction::notify(level, message));
    }

    fn notify_failure(&self, context: &str, err: &CoreError) {
        let info = ErrorInfo::from(err);
        warn!(error = %err, "{context}");
        self.notify(NotificationLevel::Error, format!("{context}: {}", info.message));
    }

    // ── Invalidation ─────────────────────────────────────────────────

    /// Flag every slice whose source key was invalidated.
    fn mark_stale(&self, keys: &[QueryKey]) {
        if keys.is_empty() {
            return;
        }
        let inner = &self.inner;
        let flagged = [
            inner.offices.mark_stale(keys),
            inner.passengers.mark_stale(keys),
            inner.error_logs.mark_stale(keys),
            inner.analytics.mark_stale(keys),
            inner.search.mark_stale(keys),
            inner.files.mark_stale(keys),
            inner.overview.mark_stale(keys),
        ];
        debug!(
            keys = keys.len(),
            stores = flagged.iter().filter(|f| **f).count(),
            "marked slices stale"
        );
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Stop the real-time monitor and every cache poll loop.
    pub async fn shutdown(&self) {
        if let Some(monitor) = self.inner.monitor.lock().await.take() {
            monitor.stop();
        }
        self.inner.cancel.cancel();
        self.inner.cache.shutdown();
        info!("dashboard shut down");
    }
}

/// Run one cached read, driving `store` through pending and settle.
async fn coordinate<E, S>(
    cache: &QueryCache,
    store: &Store<S>,
    args: E::Args,
    pending: impl FnOnce(RequestToken) -> S::Action,
    settled: impl FnOnce(RequestToken, Settled<E::Output>) -> S::Action,
) -> Result<Arc<E::Output>, CoreError>
where
    E: QueryEndpoint,
    S: Reducer + Clone + Send + Sync + 'static,
{
    drive::<E, S>(cache, store, args, false, pending, settled).await
}

/// Like [`coordinate`], bypassing any cached value.
async fn coordinate_fresh<E, S>(
    cache: &QueryCache,
    store: &Store<S>,
    args: E::Args,
    pending: impl FnOnce(RequestToken) -> S::Action,
    settled: impl FnOnce(RequestToken, Settled<E::Output>) -> S::Action,
) -> Result<Arc<E::Output>, CoreError>
where
    E: QueryEndpoint,
    S: Reducer + Clone + Send + Sync + 'static,
{
    drive::<E, S>(cache, store, args, true, pending, settled).await
}

async fn drive<E, S>(
    cache: &QueryCache,
    store: &Store<S>,
    args: E::Args,
    network: bool,
    pending: impl FnOnce(RequestToken) -> S::Action,
    settled: impl FnOnce(RequestToken, Settled<E::Output>) -> S::Action,
) -> Result<Arc<E::Output>, CoreError>
where
    E: QueryEndpoint,
    S: Reducer + Clone + Send + Sync + 'static,
{
    let key = QueryKey::of::<E>(&args)?;
    let token = RequestToken::next();
    store.dispatch(pending(token));

    let result = if network {
        cache.fetch::<E>(args).await
    } else {
        cache.query::<E>(args).await
    };
    match result {
        Ok(value) => {
            store.dispatch(settled(
                token,
                Ok(Fetched {
                    value: Arc::clone(&value),
                    key,
                }),
            ));
            Ok(value)
        }
        Err(err) => {
            store.dispatch(settled(token, Err(ErrorInfo::from(&err))));
            Err(err)
        }
    }
}

fn first_error<T>(results: impl IntoIterator<Item = Result<T, CoreError>>) -> Result<(), CoreError> {
    results.into_iter().find_map(Result::err).map_or(Ok(()), Err)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn first_error_wins() {
        let results: Vec<Result<u8, CoreError>> = vec![
            Ok(1),
            Err(CoreError::Internal("a".into())),
            Err(CoreError::Internal("b".into())),
        ];
        let err = first_error(results).err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Internal error: a"));
    }

    #[tokio::test]
    async fn stores_start_with_configured_page_size() {
        let mut config = DashboardConfig::new(url::Url::parse("http://localhost:3000").unwrap());
        config.page_size = 25;
        config.lookup_history_limit = 3;
        let dashboard = Dashboard::new(config).unwrap();

        assert_eq!(dashboard.offices().read(|s| s.filters.limit()), 25);
        assert_eq!(
            dashboard.error_logs().read(|s| s.resource.filters.limit()),
            25
        );
        assert_eq!(dashboard.search().read(|s| s.lookup_history.capacity()), 3);
    }

    #[tokio::test]
    async fn empty_bulk_delete_is_rejected_locally() {
        let config = DashboardConfig::new(url::Url::parse("http://127.0.0.1:9").unwrap());
        let dashboard = Dashboard::new(config).unwrap();
        let err = dashboard.bulk_delete_error_logs(Vec::new()).await.err();
        assert!(matches!(err, Some(CoreError::Validation { .. })));
        assert!(dashboard.ui().read(|s| s.notifications.is_empty()));
    }
}
