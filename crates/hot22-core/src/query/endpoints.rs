// ── Typed cache endpoints ──
//
// One zero-sized type per cached read or mutation. Each names its
// arguments and output, delegates to `ApiClient`, and declares the tags
// it provides or invalidates.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use hot22_api::{
    AnalyticsReport, ApiClient, BulkOperation, CollectionsReport, Error, ErrorLog, ErrorLogStats,
    FileStats, HealthStatus, HistoryRecord, LookupKind, Office, OperationResult, Page, Passenger,
    QueryParams, RealtimeSnapshot, SearchResult, UploadResult,
};

use super::{CacheTag, MutationEndpoint, QueryEndpoint, TagKind};

type Fetch<T> = BoxFuture<'static, Result<T, Error>>;

fn page_tags<T>(kind: TagKind, page: &Page<T>, key: impl Fn(&T) -> &str) -> Vec<CacheTag> {
    std::iter::once(CacheTag::list(kind))
        .chain(page.data.iter().map(|item| CacheTag::id(kind, key(item))))
        .collect()
}

// ── Offices ─────────────────────────────────────────────────────────

pub struct OfficeList;

impl QueryEndpoint for OfficeList {
    const NAME: &'static str = "offices.list";
    type Args = QueryParams;
    type Output = Page<Office>;

    fn fetch(api: ApiClient, params: QueryParams) -> Fetch<Page<Office>> {
        Box::pin(async move { api.list_offices(&params).await })
    }

    fn provides(_: &QueryParams, page: &Page<Office>) -> Vec<CacheTag> {
        page_tags(TagKind::Office, page, |o| o.agent_code.as_str())
    }
}

pub struct OfficeDetail;

impl QueryEndpoint for OfficeDetail {
    const NAME: &'static str = "offices.get";
    type Args = String;
    type Output = Office;

    fn fetch(api: ApiClient, agent_code: String) -> Fetch<Office> {
        Box::pin(async move { api.get_office(&agent_code).await })
    }

    fn provides(agent_code: &String, _: &Office) -> Vec<CacheTag> {
        vec![CacheTag::id(TagKind::Office, agent_code.clone())]
    }
}

// ── Passengers ──────────────────────────────────────────────────────

pub struct PassengerList;

impl QueryEndpoint for PassengerList {
    const NAME: &'static str = "passengers.list";
    type Args = QueryParams;
    type Output = Page<Passenger>;

    fn fetch(api: ApiClient, params: QueryParams) -> Fetch<Page<Passenger>> {
        Box::pin(async move { api.list_passengers(&params).await })
    }

    fn provides(_: &QueryParams, page: &Page<Passenger>) -> Vec<CacheTag> {
        page_tags(TagKind::Passenger, page, |p| p.transaction_number.as_str())
    }
}

pub struct PassengerDetail;

impl QueryEndpoint for PassengerDetail {
    const NAME: &'static str = "passengers.get";
    type Args = String;
    type Output = Passenger;

    fn fetch(api: ApiClient, trnn: String) -> Fetch<Passenger> {
        Box::pin(async move { api.get_passenger(&trnn).await })
    }

    fn provides(trnn: &String, _: &Passenger) -> Vec<CacheTag> {
        vec![CacheTag::id(TagKind::Passenger, trnn.clone())]
    }
}

pub struct PassengerHistory;

impl QueryEndpoint for PassengerHistory {
    const NAME: &'static str = "passengers.history";
    type Args = String;
    type Output = Vec<HistoryRecord>;

    fn fetch(api: ApiClient, trnn: String) -> Fetch<Vec<HistoryRecord>> {
        Box::pin(async move { api.passenger_history(&trnn).await })
    }

    fn provides(trnn: &String, _: &Vec<HistoryRecord>) -> Vec<CacheTag> {
        vec![CacheTag::id(TagKind::Passenger, trnn.clone())]
    }
}

// ── Analytics and search ────────────────────────────────────────────

pub struct Analytics;

impl QueryEndpoint for Analytics {
    const NAME: &'static str = "analytics.report";
    type Args = (AnalyticsReport, QueryParams);
    type Output = serde_json::Value;

    fn fetch(api: ApiClient, (report, params): Self::Args) -> Fetch<serde_json::Value> {
        Box::pin(async move { api.analytics_report(report, &params).await })
    }

    fn provides((report, _): &Self::Args, _: &serde_json::Value) -> Vec<CacheTag> {
        vec![CacheTag::id(TagKind::Analytics, report.to_string())]
    }
}

pub struct GlobalSearch;

impl QueryEndpoint for GlobalSearch {
    const NAME: &'static str = "search.global";
    type Args = QueryParams;
    type Output = Page<SearchResult>;

    fn fetch(api: ApiClient, params: QueryParams) -> Fetch<Page<SearchResult>> {
        Box::pin(async move { api.global_search(&params).await })
    }

    fn provides(_: &QueryParams, _: &Page<SearchResult>) -> Vec<CacheTag> {
        vec![CacheTag::list(TagKind::Search)]
    }
}

pub struct Lookup;

impl QueryEndpoint for Lookup {
    const NAME: &'static str = "search.lookup";
    type Args = (LookupKind, String);
    type Output = serde_json::Value;

    fn fetch(api: ApiClient, (kind, value): Self::Args) -> Fetch<serde_json::Value> {
        Box::pin(async move { api.lookup(kind, &value).await })
    }

    fn provides((kind, value): &Self::Args, _: &serde_json::Value) -> Vec<CacheTag> {
        vec![CacheTag::id(TagKind::Search, format!("{kind}:{value}"))]
    }
}

// ── Error logs ──────────────────────────────────────────────────────

pub struct ErrorLogList;

impl QueryEndpoint for ErrorLogList {
    const NAME: &'static str = "errorLogs.list";
    type Args = QueryParams;
    type Output = Page<ErrorLog>;

    fn fetch(api: ApiClient, params: QueryParams) -> Fetch<Page<ErrorLog>> {
        Box::pin(async move { api.list_error_logs(&params).await })
    }

    fn provides(_: &QueryParams, page: &Page<ErrorLog>) -> Vec<CacheTag> {
        page_tags(TagKind::ErrorLog, page, |l| l.upload_id.as_str())
    }
}

pub struct ErrorLogSearch;

impl QueryEndpoint for ErrorLogSearch {
    const NAME: &'static str = "errorLogs.search";
    type Args = QueryParams;
    type Output = Page<ErrorLog>;

    fn fetch(api: ApiClient, params: QueryParams) -> Fetch<Page<ErrorLog>> {
        Box::pin(async move { api.search_error_logs(&params).await })
    }

    fn provides(_: &QueryParams, page: &Page<ErrorLog>) -> Vec<CacheTag> {
        page_tags(TagKind::ErrorLog, page, |l| l.upload_id.as_str())
    }
}

pub struct ErrorLogsByType;

impl QueryEndpoint for ErrorLogsByType {
    const NAME: &'static str = "errorLogs.byType";
    type Args = (String, QueryParams);
    type Output = Page<ErrorLog>;

    fn fetch(api: ApiClient, (error_type, params): Self::Args) -> Fetch<Page<ErrorLog>> {
        Box::pin(async move { api.error_logs_by_type(&error_type, &params).await })
    }

    fn provides(_: &Self::Args, page: &Page<ErrorLog>) -> Vec<CacheTag> {
        page_tags(TagKind::ErrorLog, page, |l| l.upload_id.as_str())
    }
}

pub struct ErrorLogDetail;

impl QueryEndpoint for ErrorLogDetail {
    const NAME: &'static str = "errorLogs.get";
    type Args = String;
    type Output = ErrorLog;

    fn fetch(api: ApiClient, upload_id: String) -> Fetch<ErrorLog> {
        Box::pin(async move { api.get_error_log(&upload_id).await })
    }

    fn provides(upload_id: &String, _: &ErrorLog) -> Vec<CacheTag> {
        vec![CacheTag::id(TagKind::ErrorLog, upload_id.clone())]
    }
}

pub struct ErrorLogStatsSummary;

impl QueryEndpoint for ErrorLogStatsSummary {
    const NAME: &'static str = "errorLogs.stats";
    type Args = QueryParams;
    type Output = ErrorLogStats;

    fn fetch(api: ApiClient, params: QueryParams) -> Fetch<ErrorLogStats> {
        Box::pin(async move { api.error_log_stats(&params).await })
    }

    fn provides(_: &QueryParams, _: &ErrorLogStats) -> Vec<CacheTag> {
        vec![CacheTag::kind(TagKind::ErrorLogStats)]
    }
}

pub struct ErrorLogDashboard;

impl QueryEndpoint for ErrorLogDashboard {
    const NAME: &'static str = "errorLogs.dashboard";
    type Args = ();
    type Output = serde_json::Value;

    fn fetch(api: ApiClient, (): ()) -> Fetch<serde_json::Value> {
        Box::pin(async move { api.error_log_dashboard().await })
    }

    fn provides((): &(), _: &serde_json::Value) -> Vec<CacheTag> {
        vec![CacheTag::kind(TagKind::ErrorLogStats)]
    }
}

pub struct ErrorLogRealtime;

impl QueryEndpoint for ErrorLogRealtime {
    const NAME: &'static str = "errorLogs.realtime";
    type Args = ();
    type Output = RealtimeSnapshot;

    fn fetch(api: ApiClient, (): ()) -> Fetch<RealtimeSnapshot> {
        Box::pin(async move { api.error_log_realtime().await })
    }

    fn provides((): &(), _: &RealtimeSnapshot) -> Vec<CacheTag> {
        vec![CacheTag::kind(TagKind::ErrorLogStats)]
    }
}

// ── Files and health ────────────────────────────────────────────────

pub struct HotFileStats;

impl QueryEndpoint for HotFileStats {
    const NAME: &'static str = "files.stats";
    type Args = ();
    type Output = FileStats;

    fn fetch(api: ApiClient, (): ()) -> Fetch<FileStats> {
        Box::pin(async move { api.file_stats().await })
    }

    fn provides((): &(), _: &FileStats) -> Vec<CacheTag> {
        vec![CacheTag::kind(TagKind::HotFile)]
    }
}

pub struct Records;

impl QueryEndpoint for Records {
    const NAME: &'static str = "files.records";
    type Args = (String, QueryParams);
    type Output = Page<serde_json::Value>;

    fn fetch(api: ApiClient, (record_type, params): Self::Args) -> Fetch<Page<serde_json::Value>> {
        Box::pin(async move { api.records(&record_type, &params).await })
    }

    fn provides((record_type, _): &Self::Args, _: &Page<serde_json::Value>) -> Vec<CacheTag> {
        vec![CacheTag::id(TagKind::Record, record_type.clone())]
    }
}

pub struct ServiceHealth;

impl QueryEndpoint for ServiceHealth {
    const NAME: &'static str = "health.check";
    type Args = ();
    type Output = HealthStatus;

    fn fetch(api: ApiClient, (): ()) -> Fetch<HealthStatus> {
        Box::pin(async move { api.health().await })
    }

    fn provides((): &(), _: &HealthStatus) -> Vec<CacheTag> {
        vec![CacheTag::kind(TagKind::Health)]
    }
}

pub struct CollectionHealth;

impl QueryEndpoint for CollectionHealth {
    const NAME: &'static str = "health.collections";
    type Args = ();
    type Output = CollectionsReport;

    fn fetch(api: ApiClient, (): ()) -> Fetch<CollectionsReport> {
        Box::pin(async move { api.collection_health().await })
    }

    fn provides((): &(), _: &CollectionsReport) -> Vec<CacheTag> {
        vec![CacheTag::kind(TagKind::Health)]
    }
}

// ── Mutations ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkArgs {
    pub upload_ids: Vec<String>,
    pub operation: BulkOperation,
}

pub struct BulkErrorLogs;

impl MutationEndpoint for BulkErrorLogs {
    const NAME: &'static str = "errorLogs.bulk";
    type Args = BulkArgs;
    type Output = OperationResult;

    fn execute(api: ApiClient, args: BulkArgs) -> Fetch<OperationResult> {
        Box::pin(async move { api.bulk_error_logs(&args.upload_ids, args.operation).await })
    }

    /// Export reads without changing anything, so it invalidates nothing.
    fn invalidates(args: &BulkArgs, _: &OperationResult) -> Vec<CacheTag> {
        match args.operation {
            BulkOperation::Export => Vec::new(),
            BulkOperation::Delete => [
                CacheTag::list(TagKind::ErrorLog),
                CacheTag::kind(TagKind::ErrorLogStats),
            ]
            .into_iter()
            .chain(args.upload_ids.iter().map(|id| CacheTag::id(TagKind::ErrorLog, id.clone())))
            .collect(),
        }
    }
}

pub struct CleanupErrorLogs;

impl MutationEndpoint for CleanupErrorLogs {
    const NAME: &'static str = "errorLogs.cleanup";
    type Args = Option<u32>;
    type Output = OperationResult;

    fn execute(api: ApiClient, days_old: Option<u32>) -> Fetch<OperationResult> {
        Box::pin(async move { api.cleanup_error_logs(days_old).await })
    }

    fn invalidates(_: &Option<u32>, _: &OperationResult) -> Vec<CacheTag> {
        vec![
            CacheTag::kind(TagKind::ErrorLog),
            CacheTag::kind(TagKind::ErrorLogStats),
        ]
    }
}

pub struct DeleteAllRecords;

impl MutationEndpoint for DeleteAllRecords {
    const NAME: &'static str = "files.deleteAll";
    type Args = ();
    type Output = OperationResult;

    fn execute(api: ApiClient, (): ()) -> Fetch<OperationResult> {
        Box::pin(async move { api.delete_all_records().await })
    }

    fn invalidates((): &(), _: &OperationResult) -> Vec<CacheTag> {
        vec![CacheTag::kind(TagKind::HotFile), CacheTag::kind(TagKind::Record)]
    }
}

/// Upload progress sink, called with a percentage.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

#[derive(Clone)]
pub struct UploadArgs {
    pub path: PathBuf,
    pub on_progress: ProgressFn,
}

impl std::fmt::Debug for UploadArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadArgs").field("path", &self.path).finish_non_exhaustive()
    }
}

pub struct UploadHot22;

impl MutationEndpoint for UploadHot22 {
    const NAME: &'static str = "files.upload";
    type Args = UploadArgs;
    type Output = UploadResult;

    fn execute(api: ApiClient, args: UploadArgs) -> Fetch<UploadResult> {
        Box::pin(async move {
            let sink = args.on_progress;
            api.upload_hot22(&args.path, move |pct| sink(pct)).await
        })
    }

    /// A processed upload adds records and error logs.
    fn invalidates(_: &UploadArgs, _: &UploadResult) -> Vec<CacheTag> {
        vec![
            CacheTag::kind(TagKind::HotFile),
            CacheTag::kind(TagKind::Record),
            CacheTag::list(TagKind::ErrorLog),
            CacheTag::kind(TagKind::ErrorLogStats),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_export_invalidates_nothing() {
        let args = BulkArgs {
            upload_ids: vec!["u-1".into()],
            operation: BulkOperation::Export,
        };
        assert!(BulkErrorLogs::invalidates(&args, &OperationResult::default()).is_empty());
    }

    #[test]
    fn bulk_delete_invalidates_list_stats_and_each_id() {
        let args = BulkArgs {
            upload_ids: vec!["id1".into(), "id2".into()],
            operation: BulkOperation::Delete,
        };
        let tags: Vec<String> = BulkErrorLogs::invalidates(&args, &OperationResult::default())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            tags,
            vec!["ErrorLog:LIST", "ErrorLogStats", "ErrorLog:id1", "ErrorLog:id2"]
        );
    }

    #[test]
    fn list_provides_list_tag_and_row_ids() {
        let page: Page<ErrorLog> = serde_json::from_value(serde_json::json!({
            "data": [{ "uploadId": "a" }, { "uploadId": "b" }],
            "pagination": {}
        }))
        .unwrap_or_default();
        let tags = ErrorLogList::provides(&QueryParams::new(), &page);
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0], CacheTag::list(TagKind::ErrorLog));
    }
}
