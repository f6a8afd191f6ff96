//! Client-side state and data-fetching layer for the HOT22 back-office
//! dashboard.
//!
//! - **[`Dashboard`]**: facade owning every feature store and the query
//!   cache. Coordinators such as [`load_offices()`](Dashboard::load_offices)
//!   read criteria from a store, fetch through the cache, and drive the
//!   slice through `pending -> fulfilled | rejected`.
//!
//! - **[`Store<S>`]**: `watch`-backed state container mutated only through
//!   the state's [`Reducer`]. Subscribers get a [`StateStream`].
//!
//! - **[`QueryCache`]**: tag-based cache keyed by endpoint name plus
//!   serialized arguments. Mutations invalidate by [`CacheTag`]; polling
//!   subscriptions refetch at the smallest requested interval.
//!
//! - **Feature stores** ([`domains`]): offices, passengers, error logs
//!   (generic [`ResourceState`] instances), analytics, search, files,
//!   overview, and UI notifications.

pub mod config;
pub mod dashboard;
pub mod domains;
pub mod error;
pub mod filters;
pub mod query;
pub mod realtime;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{CoreError, ErrorInfo, NETWORK_ERROR_MESSAGE};
pub use filters::{
    AnalyticsFilter, AnalyticsFilters, DEFAULT_PAGE_SIZE, ErrorLogFilter, ErrorLogFilters,
    Filters, OfficeFilter, OfficeFilters, PassengerFilter, PassengerFilters, Sort, SortOrder,
};
pub use query::{CacheTag, QueryCache, QueryKey, Subscription, TagKind};
pub use realtime::{MIN_INTERVAL, RealtimeMonitor};
pub use store::{
    BoundedHistory, FetchSlice, Reducer, RequestToken, ResourceAction, ResourceState,
    SearchHistoryEntry, Selection, StateStream, Store, ViewMode,
};

// Wire models, so consumers need not depend on `hot22-api` directly.
pub use hot22_api::{
    AnalyticsReport, BulkOperation, CollectionsReport, ErrorLog, ErrorLogStats, FileStats,
    GroupBy, HealthStatus, HistoryRecord, LookupKind, Office, OperationResult, Page, Pagination,
    Passenger, RealtimeSnapshot, SearchResult, UploadResult,
};
