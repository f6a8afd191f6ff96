// ── Runtime dashboard configuration ──
//
// Describes how to reach the API and how the state layer behaves.
// Never touches disk: `hot22-config` (or a test) builds one and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use hot22_api::TransportConfig;
use url::Url;

use crate::filters::DEFAULT_PAGE_SIZE;

/// Configuration for one `Dashboard`.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API base URL (e.g. `http://localhost:3000`).
    pub base_url: Url,
    /// Uniform request timeout.
    pub timeout: Duration,
    /// Log every request/response at `info`.
    pub dev_mode: bool,
    /// Initial `limit` for every paginated resource.
    pub page_size: u32,
    /// Default polling interval for real-time mode.
    pub realtime_interval: Duration,
    /// How long an unsubscribed cache entry survives.
    pub cache_keep_unused: Duration,
    /// Capacity of the global search history.
    pub search_history_limit: usize,
    /// Capacity of the quick-lookup history.
    pub lookup_history_limit: usize,
    /// Where exports are written.
    pub download_dir: PathBuf,
    /// Notifications older than this are pruned.
    pub notification_ttl: Duration,
}

impl DashboardConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
            dev_mode: false,
            page_size: DEFAULT_PAGE_SIZE,
            realtime_interval: Duration::from_secs(10),
            cache_keep_unused: Duration::from_secs(60),
            search_history_limit: 10,
            lookup_history_limit: 20,
            download_dir: PathBuf::from("."),
            notification_ttl: Duration::from_secs(5),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_dev_mode(self.dev_mode)
    }
}
