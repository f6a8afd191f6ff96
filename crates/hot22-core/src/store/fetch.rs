// ── Async request lifecycle ──
//
// One `FetchSlice` per fetched value. `begin` records the newest request
// token; a settle carrying any other token is dropped, so the most
// recently dispatched request always wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::ErrorInfo;
use crate::query::QueryKey;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identifies one dispatched request. Tokens are process-wide and
/// strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// A successful settle: the value plus the cache key it came from.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: Arc<T>,
    pub key: QueryKey,
}

/// Outcome handed to a slice when its request completes.
pub type Settled<T> = Result<Fetched<T>, ErrorInfo>;

/// Data plus request lifecycle: `idle -> pending -> fulfilled | rejected`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSlice<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<ErrorInfo>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Set when the cache entry this data came from was invalidated.
    pub stale: bool,
    source: Option<QueryKey>,
    latest: Option<RequestToken>,
}

impl<T: Default> Default for FetchSlice<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            loading: false,
            error: None,
            last_updated: None,
            stale: false,
            source: None,
            latest: None,
        }
    }
}

impl<T> FetchSlice<T> {
    /// Pending: `loading = true`, error cleared, data kept.
    pub fn begin(&mut self, token: RequestToken) {
        self.latest = Some(token);
        self.loading = true;
        self.error = None;
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest == Some(token)
    }

    /// Fulfilled: replace data wholesale. Returns `false` (and changes
    /// nothing) if `token` was superseded.
    pub fn fulfill(&mut self, token: RequestToken, data: T, source: QueryKey) -> bool {
        if !self.is_current(token) {
            debug!(?token, "discarding superseded response");
            return false;
        }
        self.data = data;
        self.loading = false;
        self.error = None;
        self.stale = false;
        self.last_updated = Some(Utc::now());
        self.source = Some(source);
        true
    }

    /// Rejected: keep the previous data, record the error.
    pub fn reject(&mut self, token: RequestToken, error: ErrorInfo) -> bool {
        if !self.is_current(token) {
            debug!(?token, "discarding superseded failure");
            return false;
        }
        self.loading = false;
        self.error = Some(error);
        true
    }

    /// Apply a settle, mapping the fetched value into slice data.
    pub fn settle<V>(
        &mut self,
        token: RequestToken,
        settled: Settled<V>,
        map: impl FnOnce(&V) -> T,
    ) -> bool {
        match settled {
            Ok(fetched) => {
                let data = map(&fetched.value);
                self.fulfill(token, data, fetched.key)
            }
            Err(error) => self.reject(token, error),
        }
    }

    /// The cache key of the last fulfilled request.
    pub fn source(&self) -> Option<&QueryKey> {
        self.source.as_ref()
    }

    pub fn mark_stale_if(&mut self, keys: &[QueryKey]) -> bool {
        match &self.source {
            Some(source) if !self.stale && keys.contains(source) => {
                self.stale = true;
                true
            }
            _ => false,
        }
    }

    /// Back to idle with default data.
    pub fn reset(&mut self)
    where
        T: Default,
    {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(args: &str) -> QueryKey {
        QueryKey::new("test", args)
    }

    #[test]
    fn pending_then_fulfilled() {
        let mut slice = FetchSlice::<Vec<u32>>::default();
        let token = RequestToken::next();

        slice.begin(token);
        assert!(slice.loading);
        assert!(slice.error.is_none());

        assert!(slice.fulfill(token, vec![1, 2, 3], key("a")));
        assert!(!slice.loading);
        assert!(slice.error.is_none());
        assert_eq!(slice.data, vec![1, 2, 3]);
        assert!(slice.last_updated.is_some());
    }

    #[test]
    fn rejected_keeps_previous_data() {
        let mut slice = FetchSlice::<Vec<u32>>::default();
        let first = RequestToken::next();
        slice.begin(first);
        slice.fulfill(first, vec![7], key("a"));

        let second = RequestToken::next();
        slice.begin(second);
        assert!(slice.reject(second, ErrorInfo::new("boom")));

        assert!(!slice.loading);
        assert_eq!(slice.data, vec![7]);
        assert_eq!(slice.error.as_ref().map(|e| e.message.as_str()), Some("boom"));
    }

    #[test]
    fn superseded_response_never_overwrites_newer_result() {
        let mut slice = FetchSlice::<Vec<u32>>::default();
        let older = RequestToken::next();
        let newer = RequestToken::next();
        slice.begin(older);
        slice.begin(newer);

        assert!(slice.fulfill(newer, vec![2], key("page=2")));
        assert!(!slice.fulfill(older, vec![1], key("page=1")));
        assert!(!slice.reject(older, ErrorInfo::new("late failure")));

        assert_eq!(slice.data, vec![2]);
        assert!(slice.error.is_none());
        assert_eq!(slice.source(), Some(&key("page=2")));
    }

    #[test]
    fn stale_only_when_source_invalidated() {
        let mut slice = FetchSlice::<Vec<u32>>::default();
        let token = RequestToken::next();
        slice.begin(token);
        slice.fulfill(token, vec![1], key("a"));

        assert!(!slice.mark_stale_if(&[key("b")]));
        assert!(slice.mark_stale_if(&[key("b"), key("a")]));
        assert!(slice.stale);
        assert!(!slice.mark_stale_if(&[key("a")]));
    }

    #[test]
    fn tokens_increase() {
        let a = RequestToken::next();
        let b = RequestToken::next();
        assert!(b > a);
    }
}
