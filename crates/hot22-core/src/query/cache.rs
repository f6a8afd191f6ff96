// ── Query cache ──
//
// Process-wide map from `QueryKey` to a type-erased entry. Values are
// stored as `Arc<dyn Any>` and downcast on read; each entry keeps a
// refetch closure so polling and eager invalidation can refresh it
// without knowing its endpoint type. No map guard is held across an
// await.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures_util::future::{BoxFuture, join_all};
use hot22_api::ApiClient;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::subscription::Subscription;
use super::{CacheTag, MutationEndpoint, QueryEndpoint};
use crate::error::{CoreError, ErrorInfo};
use crate::realtime::MIN_INTERVAL;

// ── Keys ────────────────────────────────────────────────────────────

/// Endpoint name plus the JSON form of its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    endpoint: &'static str,
    args: String,
}

impl QueryKey {
    pub fn new(endpoint: &'static str, args: impl Into<String>) -> Self {
        Self {
            endpoint,
            args: args.into(),
        }
    }

    pub fn of<E: QueryEndpoint>(args: &E::Args) -> Result<Self, CoreError> {
        serde_json::to_string(args)
            .map(|a| Self::new(E::NAME, a))
            .map_err(|e| CoreError::Internal(format!("unserializable {} args: {e}", E::NAME)))
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    pub fn args(&self) -> &str {
        &self.args
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args)
    }
}

// ── Entries ─────────────────────────────────────────────────────────

type AnyValue = Arc<dyn Any + Send + Sync>;
type Refetch = Arc<dyn Fn(QueryCache) -> BoxFuture<'static, ()> + Send + Sync>;

struct Poller {
    interval: Duration,
    cancel: CancellationToken,
}

struct Entry {
    value: Option<AnyValue>,
    error: Option<ErrorInfo>,
    tags: Vec<CacheTag>,
    stale: bool,
    fetched_at: Option<DateTime<Utc>>,
    /// Sequence of the latest request; older settles are dropped.
    seq: u64,
    subscribers: usize,
    polling: HashMap<u64, Duration>,
    poller: Option<Poller>,
    unused_since: Option<Instant>,
    refetch: Refetch,
    version: watch::Sender<u64>,
}

impl Entry {
    fn new(refetch: Refetch) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            value: None,
            error: None,
            tags: Vec::new(),
            stale: false,
            fetched_at: None,
            seq: 0,
            subscribers: 0,
            polling: HashMap::new(),
            poller: None,
            unused_since: None,
            refetch,
            version,
        }
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

/// Point-in-time view of one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryState {
    pub has_value: bool,
    pub stale: bool,
    pub error: Option<ErrorInfo>,
    pub tags: Vec<CacheTag>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub subscribers: usize,
    /// Interval of the running poll loop, if any.
    pub polling_interval: Option<Duration>,
}

/// Result of a successful mutation.
#[derive(Debug, Clone)]
pub struct MutationOutcome<T> {
    pub output: T,
    /// Keys marked stale by the mutation's tags.
    pub invalidated: Vec<QueryKey>,
}

fn refetcher<E: QueryEndpoint>(args: E::Args) -> Refetch {
    Arc::new(move |cache: QueryCache| -> BoxFuture<'static, ()> {
        let args = args.clone();
        Box::pin(async move {
            if let Err(e) = cache.fetch::<E>(args).await {
                debug!(endpoint = E::NAME, error = %e, "background refetch failed");
            }
        })
    })
}

// ── Cache ───────────────────────────────────────────────────────────

/// Shared, cheaply cloneable handle to the cache.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    api: ApiClient,
    entries: DashMap<QueryKey, Entry>,
    keep_unused_for: Duration,
    next_subscriber: AtomicU64,
    cancel: CancellationToken,
}

impl Drop for CacheInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries.len())
            .field("keep_unused_for", &self.inner.keep_unused_for)
            .finish_non_exhaustive()
    }
}

impl QueryCache {
    pub fn new(api: ApiClient, keep_unused_for: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                api,
                entries: DashMap::new(),
                keep_unused_for,
                next_subscriber: AtomicU64::new(1),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Cached read: returns the stored value unless it is missing or stale.
    pub async fn query<E: QueryEndpoint>(
        &self,
        args: E::Args,
    ) -> Result<Arc<E::Output>, CoreError> {
        let key = QueryKey::of::<E>(&args)?;
        if let Some(hit) = self.fresh::<E::Output>(&key) {
            debug!(%key, "cache hit");
            return Ok(hit);
        }
        self.fetch::<E>(args).await
    }

    /// Always hits the network and refreshes the entry.
    pub async fn fetch<E: QueryEndpoint>(
        &self,
        args: E::Args,
    ) -> Result<Arc<E::Output>, CoreError> {
        let key = QueryKey::of::<E>(&args)?;
        let seq = self.begin::<E>(&key, &args);
        debug!(%key, seq, "fetching");

        match E::fetch(self.inner.api.clone(), args.clone()).await {
            Ok(output) => {
                let tags = E::provides(&args, &output);
                let output = Arc::new(output);
                let value: AnyValue = output.clone();
                let applied = self.settle(&key, seq, move |entry| {
                    entry.value = Some(value);
                    entry.tags = tags;
                    entry.error = None;
                    entry.stale = false;
                    entry.fetched_at = Some(Utc::now());
                });
                if !applied {
                    debug!(%key, seq, "dropping superseded response");
                }
                Ok(output)
            }
            Err(e) => {
                let err = CoreError::from(e);
                let info = ErrorInfo::from(&err);
                self.settle(&key, seq, move |entry| entry.error = Some(info));
                Err(err)
            }
        }
    }

    /// The stored value even if stale, without fetching.
    pub fn peek<E: QueryEndpoint>(&self, args: &E::Args) -> Option<Arc<E::Output>> {
        let key = QueryKey::of::<E>(args).ok()?;
        self.value_of::<E::Output>(&key)
    }

    pub fn state(&self, key: &QueryKey) -> Option<EntryState> {
        self.inner.entries.get(key).map(|e| EntryState {
            has_value: e.value.is_some(),
            stale: e.stale,
            error: e.error.clone(),
            tags: e.tags.clone(),
            fetched_at: e.fetched_at,
            subscribers: e.subscribers,
            polling_interval: e.poller.as_ref().map(|p| p.interval),
        })
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self.inner.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Register interest in `args`, fetching on first use or when stale.
    ///
    /// With `polling`, the entry is refetched at the smallest interval
    /// requested by any live subscription, never faster than
    /// [`MIN_INTERVAL`]. A failed initial fetch is
    /// recorded on the entry and still yields a subscription.
    pub async fn subscribe<E: QueryEndpoint>(
        &self,
        args: E::Args,
        polling: Option<Duration>,
    ) -> Result<Subscription<E>, CoreError> {
        let key = QueryKey::of::<E>(&args)?;
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);

        let (needs_fetch, version) = {
            let mut entry = self
                .inner
                .entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(refetcher::<E>(args.clone())));
            entry.subscribers += 1;
            entry.unused_since = None;
            if let Some(interval) = polling {
                entry.polling.insert(id, interval.max(MIN_INTERVAL));
            }
            (entry.value.is_none() || entry.stale, entry.version.subscribe())
        };
        self.reconcile_poller(&key);

        let subscription = Subscription::new(self.clone(), key, id, args.clone(), version);
        if needs_fetch {
            if let Err(e) = self.fetch::<E>(args).await {
                debug!(key = %subscription.key(), error = %e, "initial subscription fetch failed");
            }
        }
        Ok(subscription)
    }

    pub(crate) fn set_polling(&self, key: &QueryKey, id: u64, polling: Option<Duration>) {
        if let Some(mut entry) = self.inner.entries.get_mut(key) {
            match polling {
                Some(interval) => entry.polling.insert(id, interval.max(MIN_INTERVAL)),
                None => entry.polling.remove(&id),
            };
        }
        self.reconcile_poller(key);
    }

    pub(crate) fn release(&self, key: &QueryKey, id: u64) {
        let unused = {
            let Some(mut entry) = self.inner.entries.get_mut(key) else {
                return;
            };
            entry.subscribers = entry.subscribers.saturating_sub(1);
            entry.polling.remove(&id);
            if entry.subscribers == 0 {
                entry.unused_since = Some(Instant::now());
            }
            entry.subscribers == 0
        };
        self.reconcile_poller(key);
        if unused {
            self.schedule_eviction(key.clone());
        }
    }

    pub(crate) fn value_of<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let value = self.inner.entries.get(key)?.value.clone()?;
        value.downcast::<T>().ok()
    }

    pub(crate) fn error_of(&self, key: &QueryKey) -> Option<ErrorInfo> {
        self.inner.entries.get(key)?.error.clone()
    }

    // ── Invalidation ─────────────────────────────────────────────────

    /// Mark every entry providing a matching tag as stale. Entries with
    /// subscribers are refetched before this returns; the others wait
    /// for their next read. Returns the invalidated keys.
    pub async fn invalidate(&self, tags: &[CacheTag]) -> Vec<QueryKey> {
        if tags.is_empty() {
            return Vec::new();
        }

        let mut invalidated = Vec::new();
        let mut refetches = Vec::new();
        for mut entry in self.inner.entries.iter_mut() {
            if !entry
                .tags
                .iter()
                .any(|provided| tags.iter().any(|t| t.matches(provided)))
            {
                continue;
            }
            entry.stale = true;
            entry.bump();
            if entry.subscribers > 0 {
                refetches.push(Arc::clone(&entry.refetch));
            }
            invalidated.push(entry.key().clone());
        }
        invalidated.sort();

        debug!(
            tags = ?tags.iter().map(ToString::to_string).collect::<Vec<_>>(),
            invalidated = invalidated.len(),
            refetching = refetches.len(),
            "invalidated cache entries"
        );
        join_all(refetches.into_iter().map(|refetch| refetch(self.clone()))).await;
        invalidated
    }

    /// Run a mutation. On success its tags are invalidated; on failure
    /// nothing is.
    pub async fn mutate<M: MutationEndpoint>(
        &self,
        args: M::Args,
    ) -> Result<MutationOutcome<M::Output>, CoreError> {
        debug!(mutation = M::NAME, "running mutation");
        let output = match M::execute(self.inner.api.clone(), args.clone()).await {
            Ok(output) => output,
            Err(e) => {
                let err = CoreError::from(e);
                warn!(mutation = M::NAME, error = %err, "mutation failed");
                return Err(err);
            }
        };
        let tags = M::invalidates(&args, &output);
        let invalidated = self.invalidate(&tags).await;
        Ok(MutationOutcome {
            output,
            invalidated,
        })
    }

    // ── Lifetime ─────────────────────────────────────────────────────

    /// Drop every unsubscribed entry idle for at least `keep_unused_for`.
    pub fn evict_unused(&self) -> usize {
        let before = self.inner.entries.len();
        let keep = self.inner.keep_unused_for;
        self.inner.entries.retain(|_, e| !is_evictable(e, keep));
        before - self.inner.entries.len()
    }

    /// Stop every poll loop and pending eviction.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        for mut entry in self.inner.entries.iter_mut() {
            entry.poller = None;
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn fresh<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let value = {
            let entry = self.inner.entries.get(key)?;
            if entry.stale {
                return None;
            }
            entry.value.clone()?
        };
        value.downcast::<T>().ok()
    }

    fn begin<E: QueryEndpoint>(&self, key: &QueryKey, args: &E::Args) -> u64 {
        let (seq, unused) = {
            let mut entry = self
                .inner
                .entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(refetcher::<E>(args.clone())));
            entry.seq += 1;
            if entry.subscribers == 0 {
                entry.unused_since = Some(Instant::now());
            }
            (entry.seq, entry.subscribers == 0)
        };
        if unused {
            self.schedule_eviction(key.clone());
        }
        seq
    }

    fn settle(&self, key: &QueryKey, seq: u64, apply: impl FnOnce(&mut Entry)) -> bool {
        let Some(mut entry) = self.inner.entries.get_mut(key) else {
            return false;
        };
        if entry.seq != seq {
            return false;
        }
        apply(&mut entry);
        entry.bump();
        true
    }

    fn reconcile_poller(&self, key: &QueryKey) {
        let Some(mut entry) = self.inner.entries.get_mut(key) else {
            return;
        };
        let wanted = entry.polling.values().min().copied();
        if wanted == entry.poller.as_ref().map(|p| p.interval) {
            return;
        }
        if let Some(old) = entry.poller.take() {
            old.cancel.cancel();
        }
        let Some(interval) = wanted else {
            debug!(%key, "polling stopped");
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(%key, "no runtime available, polling disabled");
            return;
        };

        let cancel = self.inner.cancel.child_token();
        entry.poller = Some(Poller {
            interval,
            cancel: cancel.clone(),
        });
        drop(entry);

        debug!(%key, interval = ?interval, "polling started");
        runtime.spawn(poll_task(
            Arc::downgrade(&self.inner),
            key.clone(),
            interval,
            cancel,
        ));
    }

    fn schedule_eviction(&self, key: QueryKey) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.evict_unused();
            return;
        };
        let weak = Arc::downgrade(&self.inner);
        let keep = self.inner.keep_unused_for;
        let cancel = self.inner.cancel.clone();
        runtime.spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(keep) => {
                    if let Some(inner) = weak.upgrade() {
                        if inner.entries.remove_if(&key, |_, e| is_evictable(e, keep)).is_some() {
                            debug!(%key, "evicted unused cache entry");
                        }
                    }
                }
            }
        });
    }
}

fn is_evictable(entry: &Entry, keep: Duration) -> bool {
    entry.subscribers == 0 && entry.unused_since.is_some_and(|t| t.elapsed() >= keep)
}

// ── Background tasks ────────────────────────────────────────────────

/// Refetch one entry every `period` until cancelled. The first refetch
/// happens one period after start; the subscriber that started the loop
/// has already fetched.
async fn poll_task(
    cache: Weak<CacheInner>,
    key: QueryKey,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let Some(inner) = cache.upgrade() else { break };
                let Some(refetch) = inner.entries.get(&key).map(|e| Arc::clone(&e.refetch)) else {
                    break;
                };
                refetch(QueryCache { inner }).await;
            }
        }
    }
    debug!(%key, "poll loop exited");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::LazyLock;

    use hot22_api::TransportConfig;
    use url::Url;

    use super::*;
    use crate::query::TagKind;

    static CALLS: LazyLock<DashMap<String, u32>> = LazyLock::new(DashMap::new);

    fn calls(args: &str) -> u32 {
        CALLS.get(args).map_or(0, |n| *n)
    }

    /// Returns how many times it has been called for these args.
    struct Counting;

    impl QueryEndpoint for Counting {
        const NAME: &'static str = "counting";
        type Args = String;
        type Output = u32;

        fn fetch(_api: ApiClient, args: String) -> BoxFuture<'static, Result<u32, hot22_api::Error>> {
            Box::pin(async move {
                let mut n = CALLS.entry(args).or_insert(0);
                *n += 1;
                Ok(*n)
            })
        }

        fn provides(args: &String, _output: &u32) -> Vec<CacheTag> {
            vec![CacheTag::list(TagKind::Record), CacheTag::id(TagKind::Record, args.clone())]
        }
    }

    /// First call is slow, later calls are fast.
    struct Racy;

    impl QueryEndpoint for Racy {
        const NAME: &'static str = "racy";
        type Args = String;
        type Output = u32;

        fn fetch(_api: ApiClient, args: String) -> BoxFuture<'static, Result<u32, hot22_api::Error>> {
            Box::pin(async move {
                let n = {
                    let mut n = CALLS.entry(args).or_insert(0);
                    *n += 1;
                    *n
                };
                let delay = if n == 1 { 100 } else { 10 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(n)
            })
        }
    }

    struct Touch;

    impl MutationEndpoint for Touch {
        const NAME: &'static str = "touch";
        type Args = Vec<CacheTag>;
        type Output = ();

        fn execute(_api: ApiClient, _args: Vec<CacheTag>) -> BoxFuture<'static, Result<(), hot22_api::Error>> {
            Box::pin(async { Ok(()) })
        }

        fn invalidates(args: &Vec<CacheTag>, _output: &()) -> Vec<CacheTag> {
            args.clone()
        }
    }

    struct Broken;

    impl MutationEndpoint for Broken {
        const NAME: &'static str = "broken";
        type Args = ();
        type Output = ();

        fn execute(_api: ApiClient, _args: ()) -> BoxFuture<'static, Result<(), hot22_api::Error>> {
            Box::pin(async {
                Err(hot22_api::Error::Http {
                    status: 500,
                    message: "Internal Server Error".into(),
                    body: None,
                })
            })
        }

        fn invalidates(_args: &(), _output: &()) -> Vec<CacheTag> {
            vec![CacheTag::kind(TagKind::Record)]
        }
    }

    fn cache() -> QueryCache {
        let api = ApiClient::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            &TransportConfig::default(),
        )
        .unwrap();
        QueryCache::new(api, Duration::from_secs(60))
    }

    fn key(args: &str) -> QueryKey {
        QueryKey::of::<Counting>(&args.to_owned()).unwrap()
    }

    #[tokio::test]
    async fn query_serves_from_cache() {
        let cache = cache();
        let a = cache.query::<Counting>("query-hit".into()).await.unwrap();
        let b = cache.query::<Counting>("query-hit".into()).await.unwrap();
        assert_eq!((*a, *b), (1, 1));
        assert_eq!(calls("query-hit"), 1);

        let forced = cache.fetch::<Counting>("query-hit".into()).await.unwrap();
        assert_eq!(*forced, 2);
    }

    #[tokio::test]
    async fn kind_only_invalidation_refetches_subscribed_providers() {
        let cache = cache();
        let sub_a = cache.subscribe::<Counting>("kind-a".into(), None).await.unwrap();
        let sub_b = cache.subscribe::<Counting>("kind-b".into(), None).await.unwrap();
        cache.query::<Counting>("kind-lazy".into()).await.unwrap();

        let outcome = cache
            .mutate::<Touch>(vec![CacheTag::kind(TagKind::Record)])
            .await
            .unwrap();

        assert_eq!(outcome.invalidated.len(), 3);
        assert_eq!(calls("kind-a"), 2);
        assert_eq!(calls("kind-b"), 2);
        assert_eq!(sub_a.current().map(|v| *v), Some(2));
        assert_eq!(sub_b.current().map(|v| *v), Some(2));

        // Unsubscribed entries are stale until read again.
        assert_eq!(calls("kind-lazy"), 1);
        assert!(cache.state(&key("kind-lazy")).unwrap().stale);
        let lazy = cache.query::<Counting>("kind-lazy".into()).await.unwrap();
        assert_eq!(*lazy, 2);
    }

    #[tokio::test]
    async fn id_invalidation_touches_only_that_entry() {
        let cache = cache();
        cache.query::<Counting>("id-a".into()).await.unwrap();
        cache.query::<Counting>("id-b".into()).await.unwrap();

        let invalidated = cache
            .invalidate(&[CacheTag::id(TagKind::Record, "id-a")])
            .await;

        assert_eq!(invalidated, vec![key("id-a")]);
        assert!(!cache.state(&key("id-b")).unwrap().stale);
    }

    #[tokio::test]
    async fn failed_mutation_invalidates_nothing() {
        let cache = cache();
        cache.query::<Counting>("broken".into()).await.unwrap();

        let err = cache.mutate::<Broken>(()).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(!cache.state(&key("broken")).unwrap().stale);
        assert_eq!(calls("broken"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_fetch_does_not_overwrite_newer_value() {
        let cache = cache();
        let (slow, fast) = tokio::join!(
            cache.fetch::<Racy>("race".into()),
            cache.fetch::<Racy>("race".into()),
        );
        assert_eq!((*slow.unwrap(), *fast.unwrap()), (1, 2));

        let key = QueryKey::of::<Racy>(&"race".to_owned()).unwrap();
        assert_eq!(cache.value_of::<u32>(&key).map(|v| *v), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn polls_at_smallest_interval_until_released() {
        let cache = cache();
        let slow = cache
            .subscribe::<Counting>("poll".into(), Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(calls("poll"), 1);

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(calls("poll"), 2);

        let fast = cache
            .subscribe::<Counting>("poll".into(), Some(Duration::from_secs(2)))
            .await
            .unwrap();
        assert_eq!(
            cache.state(&key("poll")).unwrap().polling_interval,
            Some(Duration::from_secs(2))
        );
        tokio::time::sleep(Duration::from_millis(4_500)).await;
        assert_eq!(calls("poll"), 4);

        fast.skip_polling();
        assert_eq!(
            cache.state(&key("poll")).unwrap().polling_interval,
            Some(Duration::from_secs(5))
        );

        drop(fast);
        drop(slow);
        let settled = calls("poll");
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls("poll"), settled);
        assert_eq!(cache.state(&key("poll")).unwrap().polling_interval, None);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_polling_interval_is_raised_to_the_floor() {
        let cache = cache();
        let sub = cache
            .subscribe::<Counting>("zero".into(), Some(Duration::ZERO))
            .await
            .unwrap();
        assert_eq!(
            cache.state(&key("zero")).unwrap().polling_interval,
            Some(MIN_INTERVAL)
        );
        tokio::time::sleep(MIN_INTERVAL + Duration::from_millis(500)).await;
        assert_eq!(calls("zero"), 2);

        sub.set_polling(Duration::ZERO);
        assert_eq!(
            cache.state(&key("zero")).unwrap().polling_interval,
            Some(MIN_INTERVAL)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unused_entries_are_evicted() {
        let cache = cache();
        cache.query::<Counting>("evict-query".into()).await.unwrap();
        let sub = cache.subscribe::<Counting>("evict-sub".into(), None).await.unwrap();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(cache.state(&key("evict-query")).is_none());
        assert!(cache.state(&key("evict-sub")).is_some());

        drop(sub);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(cache.state(&key("evict-sub")).is_some());
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(cache.state(&key("evict-sub")).is_none());
    }
}
