// Live interest in one cache entry. Dropping it releases the entry's
// subscriber count and polling contribution.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::{EntryState, QueryCache, QueryEndpoint, QueryKey};
use crate::error::{CoreError, ErrorInfo};

pub struct Subscription<E: QueryEndpoint> {
    cache: QueryCache,
    key: QueryKey,
    id: u64,
    args: E::Args,
    version: watch::Receiver<u64>,
    _endpoint: PhantomData<fn() -> E>,
}

impl<E: QueryEndpoint> Subscription<E> {
    pub(crate) fn new(
        cache: QueryCache,
        key: QueryKey,
        id: u64,
        args: E::Args,
        version: watch::Receiver<u64>,
    ) -> Self {
        Self {
            cache,
            key,
            id,
            args,
            version,
            _endpoint: PhantomData,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Latest value, possibly stale.
    pub fn current(&self) -> Option<Arc<E::Output>> {
        self.cache.value_of::<E::Output>(&self.key)
    }

    /// Error from the most recent fetch, if it failed.
    pub fn error(&self) -> Option<ErrorInfo> {
        self.cache.error_of(&self.key)
    }

    pub fn state(&self) -> Option<EntryState> {
        self.cache.state(&self.key)
    }

    /// Wait until the entry changes (new value, error, or invalidation).
    /// Returns `false` if the entry no longer exists.
    pub async fn changed(&mut self) -> bool {
        let changed = self.version.changed().await.is_ok();
        self.version.borrow_and_update();
        changed
    }

    /// Force a network refetch of this entry.
    pub async fn refetch(&self) -> Result<Arc<E::Output>, CoreError> {
        self.cache.fetch::<E>(self.args.clone()).await
    }

    /// Change this subscription's polling interval.
    pub fn set_polling(&self, interval: Duration) {
        self.cache.set_polling(&self.key, self.id, Some(interval));
    }

    /// Stop contributing to the entry's polling without unsubscribing.
    pub fn skip_polling(&self) {
        self.cache.set_polling(&self.key, self.id, None);
    }
}

impl<E: QueryEndpoint> Drop for Subscription<E> {
    fn drop(&mut self) {
        self.cache.release(&self.key, self.id);
    }
}

impl<E: QueryEndpoint> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
