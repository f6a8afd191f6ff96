// ── Tag-based query cache ──
//
// Every domain fetches through one `QueryCache`. Entries are keyed by
// endpoint name plus serialized arguments, carry the tags their data
// provides, and are refreshed or marked stale when a mutation
// invalidates a matching tag.

mod cache;
pub mod endpoints;
mod subscription;
mod tags;

use futures_util::future::BoxFuture;
use hot22_api::ApiClient;
use serde::Serialize;

pub use cache::{EntryState, MutationOutcome, QueryCache, QueryKey};
pub use subscription::Subscription;
pub use tags::{CacheTag, TagKind};

/// A cacheable read.
pub trait QueryEndpoint: Send + Sync + 'static {
    /// Stable name; the first half of every cache key.
    const NAME: &'static str;

    type Args: Serialize + Clone + Send + Sync + 'static;
    type Output: Send + Sync + 'static;

    fn fetch(
        api: ApiClient,
        args: Self::Args,
    ) -> BoxFuture<'static, Result<Self::Output, hot22_api::Error>>;

    /// Tags attached to the entry after a successful fetch.
    fn provides(_args: &Self::Args, _output: &Self::Output) -> Vec<CacheTag> {
        Vec::new()
    }
}

/// A write that invalidates cached reads on success.
pub trait MutationEndpoint: Send + Sync + 'static {
    const NAME: &'static str;

    type Args: Clone + Send + Sync + 'static;
    type Output: Send + Sync + 'static;

    fn execute(
        api: ApiClient,
        args: Self::Args,
    ) -> BoxFuture<'static, Result<Self::Output, hot22_api::Error>>;

    fn invalidates(_args: &Self::Args, _output: &Self::Output) -> Vec<CacheTag> {
        Vec::new()
    }
}
