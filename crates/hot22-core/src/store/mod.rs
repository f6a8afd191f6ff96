// ── Reactive state containers ──
//
// Each feature store is a `watch` channel holding one state value.
// Writes go through the state's reducer; reads are snapshots or borrows.

mod fetch;
mod history;
mod resource;
mod selection;
mod stream;

use tokio::sync::watch;

pub use fetch::{Fetched, FetchSlice, RequestToken, Settled};
pub use history::{BoundedHistory, HistoryEntry, SearchHistoryEntry};
pub use resource::{Keyed, ResourceAction, ResourceState, ViewMode, ViewState};
pub use selection::Selection;
pub use stream::{StateStream, StateWatchStream};

use crate::query::QueryKey;

/// State that changes only through typed actions.
pub trait Reducer {
    type Action;

    fn reduce(&mut self, action: Self::Action);
}

/// State whose slices remember the cache key they were loaded from.
pub trait StaleTracking {
    /// Flag every slice whose source is among `keys`. Returns `true` if
    /// anything changed.
    fn mark_stale(&mut self, keys: &[QueryKey]) -> bool;
}

/// A single-value reactive store.
///
/// Every mutation notifies subscribers with the new state.
#[derive(Debug)]
pub struct Store<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone + Send + Sync + 'static> Store<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Read from the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Mutate in place and notify subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut out = None;
        self.tx.send_modify(|state| out = Some(f(state)));
        out.unwrap_or_else(|| unreachable!("send_modify always runs its closure"))
    }

    /// Mutate in place; subscribers are notified only if `f` returns `true`.
    pub fn update_if(&self, f: impl FnOnce(&mut S) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    pub fn subscribe(&self) -> StateStream<S> {
        StateStream::new(self.tx.subscribe())
    }
}

impl<S: Reducer + Clone + Send + Sync + 'static> Store<S> {
    /// Apply one action through the state's reducer.
    pub fn dispatch(&self, action: S::Action) {
        self.tx.send_modify(|state| state.reduce(action));
    }
}

impl<S: StaleTracking + Clone + Send + Sync + 'static> Store<S> {
    pub fn mark_stale(&self, keys: &[QueryKey]) -> bool {
        self.update_if(|state| state.mark_stale(keys))
    }
}

impl<S: Default + Clone + Send + Sync + 'static> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
