//! Keyed read-through cache shared by every hook of one entity kind.
//!
//! Each key holds the last settled value or error plus at most one in-flight
//! fetch. Fetches run as spawned tasks wrapped in a [`Shared`] future, so any
//! number of callers can await the same request and the result lands in the
//! cache even if nobody is waiting for it anymore.
//!
//! Entries with no observers and nothing in flight are evicted once their
//! last result is older than the cache's GC time. The sweep runs whenever a
//! new key is inserted.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::task::AbortHandle;
use tokio::time::Instant;

use crate::source::DataError;

pub type FetchResult<V> = Result<V, Arc<DataError>>;
pub type SharedFetch<V> = Shared<BoxFuture<'static, FetchResult<V>>>;

/// What a consumer currently sees for one query.
#[derive(Debug, Clone)]
pub enum QueryState<V> {
    /// Disabled or never requested.
    Idle,
    /// A fetch is running and nothing has settled yet.
    Loading,
    Failed(Arc<DataError>),
    Ready(V),
}

impl<V> QueryState<V> {
    #[cfg(test)]
    pub fn ready(self) -> Option<V> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Outcome of [`QueryCache::fetch`].
pub enum Lookup<V> {
    /// Cached and younger than the stale time; no request issued.
    Fresh(V),
    /// Cached but stale; a background refresh was started or joined.
    Stale(V),
    /// The last fetch failed and the failure is still fresh.
    Failed(Arc<DataError>),
    /// Nothing usable cached; await the shared fetch.
    Pending(SharedFetch<V>),
}

struct InFlight<V> {
    generation: u64,
    future: SharedFetch<V>,
    abort: AbortHandle,
    /// Set once a caller outside any observer joined; such a fetch always
    /// runs to completion.
    pinned: bool,
}

struct Entry<V> {
    data: Option<V>,
    error: Option<Arc<DataError>>,
    settled_at: Option<Instant>,
    in_flight: Option<InFlight<V>>,
    observers: usize,
}

impl<V> Entry<V> {
    fn collectable(&self, gc_time: Duration) -> bool {
        self.observers == 0
            && self.in_flight.is_none()
            && self.settled_at.is_none_or(|at| at.elapsed() >= gc_time)
    }
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            settled_at: None,
            in_flight: None,
            observers: 0,
        }
    }
}

type Entries<K, V> = Arc<Mutex<HashMap<K, Entry<V>>>>;

pub struct QueryCache<K, V> {
    kind: &'static str,
    stale_time: Duration,
    gc_time: Duration,
    entries: Entries<K, V>,
    /// Shared across keys so an evicted and re-created entry never reuses a
    /// generation an old task may still settle with.
    generations: Arc<AtomicU64>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            stale_time: self.stale_time,
            gc_time: self.gc_time,
            entries: Arc::clone(&self.entries),
            generations: Arc::clone(&self.generations),
        }
    }
}

/// Keeps a key observed until dropped.
///
/// When the last guard of a key drops, its pending fetch is aborted unless a
/// non-observing caller is also waiting on it.
#[must_use = "dropping the guard releases the observer immediately"]
pub struct ObserverGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Clone + Eq + Hash + Debug + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(kind: &'static str, stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            kind,
            stale_time,
            gc_time,
            entries: Arc::new(Mutex::new(HashMap::new())),
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        lock_entries(&self.entries)
    }

    /// Entry for `key`, sweeping idle entries first when it has to be created.
    fn slot<'a>(&self, entries: &'a mut HashMap<K, Entry<V>>, key: &K) -> &'a mut Entry<V> {
        if !entries.contains_key(key) {
            let before = entries.len();
            entries.retain(|_, entry| !entry.collectable(self.gc_time));
            let evicted = before - entries.len();
            if evicted > 0 {
                tracing::debug!(kind = self.kind, evicted, "evicted idle entries");
            }
        }
        entries.entry(key.clone()).or_default()
    }

    /// Stale-while-revalidate read of `key`.
    ///
    /// `fetcher` is only invoked when a new request has to start.
    pub fn fetch<F, Fut>(&self, key: K, fetcher: F) -> Lookup<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, DataError>> + Send + 'static,
    {
        let mut entries = self.lock();
        let entry = self.slot(&mut entries, &key);

        let fresh = entry
            .settled_at
            .is_some_and(|at| at.elapsed() < self.stale_time);
        if fresh {
            if let Some(err) = &entry.error {
                return Lookup::Failed(Arc::clone(err));
            }
            if let Some(data) = &entry.data {
                return Lookup::Fresh(data.clone());
            }
        }

        let pending = self.join_or_start(key, entry, fetcher);
        if let Some(in_flight) = &mut entry.in_flight {
            in_flight.pinned = true;
        }
        match (&entry.data, &entry.error) {
            (Some(data), None) => Lookup::Stale(data.clone()),
            _ => Lookup::Pending(pending),
        }
    }

    /// Forces a request for `key`, joining one that is already running.
    ///
    /// Meant for observers: unlike [`Self::fetch`] it does not pin the
    /// request, so it is aborted when the last observer leaves.
    pub fn refetch<F, Fut>(&self, key: K, fetcher: F) -> SharedFetch<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, DataError>> + Send + 'static,
    {
        let mut entries = self.lock();
        let entry = self.slot(&mut entries, &key);
        self.join_or_start(key, entry, fetcher)
    }

    /// Current state of `key` without starting anything.
    #[cfg(test)]
    pub fn state(&self, key: &K) -> QueryState<V> {
        let entries = self.lock();
        let Some(entry) = entries.get(key) else {
            return QueryState::Idle;
        };
        if let Some(err) = &entry.error {
            QueryState::Failed(Arc::clone(err))
        } else if let Some(data) = &entry.data {
            QueryState::Ready(data.clone())
        } else if entry.in_flight.is_some() {
            QueryState::Loading
        } else {
            QueryState::Idle
        }
    }

    #[cfg(test)]
    pub fn is_fetching(&self, key: &K) -> bool {
        self.lock()
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

    #[cfg(test)]
    pub fn observers(&self, key: &K) -> usize {
        self.lock().get(key).map_or(0, |entry| entry.observers)
    }

    #[cfg(test)]
    pub fn entry_count(&self) -> usize {
        self.lock().len()
    }

    pub fn observe(&self, key: K) -> ObserverGuard {
        let mut entries = self.lock();
        self.slot(&mut entries, &key).observers += 1;
        drop(entries);
        let cache = self.clone();
        ObserverGuard {
            release: Some(Box::new(move || cache.release(&key))),
        }
    }

    fn release(&self, key: &K) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        entry.observers = entry.observers.saturating_sub(1);
        if entry.observers > 0 {
            return;
        }
        if entry.in_flight.as_ref().is_some_and(|f| !f.pinned) {
            if let Some(in_flight) = entry.in_flight.take() {
                in_flight.abort.abort();
                tracing::debug!(kind = self.kind, key = ?key, "last observer gone; fetch aborted");
            }
        }
    }

    fn join_or_start<F, Fut>(&self, key: K, entry: &mut Entry<V>, fetcher: F) -> SharedFetch<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, DataError>> + Send + 'static,
    {
        if let Some(in_flight) = &entry.in_flight {
            return in_flight.future.clone();
        }

        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let kind = self.kind;
        tracing::debug!(kind, key = ?key, generation, "starting fetch");

        let request = fetcher();
        let task_entries = Arc::clone(&self.entries);
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let result = request.await.map_err(Arc::new);
            if let Err(err) = &result {
                tracing::warn!(kind, key = ?task_key, error = %err, "fetch failed");
            }
            settle(&task_entries, &task_key, generation, &result);
            result
        });
        let abort = task.abort_handle();

        // A task that panicked never settled; record it so the key does not
        // stay in flight forever. Aborted tasks were already detached.
        let join_entries = Arc::clone(&self.entries);
        let future = async move {
            match task.await {
                Ok(result) => result,
                Err(join_err) => {
                    let result = Err(Arc::new(DataError::Cancelled));
                    if join_err.is_panic() {
                        settle(&join_entries, &key, generation, &result);
                    }
                    result
                }
            }
        }
        .boxed()
        .shared();

        entry.in_flight = Some(InFlight {
            generation,
            future: future.clone(),
            abort,
            pinned: false,
        });
        future
    }
}

fn lock_entries<K, V>(entries: &Entries<K, V>) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Writes `result` into the entry if `generation` is still its current fetch.
fn settle<K, V>(entries: &Entries<K, V>, key: &K, generation: u64, result: &FetchResult<V>)
where
    K: Eq + Hash,
    V: Clone,
{
    let mut map = lock_entries(entries);
    let Some(entry) = map.get_mut(key) else {
        return;
    };
    if !entry
        .in_flight
        .as_ref()
        .is_some_and(|f| f.generation == generation)
    {
        return;
    }
    entry.in_flight = None;
    entry.settled_at = Some(Instant::now());
    match result {
        Ok(value) => {
            entry.data = Some(value.clone());
            entry.error = None;
        }
        Err(err) => entry.error = Some(Arc::clone(err)),
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
