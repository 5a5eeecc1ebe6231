//! Query result cache with tag-based invalidation
//!
//! Entries are keyed by (operation, argument). Each entry remembers the tags its
//! query provides; invalidating a tag marks every entry carrying it stale so the
//! next observer refetches. Values are shared immutable snapshots.
//!
//! The lock is only held for bookkeeping. Network calls happen between
//! [`QueryCache::begin`] and [`QueryCache::complete`] / [`QueryCache::fail`],
//! and a generation counter keeps a fetch that raced an invalidation from
//! marking its entry fresh. Observers arriving while a fetch is in flight wait
//! for its result instead of fetching again.

use parking_lot::RwLock;
use serde::Serialize;
use std::{
    any::Any,
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};
use tokio::sync::watch;

use super::tags::Tag;

/// Type-erased cached value
pub type Snapshot = std::sync::Arc<dyn Any + Send + Sync>;

/// Key for cache lookups: operation name plus canonical JSON of the argument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: &'static str,
    argument: String,
}

impl CacheKey {
    pub fn new<A: Serialize + ?Sized>(operation: &'static str, argument: &A) -> Self {
        Self {
            operation,
            argument: serde_json::to_string(argument).unwrap_or_default(),
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.operation, self.argument)
    }
}

/// Per-query lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// Never requested
    Idle,
    Loading,
    Success,
    Error,
    /// Invalidated; the next access refetches
    Stale,
}

/// Result of a finished fetch, broadcast to the observers that waited on it
#[derive(Clone)]
pub enum Landed {
    Value(Snapshot),
    Failed(String),
}

/// Fetch in progress for one key; completing or failing it wakes the waiters.
/// Dropping it unfinished lets the waiters start their own fetch.
pub struct Flight {
    id: u64,
    generation: u64,
    landed: watch::Sender<Option<Landed>>,
}

impl Flight {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct InFlight {
    id: u64,
    landed: watch::Receiver<Option<Landed>>,
}

/// Entry stored in the cache
pub struct CacheEntry {
    pub value: Option<Snapshot>,
    pub status: QueryStatus,
    pub tags: HashSet<Tag>,
    /// Bumped on every invalidation
    pub generation: u64,
    pub last_error: Option<String>,
    pub fetched_at: Option<Instant>,
    inflight: Option<InFlight>,
}

impl CacheEntry {
    fn new(tags: &[Tag]) -> Self {
        Self {
            value: None,
            status: QueryStatus::Idle,
            tags: tags.iter().copied().collect(),
            generation: 0,
            last_error: None,
            fetched_at: None,
            inflight: None,
        }
    }
}

/// Outcome of [`QueryCache::begin`]
pub enum Begin {
    /// Fresh value; no fetch needed
    Hit(Snapshot),
    /// Caller must fetch and report back through the flight
    Fetch(Flight),
    /// Another caller is fetching; wait for it to land
    Wait(watch::Receiver<Option<Landed>>),
}

#[derive(Default)]
struct Inner {
    entries: HashMap<CacheKey, CacheEntry>,
    tag_index: HashMap<Tag, HashSet<CacheKey>>,
    next_flight: u64,
}

/// Thread-safe query cache
#[derive(Default)]
pub struct QueryCache {
    inner: RwLock<Inner>,
    stats: CacheStats,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an access: returns the cached value when fresh, otherwise marks the
    /// entry loading and hands out the flight the caller must land, or the
    /// flight already running for the key.
    pub fn begin(&self, key: &CacheKey, tags: &[Tag]) -> Begin {
        let mut inner = self.inner.write();

        if let Some(entry) = inner.entries.get(key) {
            match (&entry.status, &entry.value, &entry.inflight) {
                (QueryStatus::Success, Some(value), _) => {
                    self.stats.record_hit();
                    tracing::debug!("cache hit: {}", key);
                    return Begin::Hit(value.clone());
                }
                // a flight whose fetcher went away is abandoned
                (QueryStatus::Loading, _, Some(flight)) if flight.landed.has_changed().is_ok() => {
                    self.stats.record_shared();
                    tracing::debug!("joining in-flight fetch: {}", key);
                    return Begin::Wait(flight.landed.clone());
                }
                _ => {}
            }
        }

        self.stats.record_miss();
        tracing::debug!("cache miss: {}", key);
        Begin::Fetch(Self::mark_loading(&mut inner, key, tags))
    }

    /// Start a fetch unconditionally, ignoring any fresh value or running fetch
    pub fn begin_refetch(&self, key: &CacheKey, tags: &[Tag]) -> Flight {
        let mut inner = self.inner.write();
        tracing::debug!("forced refetch: {}", key);
        Self::mark_loading(&mut inner, key, tags)
    }

    fn mark_loading(inner: &mut Inner, key: &CacheKey, tags: &[Tag]) -> Flight {
        inner.next_flight += 1;
        let id = inner.next_flight;
        let (landed, receiver) = watch::channel(None);

        for tag in tags {
            inner.tag_index.entry(*tag).or_default().insert(key.clone());
        }
        let entry = inner
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(tags));
        entry.tags.extend(tags.iter().copied());
        entry.status = QueryStatus::Loading;
        entry.inflight = Some(InFlight {
            id,
            landed: receiver,
        });

        Flight {
            id,
            generation: entry.generation,
            landed,
        }
    }

    /// Detach a finished flight from its entry. Returns `false` when a newer
    /// fetch has taken over the entry; that fetch owns the status.
    fn land(entry: &mut CacheEntry, flight: &Flight) -> bool {
        match &entry.inflight {
            Some(current) if current.id == flight.id => {
                entry.inflight = None;
                true
            }
            Some(_) => false,
            None => true,
        }
    }

    /// Store a fetched value. Last write wins; a fetch from an older generation
    /// still stores its value but leaves the entry stale.
    pub fn complete(&self, key: &CacheKey, flight: Flight, value: Snapshot) {
        {
            let mut inner = self.inner.write();
            if let Some(entry) = inner.entries.get_mut(key) {
                let owns_status = Self::land(entry, &flight);
                entry.value = Some(value.clone());
                entry.fetched_at = Some(Instant::now());
                entry.last_error = None;
                if owns_status {
                    entry.status = if entry.generation == flight.generation {
                        QueryStatus::Success
                    } else {
                        tracing::debug!("fetch for {} raced an invalidation, keeping it stale", key);
                        QueryStatus::Stale
                    };
                }
            }
        }
        flight.landed.send_replace(Some(Landed::Value(value)));
    }

    /// Record a failed fetch; the previous value, if any, is kept
    pub fn fail(&self, key: &CacheKey, flight: Flight, message: impl Into<String>) {
        self.stats.record_error();
        let message = message.into();
        {
            let mut inner = self.inner.write();
            if let Some(entry) = inner.entries.get_mut(key) {
                let owns_status = Self::land(entry, &flight);
                entry.last_error = Some(message.clone());
                if owns_status {
                    entry.status = if entry.generation == flight.generation {
                        QueryStatus::Error
                    } else {
                        QueryStatus::Stale
                    };
                }
            }
        }
        flight.landed.send_replace(Some(Landed::Failed(message)));
    }

    /// Mark every entry whose tags intersect `tags` stale. Returns how many
    /// entries were affected.
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        let mut inner = self.inner.write();

        let keys: HashSet<CacheKey> = tags
            .iter()
            .filter_map(|tag| inner.tag_index.get(tag))
            .flatten()
            .cloned()
            .collect();

        let mut count = 0;
        for key in &keys {
            if let Some(entry) = inner.entries.get_mut(key) {
                entry.generation += 1;
                if entry.status != QueryStatus::Idle {
                    entry.status = QueryStatus::Stale;
                }
                count += 1;
            }
        }
        drop(inner);

        self.stats.record_invalidations(count as u64);
        tracing::debug!("invalidated {} entries for tags {:?}", count, tags);
        count
    }

    /// Current lifecycle state of a key
    pub fn status(&self, key: &CacheKey) -> QueryStatus {
        self.inner
            .read()
            .entries
            .get(key)
            .map(|e| e.status)
            .unwrap_or(QueryStatus::Idle)
    }

    /// Last stored value regardless of freshness
    pub fn value(&self, key: &CacheKey) -> Option<Snapshot> {
        self.inner.read().entries.get(key).and_then(|e| e.value.clone())
    }

    /// Message of the last failed fetch, cleared by the next success
    pub fn last_error(&self, key: &CacheKey) -> Option<String> {
        self.inner
            .read()
            .entries
            .get(key)
            .and_then(|e| e.last_error.clone())
    }

    /// Drop everything
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.tag_index.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            entries: self.len() as u64,
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            invalidations: self.stats.invalidations.load(Ordering::Relaxed),
            shared: self.stats.shared.load(Ordering::Relaxed),
            errors: self.stats.errors.load(Ordering::Relaxed),
        }
    }
}

/// Counters for cache monitoring
#[derive(Debug, Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
    /// Accesses that joined a fetch already in flight
    shared: AtomicU64,
    errors: AtomicU64,
}

impl CacheStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_invalidations(&self, count: u64) {
        self.invalidations.fetch_add(count, Ordering::Relaxed);
    }

    fn record_shared(&self) {
        self.shared.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time copy of the cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub shared: u64,
    pub errors: u64,
}
