//! Time-expiring in-memory cache for raw API response bodies
//!
//! `TimedCache` maps request URLs to the bytes returned for them. Creating a
//! cache spawns one background sweeper that removes entries older than the
//! TTL once per TTL period. `get` never hands out an entry older than the
//! TTL, even if the sweeper has not reached it yet.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Smallest period the sweeper will tick at
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(1);

/// A stored response body and when it was added
#[derive(Debug, Clone)]
struct CacheEntry {
    created_at: Instant,
    value: Vec<u8>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

type Store = Mutex<HashMap<String, CacheEntry>>;

/// Locks the store, recovering the map if a previous holder panicked.
///
/// Every critical section leaves the map consistent, so a poisoned lock
/// carries no partial mutation.
fn lock(store: &Store) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Thread-safe key to bytes cache with background time-based expiry
///
/// A single TTL governs every entry. The cache must be created inside a
/// Tokio runtime because it spawns its sweeper on construction. Share it
/// between clients with `Arc<TimedCache>`.
///
/// After [`TimedCache::close`] the sweeper stops; `add` and `get` keep
/// working on the map, `get` still hides entries older than the TTL and
/// `add` removes them.
#[derive(Debug)]
pub struct TimedCache {
    store: Arc<Store>,
    ttl: Duration,
    sweeps: Arc<AtomicU64>,
    shutdown_tx: Mutex<Option<mpsc::Sender<()>>>,
}

impl TimedCache {
    /// Creates an empty cache and starts its sweeper
    ///
    /// # Arguments
    /// * `ttl` - How long an entry stays valid; also the sweep period
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn new(ttl: Duration) -> Self {
        let store = Arc::new(Store::default());
        let sweeps = Arc::new(AtomicU64::new(0));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(sweep_loop(
            Arc::clone(&store),
            ttl,
            Arc::clone(&sweeps),
            shutdown_rx,
        ));
        debug!(ttl = ?ttl, "Started cache sweeper");

        Self {
            store,
            ttl,
            sweeps,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
        }
    }

    /// Inserts or overwrites the entry for `key`, stamping it with the current time
    ///
    /// Once the cache is closed, each `add` also drops entries older than the
    /// TTL, since no sweeper is left to do it.
    pub fn add(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let key = key.into();
        let now = Instant::now();
        let entry = CacheEntry {
            created_at: now,
            value: value.into(),
        };
        trace!(key = %key, bytes = entry.value.len(), "Cache add");

        let closed = self.is_closed();
        let mut store = lock(&self.store);
        if closed {
            store.retain(|_, entry| !entry.is_expired(now, self.ttl));
        }
        store.insert(key, entry);
    }

    /// Returns a copy of the value stored under `key`
    ///
    /// Returns `None` if the key is absent or its entry is older than the TTL.
    /// Stale entries are left for the sweeper to remove.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let now = Instant::now();
        let store = lock(&self.store);
        store
            .get(key)
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Number of entries currently stored, including stale ones not yet swept
    pub fn len(&self) -> usize {
        lock(&self.store).len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        lock(&self.store).is_empty()
    }

    /// The TTL this cache was created with
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of sweep passes completed so far
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Acquire)
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        lock_sender(&self.shutdown_tx).is_none()
    }

    /// Stops the background sweeper
    ///
    /// Only the first call has an effect. Dropping the cache also closes it.
    /// Stale entries stay in memory until the next `add` removes them.
    pub fn close(&self) {
        if let Some(tx) = lock_sender(&self.shutdown_tx).take() {
            // Dropping the sender ends the sweeper's `recv`
            drop(tx);
            debug!("Closing cache sweeper");
        }
    }
}

impl Drop for TimedCache {
    fn drop(&mut self) {
        self.close();
    }
}

fn lock_sender(
    sender: &Mutex<Option<mpsc::Sender<()>>>,
) -> MutexGuard<'_, Option<mpsc::Sender<()>>> {
    sender.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes every entry older than `ttl` and returns how many were removed
fn sweep(store: &Store, ttl: Duration) -> usize {
    let now = Instant::now();
    let mut store = lock(store);
    let before = store.len();
    store.retain(|_, entry| !entry.is_expired(now, ttl));
    before - store.len()
}

/// Background task: one sweep per period until the shutdown channel closes
///
/// Passes run inline in this single task, so they can never overlap. A pass
/// that overruns its period delays the next tick instead of bursting.
async fn sweep_loop(
    store: Arc<Store>,
    ttl: Duration,
    sweeps: Arc<AtomicU64>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    let mut interval = tokio::time::interval(ttl.max(MIN_SWEEP_PERIOD));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Skip the first tick (immediate)
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => {
                break;
            }
            _ = interval.tick() => {
                let removed = sweep(&store, ttl);
                sweeps.fetch_add(1, Ordering::Release);
                if removed > 0 {
                    debug!(removed, "Swept expired cache entries");
                }
            }
        }
    }

    debug!("Cache sweeper stopped");
}
