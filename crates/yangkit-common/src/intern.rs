//! Weak intern tables.
//!
//! A table maps a key to a `Weak` handle, so interned values are shared while
//! somebody holds them and are reclaimed afterwards. Tables live for the whole
//! process; dead entries are purged every [`PURGE_INTERVAL`] insertions.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tracing::trace;

/// Number of insertions between opportunistic purges of dead entries.
pub const PURGE_INTERVAL: usize = 1024;

/// Values that can be replaced by a shared, deduplicated instance.
pub trait Interned: Sized {
    /// Returns the shared instance equal to `self`.
    fn intern(&self) -> Arc<Self>;
}

/// Concurrent table of weakly held values.
#[derive(Debug)]
pub struct WeakInterner<K: Eq + Hash, V> {
    table: DashMap<K, Weak<V>>,
    inserts: AtomicUsize,
}

impl<K: Eq + Hash + Debug, V> WeakInterner<K, V> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
            inserts: AtomicUsize::new(0),
        }
    }

    /// Returns the live value for `key`, or stores and returns `make()`.
    pub fn intern_with(&self, key: K, make: impl FnOnce() -> V) -> Arc<V> {
        // Fast path: live entry
        if let Some(existing) = self.table.get(&key).and_then(|entry| entry.upgrade()) {
            return existing;
        }

        let mut entry = self.table.entry(key).or_insert_with(Weak::new);
        if let Some(existing) = entry.upgrade() {
            return existing;
        }
        trace!(key = ?entry.key(), "interning new value");
        let shared = Arc::new(make());
        *entry = Arc::downgrade(&shared);
        drop(entry);

        if self.inserts.fetch_add(1, Ordering::Relaxed) % PURGE_INTERVAL == PURGE_INTERVAL - 1 {
            self.purge();
        }
        shared
    }

    /// Drops entries whose value is no longer referenced; returns how many.
    pub fn purge(&self) -> usize {
        let before = self.table.len();
        self.table.retain(|_, handle| handle.strong_count() > 0);
        let purged = before.saturating_sub(self.table.len());
        if purged > 0 {
            trace!(purged, "purged dead intern entries");
        }
        purged
    }

    /// Number of entries, live or dead.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<K: Eq + Hash + Debug, V> Default for WeakInterner<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
