//! Generated-stylesheet cache.
//!
//! Entries are keyed by a hash of the block type, the instance id and the
//! canonical form of the settings, so two settings trees that differ only in
//! key order share an entry. Each entry holds a [`OnceCell`]: concurrent
//! callers asking for the same missing key wait on one generation instead of
//! running their own. Failed generations leave nothing behind.

use fieldcss::SettingsTree;
use fieldcss::settings::canonicalize_tree;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(u64);

impl CacheKey {
    pub fn new(block_type: &str, instance_id: &str, settings: &SettingsTree) -> Self {
        let mut hasher = DefaultHasher::new();
        block_type.hash(&mut hasher);
        instance_id.hash(&mut hasher);
        canonicalize_tree(settings).hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

struct Slot<T> {
    block_type: String,
    created: Instant,
    cell: OnceCell<Arc<T>>,
}

impl<T> Slot<T> {
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.created.elapsed() >= ttl)
    }
}

pub struct StyleCache<T> {
    entries: RwLock<HashMap<CacheKey, Arc<Slot<T>>>>,
    ttl: Option<Duration>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<T> std::fmt::Debug for StyleCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .field("stats", &self.stats())
            .finish()
    }
}

impl<T> StyleCache<T> {
    /// A `capacity` of zero is treated as one.
    pub fn new(ttl: Option<Duration>, capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Returns the cached value for `key`, or runs `generate` to produce
    /// it. Only one caller runs `generate` for a given key at a time; the
    /// others wait and share its result. Errors are returned to the caller
    /// that ran `generate` and are not cached.
    pub fn get_or_generate<E>(
        &self,
        key: CacheKey,
        block_type: &str,
        generate: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        if let Some(value) = self.fresh(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::debug!("cache hit {:016x} ({})", key.0, block_type);
            return Ok(value);
        }

        let slot = self.slot(key, block_type);
        let mut generated = false;
        let result = slot.cell.get_or_try_init(|| {
            generated = true;
            self.misses.fetch_add(1, Ordering::Relaxed);
            log::debug!("cache miss {:016x} ({})", key.0, block_type);
            generate().map(Arc::new)
        });

        match result {
            Ok(value) => {
                if !generated {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    log::debug!("cache hit {:016x} ({}) after wait", key.0, block_type);
                }
                Ok(Arc::clone(value))
            }
            Err(err) => {
                self.discard(key, &slot);
                Err(err)
            }
        }
    }

    /// Drops the entry for `key`. Returns whether one existed.
    pub fn invalidate(&self, key: CacheKey) -> bool {
        let removed = self.write().remove(&key).is_some();
        if removed {
            log::debug!("cache invalidate {:016x}", key.0);
        }
        removed
    }

    /// Drops every entry generated for `block_type`. Returns how many.
    pub fn invalidate_block_type(&self, block_type: &str) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, slot| slot.block_type != block_type);
        let removed = before - entries.len();
        log::debug!("cache invalidate {} entries of `{}`", removed, block_type);
        removed
    }

    pub fn invalidate_all(&self) {
        self.write().clear();
        log::debug!("cache cleared");
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    fn fresh(&self, key: CacheKey) -> Option<Arc<T>> {
        let entries = self.read();
        let slot = entries.get(&key)?;
        if slot.is_expired(self.ttl) {
            return None;
        }
        slot.cell.get().cloned()
    }

    /// Finds or creates the slot for `key`, replacing an expired one and
    /// evicting the oldest entry when full.
    fn slot(&self, key: CacheKey, block_type: &str) -> Arc<Slot<T>> {
        let mut entries = self.write();
        if let Some(slot) = entries.get(&key) {
            if !slot.is_expired(self.ttl) {
                return Arc::clone(slot);
            }
            log::debug!("cache expired {:016x}", key.0);
            entries.remove(&key);
        }

        while entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, slot)| slot.created)
                .map(|(k, _)| *k);
            let Some(oldest) = oldest else { break };
            entries.remove(&oldest);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            log::debug!("cache evict {:016x}", oldest.0);
        }

        let slot = Arc::new(Slot {
            block_type: block_type.to_string(),
            created: Instant::now(),
            cell: OnceCell::new(),
        });
        entries.insert(key, Arc::clone(&slot));
        log::debug!("cache insert {:016x} ({})", key.0, block_type);
        slot
    }

    fn discard(&self, key: CacheKey, slot: &Arc<Slot<T>>) {
        let mut entries = self.write();
        let ours = entries
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && current.cell.get().is_none());
        if ours {
            entries.remove(&key);
        }
    }

    // A poisoned lock only means another thread panicked mid-update; the
    // map itself is still consistent.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<CacheKey, Arc<Slot<T>>>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<CacheKey, Arc<Slot<T>>>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
