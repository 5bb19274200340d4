//! Versioned, expiring storage for computed layouts.
//!
//! [`LayoutCache`] sits between the layout service and a keyed
//! [`CacheStore`]. It stamps every write with [`CURRENT_LAYOUT_VERSION`] and an
//! expiry time, and refuses to hand back entries that are expired or were
//! written by a different placement version. Such entries are reported as a
//! plain miss, never as an error.
//!
//! # Entry states
//!
//! ```text
//!   Absent ──put──► Valid ──time──► Expired
//!     ▲               │
//!     │               └──version bump──► StaleVersion
//!     └──────────── invalidate (from any state)
//! ```
//!
//! `put` moves any state to `Valid`.

mod entry;
mod file;
mod memory;

pub use entry::{CacheEntry, CacheMetadata};
pub use file::FileCacheStore;
pub use memory::MemoryCacheStore;

use std::{io, sync::Arc};

use chrono::TimeDelta;
use log::{debug, info, warn};
use thiserror::Error;

use skyline_core::positions::LayoutPositions;

use crate::clock::{Clock, SystemClock};

/// Version of the placement algorithms that produced a cached layout.
///
/// Bump this whenever a placer or a placement constant changes so that
/// layouts computed by older code are recomputed instead of served.
pub const CURRENT_LAYOUT_VERSION: u32 = 1;

/// Key of the single layout entry used today.
pub const LAYOUT_CACHE_KEY: &str = "layout_all";

/// Layout type recorded for the full-hierarchy layout.
pub const LAYOUT_TYPE_ALL: &str = "all";

/// Errors reported by a cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to persist cache document: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Invalid cache key `{0}`")]
    InvalidKey(String),

    #[error("Cache store lock poisoned")]
    Poisoned,
}

/// Keyed storage for [`CacheEntry`] values.
///
/// Implementations synchronize internally so a store can be shared between
/// threads; every write of an entry is a single atomic replacement.
pub trait CacheStore {
    /// Fetches the entry stored under `key`, if any.
    fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Inserts or replaces the entry under `entry.cache_key()`.
    ///
    /// When an entry is replaced its original creation time is kept.
    fn upsert_entry(&self, entry: CacheEntry) -> Result<(), CacheError>;

    /// Removes the entry under `key`. Removing a missing entry succeeds.
    fn delete_entry(&self, key: &str) -> Result<(), CacheError>;
}

impl<T: CacheStore + ?Sized> CacheStore for Arc<T> {
    fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        (**self).read_entry(key)
    }

    fn upsert_entry(&self, entry: CacheEntry) -> Result<(), CacheError> {
        (**self).upsert_entry(entry)
    }

    fn delete_entry(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete_entry(key)
    }
}

impl<T: CacheStore + ?Sized> CacheStore for Box<T> {
    fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        (**self).read_entry(key)
    }

    fn upsert_entry(&self, entry: CacheEntry) -> Result<(), CacheError> {
        (**self).upsert_entry(entry)
    }

    fn delete_entry(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete_entry(key)
    }
}

/// Classification of the stored entry for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing is stored, or the stored document cannot be decoded.
    Absent,
    /// The entry is current and unexpired.
    Valid,
    /// The entry's expiry time has passed.
    Expired,
    /// The entry was written by a different placement version.
    StaleVersion,
}

impl CacheState {
    /// Returns true if an entry in this state may be served
    pub fn is_usable(self) -> bool {
        self == CacheState::Valid
    }
}

/// Validity rules layered over a [`CacheStore`].
///
/// # Examples
///
/// ```
/// # use skyline::cache::{CacheState, LayoutCache, MemoryCacheStore};
/// # use skyline_core::positions::LayoutPositions;
/// let cache = LayoutCache::new(MemoryCacheStore::new());
/// assert!(cache.get().unwrap().is_none());
///
/// cache.put(&LayoutPositions::new()).unwrap();
/// assert_eq!(cache.state().unwrap(), CacheState::Valid);
///
/// cache.invalidate().unwrap();
/// assert_eq!(cache.state().unwrap(), CacheState::Absent);
/// ```
pub struct LayoutCache<C> {
    store: C,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    key: String,
    version: u32,
}

impl<C: CacheStore> LayoutCache<C> {
    /// Creates a cache over `store` with a one hour TTL and the system clock.
    pub fn new(store: C) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ttl: TimeDelta::hours(1),
            key: LAYOUT_CACHE_KEY.to_string(),
            version: CURRENT_LAYOUT_VERSION,
        }
    }

    /// Set the lifetime of written entries
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the key this cache reads and writes
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the version stamped on writes and required on reads.
    ///
    /// Defaults to [`CURRENT_LAYOUT_VERSION`].
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Returns the underlying store
    pub fn store(&self) -> &C {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns the cached layout if the entry is present, current and unexpired.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be read. An undecodable
    /// document is logged and treated as a miss.
    pub fn get(&self) -> Result<Option<LayoutPositions>, CacheError> {
        let (state, entry) = self.classify()?;
        match (state, entry) {
            (CacheState::Valid, Some(entry)) => {
                info!(cache_key = self.key; "Layout cache hit");
                Ok(Some(entry.into_positions()))
            }
            _ => {
                info!(cache_key = self.key, state:? = state; "Layout cache miss");
                Ok(None)
            }
        }
    }

    /// Stores `positions`, stamping the current version and a fresh expiry.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails.
    pub fn put(&self, positions: &LayoutPositions) -> Result<(), CacheError> {
        let now = self.clock.now();
        let entry = CacheEntry::new(
            self.key.as_str(),
            LAYOUT_TYPE_ALL,
            positions.clone(),
            self.version,
            now,
            self.ttl,
        );
        let expires_at = entry.expires_at();

        self.store.upsert_entry(entry)?;

        debug!(
            cache_key = self.key,
            version = self.version,
            expires_at:% = expires_at;
            "Layout cached"
        );
        Ok(())
    }

    /// Deletes the entry; the next [`get`](Self::get) is a miss.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the delete fails.
    pub fn invalidate(&self) -> Result<(), CacheError> {
        self.store.delete_entry(&self.key)?;
        info!(cache_key = self.key; "Layout cache invalidated");
        Ok(())
    }

    /// Classifies the stored entry without modifying it.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be read.
    pub fn state(&self) -> Result<CacheState, CacheError> {
        self.classify().map(|(state, _)| state)
    }

    fn classify(&self) -> Result<(CacheState, Option<CacheEntry>), CacheError> {
        let entry = match self.store.read_entry(&self.key) {
            Ok(entry) => entry,
            Err(CacheError::Serialization(err)) => {
                warn!(cache_key = self.key, err:%; "Ignoring undecodable cache entry");
                None
            }
            Err(err) => return Err(err),
        };

        let state = match &entry {
            None => CacheState::Absent,
            Some(entry) if entry.metadata().version() != self.version => CacheState::StaleVersion,
            Some(entry) if entry.is_expired_at(self.clock.now()) => CacheState::Expired,
            Some(_) => CacheState::Valid,
        };
        debug!(cache_key = self.key, state:? = state; "Classified layout cache entry");

        Ok((state, entry))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use skyline_core::geometry::Position3D;

    use super::*;
    use crate::clock::ManualClock;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn sample_positions() -> LayoutPositions {
        let mut positions = LayoutPositions::new();
        positions.insert_domain("d1", Position3D::new(0.0, 0.0, 0.0));
        positions.insert_team("t1", Position3D::new(0.0, 0.0, 5.0));
        positions.insert_service("s1", Position3D::new(20.0, 20.0, 15.0));
        positions
    }

    fn cache_with_clock() -> (LayoutCache<MemoryCacheStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = LayoutCache::new(MemoryCacheStore::new()).with_clock(clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_cold_cache_misses() {
        let (cache, _) = cache_with_clock();
        assert_eq!(cache.state().unwrap(), CacheState::Absent);
        assert!(cache.get().unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let (cache, _) = cache_with_clock();
        cache.put(&sample_positions()).unwrap();

        assert_eq!(cache.state().unwrap(), CacheState::Valid);
        assert_eq!(cache.get().unwrap(), Some(sample_positions()));
    }

    #[test]
    fn test_put_stamps_version_and_expiry() {
        let (cache, _) = cache_with_clock();
        cache.put(&sample_positions()).unwrap();

        let entry = cache.store().read_entry(LAYOUT_CACHE_KEY).unwrap().unwrap();
        assert_eq!(entry.cache_key(), LAYOUT_CACHE_KEY);
        assert_eq!(entry.layout_type(), LAYOUT_TYPE_ALL);
        assert_eq!(entry.metadata().version(), CURRENT_LAYOUT_VERSION);
        assert_eq!(entry.updated_at(), start());
        assert_eq!(entry.expires_at(), start() + TimeDelta::hours(1));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.put(&sample_positions()).unwrap();

        clock.advance(TimeDelta::minutes(59));
        assert_eq!(cache.state().unwrap(), CacheState::Valid);

        clock.advance(TimeDelta::minutes(1));
        assert_eq!(cache.state().unwrap(), CacheState::Expired);
        assert!(cache.get().unwrap().is_none());
    }

    #[test]
    fn test_put_refreshes_expired_entry() {
        let (cache, clock) = cache_with_clock();
        cache.put(&sample_positions()).unwrap();
        clock.advance(TimeDelta::hours(2));
        cache.put(&sample_positions()).unwrap();

        let entry = cache.store().read_entry(LAYOUT_CACHE_KEY).unwrap().unwrap();
        assert_eq!(entry.created_at(), start());
        assert_eq!(entry.updated_at(), start() + TimeDelta::hours(2));
        assert_eq!(cache.state().unwrap(), CacheState::Valid);
    }

    #[test]
    fn test_stale_version_misses() {
        let (cache, _) = cache_with_clock();
        let stale = CacheEntry::new(
            LAYOUT_CACHE_KEY,
            LAYOUT_TYPE_ALL,
            sample_positions(),
            CURRENT_LAYOUT_VERSION + 1,
            start(),
            TimeDelta::hours(1),
        );
        cache.store().upsert_entry(stale).unwrap();

        assert_eq!(cache.state().unwrap(), CacheState::StaleVersion);
        assert!(cache.get().unwrap().is_none());
    }

    #[test]
    fn test_version_is_checked_before_expiry() {
        let (cache, clock) = cache_with_clock();
        cache.put(&sample_positions()).unwrap();
        clock.advance(TimeDelta::hours(3));

        let bumped = LayoutCache::new(MemoryCacheStore::new())
            .with_clock(clock.clone())
            .with_version(CURRENT_LAYOUT_VERSION + 1);
        bumped
            .store()
            .upsert_entry(cache.store().read_entry(LAYOUT_CACHE_KEY).unwrap().unwrap())
            .unwrap();

        assert_eq!(bumped.state().unwrap(), CacheState::StaleVersion);
    }

    #[test]
    fn test_invalidate() {
        let (cache, _) = cache_with_clock();
        cache.put(&sample_positions()).unwrap();
        cache.invalidate().unwrap();

        assert_eq!(cache.state().unwrap(), CacheState::Absent);
        assert!(cache.get().unwrap().is_none());
    }

    #[test]
    fn test_custom_key_and_ttl() {
        let clock = Arc::new(ManualClock::new(start()));
        let store = Arc::new(MemoryCacheStore::new());
        let cache = LayoutCache::new(store.clone())
            .with_clock(clock.clone())
            .with_key("layout_domains")
            .with_ttl(TimeDelta::minutes(5));

        cache.put(&sample_positions()).unwrap();

        assert!(store.read_entry(LAYOUT_CACHE_KEY).unwrap().is_none());
        let entry = store.read_entry("layout_domains").unwrap().unwrap();
        assert_eq!(entry.expires_at(), start() + TimeDelta::minutes(5));
        assert_eq!(cache.key(), "layout_domains");
        assert_eq!(cache.ttl(), TimeDelta::minutes(5));
    }

    #[test]
    fn test_usable_states() {
        assert!(CacheState::Valid.is_usable());
        assert!(!CacheState::Absent.is_usable());
        assert!(!CacheState::Expired.is_usable());
        assert!(!CacheState::StaleVersion.is_usable());
    }
}
