//! The persisted form of a cached layout.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use skyline_core::positions::LayoutPositions;

/// Schema information stored alongside a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    version: u32,
}

impl CacheMetadata {
    pub fn version(&self) -> u32 {
        self.version
    }
}

/// One stored layout together with its validity stamps.
///
/// Serializes as
/// `{"cacheKey", "layoutType", "positions", "metadata": {"version"},
/// "createdAt", "updatedAt", "expiresAt"}` with RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    cache_key: String,
    layout_type: String,
    positions: LayoutPositions,
    metadata: CacheMetadata,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry written at `now` that expires after `ttl`.
    pub fn new(
        cache_key: impl Into<String>,
        layout_type: impl Into<String>,
        positions: LayoutPositions,
        version: u32,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            cache_key: cache_key.into(),
            layout_type: layout_type.into(),
            positions,
            metadata: CacheMetadata { version },
            created_at: now,
            updated_at: now,
            expires_at: now + ttl,
        }
    }

    /// Keeps the creation time of an entry this one replaces (builder style)
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn layout_type(&self) -> &str {
        &self.layout_type
    }

    pub fn positions(&self) -> &LayoutPositions {
        &self.positions
    }

    /// Consumes the entry, returning its layout
    pub fn into_positions(self) -> LayoutPositions {
        self.positions
    }

    pub fn metadata(&self) -> CacheMetadata {
        self.metadata
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// An entry is expired once `now` reaches its expiry time.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
