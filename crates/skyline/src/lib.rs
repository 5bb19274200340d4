//! Skyline - A deterministic 3D layout engine for organization hierarchies.
//!
//! Skyline computes non-overlapping positions for a three-level hierarchy of
//! domains, teams and services, and caches the result with explicit
//! schema-version and TTL invalidation.
//!
//! - Domains are placed on a uniform grid on the ground plane.
//! - Teams are packed row by row inside their domain's box.
//! - Services are stacked vertically above their team.
//!
//! Entity data is read through [`store::EntityStore`]; cached layouts are kept
//! in any [`cache::CacheStore`].

pub mod cache;
pub mod clock;
pub mod config;
pub mod layout;
pub mod store;

mod error;

pub use skyline_core::{geometry, item, positions};

pub use error::SkylineError;

use std::sync::Arc;

use log::{debug, info};

use cache::{CacheState, CacheStore, LayoutCache};
use clock::Clock;
use config::AppConfig;
use layout::LayoutOrchestrator;
use positions::LayoutPositions;
use store::EntityStore;

/// Entry point for computing, caching and invalidating layouts.
///
/// A service ties together the entity store it reads from, the orchestrator
/// that places entities, and the cache that remembers the last result.
///
/// # Examples
///
/// ```rust
/// use skyline::{
///     LayoutService,
///     cache::MemoryCacheStore,
///     config::AppConfig,
///     item::LayoutItem,
///     store::InMemoryEntityStore,
/// };
///
/// let mut entities = InMemoryEntityStore::new();
/// entities.add_domain(LayoutItem::new("payments", "Payments"));
/// entities.add_team("payments", LayoutItem::new("checkout", "Checkout"));
/// entities.add_service("checkout", LayoutItem::new("cart", "Cart API"));
///
/// let service = LayoutService::from_config(&AppConfig::default(), entities, MemoryCacheStore::new())
///     .expect("default config is valid");
///
/// // First call computes and caches, second call is served from the cache.
/// let layout = service.get_layout().expect("layout");
/// assert_eq!(layout.services().len(), 1);
/// assert_eq!(service.get_layout().expect("layout"), layout);
/// ```
pub struct LayoutService<S, C> {
    orchestrator: LayoutOrchestrator,
    entities: S,
    cache: LayoutCache<C>,
}

impl<S: EntityStore, C: CacheStore> LayoutService<S, C> {
    /// Create a service from its parts.
    ///
    /// # Arguments
    ///
    /// * `orchestrator` - Placement constants and hierarchy walk
    /// * `entities` - Source of domains, teams and services
    /// * `cache` - Cache the computed layout is stored in
    pub fn new(orchestrator: LayoutOrchestrator, entities: S, cache: LayoutCache<C>) -> Self {
        Self {
            orchestrator,
            entities,
            cache,
        }
    }

    /// Create a service configured from an [`AppConfig`], using the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Config`] if the configuration is invalid.
    pub fn from_config(config: &AppConfig, entities: S, store: C) -> Result<Self, SkylineError> {
        config.validate()?;

        let orchestrator = LayoutOrchestrator::from_config(config.layout());
        let cache = LayoutCache::new(store).with_ttl(config.cache().ttl()?);

        Ok(Self::new(orchestrator, entities, cache))
    }

    /// Replace the clock used to stamp and expire cache entries (builder style)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.cache = self.cache.with_clock(clock);
        self
    }

    /// Returns the entity store
    pub fn entities(&self) -> &S {
        &self.entities
    }

    /// Returns the layout cache
    pub fn cache(&self) -> &LayoutCache<C> {
        &self.cache
    }

    /// Return the cached layout, computing and caching a fresh one on a miss.
    ///
    /// A missing, expired, or version-mismatched entry is a miss.
    ///
    /// # Errors
    ///
    /// Returns `SkylineError` if the cache or the entity store cannot be read,
    /// or if the fresh layout cannot be written.
    pub fn get_layout(&self) -> Result<LayoutPositions, SkylineError> {
        if let Some(positions) = self.cache.get()? {
            debug!(entities = positions.len(); "Serving cached layout");
            return Ok(positions);
        }

        self.compute_layout()
    }

    /// Compute the layout from the entity store regardless of cache state,
    /// then store it in the cache.
    ///
    /// # Errors
    ///
    /// Returns `SkylineError` if the entity store cannot be read or the cache
    /// cannot be written. Nothing is cached when the computation fails.
    pub fn compute_layout(&self) -> Result<LayoutPositions, SkylineError> {
        info!("Recomputing layout");

        let positions = self.orchestrator.compute(&self.entities)?;
        self.cache.put(&positions)?;

        Ok(positions)
    }

    /// Delete the cached layout so the next [`get_layout`](Self::get_layout)
    /// recomputes.
    ///
    /// # Errors
    ///
    /// Returns `SkylineError` if the cache store fails.
    pub fn invalidate_layout_cache(&self) -> Result<(), SkylineError> {
        self.cache.invalidate()?;
        Ok(())
    }

    /// Report the state of the cached layout without changing it.
    ///
    /// # Errors
    ///
    /// Returns `SkylineError` if the cache store cannot be read.
    pub fn cache_state(&self) -> Result<CacheState, SkylineError> {
        Ok(self.cache.state()?)
    }
}
