//! Configuration types for the Skyline layout engine.
//!
//! This module provides configuration structures that control placement
//! constants and cache behavior. All types implement [`serde::Deserialize`]
//! for loading from external sources; every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and cache settings.
//! - [`LayoutConfig`] - Spacing and footprint constants used by the placers.
//! - [`CacheConfig`] - Time-to-live and optional on-disk location of the layout cache.
//!
//! # Example
//!
//! ```
//! # use skyline::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().domain_spacing(), 150.0);
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::Deserialize;

use skyline_core::geometry::Size3D;

use crate::error::SkylineError;

/// Top-level configuration combining layout and cache settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Cache configuration section.
    #[serde(default)]
    cache: CacheConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, cache: CacheConfig) -> Self {
        Self { layout, cache }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the cache configuration.
    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    /// Checks that the configured constants can produce a valid layout.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Config`] if a spacing is not positive, if the
    /// domain spacing is smaller than the domain footprint (grid cells would
    /// overlap), or if the TTL is zero or out of range.
    pub fn validate(&self) -> Result<(), SkylineError> {
        self.layout.validate()?;
        self.cache.ttl()?;
        Ok(())
    }
}

/// Spacing and footprint constants used by the placers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance between neighbouring domain grid cells.
    domain_spacing: f32,

    /// Vertical gap between stacked services.
    service_spacing: f32,

    /// Box allocated to every domain, anchored at its grid position.
    domain_footprint: Size3D,

    /// Box allocated to every team, anchored at its packed position.
    team_footprint: Size3D,

    /// Log a warning for every pair of sibling teams whose boxes collide.
    verify: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            domain_spacing: 150.0,
            service_spacing: 10.0,
            domain_footprint: Size3D::new(100.0, 100.0, 50.0),
            team_footprint: Size3D::new(40.0, 40.0, 50.0),
            verify: false,
        }
    }
}

impl LayoutConfig {
    pub fn domain_spacing(&self) -> f32 {
        self.domain_spacing
    }

    pub fn service_spacing(&self) -> f32 {
        self.service_spacing
    }

    pub fn domain_footprint(&self) -> Size3D {
        self.domain_footprint
    }

    pub fn team_footprint(&self) -> Size3D {
        self.team_footprint
    }

    pub fn verify(&self) -> bool {
        self.verify
    }

    /// Sets the domain grid spacing (builder style)
    pub fn with_domain_spacing(mut self, spacing: f32) -> Self {
        self.domain_spacing = spacing;
        self
    }

    /// Sets the service stacking gap (builder style)
    pub fn with_service_spacing(mut self, spacing: f32) -> Self {
        self.service_spacing = spacing;
        self
    }

    /// Enables or disables overlap verification (builder style)
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    fn validate(&self) -> Result<(), SkylineError> {
        if self.domain_spacing.is_nan() || self.domain_spacing <= 0.0 {
            return Err(SkylineError::Config(format!(
                "domain_spacing must be positive, got {}",
                self.domain_spacing
            )));
        }
        if self.service_spacing.is_nan() || self.service_spacing <= 0.0 {
            return Err(SkylineError::Config(format!(
                "service_spacing must be positive, got {}",
                self.service_spacing
            )));
        }
        let footprint = self.domain_footprint;
        if self.domain_spacing < footprint.width() || self.domain_spacing < footprint.height() {
            return Err(SkylineError::Config(format!(
                "domain_spacing ({}) is smaller than the domain footprint ({} x {})",
                self.domain_spacing,
                footprint.width(),
                footprint.height()
            )));
        }
        Ok(())
    }
}

/// Cache behavior settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a stored layout, in seconds.
    ttl_secs: u64,

    /// Directory for the file-backed cache. When `None`, the caller picks a
    /// location; the `skyline` binary falls back to the platform cache
    /// directory.
    directory: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            directory: None,
        }
    }
}

impl CacheConfig {
    /// Creates a cache configuration with the given TTL and directory.
    pub fn new(ttl_secs: u64, directory: Option<PathBuf>) -> Self {
        Self {
            ttl_secs,
            directory,
        }
    }

    /// Returns the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Config`] if the TTL is zero or cannot be
    /// represented as a [`TimeDelta`].
    pub fn ttl(&self) -> Result<TimeDelta, SkylineError> {
        if self.ttl_secs == 0 {
            return Err(SkylineError::Config("ttl_secs must be positive".to_string()));
        }
        i64::try_from(self.ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| SkylineError::Config(format!("ttl_secs {} is out of range", self.ttl_secs)))
    }

    /// Returns the configured cache directory, if any.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().domain_spacing(), 150.0);
        assert_eq!(config.layout().service_spacing(), 10.0);
        assert_eq!(config.layout().domain_footprint(), Size3D::new(100.0, 100.0, 50.0));
        assert_eq!(config.layout().team_footprint(), Size3D::new(40.0, 40.0, 50.0));
        assert!(!config.layout().verify());
        assert_eq!(config.cache().ttl().unwrap(), TimeDelta::hours(1));
        assert!(config.cache().directory().is_none());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            service_spacing = 15.0

            [cache]
            directory = "/tmp/skyline"
            "#,
        )
        .unwrap();

        assert_eq!(config.layout().service_spacing(), 15.0);
        assert_eq!(config.layout().domain_spacing(), 150.0);
        assert_eq!(config.cache().ttl().unwrap(), TimeDelta::hours(1));
        assert_eq!(config.cache().directory(), Some(Path::new("/tmp/skyline")));
    }

    #[test]
    fn test_footprint_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            domain_spacing = 300.0
            domain_footprint = { width = 200.0, height = 200.0, depth = 80.0 }
            "#,
        )
        .unwrap();

        assert_eq!(config.layout().domain_footprint(), Size3D::new(200.0, 200.0, 80.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_spacing_below_footprint() {
        let layout = LayoutConfig::default().with_domain_spacing(80.0);
        let config = AppConfig::new(layout, CacheConfig::default());
        assert!(matches!(config.validate(), Err(SkylineError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_service_spacing() {
        let layout = LayoutConfig::default().with_service_spacing(0.0);
        let config = AppConfig::new(layout, CacheConfig::default());
        assert!(matches!(config.validate(), Err(SkylineError::Config(_))));
    }

    #[test]
    fn test_ttl_bounds() {
        assert!(CacheConfig::new(0, None).ttl().is_err());
        assert!(CacheConfig::new(u64::MAX, None).ttl().is_err());
        assert_eq!(CacheConfig::new(60, None).ttl().unwrap(), TimeDelta::minutes(1));
    }
}
