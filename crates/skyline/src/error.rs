//! Error types for Skyline operations.
//!
//! This module provides the main error type [`SkylineError`] which wraps
//! the failures that can surface from the entity store, the cache store, or
//! configuration.

use std::io;

use thiserror::Error;

use crate::{cache::CacheError, store::StoreError};

/// The main error type for Skyline operations.
///
/// Stale or expired cache entries are never reported here; they are treated
/// as a cache miss and trigger recomputation.
#[derive(Debug, Error)]
pub enum SkylineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Entity store error: {0}")]
    Store(#[from] StoreError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Configuration error: {0}")]
    Config(String),
}
