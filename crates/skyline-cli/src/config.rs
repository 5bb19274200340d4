//! Configuration and organization file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory),
//! and reading the organization document that feeds the layout.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use skyline::{
    SkylineError,
    config::AppConfig,
    store::{InMemoryEntityStore, Organization, StoreError},
};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for SkylineError {
    fn from(err: ConfigError) -> Self {
        SkylineError::Config(err.to_string())
    }
}

/// Platform-specific project directories for Skyline
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "skyline", "skyline")
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (skyline/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, SkylineError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("skyline/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = project_dirs() {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, SkylineError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

/// Resolve the directory holding the layout cache
///
/// Precedence: command-line override, then configuration, then the
/// platform cache directory, then `.skyline-cache` in the working directory.
pub fn cache_directory(override_dir: Option<&str>, config: &AppConfig) -> PathBuf {
    if let Some(dir) = override_dir {
        return PathBuf::from(dir);
    }
    if let Some(dir) = config.cache().directory() {
        return dir.to_path_buf();
    }
    project_dirs()
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".skyline-cache"))
}

/// Load an organization document and flatten it into an entity store
///
/// # Errors
///
/// Returns error if the file cannot be read, is not valid TOML, or reuses an
/// entity id.
pub fn load_organization(path: impl AsRef<Path>) -> Result<InMemoryEntityStore, SkylineError> {
    let path = path.as_ref();
    info!(path = path.display().to_string(); "Loading organization");

    let content = fs::read_to_string(path)?;
    let organization: Organization = toml::from_str(&content).map_err(StoreError::backend)?;

    Ok(InMemoryEntityStore::try_from(organization)?)
}
