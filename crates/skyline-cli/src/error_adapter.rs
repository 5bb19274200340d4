//! Error adapter for converting SkylineError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use skyline::{SkylineError, cache::CacheError, store::StoreError};

/// Adapter presenting a [`SkylineError`] as a miette diagnostic.
///
/// Each error kind carries a stable code and, where one helps, a hint on
/// how to recover.
pub struct ErrorAdapter<'a>(pub &'a SkylineError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SkylineError::Io(_) => "skyline::io",
            SkylineError::Store(_) => "skyline::store",
            SkylineError::Cache(_) => "skyline::cache",
            SkylineError::Config(_) => "skyline::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            SkylineError::Io(_) => return None,
            SkylineError::Store(StoreError::DuplicateId(_)) => {
                "entity ids must be unique across domains, teams and services"
            }
            SkylineError::Store(StoreError::Backend(_)) => {
                "check that the organization file is valid TOML with an id and name per entity"
            }
            SkylineError::Cache(CacheError::InvalidKey(_)) => {
                "cache keys may only contain letters, digits, '-' and '_'"
            }
            SkylineError::Cache(_) => {
                "run `skyline invalidate` or remove the cache directory to start fresh"
            }
            SkylineError::Config(_) => {
                "see `[layout]` and `[cache]` in the configuration file, or pass --config"
            }
        };
        Some(Box::new(help))
    }
}

/// Wrap an error for rendering by miette
pub fn to_reportable(err: &SkylineError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

/// Render an error as a graphical miette report.
///
/// Falls back to the plain error message if the report cannot be drawn.
pub fn render(err: &SkylineError) -> String {
    let reporter = miette::GraphicalReportHandler::new();

    let mut writer = String::new();
    match reporter.render_report(&mut writer, &to_reportable(err)) {
        Ok(()) => writer,
        Err(_) => err.to_string(),
    }
}
