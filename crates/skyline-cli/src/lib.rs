//! CLI logic for the Skyline layout tool.
//!
//! This module wires command-line arguments to a [`LayoutService`] backed by
//! an organization file and a directory of cached layouts.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, LayoutArgs};

use std::{
    fs,
    io::{self, Write},
};

use log::info;

use skyline::{
    LayoutService, SkylineError,
    cache::FileCacheStore,
    config::AppConfig,
    positions::LayoutPositions,
    store::{EntityStore, InMemoryEntityStore},
};

/// Run the Skyline CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SkylineError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Organization loading errors
/// - Cache store errors
pub fn run(args: &Args) -> Result<(), SkylineError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Get(layout) => {
            let entities = config::load_organization(&layout.input)?;
            let service = build_service(args, &app_config, entities)?;
            let positions = service.get_layout()?;
            write_layout(&positions, layout.output.as_deref())
        }
        Command::Compute { layout, verify } => {
            let app_config = if *verify {
                AppConfig::new(
                    app_config.layout().clone().with_verify(true),
                    app_config.cache().clone(),
                )
            } else {
                app_config
            };

            let entities = config::load_organization(&layout.input)?;
            let service = build_service(args, &app_config, entities)?;
            let positions = service.compute_layout()?;
            write_layout(&positions, layout.output.as_deref())
        }
        Command::Invalidate => {
            let service = build_service(args, &app_config, InMemoryEntityStore::new())?;
            service.invalidate_layout_cache()?;
            info!("Layout cache invalidated");
            Ok(())
        }
        Command::Status => {
            let service = build_service(args, &app_config, InMemoryEntityStore::new())?;
            let state = service.cache_state()?;
            info!(state:?; "Layout cache inspected");
            writeln!(io::stdout().lock(), "{state:?}")?;
            Ok(())
        }
    }
}

fn build_service<S: EntityStore>(
    args: &Args,
    app_config: &AppConfig,
    entities: S,
) -> Result<LayoutService<S, FileCacheStore>, SkylineError> {
    let directory = config::cache_directory(args.cache_dir.as_deref(), app_config);
    info!(cache_dir = directory.display().to_string(); "Opening layout cache");

    let store = FileCacheStore::new(directory)?;
    LayoutService::from_config(app_config, entities, store)
}

/// Write the layout as pretty JSON to `output`, or to stdout when `None`
fn write_layout(positions: &LayoutPositions, output: Option<&str>) -> Result<(), SkylineError> {
    let json = serde_json::to_string_pretty(positions).map_err(io::Error::from)?;

    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!(output_file = path, entities = positions.len(); "Layout exported successfully");
        }
        None => writeln!(io::stdout().lock(), "{json}")?,
    }

    Ok(())
}
