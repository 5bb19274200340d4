//! Command-line argument definitions for the Skyline CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the operation to run, the organization
//! file to lay out, configuration file selection, and logging verbosity.

use clap::{Parser, Subcommand};
use log::LevelFilter;

/// Command-line arguments for the Skyline layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding the layout cache, overriding the configuration
    #[arg(long, global = true)]
    pub cache_dir: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: LevelFilter,
}

/// Operation to perform
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the layout, computing it only when the cache has no valid entry
    Get(LayoutArgs),

    /// Recompute the layout and refresh the cache
    Compute {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Warn about sibling teams whose boxes collide
        #[arg(long)]
        verify: bool,
    },

    /// Delete the cached layout
    Invalidate,

    /// Report whether the cached layout is absent, valid, expired or stale
    Status,
}

/// Arguments shared by the operations that produce a layout
#[derive(clap::Args, Debug)]
pub struct LayoutArgs {
    /// Path to the organization file (TOML)
    #[arg(help = "Path to the organization file")]
    pub input: String,

    /// Path to the output JSON file; prints to stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,
}
