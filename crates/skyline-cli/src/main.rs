//! `skyline` binary entry point.

use std::process;

use clap::Parser;
use log::{debug, info};

use skyline_cli::{Args, error_adapter};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(args.log_level)
        .init();

    debug!(args:?; "Parsed arguments");

    // Reports go to stderr regardless of the log level.
    if let Err(err) = skyline_cli::run(&args) {
        eprintln!("{}", error_adapter::render(&err));
        process::exit(1);
    }

    info!(command:? = args.command; "Done");
}
