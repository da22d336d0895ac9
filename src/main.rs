//! # tiered-log - Main Entry Point
//!
//! Run directly, the binary builds the logger for the current mode and
//! emits one record per level so a deployment's sinks can be checked by eye.
//! Given a message it logs just that message at `--level`.
//!
//! ## Exit Codes
//!
//! A failure to set up the log directory or its files exits with the OS
//! error code of the failing call. Other failures exit with 1.

use anyhow::{Context, Result};
use clap::Parser;
use tiered_log::{cli::Args, InitError, Logger, LoggerSettings};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    // The logger's own diagnostics go to stderr; RUST_LOG takes precedence
    let default_directive = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        match e.downcast_ref::<InitError>() {
            // Already carries its io error in the message
            Some(init) => {
                eprintln!("{}", init);
                std::process::exit(init.exit_code());
            }
            None => {
                eprintln!("{:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run(args: &Args) -> Result<()> {
    // Convert CLI arguments into logger settings
    let settings = LoggerSettings::from(args);
    debug!("Settings: {:?}", settings);

    // The plan only depends on the mode, so it can be shown without
    // creating the log directory or any file
    if args.show_plan {
        let plan = settings.resolve_mode().mode.sink_plan();
        let json = serde_json::to_string_pretty(&plan).context("Failed to serialize sink plan")?;
        println!("{}", json);
        return Ok(());
    }

    // Set up the log directory and open the sinks; failures here are fatal
    let logger = Logger::init(&settings)?;

    // A single message if one was given, otherwise one record per level
    match args.message {
        Some(ref message) => logger.log(args.level, message),
        None => logger.self_test(),
    }

    Ok(())
}
