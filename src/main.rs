//! EDS Alert CLI - inspect the helpers behind the speed-camera alert app
//!
//! Computes distances and bearings, formats speeds and durations, and reads
//! or writes the app's namespaced storage from the terminal.

use std::io;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use edsalert::cli::{self, Cli};

/// Logs go to stderr so command output stays clean
fn init_tracing() {
    // RUST_LOG controls the level, e.g. RUST_LOG=edsalert=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Cli::parse();
    let config = cli::load_config(&args)?;
    let output = cli::execute(&args, &config)?;

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
