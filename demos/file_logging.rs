//! Process-wide setup with the default sinks
//!
//! Installs the default facade logger (rotating JSON file under ./logs plus
//! the console) and logs through both the facade helpers and the `log` crate.
//!
//! Run with: cargo run --example file_logging

use logbridge::facade::{self, Attr};
use logbridge::Result;

fn main() -> Result<()> {
    println!("=== logbridge - File Logging Example ===\n");

    let logger = logbridge::init_default()?;

    facade::info("Application started", &[]);
    facade::debug("Loading configuration... (below the default gate)", &[]);
    facade::warn("Using default settings", &[Attr::new("config", "none")]);

    for i in 1..=5 {
        facade::info("Processing item", &[Attr::new("item", i), Attr::new("of", 5)]);
    }

    log::info!("Records from the log crate land in the same sinks");
    log::error!(code = 503; "Failed to load optional plugin");

    logger.sync()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check './logs/app.log' for the JSON output");
    Ok(())
}
