//! Basic facade usage
//!
//! Builds a console-only core logger, wraps it in the facade and shows level
//! gating, bound attributes and groups.
//!
//! Run with: cargo run --example basic_usage

use logbridge::prelude::*;

fn main() -> Result<()> {
    println!("=== logbridge - Basic Usage Example ===\n");

    let core = Logger::builder()
        .min_level(LogLevel::Debug)
        .appender(ConsoleAppender::new().with_colors(true))
        .build();
    let logger = StructuredHandler::new(core.clone()).into_facade();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message", &[]);
    logger.info("This is an info message", &[]);
    logger.warn("This is a warning message", &[]);
    logger.error("This is an error message", &[]);
    logger.log(Level(2), "A custom level is written as INFO", &[]);

    println!("\n2. Raising the gate to WARN:");
    core.set_level(LogLevel::Warn);
    logger.info("Info message (hidden)", &[]);
    logger.warn("Warning message (visible)", &[]);
    core.set_level(LogLevel::Info);

    println!("\n3. Attributes and groups:");
    let request = logger
        .with_group("http")
        .with(&[Attr::new("requestId", "abc123")]);
    request.info("request received", &[Attr::new("path", "/health")]);
    request.info(
        "request handled",
        &[
            Attr::new("status", 200),
            Attr::group("timing", vec![Attr::new("total_ms", 12.5)]),
        ],
    );

    core.sync()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
