//! File logging example
//!
//! Demonstrates routing levels to separate files alongside the console.
//!
//! Run with: cargo run --example file_logging

use epilog::prelude::*;

fn main() -> Result<()> {
    println!("=== Epilog - File Logging Example ===\n");

    let logger = Logger::builder()
        .level("debug")
        .channel("info", STDOUT_ADDRESS)
        .channel("debug", "application.log")
        .channel("=error", "errors.log")
        .default_context(Context::new().with("app", "file_logging"))
        .build();

    println!("1. Logging to console and files:");

    logger.info("Application started")?;
    logger.debug("Loading configuration...")?;
    logger.info("Configuration loaded successfully")?;
    logger.warning("Using default settings for some options")?;
    logger.error("Failed to load optional plugin")?;
    logger.info("Application initialization complete")?;

    println!("\n2. Performing some operations:");

    for i in 1..=5 {
        let ctx = Context::new().with("item", i);
        logger.log("Processing item {item}/5", &ctx, "info", None)?;
        if i == 3 {
            logger.log("Item {item} took longer than expected", &ctx, "warning", None)?;
        }
    }

    logger.info("All operations completed")?;
    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' and 'errors.log' for the file output");

    Ok(())
}
