//! Basic logger usage example
//!
//! Demonstrates console output, minimum levels, strict mode and placeholders.
//!
//! Run with: cargo run --example basic_usage

use epilog::prelude::*;

fn main() -> Result<()> {
    println!("=== Epilog - Basic Usage Example ===\n");

    // Console logger at the lowest level
    let logger = Logger::with_channel(STDOUT_ADDRESS, "debug");

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.notice("This is a notice message")?;
    logger.warning("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.critical("This is a critical message")?;
    logger.alert("This is an alert message")?;
    logger.emergency("This is an emergency message")?;

    println!("\n2. Changing the minimum level:");
    logger.set_level("warning");
    println!("   Minimum level set to warning - debug to notice won't show:");
    logger.info("Info message (hidden)")?;
    logger.warning("Warning message (visible)")?;

    println!("\n3. Strict mode delivers one level only:");
    let strict = Logger::with_channel(STDOUT_ADDRESS, "=error");
    strict.warning("Warning message (hidden)")?;
    strict.error("Error message (visible)")?;
    strict.critical("Critical message (hidden)")?;

    println!("\n4. Placeholders and context:");
    let ctx = Context::new()
        .with("user", "alice")
        .with("attempts", 3)
        .with("roles", vec!["admin", "ops"]);
    logger.log("Login failed for {user} after {attempts} tries", &ctx, "error", None)?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
