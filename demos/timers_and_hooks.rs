//! Timers, hooks and the ring buffer
//!
//! Demonstrates named timers, scoped handles, a hook channel, a custom
//! formatter and reading lines back from the ring buffer.
//!
//! Run with: cargo run --example timers_and_hooks

use epilog::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Epilog - Timers and Hooks Example ===\n");

    let alerts = Arc::new(AtomicUsize::new(0));
    let alert_count = Arc::clone(&alerts);

    let logger = Logger::builder()
        .level("debug")
        .channel("debug", BUFFER_ADDRESS)
        .channel(
            "critical",
            Destination::hook(move |line, record| {
                alert_count.fetch_add(1, Ordering::Relaxed);
                eprint!("[page on-call] level={} {}", record.level, line);
            }),
        )
        .buffer_size(10)
        .filter("host", |mut record: Record| {
            record.set_extra("host", "demo-host");
            record
        })
        .build();

    println!("1. Timing work with named timers:");
    logger.timer_start("import");
    for batch in 1..=3 {
        std::thread::sleep(Duration::from_millis(20));
        logger
            .scoped("info:import")
            .log_with("batch {batch} imported", &Context::new().with("batch", batch))?;
    }
    logger.timer_reset("import");
    logger.scoped("notice:import").log("timer reset")?;
    logger.scoped("notice:missing").log("unknown timer")?;
    logger.timer_stop("import");

    println!("\n2. Hook channel for critical lines:");
    logger.critical("database unreachable")?;
    logger.emergency("cluster down")?;

    println!("\n3. Raw lines skip the formatter:");
    logger.info(raw("-- raw separator --\n"))?;

    println!("\n4. Buffered lines:");
    for line in logger.buffered_lines() {
        print!("   {}", line);
    }

    println!("\n5. A custom formatter using extra record fields:");
    let compact = Logger::builder()
        .level("debug")
        .sink(STDOUT_ADDRESS)
        .filter("host", |mut record: Record| {
            record.set_extra("host", "demo-host");
            record
        })
        .formatter(|record: &Record, get: &FieldAccessor<'_>| {
            format!(
                "{} {}@{} {}{}\n",
                record.date,
                record.level,
                get.value("host"),
                record.text,
                get.get("context", " ", "")
            )
        })
        .build();
    compact.warning("compact line")?;

    println!(
        "\n=== Example completed: {} alert(s) sent, {} line(s) emitted ===",
        alerts.load(Ordering::Relaxed),
        logger.metrics().emitted()
    );

    Ok(())
}
