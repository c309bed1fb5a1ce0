//! Stress tests for concurrent delivery
//!
//! These tests verify:
//! - Every admitted line reaches a shared file sink exactly once
//! - Lines from concurrent callers are never interleaved
//! - The ring buffer stays bounded under heavy load
//! - Timers started and stopped concurrently do not interfere

use epilog::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

/// No line is lost or torn when many threads share one file channel
#[test]
fn test_concurrent_file_delivery() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");

    let logger = Arc::new(
        Logger::builder()
            .level("debug")
            .channel("debug", log_file.clone())
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let ctx = Context::new().with("t", t as i64).with("i", i as i64);
                    logger.log("worker {t} item {i}", &ctx, "info", None).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    let mut seen = HashSet::new();
    for line in &lines {
        assert!(line.starts_with('['), "torn line: {:?}", line);
        let payload = line
            .split("Info: ")
            .nth(1)
            .unwrap_or_else(|| panic!("unexpected line: {:?}", line));
        assert!(seen.insert(payload.to_string()), "duplicate line: {:?}", line);
    }

    for t in 0..THREADS {
        assert!(seen.contains(&format!("worker {} item {} ", t, PER_THREAD - 1)));
    }
    assert_eq!(logger.metrics().emitted(), (THREADS * PER_THREAD) as u64);
}

/// The ring keeps only the newest lines while a hook counts every delivery
#[test]
fn test_bounded_buffer_under_load() {
    let delivered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&delivered);

    let logger = Arc::new(
        Logger::builder()
            .level("debug")
            .channel("debug", BUFFER_ADDRESS)
            .channel(
                "=emergency",
                Destination::hook(move |_line, _record| {
                    counter.fetch_add(1, Ordering::Relaxed);
                }),
            )
            .buffer_size(32)
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    if i % 50 == 0 {
                        logger.emergency(format!("burst {} at {}", t, i)).unwrap();
                    } else {
                        logger.debug(format!("noise {} {}", t, i)).unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert_eq!(logger.buffered_lines().len(), 32);
    assert_eq!(delivered.load(Ordering::Relaxed), THREADS * (PER_THREAD / 50));
    assert_eq!(
        logger.metrics().deliveries(),
        (THREADS * PER_THREAD + THREADS * (PER_THREAD / 50)) as u64
    );
}

/// Level changes racing with logging never produce a partial line
#[test]
fn test_level_changes_during_logging() {
    let logger = Arc::new(
        Logger::builder()
            .level("debug")
            .sink(BUFFER_ADDRESS)
            .build(),
    );

    let writer = {
        let logger = Arc::clone(&logger);
        std::thread::spawn(move || {
            for i in 0..1000 {
                logger.warning(format!("tick {}", i)).unwrap();
            }
        })
    };

    for i in 0..200 {
        logger.set_level(if i % 2 == 0 { "error" } else { "debug" });
    }
    writer.join().expect("writer panicked");

    let lines = logger.buffered_lines();
    assert!(lines.len() <= 1000);
    assert!(lines.iter().all(|line| line.contains("Warning: tick ")));
    assert_eq!(
        logger.metrics().emitted() + logger.metrics().suppressed(),
        1000
    );
}

/// Per-thread timers stay independent
#[test]
fn test_concurrent_timers() {
    let logger = Arc::new(Logger::with_channel(BUFFER_ADDRESS, "debug"));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                let name = format!("job-{}", t);
                for _ in 0..100 {
                    logger.timer_start(&name);
                    assert!(logger.has_timer(&name));
                    logger.scope("info", Some(name.as_str())).log("step").unwrap();
                    assert!(logger.timer_stop(&name));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let lines = logger.buffered_lines();
    assert_eq!(lines.len(), THREADS * 100);
    assert!(lines.iter().all(|line| !line.contains("not_found")));
}
