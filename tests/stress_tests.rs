//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - Records from many threads are all delivered, each exactly once
//! - Every line in the file is a complete JSON object (no interleaving)
//! - Derived loggers can be created and used concurrently
//! - Level changes from one thread are seen by all others

use logbridge::appenders::{MemoryAppender, RotatingFileAppender, RotationPolicy};
use logbridge::bridge::StructuredHandler;
use logbridge::core::{Field, LogLevel, Logger};
use logbridge::facade::Attr;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

#[test]
fn test_concurrent_records_are_whole_lines() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent.log");

    let appender = RotatingFileAppender::with_policy(
        &log_file,
        RotationPolicy::new().with_max_size(u64::MAX),
    )
    .expect("Failed to create appender");
    let logger = Logger::builder().appender(appender).build();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.with_fields(vec![Field::new("thread", t as u64)]);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info(
                        format!("message {} from {}", i, t),
                        &[Field::new("seq", i as u64), Field::new("padding", "x".repeat(64))],
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    logger.sync().expect("Failed to sync");

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let mut seen = HashSet::new();
    for line in content.lines() {
        let parsed: serde_json::Value =
            serde_json::from_str(line).expect("Interleaved or truncated line");
        let thread = parsed["thread"].as_u64().expect("thread");
        let seq = parsed["seq"].as_u64().expect("seq");
        assert!(seen.insert((thread, seq)), "Duplicate record {}/{}", thread, seq);
    }

    assert_eq!(seen.len(), THREADS * PER_THREAD);
    assert_eq!(logger.metrics().records_written(), (THREADS * PER_THREAD) as u64);
    assert_eq!(logger.metrics().sink_failures(), 0);
}

#[test]
fn test_concurrent_facade_derivation() {
    let (appender, records) = MemoryAppender::json();
    let facade = StructuredHandler::new(Logger::builder().appender(appender).build()).into_facade();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let facade = facade.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    facade
                        .with_group(&format!("worker{}", t))
                        .with(&[Attr::new("i", i)])
                        .info("tick", &[]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let entries = records.entries();
    assert_eq!(entries.len(), THREADS * 100);
    for entry in &entries {
        let name = entry.logger_name.as_deref().expect("named");
        assert!(name.starts_with("worker"));
        assert_eq!(entry.fields.len(), 1, "bound fields leaked between threads");
    }
}

#[test]
fn test_level_change_visible_across_threads() {
    let (appender, records) = MemoryAppender::json();
    let logger = Logger::builder()
        .min_level(LogLevel::Error)
        .appender(appender)
        .build();
    let stop = Arc::new(AtomicBool::new(false));

    let writer = {
        let logger = logger.named("writer");
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::Acquire) {
                logger.debug("spin", &[]);
                thread::yield_now();
            }
        })
    };

    // Nothing at Debug passes an Error gate
    thread::sleep(std::time::Duration::from_millis(20));
    assert!(records.is_empty());

    logger.set_level(LogLevel::Debug);
    while records.is_empty() {
        thread::yield_now();
    }

    stop.store(true, Ordering::Release);
    writer.join().expect("Thread panicked");
    assert!(records.entries().iter().all(|e| e.level == LogLevel::Debug));
}
