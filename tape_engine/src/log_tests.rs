//! Unit tests for log.rs
//!
//! Tests Logger trait, LogEntry, LogSeverity, DefaultLogger, CallbackLogger
//! and LogChannel.

use crate::error::{Error, Result};
use crate::log::{CallbackLogger, DefaultLogger, LogChannel, LogEntry, LogSeverity, Logger};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

// ============================================================================
// Helpers
// ============================================================================

struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "tape::Test".to_string(),
        message: format!("{:?} message", severity),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_display() {
    assert_eq!(LogSeverity::Trace.to_string(), "TRACE");
    assert_eq!(LogSeverity::Warn.to_string(), "WARN");
    assert_eq!(LogSeverity::Error.to_string(), "ERROR");
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&entry(severity, None, None));
        logger.log(&entry(severity, Some("shader.rs"), Some(42)));
    }
}

#[test]
fn test_logger_types_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
    assert_send_sync::<CallbackLogger>();
    assert_send_sync::<LogChannel>();
}

// ============================================================================
// CALLBACK LOGGER TESTS
// ============================================================================

#[test]
fn test_callback_logger_receives_severity_and_prefixed_message() {
    let seen: Arc<Mutex<Vec<(LogSeverity, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let logger = CallbackLogger::new(move |severity, message| {
        sink.lock().unwrap().push((severity, message.to_string()));
    });

    logger.log(&entry(LogSeverity::Warn, None, None));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, LogSeverity::Warn);
    assert_eq!(seen[0].1, "[tape::Test] Warn message");
}

// ============================================================================
// LOG CHANNEL TESTS
// ============================================================================

#[test]
fn test_silent_channel_drops_everything() {
    let channel = LogChannel::silent();
    assert!(!channel.is_enabled());
    channel.log(LogSeverity::Error, "tape::Test", "ignored".to_string());

    let channel = LogChannel::default();
    assert!(!channel.is_enabled());
}

#[test]
fn test_channel_forwards_entries() {
    let (logger, entries) = TestLogger::new();
    let channel = LogChannel::new(logger);
    assert!(channel.is_enabled());

    channel.log(LogSeverity::Info, "tape::Test", "hello".to_string());
    channel.log_detailed(LogSeverity::Error, "tape::Test", "boom".to_string(), "mesh.rs", 7);

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "hello");
    assert!(entries[0].file.is_none());
    assert_eq!(entries[1].file, Some("mesh.rs"));
    assert_eq!(entries[1].line, Some(7));
}

#[test]
fn test_cloned_channel_shares_logger() {
    let (logger, entries) = TestLogger::new();
    let channel = LogChannel::new(logger);
    let clone = channel.clone();

    channel.log(LogSeverity::Debug, "a", "one".to_string());
    clone.log(LogSeverity::Debug, "b", "two".to_string());

    assert_eq!(entries.lock().unwrap().len(), 2);
}

#[test]
fn test_macros_route_through_channel() {
    let (logger, entries) = TestLogger::new();
    let channel = LogChannel::new(logger);

    crate::engine_trace!(channel, "tape::Test", "t {}", 1);
    crate::engine_debug!(channel, "tape::Test", "d {}", 2);
    crate::engine_info!(channel, "tape::Test", "i {}", 3);
    crate::engine_warn!(channel, "tape::Test", "w {}", 4);
    crate::engine_error!(channel, "tape::Test", "e {}", 5);

    let entries = entries.lock().unwrap();
    let severities: Vec<LogSeverity> = entries.iter().map(|e| e.severity).collect();
    assert_eq!(
        severities,
        vec![
            LogSeverity::Trace,
            LogSeverity::Debug,
            LogSeverity::Info,
            LogSeverity::Warn,
            LogSeverity::Error,
        ]
    );
    assert_eq!(entries[4].message, "e 5");
    assert!(entries[4].file.is_some());
    assert!(entries[4].line.is_some());
}

#[test]
fn test_engine_bail_logs_and_returns_error() {
    let (logger, entries) = TestLogger::new();
    let channel = LogChannel::new(logger);

    fn check(channel: &LogChannel, width: u32) -> Result<u32> {
        if width == 0 {
            crate::engine_bail!(channel, "tape::Test", InvalidConfig, "width is {}", width);
        }
        Ok(width)
    }

    assert_eq!(check(&channel, 4), Ok(4));
    assert_eq!(
        check(&channel, 0),
        Err(Error::InvalidConfig("width is 0".to_string()))
    );

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Error);
}
