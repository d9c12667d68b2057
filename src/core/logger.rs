//! Core structured logger
//!
//! A [`Logger`] is a cheap handle: the sinks, the default level gate and the
//! metrics live in one reference-counted core, while the name and bound
//! fields are immutable per handle. Deriving a logger never touches the
//! handle it was derived from.

use super::{
    appender::Appender,
    error::Result,
    field::Field,
    level_gate::{LevelEnabler, LevelGate},
    log_entry::{sanitize, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sink::Sink,
};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

struct LoggerCore {
    sinks: Vec<Sink>,
    gate: LevelGate,
    metrics: LoggerMetrics,
}

impl Drop for LoggerCore {
    fn drop(&mut self) {
        for sink in &self.sinks {
            if let Err(e) = sink.flush() {
                eprintln!(
                    "[LOGGER ERROR] Failed to flush sink '{}' during shutdown: {}",
                    sink.name(),
                    e
                );
            }
        }

        let failures = self.metrics.sink_failures();
        if failures > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} sink failures (failure rate: {:.2}%)",
                failures,
                self.metrics.failure_rate()
            );
        }
    }
}

#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
    name: Option<Arc<str>>,
    fields: Arc<[Field]>,
}

impl Logger {
    /// A logger with no sinks; every record is discarded
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use logbridge::prelude::*;
    ///
    /// let (appender, records) = MemoryAppender::json();
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .appender(appender)
    ///     .build();
    ///
    /// logger.debug("cache warmed", &[Field::new("entries", 42)]);
    /// assert_eq!(records.len(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Emit one record to every sink whose gate admits `level`
    ///
    /// Sink failures are reported on stderr and counted in [`LoggerMetrics`];
    /// they never reach the caller and never stop delivery to other sinks.
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, fields: Vec<Field>) {
        self.log_at(level, Utc::now(), message, fields);
    }

    /// Like [`Logger::log`], but stamped with a time taken by the caller
    pub fn log_at(
        &self,
        level: LogLevel,
        timestamp: DateTime<Utc>,
        message: impl AsRef<str>,
        fields: Vec<Field>,
    ) {
        if !self.enabled(level) {
            self.core.metrics.record_filtered();
            return;
        }

        let fields = if self.fields.is_empty() {
            fields
        } else {
            let mut all = Vec::with_capacity(self.fields.len() + fields.len());
            all.extend(self.fields.iter().cloned());
            all.extend(fields);
            all
        };

        let entry = LogEntry::new(level, message.as_ref())
            .with_timestamp(timestamp)
            .with_logger_name(self.name.clone())
            .with_fields(fields);

        self.core.metrics.record_written();
        for sink in &self.core.sinks {
            if sink.enabled(level) && !sink.write(&entry) {
                self.core.metrics.record_sink_failure();
            }
        }
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(LogLevel::Debug, message, fields.to_vec());
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(LogLevel::Info, message, fields.to_vec());
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(LogLevel::Warn, message, fields.to_vec());
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(LogLevel::Error, message, fields.to_vec());
    }

    /// Whether at least one sink would accept a record at `level`
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.core.sinks.iter().any(|sink| sink.enabled(level))
    }

    /// Derive a logger that adds `fields` to every record
    ///
    /// The receiver is untouched; bound fields accumulate down a chain of
    /// derivations in the order they were added.
    #[must_use]
    pub fn with_fields(&self, fields: Vec<Field>) -> Logger {
        if fields.is_empty() {
            return self.clone();
        }

        let mut bound = Vec::with_capacity(self.fields.len() + fields.len());
        bound.extend(self.fields.iter().cloned());
        bound.extend(fields);

        Logger {
            core: Arc::clone(&self.core),
            name: self.name.clone(),
            fields: bound.into(),
        }
    }

    /// Derive a logger with `name` appended to this logger's name
    ///
    /// Segments are joined with `.`; an empty segment returns an equivalent
    /// logger.
    #[must_use]
    pub fn named(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.clone();
        }

        let name = sanitize(name);
        let full: Arc<str> = match self.name {
            Some(ref parent) => format!("{}.{}", parent, name).into(),
            None => name.into(),
        };

        Logger {
            core: Arc::clone(&self.core),
            name: Some(full),
            fields: Arc::clone(&self.fields),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields bound to this handle by [`Logger::with_fields`]
    pub fn bound_fields(&self) -> &[Field] {
        &self.fields
    }

    /// Flush every sink
    ///
    /// All sinks are flushed even if one fails; the first error is returned.
    pub fn sync(&self) -> Result<()> {
        let mut first_error = None;
        for sink in &self.core.sinks {
            if let Err(e) = sink.flush() {
                self.core.metrics.record_sink_failure();
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Current threshold of the shared default gate
    pub fn level(&self) -> LogLevel {
        self.core.gate.level()
    }

    /// Change the shared default gate; visible immediately to every handle
    pub fn set_level(&self, level: LogLevel) {
        self.core.gate.set_level(level);
    }

    pub fn level_gate(&self) -> &LevelGate {
        &self.core.gate
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.core.metrics
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.core.sinks.iter().map(Sink::name).collect()
    }

    /// True when both handles write through the same sinks
    pub fn shares_sinks_with(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("sinks", &self.core.sinks)
            .field("level", &self.core.gate.level())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Appenders added with [`LoggerBuilder::appender`] share one gate; use
/// [`LoggerBuilder::sink_with_enabler`] to give a sink its own threshold.
///
/// # Example
/// ```
/// use logbridge::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Warn)
///     .appender(ConsoleAppender::new())
///     .name("build")
///     .build();
///
/// assert!(!logger.enabled(LogLevel::Info));
/// assert_eq!(logger.name(), Some("build"));
/// ```
pub struct LoggerBuilder {
    gate: LevelGate,
    sinks: Vec<(Box<dyn Appender>, Option<Arc<dyn LevelEnabler>>)>,
    name: Option<String>,
    fields: Vec<Field>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            gate: LevelGate::default(),
            sinks: Vec::new(),
            name: None,
            fields: Vec::new(),
        }
    }

    /// Set the threshold of the shared gate
    #[must_use = "builder methods return a new value"]
    pub fn min_level(self, level: LogLevel) -> Self {
        self.gate.set_level(level);
        self
    }

    /// Use an existing gate, e.g. one shared with another logger
    #[must_use = "builder methods return a new value"]
    pub fn level_gate(mut self, gate: LevelGate) -> Self {
        self.gate = gate;
        self
    }

    /// Add an appender behind the shared gate
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.sinks.push((Box::new(appender), None));
        self
    }

    /// Add an appender with its own enabler
    #[must_use = "builder methods return a new value"]
    pub fn sink_with_enabler<A, E>(mut self, appender: A, enabler: E) -> Self
    where
        A: Appender + 'static,
        E: LevelEnabler + 'static,
    {
        self.sinks.push((Box::new(appender), Some(Arc::new(enabler))));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Fields bound to the root logger
    #[must_use = "builder methods return a new value"]
    pub fn fields(mut self, fields: Vec<Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn build(self) -> Logger {
        let shared: Arc<dyn LevelEnabler> = Arc::new(self.gate.clone());
        let sinks = self
            .sinks
            .into_iter()
            .map(|(appender, enabler)| {
                Sink::new(appender, enabler.unwrap_or_else(|| Arc::clone(&shared)))
            })
            .collect();

        Logger {
            core: Arc::new(LoggerCore {
                sinks,
                gate: self.gate,
                metrics: LoggerMetrics::new(),
            }),
            name: self
                .name
                .filter(|n| !n.is_empty())
                .map(|n| Arc::from(sanitize(&n))),
            fields: self.fields.into(),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::LoggerError;

    struct FailingAppender;

    impl Appender for FailingAppender {
        fn append(&mut self, _entry: &LogEntry) -> Result<()> {
            Err(LoggerError::writer("disk full"))
        }

        fn flush(&mut self) -> Result<()> {
            Err(LoggerError::writer("disk full"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingAppender;

    impl Appender for PanickingAppender {
        fn append(&mut self, _entry: &LogEntry) -> Result<()> {
            panic!("appender exploded");
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_builder_default_level_is_info() {
        let logger = Logger::builder().build();
        assert_eq!(logger.level(), LogLevel::Info);
        assert!(logger.sink_names().is_empty());
    }

    #[test]
    fn test_no_sinks_means_nothing_enabled() {
        let logger = Logger::new();
        assert!(!logger.enabled(LogLevel::Error));
        logger.error("dropped", &[]);
        assert_eq!(logger.metrics().records_filtered(), 1);
    }

    #[test]
    fn test_fan_out_to_every_sink() {
        let (first, first_records) = MemoryAppender::json();
        let (second, second_records) = MemoryAppender::console();
        let logger = Logger::builder().appender(first).appender(second).build();

        logger.info("build started", &[]);

        assert_eq!(first_records.len(), 1);
        assert_eq!(second_records.len(), 1);
        assert!(second_records.lines()[0].contains("build started"));
        assert_eq!(logger.metrics().records_written(), 1);
    }

    #[test]
    fn test_below_gate_writes_nothing() {
        let (appender, records) = MemoryAppender::json();
        let logger = Logger::builder().appender(appender).build();

        logger.debug("verbose detail", &[]);

        assert!(records.is_empty());
        assert_eq!(logger.metrics().records_filtered(), 1);
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let (appender, records) = MemoryAppender::json();
        let logger = Logger::builder()
            .appender(FailingAppender)
            .appender(PanickingAppender)
            .appender(appender)
            .build();

        logger.error("still delivered", &[]);

        assert_eq!(records.len(), 1);
        assert_eq!(logger.metrics().sink_failures(), 2);
    }

    #[test]
    fn test_sync_reports_first_error_after_flushing_all() {
        let (appender, _records) = MemoryAppender::json();
        let logger = Logger::builder()
            .appender(FailingAppender)
            .appender(appender)
            .build();

        assert!(logger.sync().is_err());
    }

    #[test]
    fn test_set_level_visible_to_derived_handles() {
        let (appender, records) = MemoryAppender::json();
        let logger = Logger::builder().appender(appender).build();
        let child = logger.named("child");

        logger.set_level(LogLevel::Debug);
        child.debug("now visible", &[]);

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_per_sink_enabler() {
        let (all, all_records) = MemoryAppender::json();
        let (errors, error_records) = MemoryAppender::json();
        let logger = Logger::builder()
            .min_level(LogLevel::Debug)
            .appender(all)
            .sink_with_enabler(errors, LogLevel::Error)
            .build();

        logger.info("routine", &[]);
        logger.error("bad", &[]);

        assert_eq!(all_records.len(), 2);
        assert_eq!(error_records.len(), 1);
    }

    #[test]
    fn test_with_fields_is_non_mutating() {
        let (appender, records) = MemoryAppender::json();
        let root = Logger::builder().appender(appender).build();
        let child = root.with_fields(vec![Field::new("requestId", "abc123")]);

        child.info("done", &[]);
        root.info("done", &[]);

        let lines = records.json_lines();
        assert_eq!(lines[0]["requestId"], "abc123");
        assert!(lines[1].get("requestId").is_none());
        assert!(root.bound_fields().is_empty());
        assert!(child.shares_sinks_with(&root));
    }

    #[test]
    fn test_bound_fields_precede_call_fields() {
        let (appender, records) = MemoryAppender::json();
        let logger = Logger::builder()
            .appender(appender)
            .fields(vec![Field::new("service", "commitgen")])
            .build()
            .with_fields(vec![Field::new("a", 1)]);

        logger.info("ordered", &[Field::new("b", 2)]);

        let entry = &records.entries()[0];
        let keys: Vec<&str> = entry.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["service", "a", "b"]);
    }

    #[test]
    fn test_log_at_keeps_caller_timestamp() {
        let (appender, records) = MemoryAppender::json();
        let logger = Logger::builder().appender(appender).build();
        let stamp = chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 5, 1, 8, 0, 0).unwrap();

        logger.log_at(LogLevel::Warn, stamp, "late", Vec::new());

        assert_eq!(records.entries()[0].timestamp, stamp);
        assert_eq!(records.json_lines()[0]["timestamp"], "2024-05-01T08:00:00.000Z");
    }

    #[test]
    fn test_named_joins_segments() {
        let root = Logger::new();
        let db = root.named("worker").named("db");

        assert_eq!(root.name(), None);
        assert_eq!(db.name(), Some("worker.db"));
        assert_eq!(db.named("").name(), Some("worker.db"));
    }

    #[test]
    fn test_empty_derivation_is_equivalent() {
        let root = Logger::builder().name("root").build();
        let same = root.with_fields(Vec::new());
        assert_eq!(same.name(), root.name());
        assert!(same.bound_fields().is_empty());
        assert!(same.shares_sinks_with(&root));
    }

    #[test]
    fn test_name_cannot_break_console_line() {
        let (appender, records) = MemoryAppender::console();
        let logger = Logger::builder()
            .appender(appender)
            .build()
            .named("db\n2025-01-01T00:00:00.000Z | ERROR | forged");

        logger.info("real", &[]);

        assert_eq!(logger.name(), Some("db\\n2025-01-01T00:00:00.000Z | ERROR | forged"));
        let lines = records.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].trim_end().lines().count(), 1);
        assert!(lines[0].contains("| real"));
    }

    #[test]
    fn test_builder_name_sanitized() {
        let logger = Logger::builder().name("svc\tblue").build();
        assert_eq!(logger.name(), Some("svc\\tblue"));
    }
}
