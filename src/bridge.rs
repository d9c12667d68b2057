//! Facade handler backed by the core structured logger
//!
//! Levels are reconciled through [`LEVEL_TABLE`] only; a facade level that
//! has no entry is logged at [`LogLevel::Info`].

use crate::core::{Field, FieldValue, LogLevel, Logger, Result};
use crate::facade::{Attr, FacadeLogger, Handler, Level, Record, Value};
use std::sync::Arc;

/// Facade level to core level, in severity order
pub const LEVEL_TABLE: [(Level, LogLevel); 4] = [
    (Level::DEBUG, LogLevel::Debug),
    (Level::INFO, LogLevel::Info),
    (Level::WARN, LogLevel::Warn),
    (Level::ERROR, LogLevel::Error),
];

/// Core level for a facade level; unrecognized levels map to Info
pub fn core_level(level: Level) -> LogLevel {
    LEVEL_TABLE
        .iter()
        .find(|(facade, _)| *facade == level)
        .map_or(LogLevel::Info, |(_, core)| *core)
}

pub fn facade_level(level: LogLevel) -> Level {
    LEVEL_TABLE
        .iter()
        .find(|(_, core)| *core == level)
        .map_or(Level::INFO, |(facade, _)| *facade)
}

/// Translate attributes into fields, keeping their order
///
/// Groups become nested objects. A group with an empty key is inlined and an
/// empty group is dropped.
pub fn attrs_to_fields(attrs: &[Attr]) -> Vec<Field> {
    let mut fields = Vec::with_capacity(attrs.len());
    push_fields(&mut fields, attrs);
    fields
}

fn push_fields(fields: &mut Vec<Field>, attrs: &[Attr]) {
    for attr in attrs {
        match &attr.value {
            Value::Group(inner) if inner.is_empty() => {}
            Value::Group(inner) if attr.key.is_empty() => push_fields(fields, inner),
            value => fields.push(Field {
                key: attr.key.clone(),
                value: field_value(value),
            }),
        }
    }
}

fn field_value(value: &Value) -> FieldValue {
    match value {
        Value::String(s) => FieldValue::String(s.clone()),
        Value::Int64(i) => FieldValue::Int(*i),
        Value::Uint64(u) => FieldValue::Uint(*u),
        Value::Float64(x) => FieldValue::Float(*x),
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Duration(d) => FieldValue::Duration(*d),
        Value::Time(t) => FieldValue::Time(*t),
        Value::Group(attrs) => FieldValue::Object(attrs_to_fields(attrs)),
        Value::Any(v) => FieldValue::Json(v.clone()),
        Value::Error(e) => FieldValue::Error(Arc::clone(e)),
    }
}

/// [`Handler`] that emits through a [`Logger`]
///
/// Bound attributes become bound fields and groups become logger name
/// segments, so derived handlers share the parent's sinks and gate.
#[derive(Debug, Clone)]
pub struct StructuredHandler {
    logger: Logger,
}

impl StructuredHandler {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Wrap this handler in a facade logger
    pub fn into_facade(self) -> FacadeLogger {
        FacadeLogger::from_handler(self)
    }
}

impl Handler for StructuredHandler {
    fn enabled(&self, level: Level) -> bool {
        self.logger.enabled(core_level(level))
    }

    fn handle(&self, record: &Record) -> Result<()> {
        self.logger.log_at(
            core_level(record.level),
            record.time,
            &record.message,
            attrs_to_fields(&record.attrs),
        );
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(StructuredHandler {
            logger: self.logger.with_fields(attrs_to_fields(attrs)),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(StructuredHandler {
            logger: self.logger.named(name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::{MemoryAppender, MemoryRecords};
    use std::time::Duration;

    fn facade(min: LogLevel) -> (FacadeLogger, MemoryRecords) {
        let (appender, records) = MemoryAppender::json();
        let logger = Logger::builder().min_level(min).appender(appender).build();
        (StructuredHandler::new(logger).into_facade(), records)
    }

    #[test]
    fn test_level_table_round_trip() {
        for (facade, core) in LEVEL_TABLE {
            assert_eq!(core_level(facade), core);
            assert_eq!(facade_level(core), facade);
        }
    }

    #[test]
    fn test_unrecognized_levels_fall_back_to_info() {
        assert_eq!(core_level(Level(2)), LogLevel::Info);
        assert_eq!(core_level(Level(-8)), LogLevel::Info);
        assert_eq!(core_level(Level(100)), LogLevel::Info);
    }

    #[test]
    fn test_enabled_follows_mapping() {
        let (logger, _records) = facade(LogLevel::Warn);
        assert!(!logger.enabled(Level::INFO));
        assert!(!logger.enabled(Level(5)));
        assert!(logger.enabled(Level::WARN));
        assert!(logger.enabled(Level::ERROR));
    }

    #[test]
    fn test_unrecognized_level_is_written_as_info() {
        let (logger, records) = facade(LogLevel::Info);
        logger.log(Level(2), "custom", &[]);

        assert_eq!(records.entries()[0].level, LogLevel::Info);
        assert_eq!(records.json_lines()[0]["level"], "INFO");
    }

    #[test]
    fn test_attrs_keep_order_and_type() {
        let (logger, records) = facade(LogLevel::Debug);
        logger.debug(
            "typed",
            &[
                Attr::new("count", 3),
                Attr::new("ratio", 0.5),
                Attr::new("ok", true),
                Attr::new("elapsed", Duration::from_millis(1500)),
            ],
        );

        let entry = &records.entries()[0];
        let keys: Vec<&str> = entry.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["count", "ratio", "ok", "elapsed"]);
        assert_eq!(entry.fields[0].value, FieldValue::Int(3));
        assert_eq!(entry.fields[2].value, FieldValue::Bool(true));
    }

    #[test]
    fn test_groups_become_objects() {
        let fields = attrs_to_fields(&[
            Attr::group("req", vec![Attr::new("id", 7)]),
            Attr::group("", vec![Attr::new("inlined", "yes")]),
            Attr::group("empty", Vec::new()),
        ]);

        assert_eq!(fields.len(), 2);
        assert_eq!(
            fields[0].value,
            FieldValue::Object(vec![Field::new("id", 7i64)])
        );
        assert_eq!(fields[1], Field::new("inlined", "yes"));
    }

    #[test]
    fn test_with_attrs_and_group_map_to_core_derivation() {
        let (root, records) = facade(LogLevel::Info);
        let child = root
            .with(&[Attr::new("requestId", "abc123")])
            .with_group("db");

        child.info("query", &[Attr::new("rows", 2)]);
        root.info("root", &[]);

        let lines = records.json_lines();
        assert_eq!(lines[0]["logger"], "db");
        assert_eq!(lines[0]["requestId"], "abc123");
        assert_eq!(lines[0]["rows"], 2);
        assert!(lines[1].get("logger").is_none());
        assert!(lines[1].get("requestId").is_none());
    }

    #[test]
    fn test_record_time_is_preserved() {
        let (appender, records) = MemoryAppender::json();
        let handler = StructuredHandler::new(Logger::builder().appender(appender).build());
        let time = chrono::DateTime::parse_from_rfc3339("2025-01-08T10:30:45Z")
            .unwrap()
            .with_timezone(&chrono::Utc);

        handler
            .handle(&Record::new(Level::WARN, "stamped").with_time(time))
            .unwrap();

        assert_eq!(records.entries()[0].timestamp, time);
    }
}
