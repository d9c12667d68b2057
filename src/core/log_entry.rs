//! Log entry structure

use super::field::Field;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One record as handed to every sink.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Dot-separated logger name, absent for the root logger
    pub logger_name: Option<Arc<str>>,
    /// Bound fields first, then call-site fields, in order
    pub fields: Vec<Field>,
}

/// Escape line breaks and tabs so a record always occupies a single line
///
/// Applied to messages and logger names, the two free-text values that are
/// written outside of JSON string escaping in the console layout.
pub(crate) fn sanitize(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

pub(crate) fn needs_sanitizing(text: &str) -> bool {
    text.contains(|c| matches!(c, '\n' | '\r' | '\t'))
}

impl LogEntry {
    pub fn new(level: LogLevel, message: &str) -> Self {
        Self {
            level,
            message: if needs_sanitizing(message) {
                sanitize(message)
            } else {
                message.to_string()
            },
            timestamp: Utc::now(),
            logger_name: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_logger_name(mut self, name: Option<Arc<str>>) -> Self {
        self.logger_name = match name {
            Some(n) if needs_sanitizing(&n) => Some(sanitize(&n).into()),
            other => other,
        };
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// First field with the given key
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }
}
