//! Record encoders
//!
//! Two layouts are supported:
//! - Json: one object per line, machine readable
//! - Console: separator-delimited columns for humans
//!
//! Both encoders read their key names and formatting rules from the same
//! [`EncoderConfig`], so file and console output agree on timestamp key and
//! level spelling.

use super::field::{fields_to_json_object, push_json_pair};
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Record layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// `{"level":"INFO","timestamp":"2025-01-08T10:30:45.123Z","msg":"Request processed"}`
    #[default]
    Json,

    /// `2025-01-08T10:30:45.123Z | INFO  | Request processed | {"status":200}`
    Console,
}

/// Spelling of the level column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelFormat {
    /// `INFO`
    #[default]
    Capital,
    /// `INFO` wrapped in ANSI colors
    CapitalColor,
    /// `info`
    Lowercase,
}

/// Keys and formatting rules shared by the encoders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub encoding: Encoding,
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub message_key: String,
    pub console_separator: String,
    pub timestamp_format: TimestampFormat,
    pub level_format: LevelFormat,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::json()
    }
}

impl EncoderConfig {
    /// JSON lines with ISO-8601 timestamps and capitalized levels
    #[must_use]
    pub fn json() -> Self {
        Self {
            encoding: Encoding::Json,
            time_key: "timestamp".to_string(),
            level_key: "level".to_string(),
            name_key: "logger".to_string(),
            message_key: "msg".to_string(),
            console_separator: " | ".to_string(),
            timestamp_format: TimestampFormat::Iso8601,
            level_format: LevelFormat::Capital,
        }
    }

    /// Human-readable columns separated by `" | "`
    #[must_use]
    pub fn console() -> Self {
        Self {
            encoding: Encoding::Console,
            ..Self::json()
        }
    }

    #[must_use]
    pub fn with_time_key(mut self, key: impl Into<String>) -> Self {
        self.time_key = key.into();
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.console_separator = separator.into();
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_level_format(mut self, format: LevelFormat) -> Self {
        self.level_format = format;
        self
    }

    /// Encode one entry as a single line, trailing newline included
    pub fn encode(&self, entry: &LogEntry) -> String {
        let mut line = match self.encoding {
            Encoding::Json => self.encode_json(entry),
            Encoding::Console => self.encode_console(entry),
        };
        line.push('\n');
        line
    }

    fn level_text(&self, entry: &LogEntry, pad: bool) -> String {
        let text = match self.level_format {
            LevelFormat::Capital | LevelFormat::CapitalColor => entry.level.to_str().to_string(),
            LevelFormat::Lowercase => entry.level.to_str().to_lowercase(),
        };
        let text = if pad { format!("{:5}", text) } else { text };
        if self.level_format == LevelFormat::CapitalColor {
            text.color(entry.level.color_code()).to_string()
        } else {
            text
        }
    }

    fn format_time(&self, t: &DateTime<Utc>) -> String {
        self.timestamp_format.format(t)
    }

    fn encode_json(&self, entry: &LogEntry) -> String {
        let time_fmt = |t: &DateTime<Utc>| self.format_time(t);
        let mut line = String::from("{");

        push_json_pair(
            &mut line,
            &self.level_key,
            &serde_json::Value::String(self.level_text(entry, false)),
        );
        push_json_pair(
            &mut line,
            &self.time_key,
            &self.timestamp_format.to_json_value(&entry.timestamp),
        );
        if let Some(ref name) = entry.logger_name {
            push_json_pair(
                &mut line,
                &self.name_key,
                &serde_json::Value::String(name.to_string()),
            );
        }
        push_json_pair(
            &mut line,
            &self.message_key,
            &serde_json::Value::String(entry.message.clone()),
        );

        // Fields never overwrite the record's own keys.
        for field in entry.fields.iter() {
            let value = field.value.to_json_value(&time_fmt);
            if self.is_reserved_key(&field.key) {
                push_json_pair(&mut line, &format!("fields.{}", field.key), &value);
            } else {
                push_json_pair(&mut line, &field.key, &value);
            }
        }

        line.push('}');
        line
    }

    fn is_reserved_key(&self, key: &str) -> bool {
        key == self.level_key
            || key == self.time_key
            || key == self.name_key
            || key == self.message_key
    }

    fn encode_console(&self, entry: &LogEntry) -> String {
        let time_fmt = |t: &DateTime<Utc>| self.format_time(t);
        let mut columns = Vec::with_capacity(5);

        columns.push(self.format_time(&entry.timestamp));
        columns.push(self.level_text(entry, true));
        if let Some(ref name) = entry.logger_name {
            columns.push(name.to_string());
        }
        columns.push(entry.message.clone());

        if !entry.fields.is_empty() {
            columns.push(fields_to_json_object(&entry.fields, &time_fmt));
        }

        columns.join(&self.console_separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Field, LogLevel};
    use chrono::TimeZone;

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        let t = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        LogEntry::new(level, message).with_timestamp(t)
    }

    #[test]
    fn test_json_layout() {
        let result = EncoderConfig::json().encode(&entry(LogLevel::Error, "Error occurred"));
        assert!(result.ends_with('\n'));

        let parsed: serde_json::Value = serde_json::from_str(result.trim_end()).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["msg"], "Error occurred");
        assert_eq!(parsed["timestamp"], "2025-01-08T10:30:45.000Z");
        assert!(parsed.get("logger").is_none());
    }

    #[test]
    fn test_json_key_order() {
        let e = entry(LogLevel::Info, "done")
            .with_logger_name(Some("worker.db".into()))
            .with_fields(vec![Field::new("requestId", "abc123"), Field::new("attempt", 2)]);
        let result = EncoderConfig::json().encode(&e);
        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(result.trim_end()).unwrap();
        let keys: Vec<&str> = parsed.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["level", "timestamp", "logger", "msg", "requestId", "attempt"]
        );
    }

    #[test]
    fn test_custom_time_key() {
        let config = EncoderConfig::json().with_time_key("ts");
        let result = config.encode(&entry(LogLevel::Info, "x"));
        let parsed: serde_json::Value = serde_json::from_str(result.trim_end()).unwrap();
        assert!(parsed["ts"].is_string());
        assert!(parsed.get("timestamp").is_none());
    }

    #[test]
    fn test_console_layout() {
        let result = EncoderConfig::console().encode(&entry(LogLevel::Info, "build started"));
        assert_eq!(result, "2025-01-08T10:30:45.000Z | INFO  | build started\n");
    }

    #[test]
    fn test_console_with_name_and_fields() {
        let e = entry(LogLevel::Warn, "slow query")
            .with_logger_name(Some("db".into()))
            .with_fields(vec![Field::new("ms", 420)]);
        let result = EncoderConfig::console().encode(&e);
        assert_eq!(
            result,
            "2025-01-08T10:30:45.000Z | WARN  | db | slow query | {\"ms\":420}\n"
        );
    }

    #[test]
    fn test_lowercase_levels() {
        let config = EncoderConfig::json().with_level_format(LevelFormat::Lowercase);
        let result = config.encode(&entry(LogLevel::Warn, "w"));
        let parsed: serde_json::Value = serde_json::from_str(result.trim_end()).unwrap();
        assert_eq!(parsed["level"], "warn");
    }

    #[test]
    fn test_colored_level_keeps_name() {
        colored::control::set_override(true);
        let config = EncoderConfig::console().with_level_format(LevelFormat::CapitalColor);
        let result = config.encode(&entry(LogLevel::Error, "boom"));
        assert!(result.contains("ERROR"));
        assert!(result.contains("\u{1b}["));
    }

    #[test]
    fn test_injected_newline_stays_on_one_line() {
        let result = EncoderConfig::console().encode(&entry(LogLevel::Info, "a\nERROR fake"));
        assert_eq!(result.lines().count(), 1);
    }

    #[test]
    fn test_fields_cannot_replace_record_keys() {
        let e = entry(LogLevel::Info, "build started").with_fields(vec![
            Field::new("msg", "user value"),
            Field::new("level", "custom"),
            Field::new("region", "eu"),
        ]);
        let result = EncoderConfig::json().encode(&e);
        let parsed: serde_json::Value = serde_json::from_str(result.trim_end()).unwrap();
        assert_eq!(parsed["msg"], "build started");
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["fields.msg"], "user value");
        assert_eq!(parsed["fields.level"], "custom");
        assert_eq!(parsed["region"], "eu");
    }

    #[test]
    fn test_reserved_keys_follow_config() {
        let config = EncoderConfig::json().with_time_key("ts");
        let e = entry(LogLevel::Info, "x")
            .with_fields(vec![Field::new("ts", 1), Field::new("timestamp", 2)]);
        let result = config.encode(&e);
        assert!(result.contains(r#""fields.ts":1"#));
        assert!(result.contains(r#","timestamp":2"#));
    }

    #[test]
    fn test_json_keeps_repeated_field_keys() {
        let e = entry(LogLevel::Info, "dup")
            .with_fields(vec![Field::new("a", 1), Field::new("a", 2)]);
        let result = EncoderConfig::json().encode(&e);
        assert_eq!(
            result,
            "{\"level\":\"INFO\",\"timestamp\":\"2025-01-08T10:30:45.000Z\",\"msg\":\"dup\",\"a\":1,\"a\":2}\n"
        );
    }

    #[test]
    fn test_console_keeps_repeated_field_keys() {
        let e = entry(LogLevel::Info, "dup")
            .with_fields(vec![Field::new("a", 1), Field::new("a", 2)]);
        let result = EncoderConfig::console().encode(&e);
        assert_eq!(
            result,
            "2025-01-08T10:30:45.000Z | INFO  | dup | {\"a\":1,\"a\":2}\n"
        );
    }
}
