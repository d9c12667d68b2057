//! In-memory appender for inspecting what a logger wrote
//!
//! Emitting never returns an error, so tests observe missing or malformed
//! output through the records captured here.

use crate::core::{Appender, EncoderConfig, LogEntry, Result};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Captured {
    entries: Vec<LogEntry>,
    lines: Vec<String>,
}

/// Shared view of everything a [`MemoryAppender`] received
#[derive(Clone, Default)]
pub struct MemoryRecords {
    inner: Arc<Mutex<Captured>>,
}

impl MemoryRecords {
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries as handed to the appender
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner.lock().entries.clone()
    }

    /// Encoded lines without their trailing newline
    pub fn lines(&self) -> Vec<String> {
        self.inner.lock().lines.clone()
    }

    /// Encoded lines parsed as JSON; lines that are not JSON are skipped
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.inner
            .lock()
            .lines
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn clear(&self) {
        let mut captured = self.inner.lock();
        captured.entries.clear();
        captured.lines.clear();
    }
}

pub struct MemoryAppender {
    encoder: EncoderConfig,
    records: MemoryRecords,
}

impl MemoryAppender {
    pub fn new(encoder: EncoderConfig) -> (Self, MemoryRecords) {
        let records = MemoryRecords::default();
        (
            Self {
                encoder,
                records: records.clone(),
            },
            records,
        )
    }

    pub fn json() -> (Self, MemoryRecords) {
        Self::new(EncoderConfig::json())
    }

    pub fn console() -> (Self, MemoryRecords) {
        Self::new(EncoderConfig::console())
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut line = self.encoder.encode(entry);
        line.pop();

        let mut captured = self.records.inner.lock();
        captured.entries.push(entry.clone());
        captured.lines.push(line);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Field, LogLevel};

    #[test]
    fn test_captures_entry_and_line() {
        let (mut appender, records) = MemoryAppender::json();
        let entry = LogEntry::new(LogLevel::Info, "captured")
            .with_fields(vec![Field::new("k", "v")]);

        appender.append(&entry).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records.entries()[0].message, "captured");
        assert!(!records.lines()[0].ends_with('\n'));
        assert_eq!(records.json_lines()[0]["k"], "v");

        records.clear();
        assert!(records.is_empty());
    }

    #[test]
    fn test_console_lines_are_not_json() {
        let (mut appender, records) = MemoryAppender::console();
        appender
            .append(&LogEntry::new(LogLevel::Warn, "plain"))
            .unwrap();
        assert_eq!(records.lines().len(), 1);
        assert!(records.json_lines().is_empty());
    }
}
