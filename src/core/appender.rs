//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A physical destination that encodes and writes entries.
///
/// Implementations write each entry as a single unit; the owning sink
/// serializes calls, so `&mut self` is never shared between threads.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
