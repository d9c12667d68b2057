//! Application-facing logger over a pluggable [`Handler`]

use super::handler::Handler;
use super::level::Level;
use super::record::Record;
use super::value::Attr;
use std::fmt;
use std::sync::Arc;

/// Cheap, cloneable front end to a [`Handler`]
///
/// # Example
///
/// ```
/// use logbridge::bridge::StructuredHandler;
/// use logbridge::facade::{Attr, FacadeLogger};
/// use logbridge::prelude::*;
///
/// let (appender, records) = MemoryAppender::json();
/// let core = Logger::builder().appender(appender).build();
/// let logger = FacadeLogger::from_handler(StructuredHandler::new(core));
///
/// logger.with(&[Attr::new("requestId", "abc123")]).info("done", &[]);
/// assert_eq!(records.json_lines()[0]["requestId"], "abc123");
/// ```
#[derive(Clone)]
pub struct FacadeLogger {
    handler: Arc<dyn Handler>,
}

impl FacadeLogger {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    pub fn from_handler<H: Handler + 'static>(handler: H) -> Self {
        Self::new(Arc::new(handler))
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// Build a record and pass it to the handler if the level is enabled
    ///
    /// Handler errors are reported on stderr; logging never fails the caller.
    pub fn log(&self, level: Level, message: impl Into<String>, attrs: &[Attr]) {
        if !self.handler.enabled(level) {
            return;
        }

        let mut record = Record::new(level, message);
        record.add_attrs(attrs.iter().cloned());

        if let Err(e) = self.handler.handle(&record) {
            eprintln!("[LOGGER ERROR] Handler failed at level {}: {}", level, e);
        }
    }

    pub fn debug(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::DEBUG, message, attrs);
    }

    pub fn info(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::INFO, message, attrs);
    }

    pub fn warn(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::WARN, message, attrs);
    }

    pub fn error(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::ERROR, message, attrs);
    }

    /// Derive a logger whose records all carry `attrs`
    #[must_use]
    pub fn with(&self, attrs: &[Attr]) -> FacadeLogger {
        if attrs.is_empty() {
            return self.clone();
        }
        Self::new(self.handler.with_attrs(attrs))
    }

    /// Derive a logger whose records are qualified by `name`
    #[must_use]
    pub fn with_group(&self, name: &str) -> FacadeLogger {
        if name.is_empty() {
            return self.clone();
        }
        Self::new(self.handler.with_group(name))
    }
}

impl fmt::Debug for FacadeLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacadeLogger").finish_non_exhaustive()
    }
}
