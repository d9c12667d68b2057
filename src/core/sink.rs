//! A sink pairs one appender with the gate that decides what reaches it

use super::{
    appender::Appender, error::Result, level_gate::LevelEnabler, log_entry::LogEntry,
    log_level::LogLevel,
};
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub struct Sink {
    name: String,
    appender: Mutex<Box<dyn Appender>>,
    enabler: Arc<dyn LevelEnabler>,
}

impl Sink {
    pub fn new(appender: Box<dyn Appender>, enabler: Arc<dyn LevelEnabler>) -> Self {
        Self {
            name: appender.name().to_string(),
            appender: Mutex::new(appender),
            enabler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.enabler.enabled(level)
    }

    /// Write one entry, isolating errors and panics from the caller
    ///
    /// Returns `false` when the appender failed. The mutex is held for the
    /// whole append, so concurrent records never interleave within this sink.
    pub(crate) fn write(&self, entry: &LogEntry) -> bool {
        let mut appender = self.appender.lock();
        let append_result = catch_unwind(AssertUnwindSafe(|| appender.append(entry)));

        match append_result {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", self.name, e);
                false
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                     Other sinks continue to function.",
                    self.name,
                    panic_message(&panic_info)
                );
                false
            }
        }
    }

    pub(crate) fn flush(&self) -> Result<()> {
        let mut appender = self.appender.lock();
        match catch_unwind(AssertUnwindSafe(|| appender.flush())) {
            Ok(result) => result,
            Err(panic_info) => Err(super::error::LoggerError::writer(format!(
                "sink '{}' panicked during flush: {}",
                self.name,
                panic_message(&panic_info)
            ))),
        }
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink").field("name", &self.name).finish()
    }
}

fn panic_message(panic_info: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
