//! # logbridge
//!
//! Structured logging behind a generic attribute facade.
//!
//! Application code logs through [`facade::FacadeLogger`] (or the
//! process-wide helpers in [`facade`]). The installed handler,
//! [`bridge::StructuredHandler`], turns each record into a leveled
//! structured entry on a [`Logger`], which fans it out to its sinks: by
//! default a rotating, gzip-compressed JSON file and a human-readable console.
//!
//! ```no_run
//! use logbridge::facade::{self, Attr};
//!
//! let logger = logbridge::init_default().unwrap();
//! facade::info("build started", &[]);
//! logbridge::facade::default_logger()
//!     .unwrap()
//!     .with(&[Attr::new("requestId", "abc123")])
//!     .info("request handled", &[]);
//! logger.sync().unwrap();
//! ```

pub mod appenders;
pub mod bridge;
pub mod config;
pub mod core;
pub mod facade;
pub mod init;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{
        ConsoleAppender, MemoryAppender, MemoryRecords, RotatingFileAppender, RotationPolicy,
    };
    pub use crate::bridge::StructuredHandler;
    pub use crate::config::LoggingConfig;
    pub use crate::core::{
        Appender, EncoderConfig, Field, FieldValue, LevelGate, LogEntry, LogLevel, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, Result,
    };
    pub use crate::facade::{Attr, FacadeLogger, Level};
}

pub use appenders::{ConsoleAppender, RotatingFileAppender};
pub use core::{
    Appender, EncoderConfig, Encoding, Field, FieldValue, LevelEnabler, LevelFormat, LevelGate,
    LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result,
    TimestampFormat,
};
pub use init::{init, init_default};
