//! Core logger types and traits

pub mod appender;
pub mod encoder;
pub mod error;
pub mod field;
pub mod level_gate;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod timestamp;

pub use appender::Appender;
pub use encoder::{EncoderConfig, Encoding, LevelFormat};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use level_gate::{LevelEnabler, LevelGate};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use timestamp::TimestampFormat;
