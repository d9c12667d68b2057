//! Logging macros for [`FacadeLogger`](crate::facade::FacadeLogger).
//!
//! Messages are formatted like `format!`. Attributes follow a `;` as
//! `key => value` pairs, where each value is anything convertible into a
//! [`Value`](crate::facade::Value).
//!
//! # Examples
//!
//! ```
//! use logbridge::prelude::*;
//! use logbridge::info;
//!
//! let (appender, records) = MemoryAppender::json();
//! let logger = StructuredHandler::new(Logger::builder().appender(appender).build()).into_facade();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With attributes
//! info!(logger, "request handled"; "status" => 200, "path" => "/health");
//!
//! assert_eq!(records.len(), 3);
//! assert_eq!(records.json_lines()[2]["status"], 200);
//! ```

/// Log a message at an explicit facade level.
///
/// # Examples
///
/// ```
/// # use logbridge::prelude::*;
/// # let logger = StructuredHandler::new(Logger::new()).into_facade();
/// use logbridge::log;
/// log!(logger, Level::INFO, "Simple message");
/// log!(logger, Level(2), "Between info and warn: {}", 2);
/// log!(logger, Level::ERROR, "Error code: {}", 500; "retryable" => false);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.log(
            $level,
            format!($fmt $(, $arg)*),
            &[$($crate::facade::Attr::new($key, $value)),+],
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), &[])
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use logbridge::prelude::*;
/// # let logger = StructuredHandler::new(Logger::new()).into_facade();
/// use logbridge::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10; "cache" => "warm");
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::facade::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::facade::Level::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use logbridge::prelude::*;
/// # let logger = StructuredHandler::new(Logger::new()).into_facade();
/// use logbridge::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::facade::Level::WARN, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::facade::Level::ERROR, $($arg)+)
    };
}
