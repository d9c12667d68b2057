//! Logging configuration
//!
//! Defaults reproduce the stock setup: a JSON file sink at `./logs/app.log`
//! rotated at 10 MB with 3 compressed backups kept for 28 days, and a
//! console sink on stdout, both gated at Info.
//!
//! # Example
//!
//! ```
//! use logbridge::config::LoggingConfig;
//! use logbridge::LogLevel;
//!
//! let config = LoggingConfig::from_toml_str(
//!     r#"
//!     level = "debug"
//!
//!     [file]
//!     path = "./var/log/commitgen.log"
//!     max_backups = 5
//!
//!     [console]
//!     enabled = false
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.level, LogLevel::Debug);
//! assert_eq!(config.file.max_backups, 5);
//! assert_eq!(config.file.max_size_mb, 10);
//! assert!(!config.console.enabled);
//! ```

use crate::appenders::{ConsoleAppender, ConsoleStream, RotatingFileAppender, RotationPolicy};
use crate::core::{
    EncoderConfig, Encoding, LevelFormat, LogLevel, Logger, LoggerError, Result, TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding [`LoggingConfig::level`]
pub const LEVEL_ENV: &str = "LOGBRIDGE_LEVEL";

const SECS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Threshold of the gate shared by every sink
    pub level: LogLevel,
    /// Key holding the timestamp in JSON output
    pub time_key: String,
    pub timestamp_format: TimestampFormat,
    pub file: FileSinkConfig,
    pub console: ConsoleSinkConfig,
    /// Also route the `log` crate macros to the installed logger
    pub bridge_log_crate: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            time_key: "timestamp".to_string(),
            timestamp_format: TimestampFormat::Iso8601,
            file: FileSinkConfig::default(),
            console: ConsoleSinkConfig::default(),
            bridge_log_crate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSinkConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub max_size_mb: u64,
    /// Rotated files to keep
    pub max_backups: usize,
    /// Age in days after which rotated files are deleted; 0 keeps them
    pub max_age_days: u64,
    /// Gzip rotated files
    pub compress: bool,
    pub encoding: Encoding,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("./logs/app.log"),
            max_size_mb: 10,
            max_backups: 3,
            max_age_days: 28,
            compress: true,
            encoding: Encoding::Json,
        }
    }
}

impl FileSinkConfig {
    pub fn rotation_policy(&self) -> RotationPolicy {
        let policy = RotationPolicy::new()
            .with_max_size(self.max_size_mb.saturating_mul(1024 * 1024))
            .with_max_backups(self.max_backups)
            .with_compression(self.compress);

        if self.max_age_days == 0 {
            policy
        } else {
            policy.with_max_age(Duration::from_secs(
                self.max_age_days.saturating_mul(SECS_PER_DAY),
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSinkConfig {
    pub enabled: bool,
    pub stream: ConsoleStream,
    pub encoding: Encoding,
    pub separator: String,
    pub colors: bool,
}

impl Default for ConsoleSinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stream: ConsoleStream::Stdout,
            encoding: Encoding::Console,
            separator: " | ".to_string(),
            colors: false,
        }
    }
}

impl LoggingConfig {
    /// # Errors
    ///
    /// Returns [`LoggerError::ConfigParse`] for malformed TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "load logging config",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&source)
    }

    /// Apply `LOGBRIDGE_LEVEL` if set
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] for an unknown level name.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(LEVEL_ENV) {
            self.level = raw
                .trim()
                .parse()
                .map_err(|e: String| LoggerError::config(LEVEL_ENV, e))?;
        }
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] naming the offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.time_key.is_empty() {
            return Err(LoggerError::config("time_key", "must not be empty"));
        }
        if self.file.enabled {
            if self.file.path.as_os_str().is_empty() {
                return Err(LoggerError::config("file.path", "must not be empty"));
            }
            if self.file.max_size_mb == 0 {
                return Err(LoggerError::config("file.max_size_mb", "must be at least 1"));
            }
        }
        if self.console.enabled && self.console.separator.is_empty() {
            return Err(LoggerError::config("console.separator", "must not be empty"));
        }
        Ok(())
    }

    fn encoder(&self, encoding: Encoding) -> EncoderConfig {
        EncoderConfig {
            encoding,
            ..EncoderConfig::json()
        }
        .with_time_key(self.time_key.clone())
        .with_timestamp_format(self.timestamp_format.clone())
    }

    /// Build the core logger with every enabled sink on one shared gate
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the log file cannot be opened.
    pub fn build_logger(&self) -> Result<Logger> {
        self.validate()?;

        let mut builder = Logger::builder().min_level(self.level);

        if self.file.enabled {
            let appender =
                RotatingFileAppender::with_policy(&self.file.path, self.file.rotation_policy())?
                    .with_encoder(self.encoder(self.file.encoding));
            builder = builder.appender(appender);
        }

        if self.console.enabled {
            let level_format = if self.console.colors {
                LevelFormat::CapitalColor
            } else {
                LevelFormat::Capital
            };
            let encoder = self
                .encoder(self.console.encoding)
                .with_separator(self.console.separator.clone())
                .with_level_format(level_format);
            let appender = ConsoleAppender::new()
                .with_stream(self.console.stream)
                .with_encoder(encoder);
            builder = builder.appender(appender);
        }

        Ok(builder.build())
    }
}
