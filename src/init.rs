//! One-shot process-wide logging setup

use crate::bridge::StructuredHandler;
use crate::config::LoggingConfig;
use crate::core::{Logger, LoggerError, Result};
use crate::facade::{self, log_bridge};
use once_cell::sync::OnceCell;

static INSTALLED: OnceCell<Logger> = OnceCell::new();

/// Build the configured logger and install it as the default facade logger
///
/// Returns the core logger so the caller can [`Logger::sync`] before the
/// process exits. Only the first successful call builds sinks.
///
/// # Errors
///
/// Returns [`LoggerError::AlreadyInitialized`] on any later call, and
/// configuration or I/O errors if the sinks cannot be built.
///
/// # Example
///
/// ```no_run
/// use logbridge::config::LoggingConfig;
/// use logbridge::facade::{self, Attr};
///
/// let logger = logbridge::init(&LoggingConfig::default()).unwrap();
/// facade::info("build started", &[Attr::new("target", "release")]);
/// logger.sync().unwrap();
/// ```
pub fn init(config: &LoggingConfig) -> Result<Logger> {
    if INSTALLED.get().is_some() || facade::is_initialized() {
        return Err(LoggerError::already_initialized("default facade logger"));
    }

    let mut built_here = false;

    let logger = INSTALLED.get_or_try_init(|| -> Result<Logger> {
        let logger = config.build_logger()?;
        facade::set_default(StructuredHandler::new(logger.clone()).into_facade())?;

        if config.bridge_log_crate {
            if let Err(e) = log_bridge::install() {
                eprintln!("[LOGGER WARNING] log crate records will not be captured: {}", e);
            }
        }

        built_here = true;
        Ok(logger)
    })?;

    if !built_here {
        return Err(LoggerError::already_initialized("logging"));
    }
    Ok(logger.clone())
}

/// [`init`] with the default configuration and environment overrides
///
/// # Errors
///
/// See [`init`]; also fails if `LOGBRIDGE_LEVEL` names an unknown level.
pub fn init_default() -> Result<Logger> {
    init(&LoggingConfig::default().with_env_overrides()?)
}

/// The logger installed by [`init`], if any
pub fn installed() -> Option<&'static Logger> {
    INSTALLED.get()
}
