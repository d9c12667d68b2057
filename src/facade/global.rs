//! Process-wide default facade logger
//!
//! The default can be installed once. Before that, the free functions in
//! this module discard their records.

use super::level::Level;
use super::logger::FacadeLogger;
use super::value::Attr;
use crate::core::{LoggerError, Result};
use once_cell::sync::OnceCell;

static DEFAULT: OnceCell<FacadeLogger> = OnceCell::new();

/// Install `logger` as the process default
///
/// # Errors
///
/// Returns [`LoggerError::AlreadyInitialized`] if a default is already set.
pub fn set_default(logger: FacadeLogger) -> Result<()> {
    DEFAULT
        .set(logger)
        .map_err(|_| LoggerError::already_initialized("default facade logger"))
}

pub fn default_logger() -> Option<&'static FacadeLogger> {
    DEFAULT.get()
}

pub fn is_initialized() -> bool {
    DEFAULT.get().is_some()
}

/// Log through the default logger, if one is installed
pub fn log(level: Level, message: impl Into<String>, attrs: &[Attr]) {
    if let Some(logger) = DEFAULT.get() {
        logger.log(level, message, attrs);
    }
}

pub fn debug(message: impl Into<String>, attrs: &[Attr]) {
    log(Level::DEBUG, message, attrs);
}

pub fn info(message: impl Into<String>, attrs: &[Attr]) {
    log(Level::INFO, message, attrs);
}

pub fn warn(message: impl Into<String>, attrs: &[Attr]) {
    log(Level::WARN, message, attrs);
}

pub fn error(message: impl Into<String>, attrs: &[Attr]) {
    log(Level::ERROR, message, attrs);
}
