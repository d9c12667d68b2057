//! Routes records from the `log` crate macros to the default facade logger
//!
//! The facade has no level below DEBUG, so `log::Level::Trace` is folded into
//! DEBUG and stays behind the same gate as debug records.

use super::global::default_logger;
use super::level::Level;
use super::value::{Attr, Value};
use crate::core::{LoggerError, Result};
use log::kv::{self, VisitSource};

/// Facade level for a `log` crate level
pub fn facade_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::ERROR,
        log::Level::Warn => Level::WARN,
        log::Level::Info => Level::INFO,
        log::Level::Debug | log::Level::Trace => Level::DEBUG,
    }
}

/// `log::Log` implementation forwarding to [`default_logger`]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBridge;

static LOG_BRIDGE: LogBridge = LogBridge;

/// Make [`LogBridge`] the `log` crate backend
///
/// # Errors
///
/// Fails when another `log` backend is already installed.
pub fn install() -> Result<()> {
    log::set_logger(&LOG_BRIDGE)
        .map_err(|e| LoggerError::already_initialized(format!("log crate backend ({})", e)))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        default_logger().is_some_and(|logger| logger.enabled(facade_level(metadata.level())))
    }

    fn log(&self, record: &log::Record<'_>) {
        let Some(logger) = default_logger() else {
            return;
        };
        let level = facade_level(record.level());
        if !logger.enabled(level) {
            return;
        }

        let mut collector = AttrCollector::default();
        if let Err(e) = record.key_values().visit(&mut collector) {
            eprintln!("[LOGGER ERROR] Failed to read log record key-values: {}", e);
        }

        logger.log(level, record.args().to_string(), &collector.attrs);
    }

    fn flush(&self) {}
}

#[derive(Default)]
struct AttrCollector {
    attrs: Vec<Attr>,
}

impl<'kvs> VisitSource<'kvs> for AttrCollector {
    fn visit_pair(
        &mut self,
        key: kv::Key<'kvs>,
        value: kv::Value<'kvs>,
    ) -> std::result::Result<(), kv::Error> {
        self.attrs.push(Attr {
            key: key.as_str().to_string(),
            value: kv_value(&value),
        });
        Ok(())
    }
}

fn kv_value(value: &kv::Value<'_>) -> Value {
    if let Some(s) = value.to_borrowed_str() {
        Value::String(s.to_string())
    } else if let Some(b) = value.to_bool() {
        Value::Bool(b)
    } else if let Some(i) = value.to_i64() {
        Value::Int64(i)
    } else if let Some(u) = value.to_u64() {
        Value::Uint64(u)
    } else if let Some(f) = value.to_f64() {
        Value::Float64(f)
    } else {
        Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(facade_level(log::Level::Error), Level::ERROR);
        assert_eq!(facade_level(log::Level::Warn), Level::WARN);
        assert_eq!(facade_level(log::Level::Info), Level::INFO);
        assert_eq!(facade_level(log::Level::Debug), Level::DEBUG);
        assert_eq!(facade_level(log::Level::Trace), Level::DEBUG);
    }

    #[test]
    fn test_kv_values_keep_type() {
        assert_eq!(kv_value(&kv::Value::from(42i64)), Value::Int64(42));
        assert_eq!(kv_value(&kv::Value::from(true)), Value::Bool(true));
        assert_eq!(kv_value(&kv::Value::from(1.5f64)), Value::Float64(1.5));
        assert_eq!(
            kv_value(&kv::Value::from("abc123")),
            Value::String("abc123".to_string())
        );
    }

    #[test]
    fn test_collector_preserves_order() {
        let pairs = [("a", 1i64), ("b", 2i64)];
        let mut collector = AttrCollector::default();
        kv::Source::visit(&pairs[..], &mut collector).unwrap();

        let keys: Vec<&str> = collector.attrs.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
