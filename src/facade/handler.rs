//! The backend contract every facade logger delegates to

use super::level::Level;
use super::record::Record;
use super::value::Attr;
use crate::core::Result;
use std::sync::Arc;

/// Backend for [`super::FacadeLogger`]
///
/// `with_attrs` and `with_group` return new handlers; the receiver must stay
/// unchanged so loggers derived from it keep their own context.
pub trait Handler: Send + Sync {
    /// Whether a record at `level` would be handled
    fn enabled(&self, level: Level) -> bool;

    /// Process one record
    ///
    /// Only called after `enabled` returned true for the record's level.
    fn handle(&self, record: &Record) -> Result<()>;

    /// A handler that adds `attrs` to every record it handles
    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler>;

    /// A handler that qualifies every record with `name`
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}
