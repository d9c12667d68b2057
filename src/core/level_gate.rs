//! Runtime-adjustable minimum severity shared between sinks

use super::log_level::LogLevel;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Decides whether a sink accepts records of a given severity.
pub trait LevelEnabler: Send + Sync {
    fn enabled(&self, level: LogLevel) -> bool;
}

/// Shared minimum-severity threshold.
///
/// Clones share the same atomic, so a single [`LevelGate::set_level`] is seen
/// by every sink and every derived logger holding a clone without locking.
///
/// ```
/// use logbridge::core::{LevelEnabler, LevelGate, LogLevel};
///
/// let gate = LevelGate::new(LogLevel::Info);
/// let shared = gate.clone();
/// assert!(!shared.enabled(LogLevel::Debug));
///
/// gate.set_level(LogLevel::Debug);
/// assert!(shared.enabled(LogLevel::Debug));
/// ```
#[derive(Clone)]
pub struct LevelGate {
    threshold: Arc<AtomicU8>,
}

impl LevelGate {
    pub fn new(level: LogLevel) -> Self {
        Self {
            threshold: Arc::new(AtomicU8::new(level.as_u8())),
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.threshold.load(Ordering::Acquire))
    }

    pub fn set_level(&self, level: LogLevel) {
        self.threshold.store(level.as_u8(), Ordering::Release);
    }

    /// True when both handles observe the same threshold
    pub fn shares_with(&self, other: &LevelGate) -> bool {
        Arc::ptr_eq(&self.threshold, &other.threshold)
    }
}

impl Default for LevelGate {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl LevelEnabler for LevelGate {
    #[inline]
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }
}

impl fmt::Debug for LevelGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelGate").field("level", &self.level()).finish()
    }
}

/// Fixed threshold that cannot be changed after construction
impl LevelEnabler for LogLevel {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= *self
    }
}
