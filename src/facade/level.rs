//! Facade severity levels

use std::fmt;

/// Severity on the facade's open integer scale
///
/// The four named levels are spaced four apart so callers can slot custom
/// severities between them. Any other value is a legal level that handlers
/// are free to treat as unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(pub i32);

impl Level {
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);

    /// True for the four named levels
    pub fn is_named(self) -> bool {
        matches!(self, Level::DEBUG | Level::INFO | Level::WARN | Level::ERROR)
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Level(value)
    }
}

impl fmt::Display for Level {
    /// Named levels print bare; others print relative to the named level
    /// below them, e.g. `INFO+2` or `DEBUG-4`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, base) = if *self < Level::INFO {
            ("DEBUG", Level::DEBUG)
        } else if *self < Level::WARN {
            ("INFO", Level::INFO)
        } else if *self < Level::ERROR {
            ("WARN", Level::WARN)
        } else {
            ("ERROR", Level::ERROR)
        };

        let offset = self.0 - base.0;
        if offset == 0 {
            f.write_str(name)
        } else {
            write!(f, "{}{:+}", name, offset)
        }
    }
}
