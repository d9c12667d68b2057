//! Generic attribute-based logging facade
//!
//! Application code logs through a [`FacadeLogger`]; what happens to the
//! records is decided by the [`Handler`] behind it.

pub mod global;
pub mod handler;
pub mod level;
pub mod log_bridge;
pub mod logger;
pub mod record;
pub mod value;

pub use global::{debug, default_logger, error, info, is_initialized, log, set_default, warn};
pub use handler::Handler;
pub use level::Level;
pub use log_bridge::LogBridge;
pub use logger::FacadeLogger;
pub use record::Record;
pub use value::{Attr, Value};
