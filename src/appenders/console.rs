//! Console appender implementation

use crate::core::{Appender, EncoderConfig, LevelFormat, LogEntry, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Standard stream a console appender writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

pub struct ConsoleAppender {
    stream: ConsoleStream,
    encoder: EncoderConfig,
}

impl ConsoleAppender {
    /// Human-readable layout on stdout
    pub fn new() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
            encoder: EncoderConfig::console(),
        }
    }

    #[must_use]
    pub fn with_stream(mut self, stream: ConsoleStream) -> Self {
        self.stream = stream;
        self
    }

    /// Replace the encoder, e.g. to print JSON to the console
    ///
    /// # Example
    ///
    /// ```
    /// use logbridge::appenders::ConsoleAppender;
    /// use logbridge::EncoderConfig;
    ///
    /// let appender = ConsoleAppender::new().with_encoder(EncoderConfig::json());
    /// ```
    #[must_use]
    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.encoder.level_format = if use_colors {
            LevelFormat::CapitalColor
        } else {
            LevelFormat::Capital
        };
        self
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    pub fn encoder(&self) -> &EncoderConfig {
        &self.encoder
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let line = self.encoder.encode(entry);

        // One write_all on a locked handle keeps the record contiguous even
        // when other code prints to the same stream.
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().lock().write_all(line.as_bytes())?,
            ConsoleStream::Stderr => std::io::stderr().lock().write_all(line.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush()?,
            ConsoleStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
