//! Rotating file appender with size-triggered rotation
//!
//! Before a record would push the active file past the size limit, the file
//! is renamed to `<name>.1` and older backups shift up by one index. Then:
//! - backups beyond the retention count are deleted
//! - backups older than the maximum age are expired
//! - with compression on, rotated files become `<name>.<n>.gz`

use crate::core::appender::Appender;
use crate::core::encoder::EncoderConfig;
use crate::core::error::{LoggerError, Result};
use crate::core::log_entry::LogEntry;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// When to rotate the active file
#[derive(Debug, Clone, PartialEq)]
pub enum RotationStrategy {
    /// Rotate before a write would take the file past `max_bytes`
    Size { max_bytes: u64 },

    /// No rotation (useful for testing or when external rotation is used)
    Never,
}

impl Default for RotationStrategy {
    fn default() -> Self {
        RotationStrategy::Size {
            max_bytes: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl RotationStrategy {
    #[must_use]
    pub fn size(max_bytes: u64) -> Self {
        RotationStrategy::Size { max_bytes }
    }

    #[must_use]
    pub fn size_mb(megabytes: u64) -> Self {
        RotationStrategy::Size {
            max_bytes: megabytes.saturating_mul(1024 * 1024),
        }
    }
}

/// Configuration for rotating file appender
///
/// # Examples
///
/// ```
/// use logbridge::appenders::{RotationPolicy, RotationStrategy};
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_strategy(RotationStrategy::size_mb(10))
///     .with_max_backups(3)
///     .with_max_age(Duration::from_secs(28 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_file_size(), Some(10 * 1024 * 1024));
/// ```
#[derive(Debug, Clone)]
pub struct RotationPolicy {
    pub strategy: RotationStrategy,
    /// Maximum number of rotated files to keep; 0 keeps none
    pub max_backup_files: usize,
    /// Rotated files older than this are deleted; `None` keeps them
    pub max_age: Option<Duration>,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::default(),
            max_backup_files: 3,
            max_age: None,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_strategy(mut self, strategy: RotationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Shorthand for `with_strategy(RotationStrategy::Size { max_bytes: size })`
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.strategy = RotationStrategy::Size { max_bytes: size };
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backup_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use]
    pub fn max_file_size(&self) -> Option<u64> {
        match &self.strategy {
            RotationStrategy::Size { max_bytes } => Some(*max_bytes),
            RotationStrategy::Never => None,
        }
    }
}

/// File appender that rotates, expires and compresses its backups
///
/// # Examples
///
/// ```no_run
/// use logbridge::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let policy = RotationPolicy::new().with_max_size(1024 * 1024).with_compression(true);
/// let appender = RotatingFileAppender::with_policy("./logs/app.log", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    encoder: EncoderConfig,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    /// Counter for consecutive deletion failures (reset on successful deletion)
    deletion_failure_count: usize,
}

impl RotatingFileAppender {
    /// Create a rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_active(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            encoder: EncoderConfig::json(),
            writer: Some(BufWriter::new(file)),
            current_size,
            deletion_failure_count: 0,
        })
    }

    /// Set the encoder used for each line (JSON by default)
    #[must_use]
    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    fn open_active(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        match self.policy.strategy {
            RotationStrategy::Never => false,
            // An oversized record still lands in a fresh file
            RotationStrategy::Size { max_bytes } => {
                self.current_size > 0 && self.current_size + incoming > max_bytes
            }
        }
    }

    /// Perform log rotation
    fn rotate(&mut self) -> Result<()> {
        // Explicitly drop writer to release file handle before renaming
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let max_backups = self.policy.max_backup_files;
        if max_backups == 0 {
            if self.base_path.exists() {
                fs::remove_file(&self.base_path).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to discard full log file: {}", e),
                    )
                })?;
            }
        } else {
            self.remove_oldest_backup(max_backups)?;
            self.shift_backups(max_backups)?;

            let backup_path = self.backup_path(1);
            if self.base_path.exists() {
                fs::rename(&self.base_path, &backup_path).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to rotate current log file: {}", e),
                    )
                })?;

                if self.policy.compress {
                    self.compress_file(&backup_path)?;
                }
            }

            self.remove_expired_backups(SystemTime::now());
        }

        let (file, size) = Self::open_active(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;

        Ok(())
    }

    /// Delete the backup at index `max_backups` so the shift has room
    fn remove_oldest_backup(&mut self, max_backups: usize) -> Result<()> {
        const MAX_DELETION_FAILURES: usize = 5;

        let oldest = self.backup_path(max_backups);
        let mut deletion_failed = false;

        for candidate in [gz_path(&oldest), oldest] {
            if candidate.exists() {
                if let Err(e) = fs::remove_file(&candidate) {
                    deletion_failed = true;
                    eprintln!(
                        "[WARN] Failed to remove oldest backup {}: {} (failure #{}/{})",
                        candidate.display(),
                        e,
                        self.deletion_failure_count + 1,
                        MAX_DELETION_FAILURES
                    );
                }
            }
        }

        if deletion_failed {
            self.deletion_failure_count += 1;
            if self.deletion_failure_count >= MAX_DELETION_FAILURES {
                return Err(LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!(
                        "Rotation aborted: failed to delete old backup files {} consecutive times",
                        self.deletion_failure_count
                    ),
                ));
            }
        } else {
            self.deletion_failure_count = 0;
        }

        Ok(())
    }

    /// Move `.n` (and `.n.gz`) to `.n+1`, newest last
    fn shift_backups(&self, max_backups: usize) -> Result<()> {
        for i in (1..max_backups).rev() {
            let old_path = self.backup_path(i);
            let new_path = self.backup_path(i + 1);

            for (from, to) in [
                (gz_path(&old_path), gz_path(&new_path)),
                (old_path, new_path),
            ] {
                if !from.exists() {
                    continue;
                }
                if fs::rename(&from, &to).is_err() {
                    // Some platforms refuse to replace an existing destination
                    if to.exists() {
                        let _ = fs::remove_file(&to);
                    }
                    fs::rename(&from, &to).map_err(|e| {
                        LoggerError::file_rotation(
                            from.display().to_string(),
                            format!("Failed to rotate backup files: {}", e),
                        )
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Delete backups whose modification time is older than the maximum age
    ///
    /// Returns the number of files removed. Failures are reported and skipped.
    fn remove_expired_backups(&self, now: SystemTime) -> usize {
        let Some(max_age) = self.policy.max_age else {
            return 0;
        };

        let mut removed = 0;
        for i in 1..=self.policy.max_backup_files {
            let plain = self.backup_path(i);
            for candidate in [gz_path(&plain), plain] {
                let Ok(modified) = fs::metadata(&candidate).and_then(|m| m.modified()) else {
                    continue;
                };
                let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
                if age <= max_age {
                    continue;
                }
                match fs::remove_file(&candidate) {
                    Ok(()) => removed += 1,
                    Err(e) => eprintln!(
                        "[WARN] Failed to remove expired backup {}: {}",
                        candidate.display(),
                        e
                    ),
                }
            }
        }
        removed
    }

    /// Get backup file path for given index
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    /// Compress a rotated file, deleting the original only on success
    ///
    /// Data is streamed through the encoder so large files are never loaded
    /// into memory at once.
    fn compress_file(&self, path: &Path) -> Result<()> {
        use std::io::{BufReader, Read};

        let gz = gz_path(path);
        let mut temp_gz = gz.clone().into_os_string();
        temp_gz.push(".tmp");
        let temp_gz = PathBuf::from(temp_gz);

        let input = File::open(path).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to open file for compression: {}", path.display()),
                e,
            )
        })?;
        let mut reader = BufReader::with_capacity(64 * 1024, input);

        let output = File::create(&temp_gz).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to create temporary compressed file: {}", temp_gz.display()),
                e,
            )
        })?;
        let mut encoder = flate2::write::GzEncoder::new(
            BufWriter::with_capacity(64 * 1024, output),
            flate2::Compression::default(),
        );

        let mut buffer = vec![0u8; 64 * 1024];
        loop {
            let bytes_read = reader.read(&mut buffer).map_err(|e| {
                let _ = fs::remove_file(&temp_gz);
                LoggerError::io_operation(
                    "compress log file",
                    format!("Failed to read from file: {}", path.display()),
                    e,
                )
            })?;

            if bytes_read == 0 {
                break;
            }

            encoder.write_all(&buffer[..bytes_read]).map_err(|e| {
                let _ = fs::remove_file(&temp_gz);
                LoggerError::io_operation("compress log file", "Failed to compress data chunk", e)
            })?;
        }

        let mut inner = encoder.finish().map_err(|e| {
            let _ = fs::remove_file(&temp_gz);
            LoggerError::io_operation("compress log file", "Failed to finish compression", e)
        })?;
        inner.flush().map_err(|e| {
            let _ = fs::remove_file(&temp_gz);
            LoggerError::io_operation("compress log file", "Failed to flush compressed file", e)
        })?;
        drop(inner);

        fs::rename(&temp_gz, &gz).map_err(|e| {
            let _ = fs::remove_file(&temp_gz);
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to rename compressed file to: {}", gz.display()),
                e,
            )
        })?;

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[WARN] Compression succeeded but failed to remove original file {}: {}. \
                Both compressed and uncompressed versions exist.",
                path.display(),
                e
            );
        }

        Ok(())
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

/// `app.log.1` -> `app.log.1.gz`
fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let line = self.encoder.encode(entry);
        let bytes_written = line.len() as u64;

        if self.should_rotate(bytes_written) {
            if let Err(e) = self.rotate() {
                // Keep logging to the current file rather than losing records
                eprintln!("[WARN] Log rotation failed: {}. Continuing with current file.", e);

                if self.writer.is_none() {
                    let (file, size) = Self::open_active(&self.base_path).map_err(|reopen_err| {
                        eprintln!(
                            "[ERROR] Failed to reopen log file after rotation failure: {}",
                            reopen_err
                        );
                        e
                    })?;
                    self.writer = Some(BufWriter::new(file));
                    self.current_size = size;
                }

                // Prevent a rotation attempt on every subsequent record
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;

        writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += bytes_written;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
            writer.get_ref().sync_data()?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
