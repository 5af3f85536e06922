//! Rotating file sink
//!
//! Appends pattern-formatted lines to a file and rotates it by size:
//! `app.log` → `app.log.1` → … → `app.log.N`, deleting whatever would become
//! `app.log.N+1`.

use crate::core::{LogRecord, LoggerError, PatternFormatter, Result, Sink};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Size cap and retention of a [`RotatingFileSink`]
///
/// # Examples
///
/// ```
/// use logix::sinks::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_bytes(5 * 1024 * 1024)
///     .with_max_files(3);
/// assert_eq!(policy.max_files, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate before a write would push the file past this size
    pub max_bytes: u64,
    /// Number of rotated files kept next to the active one
    pub max_files: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            max_files: 3,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes.max(1);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }
}

/// Verify that `path` can be used as a log file: create the parent directory
/// if needed and open the file for appending.
///
/// Returns `true` if a directory had to be created.
///
/// # Errors
///
/// [`LoggerError::SinkInit`] describing what could not be done.
pub fn probe_writable(path: &Path) -> Result<bool> {
    let mut created_dir = false;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::sink_init(
                    "file",
                    format!("cannot create directory '{}': {}", parent.display(), e),
                )
            })?;
            created_dir = true;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::sink_init(
                "file",
                format!("cannot open '{}' for writing: {}", path.display(), e),
            )
        })?;

    Ok(created_dir)
}

pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    formatter: PatternFormatter,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileSink {
    /// Open (or create) `path` for appending.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created or opened
    pub fn new<P: AsRef<Path>>(
        path: P,
        policy: RotationPolicy,
        formatter: PatternFormatter,
    ) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        probe_writable(&base_path)?;

        let (file, current_size) = Self::open(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            formatter,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    fn open(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::io_operation(
                    "reading log file metadata",
                    format!("cannot stat '{}'", path.display()),
                    e,
                )
            })?
            .len();
        Ok((file, size))
    }

    /// `base.N`
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::io_operation("flushing before rotation", "flush failed", e)
            })?;
        }

        if self.policy.max_files == 0 {
            // No history kept: start the file over
            let file = File::create(&self.base_path).map_err(|e| {
                LoggerError::io_operation(
                    "truncating log file",
                    format!("cannot truncate '{}'", self.base_path.display()),
                    e,
                )
            })?;
            self.writer = Some(BufWriter::new(file));
            self.current_size = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.policy.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest).map_err(|e| {
                LoggerError::io_operation(
                    "removing oldest rotated file",
                    format!("cannot remove '{}'", oldest.display()),
                    e,
                )
            })?;
        }

        for i in (1..self.policy.max_files).rev() {
            let from = self.backup_path(i);
            if from.exists() {
                let to = self.backup_path(i + 1);
                fs::rename(&from, &to).map_err(|e| {
                    LoggerError::io_operation(
                        "shifting rotated files",
                        format!("cannot rename '{}' to '{}'", from.display(), to.display()),
                        e,
                    )
                })?;
            }
        }

        if self.base_path.exists() {
            let first = self.backup_path(1);
            fs::rename(&self.base_path, &first).map_err(|e| {
                LoggerError::io_operation(
                    "rotating log file",
                    format!("cannot rename '{}'", self.base_path.display()),
                    e,
                )
            })?;
        }

        let (file, size) = Self::open(&self.base_path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        Ok(())
    }

    /// Keep logging into whatever file is at `base_path` after a failed rotation
    fn recover_after_failed_rotation(&mut self) -> Result<()> {
        if self.writer.is_none() {
            let (file, _) = Self::open(&self.base_path)?;
            self.writer = Some(BufWriter::new(file));
        }
        // Let the file grow past the cap rather than retrying on every record
        self.current_size = 0;
        Ok(())
    }

    pub fn current_size(&self) -> u64 {
        self.current_size
    }
}

impl Sink for RotatingFileSink {
    fn deliver(&mut self, record: &LogRecord) -> Result<()> {
        let mut line = self.formatter.format(record);
        line.push('\n');
        let len = line.len() as u64;

        if self.current_size > 0 && self.current_size + len > self.policy.max_bytes {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );
                self.recover_after_failed_rotation()?;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::delivery("file", "writer not initialized"))?;
        writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::delivery(
                "file",
                format!("cannot write to '{}': {}", self.base_path.display(), e),
            )
        })?;
        self.current_size += len;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use tempfile::tempdir;

    fn formatter() -> PatternFormatter {
        PatternFormatter::new("[%l] %v")
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("deeper").join("app.log");

        assert!(probe_writable(&log_path).unwrap());
        assert!(log_path.exists());
        // Second probe finds the directory in place
        assert!(!probe_writable(&log_path).unwrap());
    }

    #[test]
    fn test_probe_rejects_directory_path() {
        let dir = tempdir().unwrap();
        let err = probe_writable(dir.path()).unwrap_err();
        assert!(matches!(err, LoggerError::SinkInit { .. }));
    }

    #[test]
    fn test_appends_formatted_lines() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");

        let mut sink = RotatingFileSink::new(&log_path, RotationPolicy::new(), formatter()).unwrap();
        sink.deliver(&LogRecord::new(LogLevel::Info, "app", "hello")).unwrap();
        sink.deliver(&LogRecord::new(LogLevel::Warn, "app", "careful")).unwrap();
        sink.flush().unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content, "[info] hello\n[warn] careful\n");
        assert_eq!(sink.current_size(), content.len() as u64);
    }

    #[test]
    fn test_reopen_keeps_existing_size() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");
        fs::write(&log_path, "previous run\n").unwrap();

        let sink = RotatingFileSink::new(&log_path, RotationPolicy::new(), formatter()).unwrap();
        assert_eq!(sink.current_size(), 13);
    }

    #[test]
    fn test_rotation_by_size() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");
        let policy = RotationPolicy::new().with_max_bytes(100).with_max_files(3);

        let mut sink = RotatingFileSink::new(&log_path, policy, formatter()).unwrap();
        for i in 0..20 {
            let record = LogRecord::new(LogLevel::Info, "app", format!("Test message number {}", i));
            sink.deliver(&record).unwrap();
        }
        sink.flush().unwrap();

        assert!(dir.path().join("rotation.log.1").exists());
        assert!(fs::metadata(&log_path).unwrap().len() <= 100);
    }

    #[test]
    fn test_retention_is_bounded() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("multi.log");
        let policy = RotationPolicy::new().with_max_bytes(50).with_max_files(2);

        let mut sink = RotatingFileSink::new(&log_path, policy, formatter()).unwrap();
        for i in 0..100 {
            sink.deliver(&LogRecord::new(LogLevel::Info, "app", format!("Entry {}", i)))
                .unwrap();
        }
        sink.flush().unwrap();

        let log_files: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().to_str().map(String::from))
            .filter(|name| name.starts_with("multi.log"))
            .collect();

        assert_eq!(log_files.len(), 3, "files: {:?}", log_files);
        assert!(!dir.path().join("multi.log.3").exists());

        // The newest record is in the active file, the one before it in .1
        let active = fs::read_to_string(&log_path).unwrap();
        assert!(active.contains("Entry 99"));
    }

    #[test]
    fn test_zero_history_truncates() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("single.log");
        let policy = RotationPolicy::new().with_max_bytes(30).with_max_files(0);

        let mut sink = RotatingFileSink::new(&log_path, policy, formatter()).unwrap();
        for i in 0..10 {
            sink.deliver(&LogRecord::new(LogLevel::Info, "app", format!("line {}", i)))
                .unwrap();
        }
        sink.flush().unwrap();

        assert!(!dir.path().join("single.log.1").exists());
        assert!(fs::metadata(&log_path).unwrap().len() <= 30);
    }

    #[test]
    fn test_oversized_record_still_written() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("big.log");
        let policy = RotationPolicy::new().with_max_bytes(10).with_max_files(1);

        let mut sink = RotatingFileSink::new(&log_path, policy, formatter()).unwrap();
        let long = "x".repeat(64);
        sink.deliver(&LogRecord::new(LogLevel::Info, "app", &long)).unwrap();
        sink.flush().unwrap();

        assert!(fs::read_to_string(&log_path).unwrap().contains(&long));
    }
}
