//! File backend with size-based rotation
//!
//! After every write the file size is checked against `max_size_bytes`.
//! Rotation shifts `log.1 -> log.2 ... log.N-1 -> log.N`, moves the live file
//! to `log.1` and opens a fresh one. Anything past `backup_count` is removed.
//!
//! I/O failures never propagate to the caller: they are reported through
//! tracing, the handle is dropped and the next write tries to reopen.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use mlog_core::prelude::*;
use mlog_core::{
    AtomicLevel, FileSettings, LogLevel, LogRecord, Logger, OpenMode, TimestampFormat,
};

/// Logger that appends formatted lines to a file
pub struct FileLogger {
    name: String,
    level: AtomicLevel,
    settings: FileSettings,
    format: RwLock<TimestampFormat>,
    state: Mutex<FileState>,
}

#[derive(Default)]
struct FileState {
    file: Option<File>,
    /// Set after the first successful open; later opens always append
    opened: bool,
}

/// Path of the `index`-th backup next to `path`
pub fn backup_path(path: &Path, index: u32) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

fn check_encoding(encoding: &str) -> Result<()> {
    match encoding.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => Ok(()),
        _ => Err(Error::UnsupportedEncoding {
            encoding: encoding.to_string(),
        }),
    }
}

impl FileLogger {
    /// Create a file logger; the file is opened immediately
    ///
    /// Only the encoding is validated here. A file that cannot be opened
    /// yet is reported and retried on the first write.
    pub fn new(settings: FileSettings) -> Result<Self> {
        check_encoding(&settings.encoding)?;

        let logger = Self {
            name: "file".to_string(),
            level: AtomicLevel::new(settings.level),
            format: RwLock::new(settings.timestamp_format.clone()),
            settings,
            state: Mutex::new(FileState::default()),
        };

        if let Ok(mut state) = logger.state.lock() {
            logger.open(&mut state);
        }

        Ok(logger)
    }

    /// Shorthand for a logger at `path` with default settings
    pub fn at_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::new(FileSettings::for_path(path))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.settings.filename
    }

    /// Switch the timestamp format for subsequent lines
    pub fn set_timestamp_format(&self, format: &str) -> Result<()> {
        let format = TimestampFormat::new(format)?;
        if let Ok(mut current) = self.format.write() {
            *current = format;
        }
        Ok(())
    }

    /// Whether a file handle is currently open
    pub fn is_open(&self) -> bool {
        self.state.lock().map(|s| s.file.is_some()).unwrap_or(false)
    }

    fn open(&self, state: &mut FileState) {
        let truncate = !state.opened && self.settings.open_mode == OpenMode::Overwrite;
        match self.open_file(truncate) {
            Ok(file) => {
                debug!("Opened log file {:?} (truncate={})", self.path(), truncate);
                state.file = Some(file);
                state.opened = true;
            }
            Err(e) => {
                error!("{}", e);
                state.file = None;
            }
        }
    }

    fn open_file(&self, truncate: bool) -> Result<File> {
        let path = self.path();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                Error::log_file(path, format!("cannot create directory {:?}: {}", dir, e))
            })?;
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        options
            .open(path)
            .map_err(|e| Error::log_file(path, format!("cannot open: {}", e)))
    }

    fn rotate_if_needed(&self, state: &mut FileState) {
        let max = self.settings.max_size_bytes;
        if max == 0 {
            return;
        }
        let Some(file) = state.file.as_ref() else {
            return;
        };

        let size = match file.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("Could not stat log file {:?}: {}", self.path(), e);
                return;
            }
        };
        if size < max {
            return;
        }

        state.file = None;
        if let Err(e) = self.rotate_files() {
            error!("{}", Error::log_file(self.path(), format!("rotation failed: {}", e)));
        }
        self.open(state);
    }

    fn rotate_files(&self) -> std::io::Result<()> {
        let path = self.path();
        let count = self.settings.backup_count;

        if count == 0 {
            // No backups kept: start the live file over
            File::create(path)?;
            return Ok(());
        }

        for i in (1..count).rev() {
            let src = backup_path(path, i);
            let dst = backup_path(path, i + 1);
            if src.exists() {
                if dst.exists() {
                    fs::remove_file(&dst)?;
                }
                fs::rename(&src, &dst)?;
            }
        }

        let first = backup_path(path, 1);
        if first.exists() {
            fs::remove_file(&first)?;
        }
        fs::rename(path, &first)?;
        info!("Rotated log file {:?}", path);
        Ok(())
    }
}

impl Logger for FileLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> LogLevel {
        self.level.get()
    }

    fn set_level(&self, level: LogLevel) {
        self.level.set(level);
    }

    fn write_record(&self, record: &LogRecord) {
        let line = match self.format.read() {
            Ok(format) => mlog_core::format_line(&format, record),
            Err(_) => mlog_core::format_line(&self.settings.timestamp_format, record),
        };
        let Ok(mut state) = self.state.lock() else {
            warn!("file logger lock poisoned, dropping line");
            return;
        };

        if state.file.is_none() {
            self.open(&mut state);
        }

        let Some(file) = state.file.as_mut() else {
            return;
        };

        if let Err(e) = writeln!(file, "{}", line).and_then(|_| file.flush()) {
            error!("{}", Error::log_file(self.path(), format!("write failed: {}", e)));
            state.file = None;
            return;
        }

        self.rotate_if_needed(&mut state);
    }

    fn close(&self) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(mut file) = state.file.take() {
                let _ = file.flush();
            }
        }
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        self.close();
    }
}
