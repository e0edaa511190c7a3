//! The facade shared by every backend
//!
//! Backends implement [`Logger::write_record`] and [`Logger::level`]; the
//! level methods (`debug` .. `critical`, `exception`) are provided.

use std::error::Error as StdError;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::report::{exception_text, DEFAULT_EXCEPTION_MESSAGE};
use crate::types::{LogLevel, LogRecord};

/// A log destination with its own minimum level
pub trait Logger: Send + Sync {
    /// Name used to identify this logger inside a fan-out
    fn name(&self) -> &str;

    /// Current minimum level
    fn level(&self) -> LogLevel;

    /// Change the minimum level
    fn set_level(&self, level: LogLevel);

    /// Emit a record unconditionally
    fn write_record(&self, record: &LogRecord);

    /// Release any held resources
    fn close(&self) {}

    /// Emit a record if it passes this logger's threshold
    fn log_record(&self, record: &LogRecord) {
        if record.level.passes(self.level()) {
            self.write_record(record);
        }
    }

    /// Build and emit a record if `level` passes this logger's threshold
    fn log(&self, level: LogLevel, text: &str) {
        if level.passes(self.level()) {
            self.write_record(&LogRecord::new(level, text));
        }
    }

    fn debug(&self, text: &str) {
        self.log(LogLevel::Debug, text);
    }

    fn info(&self, text: &str) {
        self.log(LogLevel::Info, text);
    }

    fn warning(&self, text: &str) {
        self.log(LogLevel::Warning, text);
    }

    fn error(&self, text: &str) {
        self.log(LogLevel::Error, text);
    }

    fn critical(&self, text: &str) {
        self.log(LogLevel::Critical, text);
    }

    /// Log `message` with the error's cause chain at Error level
    fn exception(&self, message: &str, error: &(dyn StdError + 'static)) {
        if LogLevel::Error.passes(self.level()) {
            self.write_record(&LogRecord::new(
                LogLevel::Error,
                exception_text(message, error),
            ));
        }
    }

    /// [`Logger::exception`] with the generic "Exception occurred" message
    fn exception_default(&self, error: &(dyn StdError + 'static)) {
        self.exception(DEFAULT_EXCEPTION_MESSAGE, error);
    }
}

/// A level that can be read and changed through a shared reference
#[derive(Debug)]
pub struct AtomicLevel(AtomicU8);

impl AtomicLevel {
    pub fn new(level: LogLevel) -> Self {
        Self(AtomicU8::new(level as u8))
    }

    pub fn get(&self) -> LogLevel {
        match self.0.load(Ordering::Relaxed) {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warning,
            3 => LogLevel::Error,
            _ => LogLevel::Critical,
        }
    }

    pub fn set(&self, level: LogLevel) {
        self.0.store(level as u8, Ordering::Relaxed);
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}
