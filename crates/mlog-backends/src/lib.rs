//! mlog-backends - Non-interactive logging backends for Modern Logger
//!
//! - [`ConsoleLogger`] - coloured lines on stdout/stderr
//! - [`FileLogger`] - file output with size-based rotation
//! - [`MultiLogger`] - fan-out to any set of [`mlog_core::Logger`]s

pub mod console;
pub mod file;
pub mod multi;

pub use console::{init_colors, ConsoleLogger, DEFAULT_COLORS};
pub use file::{backup_path, FileLogger};
pub use multi::MultiLogger;
