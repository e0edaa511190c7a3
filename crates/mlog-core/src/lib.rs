//! # mlog-core - Core Types for Modern Logger
//!
//! Foundation crate shared by every backend and the log widget. It only
//! depends on external crates (serde, chrono, thiserror, toml, tracing).
//!
//! ## Public API
//!
//! ### Records (`types`)
//! - [`LogLevel`] - Ordered severity (Debug < Info < Warning < Error < Critical)
//! - [`LogRecord`] - Timestamp, level and text of one log call
//!
//! ### Facade (`logger`)
//! - [`Logger`] - Trait implemented by every backend; provides the level methods
//! - [`AtomicLevel`] - Threshold that can be changed through `&self`
//!
//! ### Formatting (`timestamp`, `report`)
//! - [`TimestampFormat`] - Validated strftime format
//! - [`format_line`] - `[ts] [LEVEL]<pad> message` line used by file/console
//! - [`exception_text`] - Error chain and backtrace text for `exception`
//!
//! ### Configuration (`config`)
//! - [`Settings`] and its sections, loaded from `.mlog/config.toml`
//!
//! ### Error Handling (`error`)
//! - [`Error`], [`Result`], [`ResultExt`]
//!
//! ## Prelude
//!
//! ```rust
//! use mlog_core::prelude::*;
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod timestamp;
pub mod types;

pub use config::{
    ColorName, ColorSpec, ConsoleSettings, FileSettings, LevelColors, OpenMode, Settings,
    StreamTarget, WidgetSettings, DEFAULT_COMPLETION_MESSAGE,
};
pub use error::{Error, Result, ResultExt};
pub use logger::{AtomicLevel, Logger};
pub use report::{exception_text, DEFAULT_EXCEPTION_MESSAGE};
pub use timestamp::{format_line, TimestampFormat};
pub use types::{LogLevel, LogRecord, LEVEL_NAME_WIDTH};
