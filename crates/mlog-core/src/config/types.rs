//! Configuration types for Modern Logger
//!
//! Defines:
//! - `Settings` - Top-level settings file (.mlog/config.toml)
//! - `ConsoleSettings`, `FileSettings`, `WidgetSettings` - per-output sections
//! - Related sub-types and enums

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::timestamp::TimestampFormat;
use crate::types::LogLevel;

/// Text shown by the widget when loading ends without an explicit message
pub const DEFAULT_COMPLETION_MESSAGE: &str = "Loading operation completed";

/// Application settings (.mlog/config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,

    #[serde(default)]
    pub widget: WidgetSettings,
}

// ─────────────────────────────────────────────────────────────────────────────
// Console
// ─────────────────────────────────────────────────────────────────────────────

/// Console output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Terminal colour names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorName {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Grey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    DarkGrey,
}

/// Colour and weight for one level name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorSpec {
    pub color: ColorName,
    #[serde(default)]
    pub bold: bool,
}

impl ColorSpec {
    pub const fn new(color: ColorName) -> Self {
        Self { color, bold: false }
    }

    pub const fn bold(color: ColorName) -> Self {
        Self { color, bold: true }
    }
}

/// Per-level colour overrides; unset levels use the defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LevelColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<ColorSpec>,
}

impl LevelColors {
    pub fn get(&self, level: LogLevel) -> Option<ColorSpec> {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
            LogLevel::Critical => self.critical,
        }
    }
}

/// Console backend settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub level: LogLevel,

    #[serde(default = "default_true")]
    pub use_colors: bool,

    #[serde(default)]
    pub stream: StreamTarget,

    #[serde(default)]
    pub timestamp_format: TimestampFormat,

    #[serde(default)]
    pub colors: LevelColors,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Info,
            use_colors: true,
            stream: StreamTarget::Stdout,
            timestamp_format: TimestampFormat::line_default(),
            colors: LevelColors::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File
// ─────────────────────────────────────────────────────────────────────────────

/// How an existing log file is treated when opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    #[default]
    Append,
    Overwrite,
}

/// File backend settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_filename")]
    pub filename: PathBuf,

    #[serde(default)]
    pub open_mode: OpenMode,

    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Rotate once the file reaches this many bytes (0 disables rotation)
    #[serde(default)]
    pub max_size_bytes: u64,

    /// Number of rotated files (`.1` .. `.N`) to keep
    #[serde(default)]
    pub backup_count: u32,

    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub timestamp_format: TimestampFormat,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: default_filename(),
            open_mode: OpenMode::Append,
            encoding: default_encoding(),
            max_size_bytes: 0,
            backup_count: 0,
            level: LogLevel::Info,
            timestamp_format: TimestampFormat::line_default(),
        }
    }
}

impl FileSettings {
    /// Settings for `path` with every other field at its default
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            filename: path.into(),
            ..Self::default()
        }
    }
}

fn default_filename() -> PathBuf {
    PathBuf::from("logs/app.log")
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Widget
// ─────────────────────────────────────────────────────────────────────────────

/// Log widget settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WidgetSettings {
    #[serde(default = "TimestampFormat::widget_default")]
    pub timestamp_format: TimestampFormat,

    /// Queue messages while loading unless a call says otherwise
    #[serde(default = "default_true")]
    pub queue_messages: bool,

    /// Include `[LEVEL]` after the timestamp
    #[serde(default)]
    pub show_levels: bool,

    /// Pending lines that force an immediate flush
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Loading indicator animation period
    #[serde(default = "default_animation_interval_ms")]
    pub animation_interval_ms: u64,

    /// Delay before the follow-up scroll after loading starts
    #[serde(default = "default_settle_scroll_ms")]
    pub settle_scroll_ms: u64,

    /// Distance from the end that still counts as "at bottom"
    #[serde(default = "default_bottom_epsilon")]
    pub bottom_epsilon: usize,

    /// Lines kept by the display before the oldest are dropped
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Longest accepted line, if limited
    #[serde(default)]
    pub max_line_len: Option<usize>,

    #[serde(default = "default_indicator_text")]
    pub indicator_text: String,

    #[serde(default = "default_completion_message")]
    pub completion_message: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::widget_default(),
            queue_messages: true,
            show_levels: false,
            batch_size: default_batch_size(),
            animation_interval_ms: default_animation_interval_ms(),
            settle_scroll_ms: default_settle_scroll_ms(),
            bottom_epsilon: default_bottom_epsilon(),
            max_lines: default_max_lines(),
            max_line_len: None,
            indicator_text: default_indicator_text(),
            completion_message: default_completion_message(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_batch_size() -> usize {
    10
}

fn default_animation_interval_ms() -> u64 {
    500
}

fn default_settle_scroll_ms() -> u64 {
    100
}

fn default_bottom_epsilon() -> usize {
    5
}

fn default_max_lines() -> usize {
    5000
}

fn default_indicator_text() -> String {
    "Loading".to_string()
}

fn default_completion_message() -> String {
    DEFAULT_COMPLETION_MESSAGE.to_string()
}
