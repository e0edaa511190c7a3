//! Timestamp and line formatting
//!
//! `chrono` panics when a `Display` is produced from an invalid strftime
//! string, so formats are validated once when a [`TimestampFormat`] is built.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::LogRecord;

/// Default format for file and console lines (wrapped in brackets when rendered)
pub const DEFAULT_LINE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default prefix format for widget lines
pub const DEFAULT_WIDGET_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";

/// A validated strftime format string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimestampFormat(String);

impl TimestampFormat {
    /// Validate and wrap a strftime format string
    pub fn new(format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::InvalidTimestampFormat { format });
        }
        Ok(Self(format))
    }

    /// Format used by file and console backends
    pub fn line_default() -> Self {
        Self(DEFAULT_LINE_FORMAT.to_string())
    }

    /// Format used by the log widget
    pub fn widget_default() -> Self {
        Self(DEFAULT_WIDGET_FORMAT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render a timestamp with this format
    pub fn render(&self, timestamp: &DateTime<Local>) -> String {
        timestamp.format(&self.0).to_string()
    }

    /// Render a timestamp followed by a single space, ready to prefix a message
    pub fn prefix(&self, timestamp: &DateTime<Local>) -> String {
        let mut out = self.render(timestamp);
        out.push(' ');
        out
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self::line_default()
    }
}

impl TryFrom<String> for TimestampFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TimestampFormat> for String {
    fn from(value: TimestampFormat) -> Self {
        value.0
    }
}

/// Format a record as `[<timestamp>] [<LEVEL>]<pad> <message>`
pub fn format_line(format: &TimestampFormat, record: &LogRecord) -> String {
    format!(
        "[{}] [{}]{} {}",
        format.render(&record.timestamp),
        record.level.name(),
        record.level.padding(),
        record.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogLevel;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_invalid_format_rejected() {
        let err = TimestampFormat::new("%Y-%Q").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestampFormat { .. }));
    }

    #[test]
    fn test_widget_prefix() {
        let fmt = TimestampFormat::widget_default();
        assert_eq!(fmt.prefix(&fixed_time()), "[2024-03-09 14:05:07] ");
    }

    #[test]
    fn test_format_line_pads_level() {
        let fmt = TimestampFormat::line_default();
        let record = LogRecord::at(fixed_time(), LogLevel::Info, "ready");
        assert_eq!(
            format_line(&fmt, &record),
            "[2024-03-09 14:05:07] [INFO]     ready"
        );

        let record = LogRecord::at(fixed_time(), LogLevel::Critical, "down");
        assert_eq!(
            format_line(&fmt, &record),
            "[2024-03-09 14:05:07] [CRITICAL] down"
        );
    }

    #[test]
    fn test_custom_format() {
        let fmt = TimestampFormat::new("%H:%M").unwrap();
        assert_eq!(fmt.render(&fixed_time()), "14:05");
    }

    #[test]
    fn test_deserialize_validates() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: TimestampFormat,
        }
        let ok: Wrapper = toml::from_str(r#"format = "%H:%M:%S""#).unwrap();
        assert_eq!(ok.format.as_str(), "%H:%M:%S");

        let bad: std::result::Result<Wrapper, _> = toml::from_str(r#"format = "%Q""#);
        assert!(bad.is_err());
    }
}
