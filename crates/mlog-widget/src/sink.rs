//! Thread-safe entry point into the log widget
//!
//! Any thread may hold a [`LogSink`]. Records go through a channel and are
//! applied by the widget on the UI thread when it is pumped.

use mlog_core::prelude::*;
use mlog_core::{LogLevel, LogRecord, Logger};
use tokio::sync::mpsc;

/// Cloneable handle that delivers records to one widget
#[derive(Debug, Clone)]
pub struct LogSink {
    tx: mpsc::UnboundedSender<LogRecord>,
}

impl LogSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<LogRecord>) -> Self {
        Self { tx }
    }

    /// Deliver a record; false if the widget is gone
    pub fn send(&self, record: LogRecord) -> bool {
        if self.tx.send(record).is_err() {
            trace!("Log widget dropped, discarding record");
            return false;
        }
        true
    }

    /// Timestamp `text` now and deliver it at Info level
    pub fn append_message(&self, text: impl Into<String>) -> bool {
        self.send(LogRecord::new(LogLevel::Info, text))
    }

    pub fn log(&self, level: LogLevel, text: impl Into<String>) -> bool {
        self.send(LogRecord::new(level, text))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// [`Logger`] facade over a widget
///
/// Every record is forwarded. Level filtering happens in front of this
/// logger (for example in a fan-out), never inside it.
#[derive(Debug, Clone)]
pub struct GuiLogger {
    name: String,
    sink: LogSink,
}

impl GuiLogger {
    pub fn new(sink: LogSink) -> Self {
        Self {
            name: "gui".to_string(),
            sink,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }
}

impl Logger for GuiLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }

    fn set_level(&self, level: LogLevel) {
        debug!("GUI logger shows every level, ignoring {}", level);
    }

    fn write_record(&self, record: &LogRecord) {
        self.sink.send(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_delivers_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = LogSink::new(tx);

        assert!(sink.append_message("one"));
        assert!(sink.log(LogLevel::Error, "two"));

        let first = rx.try_recv().unwrap();
        assert_eq!(first.text, "one");
        assert_eq!(first.level, LogLevel::Info);
        assert_eq!(rx.try_recv().unwrap().level, LogLevel::Error);
    }

    #[test]
    fn test_sink_reports_dropped_widget() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = LogSink::new(tx);
        drop(rx);

        assert!(sink.is_closed());
        assert!(!sink.append_message("lost"));
    }

    #[test]
    fn test_gui_logger_forwards_every_level() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let logger = GuiLogger::new(LogSink::new(tx));
        logger.set_level(LogLevel::Critical);

        logger.debug("still shown");

        assert_eq!(logger.level(), LogLevel::Debug);
        assert_eq!(rx.try_recv().unwrap().text, "still shown");
    }
}
