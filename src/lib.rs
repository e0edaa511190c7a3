//! Modern Logger - console, file and terminal log widget outputs behind one facade
//!
//! The workspace is split by concern:
//! - `mlog-core` - levels, records, the [`Logger`] trait, settings
//! - `mlog-backends` - console, file and fan-out loggers
//! - `mlog-widget` - the log widget state machine (batching, loading
//!   indicator, auto-scroll) over an abstract display surface
//! - `mlog-tui` - ratatui front end and interactive demo
//!
//! [`ModernLogger`] wires the common combinations together.

use std::path::PathBuf;
use std::sync::Arc;

pub mod walkthrough;

pub use mlog_backends::{ConsoleLogger, FileLogger, MultiLogger};
pub use mlog_core::prelude;
pub use mlog_core::{LogLevel, LogRecord, Logger, Settings};
pub use mlog_widget::{
    Completion, GuiLogger, LoadingOptions, LogSink, LogWidget, MemorySurface, TimerQueue,
};

use mlog_core::prelude::*;
use mlog_core::FileSettings;

/// Widget type produced by [`ModernLogger`] when the GUI output is enabled
pub type MemoryWidget = LogWidget<MemorySurface, TimerQueue>;

/// Builder composing console, file and widget outputs into one logger
///
/// ```no_run
/// use modern_logger::{Logger, ModernLogger};
///
/// let outputs = ModernLogger::new().file("app.log").build()?;
/// outputs.logger.info("ready");
/// # Ok::<(), modern_logger::prelude::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ModernLogger {
    console: bool,
    file: Option<PathBuf>,
    gui: bool,
    settings: Settings,
}

impl Default for ModernLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything [`ModernLogger::build`] produced
pub struct LoggerOutputs {
    /// Facade forwarding to every enabled output
    pub logger: Arc<MultiLogger>,
    /// Log widget fed by the facade, when the GUI output is enabled
    pub widget: Option<MemoryWidget>,
}

impl LoggerOutputs {
    /// Thread-safe handle for producers writing straight to the widget
    pub fn sink(&self) -> Option<LogSink> {
        self.widget.as_ref().map(|w| w.sink())
    }
}

impl ModernLogger {
    /// Console output only, default settings
    pub fn new() -> Self {
        Self {
            console: true,
            file: None,
            gui: false,
            settings: Settings::default(),
        }
    }

    pub fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Also write to `path`
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn gui(mut self, enabled: bool) -> Self {
        self.gui = enabled;
        self
    }

    /// Backend and widget settings; the file path set on the builder wins
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<LoggerOutputs> {
        let logger = Arc::new(MultiLogger::new());
        // Children apply their own thresholds
        logger.set_level(LogLevel::Debug);

        if self.console {
            logger.add_logger(Arc::new(ConsoleLogger::from_settings(
                &self.settings.console,
            )));
        }

        if let Some(path) = self.file {
            let settings = FileSettings {
                filename: path.clone(),
                ..self.settings.file.clone()
            };
            let file = FileLogger::new(settings)
                .with_context(|| format!("Failed to set up file output {:?}", path))?;
            logger.add_logger(Arc::new(file));
        }

        let widget = if self.gui {
            let widget = LogWidget::new(
                MemorySurface::from_settings(&self.settings.widget),
                TimerQueue::new(),
                self.settings.widget.clone(),
            );
            logger.add_logger(Arc::new(GuiLogger::new(widget.sink())));
            Some(widget)
        } else {
            None
        };

        debug!(
            "Built logger with {} outputs (gui={})",
            logger.len(),
            widget.is_some()
        );
        Ok(LoggerOutputs { logger, widget })
    }
}
