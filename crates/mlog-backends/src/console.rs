//! Console backend with per-level colours

use std::io::{self, IsTerminal, Write};
use std::sync::{Mutex, OnceLock, RwLock};

use crossterm::style::{style, Color, Stylize};
use mlog_core::prelude::*;
use mlog_core::{
    AtomicLevel, ColorName, ColorSpec, ConsoleSettings, LogLevel, LogRecord, Logger,
    StreamTarget, TimestampFormat,
};

/// Default colours, indexed by level
pub const DEFAULT_COLORS: [ColorSpec; 5] = [
    ColorSpec::new(ColorName::Cyan),
    ColorSpec::new(ColorName::Green),
    ColorSpec::new(ColorName::Yellow),
    ColorSpec::new(ColorName::Red),
    ColorSpec::bold(ColorName::Red),
];

static COLOR_SUPPORT: OnceLock<bool> = OnceLock::new();

/// One-time terminal colour setup
///
/// Safe to call any number of times; the check runs once per process.
/// Honours `NO_COLOR`.
pub fn init_colors() -> bool {
    *COLOR_SUPPORT.get_or_init(|| {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        #[cfg(windows)]
        {
            crossterm::ansi_support::supports_ansi()
        }
        #[cfg(not(windows))]
        {
            true
        }
    })
}

fn to_crossterm(color: ColorName) -> Color {
    match color {
        ColorName::Black => Color::Black,
        ColorName::Red => Color::Red,
        ColorName::Green => Color::Green,
        ColorName::Yellow => Color::Yellow,
        ColorName::Blue => Color::Blue,
        ColorName::Magenta => Color::Magenta,
        ColorName::Cyan => Color::Cyan,
        ColorName::White => Color::White,
        ColorName::Grey => Color::Grey,
        ColorName::DarkRed => Color::DarkRed,
        ColorName::DarkGreen => Color::DarkGreen,
        ColorName::DarkYellow => Color::DarkYellow,
        ColorName::DarkBlue => Color::DarkBlue,
        ColorName::DarkMagenta => Color::DarkMagenta,
        ColorName::DarkCyan => Color::DarkCyan,
        ColorName::DarkGrey => Color::DarkGrey,
    }
}

/// Logger that writes formatted lines to a terminal stream or any writer
pub struct ConsoleLogger {
    name: String,
    level: AtomicLevel,
    colored: bool,
    format: RwLock<TimestampFormat>,
    colors: RwLock<[ColorSpec; 5]>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleLogger {
    /// Stdout logger at Info level with default colours
    pub fn new() -> Self {
        Self::from_settings(&ConsoleSettings::default())
    }

    /// Build from the `[console]` settings section
    pub fn from_settings(settings: &ConsoleSettings) -> Self {
        let (out, is_tty): (Box<dyn Write + Send>, bool) = match settings.stream {
            StreamTarget::Stdout => (Box::new(io::stdout()), io::stdout().is_terminal()),
            StreamTarget::Stderr => (Box::new(io::stderr()), io::stderr().is_terminal()),
        };
        let colored = settings.use_colors && is_tty && init_colors();

        let mut colors = DEFAULT_COLORS;
        for level in LogLevel::ALL {
            if let Some(spec) = settings.colors.get(level) {
                colors[level as usize] = spec;
            }
        }

        Self {
            name: "console".to_string(),
            level: AtomicLevel::new(settings.level),
            colored,
            format: RwLock::new(settings.timestamp_format.clone()),
            colors: RwLock::new(colors),
            out: Mutex::new(out),
        }
    }

    /// Logger writing to an arbitrary sink; `colored` is taken as given
    pub fn with_writer(out: Box<dyn Write + Send>, colored: bool) -> Self {
        Self {
            name: "console".to_string(),
            level: AtomicLevel::default(),
            colored,
            format: RwLock::new(TimestampFormat::line_default()),
            colors: RwLock::new(DEFAULT_COLORS),
            out: Mutex::new(out),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_format(mut self, format: TimestampFormat) -> Self {
        self.format = RwLock::new(format);
        self
    }

    /// Switch the timestamp format for subsequent lines
    ///
    /// An invalid strftime pattern is rejected and the old format kept.
    pub fn set_timestamp_format(&self, format: &str) -> Result<()> {
        let format = TimestampFormat::new(format)?;
        if let Ok(mut current) = self.format.write() {
            *current = format;
        }
        Ok(())
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.format
            .read()
            .map(|f| f.clone())
            .unwrap_or_else(|_| TimestampFormat::line_default())
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    /// Change the colour used for one level's name
    pub fn set_color(&self, level: LogLevel, spec: ColorSpec) {
        if let Ok(mut colors) = self.colors.write() {
            colors[level as usize] = spec;
        }
    }

    pub fn color(&self, level: LogLevel) -> ColorSpec {
        self.colors
            .read()
            .map(|c| c[level as usize])
            .unwrap_or(DEFAULT_COLORS[level as usize])
    }

    fn format_record(&self, record: &LogRecord) -> String {
        let format = self.timestamp_format();
        let timestamp = format.render(&record.timestamp);
        let name = record.level.name();
        if self.colored {
            let spec = self.color(record.level);
            let styled = style(name).with(to_crossterm(spec.color));
            let styled = if spec.bold { styled.bold() } else { styled };
            format!(
                "[{}] [{}]{} {}",
                timestamp,
                styled,
                record.level.padding(),
                record.text
            )
        } else {
            mlog_core::format_line(&format, record)
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for ConsoleLogger {
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
        let line = self.format_record(record);
        let Ok(mut out) = self.out.lock() else {
            warn!("console output lock poisoned, dropping line");
            return;
        };
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!("Failed to write console log line: {}", e);
        }
    }

    fn close(&self) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.flush();
        }
    }
}
