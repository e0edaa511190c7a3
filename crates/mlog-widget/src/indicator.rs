//! Loading indicator state and the queue of messages held back while it runs

use std::collections::VecDeque;

use mlog_core::LogRecord;

use crate::surface::LineId;

/// Number of animation frames: "", ".", "..", "..."
pub const FRAME_COUNT: u8 = 4;

/// How messages arriving during a loading operation are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorMode {
    /// Held back and released after the indicator when loading ends
    Queue,
    /// Shown immediately above the indicator
    Passthrough,
}

/// Observable indicator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    Off,
    OnQueuing,
    OnPassthrough,
}

/// Options for [`crate::LogWidget::set_loading_on`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingOptions {
    /// Overrides (and updates) the widget's queueing preference when set
    pub queue_messages: Option<bool>,
    /// Show messages above the indicator instead of queueing them
    pub passthrough: bool,
}

impl LoadingOptions {
    /// Queue messages until loading ends
    pub fn queued() -> Self {
        Self {
            queue_messages: Some(true),
            passthrough: false,
        }
    }

    /// Keep showing messages above the indicator
    pub fn passthrough() -> Self {
        Self {
            queue_messages: None,
            passthrough: true,
        }
    }

    pub fn queue_messages(mut self, queue: bool) -> Self {
        self.queue_messages = Some(queue);
        self
    }
}

/// What to print when loading ends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Completion {
    /// The configured completion message
    #[default]
    Default,
    /// A custom message
    Message(String),
    /// Nothing
    Silent,
}

impl Completion {
    /// Text to print, if any
    pub fn text(&self, default: &str) -> Option<String> {
        match self {
            Completion::Default => Some(default.to_string()),
            Completion::Message(text) => Some(text.clone()),
            Completion::Silent => None,
        }
    }
}

impl From<&str> for Completion {
    fn from(text: &str) -> Self {
        if text.is_empty() {
            Completion::Silent
        } else {
            Completion::Message(text.to_string())
        }
    }
}

impl From<String> for Completion {
    fn from(text: String) -> Self {
        Completion::from(text.as_str())
    }
}

impl From<Option<&str>> for Completion {
    fn from(text: Option<&str>) -> Self {
        text.map(Completion::from).unwrap_or_default()
    }
}

/// Indicator bookkeeping owned by the widget
#[derive(Debug, Default)]
pub struct LoadingIndicator {
    mode: Option<IndicatorMode>,
    frame: u8,
    generation: u64,
    line: Option<LineId>,
    prefix: String,
    queue: VecDeque<LogRecord>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadingState {
        match self.mode {
            None => LoadingState::Off,
            Some(IndicatorMode::Queue) => LoadingState::OnQueuing,
            Some(IndicatorMode::Passthrough) => LoadingState::OnPassthrough,
        }
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    pub fn is_queuing(&self) -> bool {
        self.mode == Some(IndicatorMode::Queue)
    }

    pub fn is_passthrough(&self) -> bool {
        self.mode == Some(IndicatorMode::Passthrough)
    }

    pub fn mode(&self) -> Option<IndicatorMode> {
        self.mode
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Bumped on every activation so ticks armed for an older run can be ignored
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Display line currently showing the indicator
    pub fn line(&self) -> Option<LineId> {
        self.line
    }

    pub(crate) fn set_line(&mut self, line: Option<LineId>) {
        self.line = line;
    }

    pub(crate) fn set_prefix(&mut self, prefix: String) {
        self.prefix = prefix;
    }

    /// Start a run; returns its generation
    pub(crate) fn activate(&mut self, mode: IndicatorMode, prefix: String) -> u64 {
        self.mode = Some(mode);
        self.frame = 0;
        self.generation += 1;
        self.line = None;
        self.prefix = prefix;
        self.generation
    }

    /// Advance the animation; returns the new frame
    pub(crate) fn advance(&mut self) -> u8 {
        self.frame = (self.frame + 1) % FRAME_COUNT;
        self.frame
    }

    /// End the run, dropping the queue (already written by the caller)
    pub(crate) fn deactivate(&mut self) -> usize {
        self.mode = None;
        self.frame = 0;
        self.line = None;
        let released = self.queue.len();
        self.queue.clear();
        released
    }

    pub(crate) fn enqueue(&mut self, record: LogRecord) {
        self.queue.push_back(record);
    }

    /// Messages held back, oldest first
    pub fn queued(&self) -> impl Iterator<Item = &LogRecord> {
        self.queue.iter()
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Indicator line text for the current frame
    pub fn render(&self, text: &str) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            text,
            ".".repeat(self.frame as usize)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlog_core::LogLevel;

    #[test]
    fn test_frames_cycle() {
        let mut indicator = LoadingIndicator::new();
        indicator.activate(IndicatorMode::Queue, "[t] ".into());

        assert_eq!(indicator.render("Loading"), "[t] Loading");
        let frames: Vec<u8> = (0..5).map(|_| indicator.advance()).collect();
        assert_eq!(frames, vec![1, 2, 3, 0, 1]);
        assert_eq!(indicator.render("Loading"), "[t] Loading.");
    }

    #[test]
    fn test_generation_bumps_on_activate() {
        let mut indicator = LoadingIndicator::new();
        let first = indicator.activate(IndicatorMode::Queue, String::new());
        indicator.deactivate();
        let second = indicator.activate(IndicatorMode::Passthrough, String::new());
        assert!(second > first);
        assert_eq!(indicator.state(), LoadingState::OnPassthrough);
    }

    #[test]
    fn test_deactivate_drops_queue() {
        let mut indicator = LoadingIndicator::new();
        indicator.activate(IndicatorMode::Queue, String::new());
        indicator.enqueue(LogRecord::new(LogLevel::Info, "held"));
        indicator.enqueue(LogRecord::new(LogLevel::Info, "held too"));

        assert_eq!(indicator.queued_len(), 2);
        assert_eq!(indicator.deactivate(), 2);
        assert_eq!(indicator.state(), LoadingState::Off);
        assert_eq!(indicator.queued_len(), 0);
    }

    #[test]
    fn test_completion_conversions() {
        assert_eq!(Completion::from(None::<&str>), Completion::Default);
        assert_eq!(Completion::from(Some("")), Completion::Silent);
        assert_eq!(
            Completion::from(Some("Done")),
            Completion::Message("Done".into())
        );
        assert_eq!(Completion::Silent.text("x"), None);
        assert_eq!(Completion::Default.text("x"), Some("x".into()));
    }

    #[test]
    fn test_options_builders() {
        assert!(LoadingOptions::passthrough().passthrough);
        assert_eq!(LoadingOptions::queued().queue_messages, Some(true));
        assert_eq!(
            LoadingOptions::default().queue_messages(false).queue_messages,
            Some(false)
        );
    }
}
