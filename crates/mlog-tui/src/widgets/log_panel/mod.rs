//! Log panel widget
//!
//! Draws the visible slice of a [`MemorySurface`]: timestamps dimmed,
//! level tags colored, the loading line highlighted, and a scrollbar once
//! the content outgrows the panel.

use mlog_core::LogLevel;
use mlog_widget::{DisplaySurface, LineId, MemorySurface};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget,
    },
};

mod styles;

pub struct LogPanel<'a> {
    surface: &'a MemorySurface,
    indicator: Option<LineId>,
    title: &'a str,
    paused: bool,
}

impl<'a> LogPanel<'a> {
    pub fn new(surface: &'a MemorySurface) -> Self {
        Self {
            surface,
            indicator: None,
            title: " Logs ",
            paused: false,
        }
    }

    /// Line to draw as the loading indicator
    pub fn indicator(mut self, line: Option<LineId>) -> Self {
        self.indicator = line;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Mark auto-scroll as paused in the title
    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    fn build_title(&self) -> Line<'a> {
        let mut spans = vec![Span::raw(self.title)];
        if self.paused {
            spans.push(Span::styled("[paused] ", styles::PAUSED_BADGE));
        }
        Line::from(spans)
    }

    fn format_line(&self, id: LineId, text: &'a str) -> Line<'a> {
        if Some(id) == self.indicator {
            return Line::from(Span::styled(text, styles::INDICATOR));
        }

        let mut spans = Vec::with_capacity(3);
        let rest = match split_timestamp(text) {
            Some((timestamp, rest)) => {
                spans.push(Span::styled(timestamp, styles::TIMESTAMP));
                rest
            }
            None => text,
        };

        match split_level(rest) {
            Some((tag, level, message)) => {
                spans.push(Span::styled(tag, level_style(level)));
                spans.push(Span::styled(message, styles::MESSAGE));
            }
            None => spans.push(Span::styled(rest, styles::MESSAGE)),
        }
        Line::from(spans)
    }

    fn render_empty(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.build_title())
            .borders(Borders::ALL)
            .border_style(styles::BORDER);

        let inner = block.inner(area);
        block.render(area, buf);

        let hint = vec![
            Line::from(""),
            Line::from(Span::styled("No messages yet", styles::EMPTY_HINT)),
            Line::from(Span::styled("Press m to log a message", styles::EMPTY_HINT)),
        ];
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.surface.is_empty() {
            self.render_empty(area, buf);
            return;
        }

        let block = Block::default()
            .title(self.build_title())
            .borders(Borders::ALL)
            .border_style(styles::BORDER);

        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .surface
            .visible()
            .take(inner.height as usize)
            .map(|(id, text)| self.format_line(id, text))
            .collect();

        Paragraph::new(lines).render(inner, buf);

        let total = self.surface.len();
        if total > inner.height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            let mut state =
                ScrollbarState::new(total).position(self.surface.scroll_position());
            scrollbar.render(area, buf, &mut state);
        }
    }
}

/// "[12:00:00] rest" -> ("[12:00:00] ", "rest")
fn split_timestamp(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with('[') {
        return None;
    }
    let end = text.find("] ")? + 2;
    Some(text.split_at(end))
}

/// "[INFO]     message" -> ("[INFO]     ", Info, "message")
fn split_level(text: &str) -> Option<(&str, LogLevel, &str)> {
    let rest = text.strip_prefix('[')?;
    let close = rest.find(']')?;
    let level: LogLevel = rest[..close].parse().ok()?;
    if &rest[..close] != level.name() {
        return None;
    }

    let after_tag = close + 2;
    let message_start = text[after_tag..]
        .find(|c: char| c != ' ')
        .map_or(text.len(), |i| after_tag + i);
    let (tag, message) = text.split_at(message_start);
    Some((tag, level, message))
}

fn level_style(level: LogLevel) -> ratatui::style::Style {
    match level {
        LogLevel::Debug => styles::LEVEL_DEBUG,
        LogLevel::Info => styles::LEVEL_INFO,
        LogLevel::Warning => styles::LEVEL_WARNING,
        LogLevel::Error => styles::LEVEL_ERROR,
        LogLevel::Critical => styles::LEVEL_CRITICAL,
    }
}
