//! Status bar widget
//!
//! Shows the loading state, queued message count, running producers and the
//! scroll mode with the current view position.

use mlog_widget::LoadingState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Snapshot of what the status bar displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub loading: LoadingState,
    pub queued: usize,
    pub producers: usize,
    /// Label of the running demo, if any
    pub task: Option<&'static str>,
    pub auto_scroll: bool,
    pub offset: usize,
    pub visible: usize,
    pub total: usize,
}

pub struct StatusBar<'a> {
    info: &'a StatusInfo,
}

impl<'a> StatusBar<'a> {
    pub fn new(info: &'a StatusInfo) -> Self {
        Self { info }
    }

    fn loading_indicator(&self) -> Span<'static> {
        match self.info.loading {
            LoadingState::Off => Span::styled("○ Idle", Style::default().fg(Color::DarkGray)),
            LoadingState::OnQueuing => Span::styled(
                "● Loading (queued)",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            LoadingState::OnPassthrough => Span::styled(
                "● Loading (passthrough)",
                Style::default().fg(Color::Cyan),
            ),
        }
    }

    fn queued_count(&self) -> Option<Span<'static>> {
        if self.info.queued == 0 {
            return None;
        }
        Some(Span::styled(
            format!("{} queued", self.info.queued),
            Style::default().fg(Color::Yellow),
        ))
    }

    fn task_info(&self) -> Option<Span<'static>> {
        let task = self.info.task?;
        let text = match self.info.producers {
            0 => task.to_string(),
            1 => format!("{} (1 producer)", task),
            n => format!("{} ({} producers)", task, n),
        };
        Some(Span::styled(text, Style::default().fg(Color::Gray)))
    }

    fn scroll_indicator(&self) -> Span<'static> {
        if self.info.auto_scroll {
            Span::styled("⬇ Auto", Style::default().fg(Color::Green))
        } else {
            Span::styled("⬆ Manual", Style::default().fg(Color::Yellow))
        }
    }

    fn position(&self) -> String {
        if self.info.total == 0 {
            return "0/0".to_string();
        }
        let first = self.info.offset + 1;
        let last = (self.info.offset + self.info.visible).min(self.info.total);
        format!("{}-{}/{}", first, last, self.info.total)
    }

    fn build_segments(&self) -> Vec<Span<'static>> {
        let separator = Span::styled(" │ ", Style::default().fg(Color::DarkGray));

        let mut segments = vec![Span::raw(" "), self.loading_indicator()];

        if let Some(queued) = self.queued_count() {
            segments.push(separator.clone());
            segments.push(queued);
        }

        if let Some(task) = self.task_info() {
            segments.push(separator.clone());
            segments.push(task);
        }

        segments.push(separator);
        segments.push(self.scroll_indicator());
        segments.push(Span::raw(" "));
        segments.push(Span::styled(
            self.position(),
            Style::default().fg(Color::DarkGray),
        ));
        segments.push(Span::raw(" "));

        segments
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(Line::from(self.build_segments())).render(inner, buf);
    }
}

/// Key reference shown under the status bar
pub struct HelpBar;

impl HelpBar {
    const KEYS: [(&'static str, &'static str); 9] = [
        ("m", "message"),
        ("f", "50 messages"),
        ("l", "loading"),
        ("p", "work"),
        ("o", "off"),
        ("s", "stress"),
        ("d", "direct"),
        ("x", "stop"),
        ("q", "quit"),
    ];
}

impl Widget for HelpBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, action)) in Self::KEYS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", action),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
