//! Display surface abstraction and an in-memory implementation
//!
//! The widget never inspects rendered text to find its own lines. Every line
//! gets a [`LineId`] when it is added, and the loading indicator is tracked
//! by that id.

use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;

/// Stable identity of one displayed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

impl LineId {
    /// For surfaces that mint their own ids
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Failure while touching the display
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderFault {
    #[error("display line {0} no longer exists")]
    UnknownLine(LineId),

    #[error("line of {len} chars exceeds the {limit} char limit")]
    ContentTooLarge { len: usize, limit: usize },

    #[error("display surface not ready: {0}")]
    NotReady(String),
}

impl RenderFault {
    /// Whether the same write may succeed later
    pub fn is_transient(&self) -> bool {
        matches!(self, RenderFault::NotReady(_))
    }
}

/// Text rendering target driven by the log widget
///
/// Multi-line operations are atomic: on error nothing has changed.
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySurface {
    /// Append lines in order, returning their ids
    fn append_lines(&mut self, texts: &[String]) -> Result<Vec<LineId>, RenderFault>;

    /// Rewrite one line in place
    fn replace_line(&mut self, id: LineId, text: &str) -> Result<(), RenderFault>;

    /// Replace one line with several, returning the new ids in order
    fn splice_line(&mut self, id: LineId, texts: &[String]) -> Result<Vec<LineId>, RenderFault>;

    /// Remove one line
    fn remove_line(&mut self, id: LineId) -> Result<(), RenderFault>;

    /// Remove everything
    fn clear(&mut self);

    /// All lines, top to bottom
    fn lines(&self) -> Vec<String>;

    /// Current offset of the view from the top
    fn scroll_position(&self) -> usize;

    /// Largest valid scroll offset
    fn max_scroll(&self) -> usize;

    /// Move the view, clamped to `max_scroll`
    fn set_scroll_position(&mut self, position: usize);

    /// Move the view to the end
    fn scroll_to_bottom(&mut self);

    /// Append one line
    fn append_line(&mut self, text: &str) -> Result<LineId, RenderFault> {
        let ids = self.append_lines(&[text.to_string()])?;
        ids.into_iter()
            .next()
            .ok_or_else(|| RenderFault::NotReady("append returned no line".to_string()))
    }
}

/// Default number of lines kept before the oldest are dropped
pub const DEFAULT_MAX_LINES: usize = 5000;

/// Default viewport height for surfaces not yet laid out
pub const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Bounded in-memory line store with a line-based scroll offset
#[derive(Debug, Clone)]
pub struct MemorySurface {
    lines: VecDeque<(LineId, String)>,
    next_id: u64,
    max_lines: usize,
    max_line_len: Option<usize>,
    viewport_height: usize,
    offset: usize,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::new(),
            next_id: 0,
            max_lines: DEFAULT_MAX_LINES,
            max_line_len: None,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            offset: 0,
        }
    }

    pub fn from_settings(settings: &mlog_core::WidgetSettings) -> Self {
        Self::new()
            .with_max_lines(settings.max_lines)
            .with_max_line_len(settings.max_line_len)
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines.max(1);
        self
    }

    pub fn with_max_line_len(mut self, limit: Option<usize>) -> Self {
        self.max_line_len = limit;
        self
    }

    pub fn with_viewport_height(mut self, height: usize) -> Self {
        self.viewport_height = height;
        self
    }

    /// Update the number of visible rows (set during render)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.offset = self.offset.min(self.max_scroll());
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of a line by id
    pub fn line(&self, id: LineId) -> Option<&str> {
        self.position_of(id).map(|i| self.lines[i].1.as_str())
    }

    /// Lines with their ids, top to bottom
    pub fn iter(&self) -> impl Iterator<Item = (LineId, &str)> {
        self.lines.iter().map(|(id, text)| (*id, text.as_str()))
    }

    /// Lines inside the viewport
    pub fn visible(&self) -> impl Iterator<Item = (LineId, &str)> {
        self.iter().skip(self.offset).take(self.viewport_height)
    }

    fn position_of(&self, id: LineId) -> Option<usize> {
        // Lines being edited are almost always near the end
        self.lines.iter().rposition(|(line_id, _)| *line_id == id)
    }

    fn allocate(&mut self) -> LineId {
        let id = LineId(self.next_id);
        self.next_id += 1;
        id
    }

    fn check_len(&self, texts: &[String]) -> Result<(), RenderFault> {
        if let Some(limit) = self.max_line_len {
            if let Some(len) = texts.iter().map(|t| t.chars().count()).find(|&n| n > limit) {
                return Err(RenderFault::ContentTooLarge { len, limit });
            }
        }
        Ok(())
    }

    fn evict_overflow(&mut self) {
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
            self.offset = self.offset.saturating_sub(1);
        }
    }
}

impl DisplaySurface for MemorySurface {
    fn append_lines(&mut self, texts: &[String]) -> Result<Vec<LineId>, RenderFault> {
        self.check_len(texts)?;
        let mut ids = Vec::with_capacity(texts.len());
        for text in texts {
            let id = self.allocate();
            self.lines.push_back((id, text.clone()));
            ids.push(id);
        }
        self.evict_overflow();
        Ok(ids)
    }

    fn replace_line(&mut self, id: LineId, text: &str) -> Result<(), RenderFault> {
        if let Some(limit) = self.max_line_len {
            let len = text.chars().count();
            if len > limit {
                return Err(RenderFault::ContentTooLarge { len, limit });
            }
        }
        let index = self.position_of(id).ok_or(RenderFault::UnknownLine(id))?;
        self.lines[index].1 = text.to_string();
        Ok(())
    }

    fn splice_line(&mut self, id: LineId, texts: &[String]) -> Result<Vec<LineId>, RenderFault> {
        self.check_len(texts)?;
        let index = self.position_of(id).ok_or(RenderFault::UnknownLine(id))?;
        self.lines.remove(index);

        let mut ids = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            let new_id = self.allocate();
            self.lines.insert(index + i, (new_id, text.clone()));
            ids.push(new_id);
        }
        self.evict_overflow();
        self.offset = self.offset.min(self.max_scroll());
        Ok(ids)
    }

    fn remove_line(&mut self, id: LineId) -> Result<(), RenderFault> {
        let index = self.position_of(id).ok_or(RenderFault::UnknownLine(id))?;
        self.lines.remove(index);
        self.offset = self.offset.min(self.max_scroll());
        Ok(())
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.offset = 0;
    }

    fn lines(&self) -> Vec<String> {
        self.lines.iter().map(|(_, text)| text.clone()).collect()
    }

    fn scroll_position(&self) -> usize {
        self.offset
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport_height)
    }

    fn set_scroll_position(&mut self, position: usize) {
        self.offset = position.min(self.max_scroll());
    }

    fn scroll_to_bottom(&mut self) {
        self.offset = self.max_scroll();
    }
}
