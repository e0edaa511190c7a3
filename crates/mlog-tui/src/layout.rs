//! Screen layout for the demo
//!
//! Log panel on top, a bordered status bar below it and a one-line key
//! reference at the very bottom.

use ratatui::layout::{Constraint, Layout, Rect};

#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    pub logs: Rect,
    pub status: Rect,
    pub help: Rect,
}

pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(2), // Top border + status line
        Constraint::Length(1),
    ])
    .split(area);

    ScreenAreas {
        logs: chunks[0],
        status: chunks[1],
        help: chunks[2],
    }
}

/// Rows available for log lines inside the bordered panel
pub fn log_rows(logs: Rect) -> usize {
    logs.height.saturating_sub(2) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_screen() {
        let areas = create(Rect::new(0, 0, 80, 24));
        assert_eq!(areas.logs.height, 21);
        assert_eq!(areas.status.height, 2);
        assert_eq!(areas.help.height, 1);
        assert_eq!(log_rows(areas.logs), 19);
    }

    #[test]
    fn test_tiny_terminal_keeps_log_panel() {
        let areas = create(Rect::new(0, 0, 80, 4));
        assert!(areas.logs.height >= 1);
        assert_eq!(log_rows(Rect::new(0, 0, 80, 1)), 0);
    }
}
