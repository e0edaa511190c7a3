//! Styling constants for the log panel

use ratatui::style::{Color, Modifier, Style};

pub const BORDER: Style = Style::new().fg(Color::DarkGray);

pub const TIMESTAMP: Style = Style::new().fg(Color::DarkGray);

pub const MESSAGE: Style = Style::new().fg(Color::White);

/// The animated loading line
pub const INDICATOR: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::ITALIC);

pub const LEVEL_DEBUG: Style = Style::new().fg(Color::DarkGray);
pub const LEVEL_INFO: Style = Style::new().fg(Color::Green);
pub const LEVEL_WARNING: Style = Style::new().fg(Color::Yellow);
pub const LEVEL_ERROR: Style = Style::new().fg(Color::Red);
pub const LEVEL_CRITICAL: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

/// Title badge shown while auto-scroll is paused
pub const PAUSED_BADGE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

pub const EMPTY_HINT: Style = Style::new().fg(Color::DarkGray);
