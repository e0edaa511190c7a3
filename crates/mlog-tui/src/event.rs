//! Terminal event polling and key bindings

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mlog_core::prelude::*;

/// Lines moved by one page key
pub const PAGE_LINES: isize = 10;

/// What a key press asks the demo to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddMessage,
    AddFiftyMessages,
    /// Loading indicator with queued messages, ended by a timed worker
    StartLoading,
    /// Passthrough loading with a progress-reporting worker
    SimulateWork,
    /// Loading off with the default completion line
    LoadingOff,
    StressTest,
    DirectMessages,
    /// Stop whichever demo is running
    Stop,
    Clear,
    ScrollBy(isize),
    ScrollTop,
    ScrollBottom,
    Quit,
}

/// Map a key press to a demo command
pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('m') => Some(Command::AddMessage),
        KeyCode::Char('f') | KeyCode::Char('5') => Some(Command::AddFiftyMessages),
        KeyCode::Char('l') => Some(Command::StartLoading),
        KeyCode::Char('p') => Some(Command::SimulateWork),
        KeyCode::Char('o') => Some(Command::LoadingOff),
        KeyCode::Char('s') => Some(Command::StressTest),
        KeyCode::Char('d') => Some(Command::DirectMessages),
        KeyCode::Char('x') => Some(Command::Stop),
        KeyCode::Char('c') => Some(Command::Clear),
        KeyCode::Up | KeyCode::Char('k') => Some(Command::ScrollBy(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::ScrollBy(1)),
        KeyCode::PageUp => Some(Command::ScrollBy(-PAGE_LINES)),
        KeyCode::PageDown => Some(Command::ScrollBy(PAGE_LINES)),
        KeyCode::Home | KeyCode::Char('g') => Some(Command::ScrollTop),
        KeyCode::End | KeyCode::Char('G') => Some(Command::ScrollBottom),
        _ => None,
    }
}

/// Wait up to `timeout` for a key press
pub fn poll(timeout: Duration) -> Result<Option<Command>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(key_to_command(key)),
        _ => Ok(None),
    }
}
