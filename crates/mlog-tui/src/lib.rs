//! # mlog-tui - Terminal front end for the Modern Logger widget
//!
//! Hosts a [`mlog_widget::LogWidget`] over an in-memory surface inside a
//! ratatui terminal, with an interactive demo that drives batching, both
//! loading indicator modes and concurrent producers.

pub mod app;
pub mod event;
pub mod layout;
pub mod producers;
pub mod render;
pub mod runner;
pub mod signals;
pub mod terminal;
pub mod widgets;

pub use app::{DemoApp, DemoOptions, DemoTask};
pub use producers::DemoTiming;
pub use runner::run;
