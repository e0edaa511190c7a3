//! Custom widget components

mod log_panel;
mod status_bar;

pub use log_panel::LogPanel;
pub use status_bar::{HelpBar, StatusBar, StatusInfo};
