//! Configuration file parsing for Modern Logger
//!
//! Supports `.mlog/config.toml` with `[console]`, `[file]` and `[widget]`
//! sections. Every field has a default.

pub mod settings;
pub mod types;

pub use settings::{config_path, init_config_dir, load_settings, load_settings_file, read_settings};
pub use types::*;
