//! Settings parser for .mlog/config.toml

use std::path::Path;

use super::types::Settings;
use crate::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const MLOG_DIR: &str = ".mlog";

/// Path of the settings file for a project directory
pub fn config_path(project_path: &Path) -> std::path::PathBuf {
    project_path.join(MLOG_DIR).join(CONFIG_FILENAME)
}

/// Load settings from `.mlog/config.toml` under `project_path`
///
/// A missing or unreadable file yields the defaults.
pub fn load_settings(project_path: &Path) -> Settings {
    let path = config_path(project_path);
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }
    load_settings_file(&path)
}

/// Load settings from an explicit file, falling back to defaults on error
pub fn load_settings_file(path: &Path) -> Settings {
    match read_settings(path) {
        Ok(settings) => {
            debug!("Loaded settings from {:?}", path);
            settings
        }
        Err(e) => {
            warn!("Failed to load {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Read and parse a settings file, reporting every failure
pub fn read_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Create `.mlog/config.toml` with commented defaults if it does not exist
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let dir = project_path.join(MLOG_DIR);

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::config(format!("Failed to create .mlog dir: {}", e)))?;
    }

    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        std::fs::write(&path, DEFAULT_CONFIG)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", path);
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Modern Logger Configuration

[console]
enabled = true
level = "info"
use_colors = true
stream = "stdout"
timestamp_format = "%Y-%m-%d %H:%M:%S"

[file]
enabled = false
filename = "logs/app.log"
open_mode = "append"
encoding = "utf-8"
max_size_bytes = 0
backup_count = 0
level = "info"

[widget]
timestamp_format = "[%Y-%m-%d %H:%M:%S]"
queue_messages = true
show_levels = false
batch_size = 10
animation_interval_ms = 500
bottom_epsilon = 5
max_lines = 5000
completion_message = "Loading operation completed"
"#;
