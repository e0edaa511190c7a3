//! Console and file logging walkthrough
//!
//! Logs one message per level, an error with its cause chain, and a short
//! run of progress messages that occasionally fail.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use mlog_core::prelude::*;
use mlog_core::{LogLevel, Logger, Settings};
use rand::Rng;

use crate::ModernLogger;

/// Items processed by the progress part of the walkthrough
pub const WALKTHROUGH_ITEMS: usize = 5;

#[derive(Debug, Clone)]
pub struct WalkthroughOptions {
    /// Also write to this file
    pub file: Option<PathBuf>,
    pub level: LogLevel,
    pub colors: bool,
    /// Pause between progress items
    pub step: Duration,
    /// Chance that a progress item reports an error
    pub failure_rate: f64,
}

impl Default for WalkthroughOptions {
    fn default() -> Self {
        Self {
            file: None,
            level: LogLevel::Debug,
            colors: true,
            step: Duration::from_millis(500),
            failure_rate: 0.2,
        }
    }
}

/// Failure raised by a progress item
#[derive(Debug)]
struct ItemError {
    item: usize,
    cause: std::io::Error,
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Random error on item {}", self.item)
    }
}

impl std::error::Error for ItemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Build console (and optional file) outputs from `settings` and run the walkthrough
pub async fn run(settings: &Settings, options: WalkthroughOptions) -> Result<()> {
    let mut settings = settings.clone();
    settings.console.level = options.level;
    settings.console.use_colors = options.colors;
    settings.file.level = options.level;

    let mut builder = ModernLogger::new().settings(settings);
    if let Some(path) = &options.file {
        builder = builder.file(path);
    }
    let outputs = builder.build()?;

    run_with(outputs.logger.as_ref(), &options).await;
    outputs.logger.close();

    if let Some(path) = &options.file {
        info!("Walkthrough log written to {}", path.display());
    }
    Ok(())
}

/// Run the walkthrough against any logger
pub async fn run_with(logger: &dyn Logger, options: &WalkthroughOptions) {
    logger.info("Starting basic example...");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warning("This is a warning message");
    logger.error("This is an error message");
    logger.critical("This is a critical message");

    for item in 1..=WALKTHROUGH_ITEMS {
        tokio::time::sleep(options.step).await;
        logger.info(&format!("Processing item {}/{}...", item, WALKTHROUGH_ITEMS));

        if rand::thread_rng().gen_bool(options.failure_rate.clamp(0.0, 1.0)) {
            let error = ItemError {
                item,
                cause: std::io::Error::other("simulated failure"),
            };
            logger.exception("An error occurred!", &error);
        }
    }

    logger.info("Basic example completed!");
}
