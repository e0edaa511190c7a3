//! Modern Logger demo - interactive log widget and console walkthrough
//!
//! This is the binary entry point. All logic lives in the libraries.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use modern_logger::prelude::*;
use modern_logger::walkthrough::{self, WalkthroughOptions};
use modern_logger::{LogLevel, Settings};
use mlog_core::config;
use mlog_tui::{DemoOptions, DemoTiming};

/// Modern Logger demo
#[derive(Parser, Debug)]
#[command(name = "mlog-demo")]
#[command(about = "Demonstrates the Modern Logger backends and log widget", long_about = None)]
struct Args {
    /// Settings file (defaults to .mlog/config.toml in the current directory)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<DemoCommand>,
}

#[derive(Subcommand, Debug)]
enum DemoCommand {
    /// Interactive log widget demo in the terminal (default)
    Tui {
        /// Also log to this file
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Console and file logging walkthrough
    Console {
        /// Also log to this file
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Minimum level written (debug, info, warning, error, critical)
        #[arg(long, default_value = "debug")]
        level: LogLevel,

        /// Print without colours
        #[arg(long)]
        no_color: bool,
    },

    /// Write a commented default .mlog/config.toml in the current directory
    Init,
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn load_settings(path: Option<&PathBuf>) -> Settings {
    match path {
        Some(path) => config::load_settings_file(path),
        None => config::load_settings(&current_dir()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    mlog_core::logging::init()?;

    info!("Modern Logger demo starting");

    let settings = load_settings(args.config.as_ref());

    let result = match args.command.unwrap_or(DemoCommand::Tui { file: None }) {
        DemoCommand::Tui { file } => {
            let options = DemoOptions {
                file,
                timing: DemoTiming::default(),
            };
            mlog_tui::run(&settings, options).await
        }
        DemoCommand::Console {
            file,
            level,
            no_color,
        } => {
            let options = WalkthroughOptions {
                file,
                level,
                colors: !no_color,
                ..WalkthroughOptions::default()
            };
            walkthrough::run(&settings, options).await
        }
        DemoCommand::Init => {
            let dir = current_dir();
            let created = config::init_config_dir(&dir).context("Failed to initialise settings");
            if created.is_ok() {
                println!("Settings file: {}", config::config_path(&dir).display());
            }
            created
        }
    };

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }

    info!("Modern Logger demo exiting");
    result
}
