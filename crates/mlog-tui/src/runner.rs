//! Demo runner - entry point and event loop

use std::time::{Duration, Instant};

use mlog_core::prelude::*;
use mlog_core::Settings;
use tokio::sync::mpsc;

use crate::app::{DemoApp, DemoOptions};
use crate::event::{self, Command};
use crate::{render, signals, terminal};

/// Longest wait for input between frames
const FRAME_BUDGET: Duration = Duration::from_millis(50);

/// Run the interactive log widget demo until the user quits
pub async fn run(settings: &Settings, options: DemoOptions) -> Result<()> {
    terminal::install_panic_hook();
    let mut term = ratatui::init();

    let mut app = DemoApp::new(settings, options);

    // External commands (signal handler)
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<Command>();
    signals::spawn_signal_handler(cmd_tx);

    let result = run_loop(&mut term, &mut app, cmd_rx).await;

    app.shutdown().await;
    ratatui::restore();

    result
}

async fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut DemoApp,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) -> Result<()> {
    while !app.should_quit() {
        while let Ok(command) = cmd_rx.try_recv() {
            app.handle(command).await;
        }

        app.tick(Instant::now());

        terminal.draw(|frame| render::view(frame, app))?;

        let timeout = app.poll_timeout(Instant::now(), FRAME_BUDGET);
        if let Some(command) = event::poll(timeout)? {
            app.handle(command).await;
        }

        // Let producer tasks run on single-threaded runtimes
        tokio::task::yield_now().await;
    }

    Ok(())
}
