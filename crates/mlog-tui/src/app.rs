//! Demo application state
//!
//! Owns the log widget, the producer pool and the logger the demo writes
//! through. Key commands and producer events are applied here; the runner
//! only moves events in and frames out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mlog_backends::{FileLogger, MultiLogger};
use mlog_core::prelude::*;
use mlog_core::{FileSettings, LogLevel, Logger, Settings};
use mlog_widget::{
    Completion, GuiLogger, LoadingOptions, LogWidget, MemorySurface, ProducerEvent,
    ProducerOutcome, ProducerPool, TimerQueue,
};

use crate::event::Command;
use crate::producers::{self, DemoTiming};

/// Producers started by the stress and direct message demos
pub const DEMO_WORKERS: usize = 4;

/// How long stopping waits for producers before aborting them
pub const STOP_TIMEOUT: Duration = Duration::from_secs(1);

pub type DemoWidget = LogWidget<MemorySurface, TimerQueue>;

/// The demo currently running in the background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoTask {
    Loading,
    Work,
    Stress { remaining: usize },
    Direct { remaining: usize },
}

impl DemoTask {
    pub fn label(&self) -> &'static str {
        match self {
            DemoTask::Loading => "loading",
            DemoTask::Work => "work",
            DemoTask::Stress { .. } => "stress test",
            DemoTask::Direct { .. } => "direct messages",
        }
    }
}

/// Options not covered by [`Settings`]
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    /// Also log to this file
    pub file: Option<std::path::PathBuf>,
    pub timing: DemoTiming,
}

pub struct DemoApp {
    widget: DemoWidget,
    logger: Arc<MultiLogger>,
    pool: ProducerPool,
    task: Option<DemoTask>,
    timing: DemoTiming,
    should_quit: bool,
}

impl DemoApp {
    pub fn new(settings: &Settings, options: DemoOptions) -> Self {
        let widget = LogWidget::new(
            MemorySurface::from_settings(&settings.widget),
            TimerQueue::new(),
            settings.widget.clone(),
        );

        let logger = Arc::new(MultiLogger::new());
        logger.set_level(LogLevel::Debug);
        logger.add_logger(Arc::new(GuiLogger::new(widget.sink())));

        if let Some(file_settings) = file_settings(settings, &options) {
            match FileLogger::new(file_settings) {
                Ok(file) => logger.add_logger(Arc::new(file)),
                Err(e) => warn!("File logging disabled: {}", e),
            }
        }

        Self {
            widget,
            logger,
            pool: ProducerPool::new(),
            task: None,
            timing: options.timing,
            should_quit: false,
        }
    }

    pub fn widget(&self) -> &DemoWidget {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut DemoWidget {
        &mut self.widget
    }

    pub fn logger(&self) -> &Arc<MultiLogger> {
        &self.logger
    }

    pub fn task(&self) -> Option<DemoTask> {
        self.task
    }

    pub fn active_producers(&self) -> usize {
        self.pool.active_count()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Pump records, apply producer events and deliver due timers
    pub fn tick(&mut self, now: Instant) {
        self.widget.pump();
        for event in self.pool.poll_events() {
            self.on_producer_event(event);
        }
        self.widget.run_due_timers(now);
    }

    /// How long the event loop may wait for input
    pub fn poll_timeout(&self, now: Instant, max: Duration) -> Duration {
        self.widget
            .time_until_next_timer(now)
            .map_or(max, |until| until.min(max))
    }

    pub async fn handle(&mut self, command: Command) {
        match command {
            Command::AddMessage => self.logger.info("User sent a single message"),
            Command::AddFiftyMessages => self.add_fifty_messages(),
            Command::StartLoading => self.start_loading(),
            Command::SimulateWork => self.simulate_work(),
            Command::LoadingOff => {
                self.widget.set_loading_off(Completion::Default);
            }
            Command::StressTest => self.start_stress_test(),
            Command::DirectMessages => self.start_direct_messages(),
            Command::Stop => self.stop().await,
            Command::Clear => self.widget.clear(),
            Command::ScrollBy(delta) => self.widget.user_scroll_by(delta),
            Command::ScrollTop => self.widget.user_scroll_to_top(),
            Command::ScrollBottom => self.widget.user_scroll_to_bottom(),
            Command::Quit => self.should_quit = true,
        }
    }

    fn add_fifty_messages(&mut self) {
        self.logger.info("Starting to add 50 messages...");
        for i in 1..=50 {
            self.logger.info(&format!("Message #{} of 50", i));
        }
        self.logger.info("Finished adding 50 messages");
    }

    fn begin_task(&mut self, task: DemoTask) -> bool {
        if let Some(running) = self.task {
            self.logger.warning(&format!(
                "The {} demo is still running, press x to stop it first",
                running.label()
            ));
            return false;
        }
        self.task = Some(task);
        true
    }

    fn start_loading(&mut self) {
        if !self.begin_task(DemoTask::Loading) {
            return;
        }
        self.logger.info("Starting loading operation");
        self.widget.set_loading_on(LoadingOptions::queued());

        let duration = self.timing.loading;
        self.pool.spawn("loading", self.widget.sink(), move |ctx| {
            producers::loading_worker(ctx, duration)
        });
    }

    fn simulate_work(&mut self) {
        if !self.begin_task(DemoTask::Work) {
            return;
        }
        self.logger.info(
            "Starting work simulation with immediate progress updates (passthrough mode)",
        );
        self.widget.set_loading_on(LoadingOptions::passthrough());

        let step = self.timing.work_step;
        self.pool.spawn("work", self.widget.sink(), move |ctx| {
            producers::work_worker(ctx, step)
        });
    }

    fn start_stress_test(&mut self) {
        if !self.begin_task(DemoTask::Stress {
            remaining: DEMO_WORKERS,
        }) {
            return;
        }
        self.logger.info(&format!(
            "Starting stress test with {} concurrent threads (queued messages)",
            DEMO_WORKERS
        ));
        self.widget.set_loading_on(LoadingOptions::queued());

        let jitter = self.timing.stress;
        for worker in 1..=DEMO_WORKERS {
            self.pool
                .spawn(format!("stress-{}", worker), self.widget.sink(), move |ctx| {
                    producers::stress_worker(ctx, worker, jitter)
                });
        }
    }

    fn start_direct_messages(&mut self) {
        if !self.begin_task(DemoTask::Direct {
            remaining: DEMO_WORKERS,
        }) {
            return;
        }
        self.logger.info(&format!(
            "Starting direct message test with {} concurrent threads",
            DEMO_WORKERS
        ));

        let jitter = self.timing.direct;
        for worker in 1..=DEMO_WORKERS {
            self.pool
                .spawn(format!("direct-{}", worker), self.widget.sink(), move |ctx| {
                    producers::direct_worker(ctx, worker, jitter)
                });
        }
    }

    /// Stop the running demo, waiting briefly for its producers
    async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            self.logger.info("Nothing to stop");
            return;
        };

        let report = self.pool.stop(STOP_TIMEOUT).await;
        if report.aborted > 0 {
            warn!("{} producers aborted after timeout", report.aborted);
        }
        // Finish events of stopped producers carry no news
        self.pool.poll_events();

        match task {
            DemoTask::Loading => self
                .widget
                .set_loading_off("Loading operation stopped by user"),
            DemoTask::Work => self.widget.set_loading_off("Work stopped by user"),
            DemoTask::Stress { .. } => self.widget.set_loading_off("Stress test stopped by user"),
            DemoTask::Direct { .. } => self.logger.info("Direct message test stopped by user"),
        }
    }

    fn on_producer_event(&mut self, event: ProducerEvent) {
        match &event.outcome {
            ProducerOutcome::Completed => {}
            ProducerOutcome::Cancelled => return,
            ProducerOutcome::Failed(reason) => {
                self.logger
                    .error(&format!("Producer {} failed: {}", event.name, reason));
            }
            ProducerOutcome::Panicked => {
                self.logger
                    .critical(&format!("Producer {} panicked", event.name));
            }
        }

        let Some(task) = self.task else {
            return;
        };

        match task {
            DemoTask::Loading => {
                self.task = None;
                self.widget.set_loading_off(Completion::Default);
            }
            DemoTask::Work => {
                self.task = None;
                self.widget.set_loading_off("Work completed!");
            }
            DemoTask::Stress { remaining } => {
                self.logger
                    .info(&format!("Thread {} completed", worker_number(&event.name)));
                if remaining <= 1 {
                    self.task = None;
                    self.widget.set_loading_off(Completion::Default);
                    self.logger
                        .info("All stress test threads completed successfully");
                } else {
                    self.task = Some(DemoTask::Stress {
                        remaining: remaining - 1,
                    });
                }
            }
            DemoTask::Direct { remaining } => {
                self.logger.info(&format!(
                    "Direct message thread {} completed",
                    worker_number(&event.name)
                ));
                if remaining <= 1 {
                    self.task = None;
                    self.logger
                        .info("All direct message threads completed successfully");
                } else {
                    self.task = Some(DemoTask::Direct {
                        remaining: remaining - 1,
                    });
                }
            }
        }
    }

    /// Stop producers and flush outputs before exit
    pub async fn shutdown(&mut self) {
        let report = self.pool.stop(STOP_TIMEOUT).await;
        debug!(
            "Shutdown: {} producers stopped, {} aborted",
            report.stopped, report.aborted
        );
        self.task = None;
        self.widget.set_loading_off(Completion::Silent);
        self.logger.close();
    }
}

/// File output requested on the command line wins over the config file
fn file_settings(settings: &Settings, options: &DemoOptions) -> Option<FileSettings> {
    match &options.file {
        Some(path) => Some(FileSettings {
            filename: path.clone(),
            ..settings.file.clone()
        }),
        None if settings.file.enabled => Some(settings.file.clone()),
        None => None,
    }
}

/// "stress-3" -> "3"
fn worker_number(name: &str) -> &str {
    name.rsplit_once('-').map_or(name, |(_, n)| n)
}
