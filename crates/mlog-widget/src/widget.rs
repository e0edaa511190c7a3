//! The log widget state machine
//!
//! Everything here runs on the UI thread. Producers reach the widget only
//! through [`LogSink`], whose records are applied by [`LogWidget::pump`].
//!
//! Display invariants:
//! - while loading is on exactly one indicator line exists and it is last
//! - records are displayed in the order they reached the widget
//! - records queued during loading stay off the surface until loading ends,
//!   then appear in order just above the completion line

use std::time::{Duration, Instant};

use chrono::Local;
use mlog_core::prelude::*;
use mlog_core::{LogLevel, LogRecord, TimestampFormat, WidgetSettings};
use tokio::sync::mpsc;

use crate::batcher::{BatchAction, MessageBatcher};
use crate::indicator::{Completion, IndicatorMode, LoadingIndicator, LoadingOptions, LoadingState};
use crate::scheduler::{Scheduler, Timer, TimerQueue};
use crate::scroll::{ScrollState, ScrollTracker};
use crate::sink::LogSink;
use crate::surface::{DisplaySurface, LineId, RenderFault};

/// Scrolling log view with batching and a loading indicator
pub struct LogWidget<S: DisplaySurface, T: Scheduler> {
    surface: S,
    scheduler: T,
    settings: WidgetSettings,
    batcher: MessageBatcher,
    indicator: LoadingIndicator,
    scroll: ScrollTracker,
    /// Next flush scrolls to the bottom even if the view was elsewhere
    first_content: bool,
    tx: mpsc::UnboundedSender<LogRecord>,
    inbox: mpsc::UnboundedReceiver<LogRecord>,
}

impl<S: DisplaySurface, T: Scheduler> LogWidget<S, T> {
    pub fn new(surface: S, scheduler: T, settings: WidgetSettings) -> Self {
        let (tx, inbox) = mpsc::unbounded_channel();
        Self {
            batcher: MessageBatcher::new(settings.batch_size),
            scroll: ScrollTracker::new(settings.bottom_epsilon),
            indicator: LoadingIndicator::new(),
            first_content: true,
            surface,
            scheduler,
            settings,
            tx,
            inbox,
        }
    }

    pub fn with_defaults(surface: S, scheduler: T) -> Self {
        Self::new(surface, scheduler, WidgetSettings::default())
    }

    /// Handle for other threads
    pub fn sink(&self) -> LogSink {
        LogSink::new(self.tx.clone())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    /// Switch the timestamp format for lines rendered from now on
    ///
    /// Lines already on the surface keep their text.
    pub fn set_timestamp_format(&mut self, format: &str) -> Result<()> {
        self.settings.timestamp_format = TimestampFormat::new(format)?;
        Ok(())
    }

    pub fn indicator(&self) -> &LoadingIndicator {
        &self.indicator
    }

    pub fn loading_state(&self) -> LoadingState {
        self.indicator.state()
    }

    pub fn is_loading(&self) -> bool {
        self.indicator.is_active()
    }

    pub fn pending_count(&self) -> usize {
        self.batcher.pending_count()
    }

    pub fn queued_count(&self) -> usize {
        self.indicator.queued_len()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    pub fn auto_scroll_enabled(&self) -> bool {
        self.scroll.auto_scroll_enabled()
    }

    /// Register a callback for auto-scroll transitions
    pub fn on_scroll_state_changed(&mut self, observer: impl FnMut(bool) + Send + 'static) {
        self.scroll.on_scroll_state_changed(observer);
    }

    /// Whether the view is within the bottom window
    pub fn is_at_bottom(&self) -> bool {
        self.scroll
            .is_at_bottom(self.surface.scroll_position(), self.surface.max_scroll())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────

    /// Apply every record delivered through sinks; returns how many
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Ok(record) = self.inbox.try_recv() {
            self.ingest(record);
            count += 1;
        }
        count
    }

    /// Timestamp `text` now and add it at Info level
    pub fn append_message(&mut self, text: impl Into<String>) {
        self.ingest(LogRecord::new(LogLevel::Info, text));
    }

    /// Add a record from the UI thread
    pub fn ingest(&mut self, record: LogRecord) {
        if self.indicator.is_queuing() {
            trace!("Queueing message while loading: {}", record.text);
            self.indicator.enqueue(record);
            return;
        }

        let line = self.render_record(&record);
        match self.batcher.add(line) {
            BatchAction::ScheduleFlush => self.scheduler.schedule(Timer::FlushBatch, Duration::ZERO),
            BatchAction::FlushNow => {
                self.scheduler.cancel(Timer::FlushBatch);
                self.flush_batch();
            }
            BatchAction::Wait => {}
        }
    }

    /// Write pending lines to the display
    ///
    /// Lines longer than the display accepts are clipped. If the display is
    /// not ready the lines stay pending and a retry is armed; any other
    /// failure drops the batch.
    pub fn flush_batch(&mut self) {
        if !self.batcher.has_pending() {
            return;
        }
        let was_at_bottom = self.is_at_bottom();

        let result = if self.indicator.is_active() {
            self.flush_under_indicator()
        } else {
            let lines = self.batcher.pending().to_vec();
            self.write_fitting(lines, |w, lines| w.surface.append_lines(lines).map(drop))
        };

        match result {
            Ok(()) => {
                let flushed = self.batcher.clear();
                trace!("Flushed {} lines", flushed);
            }
            Err(fault) if fault.is_transient() => {
                warn!(
                    "Batch flush failed, keeping {} lines for retry: {}",
                    self.batcher.pending_count(),
                    fault
                );
                let retry = self.animation_interval();
                self.scheduler.schedule(Timer::FlushBatch, retry);
                return;
            }
            Err(fault) => {
                let dropped = self.batcher.clear();
                error!("Batch flush failed, dropping {} lines: {}", dropped, fault);
                return;
            }
        }

        if self.scroll.auto_scroll_enabled() && (was_at_bottom || self.first_content) {
            self.surface.scroll_to_bottom();
        }
        self.first_content = false;
    }

    /// Replace the indicator with the batch followed by a fresh indicator
    fn flush_under_indicator(&mut self) -> std::result::Result<(), RenderFault> {
        let prefix = self.prefix_now();
        self.indicator.set_prefix(prefix);
        let mut lines = self.batcher.pending().to_vec();
        lines.push(self.indicator_text());

        let ids = self.write_fitting(lines, |w, lines| match w.indicator.line() {
            Some(id) => match w.surface.splice_line(id, lines) {
                Err(RenderFault::UnknownLine(_)) => {
                    warn!("Indicator line vanished, re-appending");
                    w.surface.append_lines(lines)
                }
                other => other,
            },
            None => w.surface.append_lines(lines),
        })?;

        self.indicator.set_line(ids.last().copied());
        Ok(())
    }

    /// Run a display write, clipping the lines and trying once more if any is too long
    fn write_fitting<R>(
        &mut self,
        mut lines: Vec<String>,
        write: impl Fn(&mut Self, &[String]) -> std::result::Result<R, RenderFault>,
    ) -> std::result::Result<R, RenderFault> {
        match write(self, &lines) {
            Err(RenderFault::ContentTooLarge { len, limit }) => {
                let clipped = lines
                    .iter_mut()
                    .map(|line| clip_line(line, limit))
                    .filter(|&changed| changed)
                    .count();
                warn!(
                    "Clipped {} lines to {} chars (longest was {})",
                    clipped, limit, len
                );
                write(self, &lines)
            }
            other => other,
        }
    }

    /// Remove every line, including the indicator, then redraw the indicator if loading
    ///
    /// Messages queued during loading are kept.
    pub fn clear(&mut self) {
        self.surface.clear();
        let dropped = self.batcher.clear();
        self.scheduler.cancel(Timer::FlushBatch);
        self.first_content = true;
        debug!("Cleared log view ({} pending lines dropped)", dropped);

        if self.indicator.is_active() {
            self.indicator.set_line(None);
            self.redraw_indicator();
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Loading indicator
    // ─────────────────────────────────────────────────────────────────────

    /// Show the loading indicator
    ///
    /// If one is already showing it is first turned off silently, so at most
    /// one indicator line ever exists.
    pub fn set_loading_on(&mut self, options: LoadingOptions) {
        // Records sent before this call belong above the indicator
        self.pump();

        if self.indicator.is_active() {
            debug!("Loading already on, restarting indicator");
            self.set_loading_off(Completion::Silent);
            if self.indicator.is_active() {
                error!("Could not restart loading indicator, keeping the current one");
                return;
            }
        }

        self.scheduler.cancel(Timer::FlushBatch);
        self.flush_batch();

        if let Some(queue) = options.queue_messages {
            self.settings.queue_messages = queue;
        }
        let mode = if options.passthrough || !self.settings.queue_messages {
            IndicatorMode::Passthrough
        } else {
            IndicatorMode::Queue
        };

        let prefix = self.prefix_now();
        let generation = self.indicator.activate(mode, prefix);
        self.redraw_indicator();

        let interval = self.animation_interval();
        self.scheduler
            .schedule(Timer::LoadingTick { generation }, interval);
        if self.scroll.auto_scroll_enabled() {
            self.surface.scroll_to_bottom();
        }
        let settle = Duration::from_millis(self.settings.settle_scroll_ms);
        self.scheduler.schedule(Timer::SettleScroll, settle);
        info!("Loading indicator on ({:?})", mode);
    }

    /// Hide the loading indicator
    ///
    /// The indicator line is replaced, in one display update, by any pending
    /// lines, the queued messages and the completion line. Over-long lines are
    /// clipped. If the display is not ready loading stays on with nothing
    /// lost; any other failure still ends loading and drops what could not
    /// be shown.
    pub fn set_loading_off(&mut self, completion: impl Into<Completion>) {
        if !self.indicator.is_active() {
            return;
        }
        let completion = completion.into();

        // Records already sent belong before the completion line
        self.pump();

        let mut lines = self.batcher.pending().to_vec();
        lines.extend(self.indicator.queued().map(|r| self.render_record(r)));
        if let Some(text) = completion.text(&self.settings.completion_message) {
            lines.push(format!("{}{}", self.prefix_now(), text));
        }

        let result = self.write_fitting(lines, |w, lines| match w.indicator.line() {
            Some(id) => w.replace_indicator(id, lines),
            None => w.append_all(lines),
        });

        match result {
            Ok(()) => {}
            Err(fault) if fault.is_transient() => {
                warn!("Failed to end loading, indicator kept: {}", fault);
                return;
            }
            Err(fault) => {
                error!("Failed to show final loading lines, dropping them: {}", fault);
                if let Some(id) = self.indicator.line() {
                    if let Err(fault) = self.surface.remove_line(id) {
                        warn!("Could not remove indicator line {}: {}", id, fault);
                    }
                }
            }
        }

        let generation = self.indicator.generation();
        self.scheduler.cancel(Timer::LoadingTick { generation });
        self.scheduler.cancel(Timer::FlushBatch);
        self.scheduler.cancel(Timer::SettleScroll);
        self.batcher.clear();
        let released = self.indicator.deactivate();
        self.first_content = false;
        info!("Loading indicator off ({} queued messages released)", released);

        if self.scroll.auto_scroll_enabled() {
            self.surface.scroll_to_bottom();
        }
    }

    /// Swap the indicator line for `lines` (possibly none)
    fn replace_indicator(&mut self, id: LineId, lines: &[String]) -> std::result::Result<(), RenderFault> {
        let result = if lines.is_empty() {
            self.surface.remove_line(id)
        } else {
            self.surface.splice_line(id, lines).map(drop)
        };
        match result {
            Err(RenderFault::UnknownLine(_)) => {
                warn!("Indicator line {} vanished, appending instead", id);
                self.append_all(lines)
            }
            other => other,
        }
    }

    fn append_all(&mut self, lines: &[String]) -> std::result::Result<(), RenderFault> {
        if lines.is_empty() {
            return Ok(());
        }
        self.surface.append_lines(lines).map(drop)
    }

    /// Deliver a timer armed through the scheduler
    pub fn on_timer(&mut self, timer: Timer) {
        self.pump();
        match timer {
            Timer::FlushBatch => self.flush_batch(),
            Timer::LoadingTick { generation } => self.on_loading_tick(generation),
            Timer::SettleScroll => {
                if self.indicator.is_active() && self.scroll.auto_scroll_enabled() {
                    self.surface.scroll_to_bottom();
                }
            }
        }
    }

    fn on_loading_tick(&mut self, generation: u64) {
        if !self.indicator.is_active() || generation != self.indicator.generation() {
            trace!("Ignoring stale loading tick (generation {})", generation);
            return;
        }

        self.indicator.advance();
        let interval = self.animation_interval();
        self.scheduler
            .schedule(Timer::LoadingTick { generation }, interval);

        if self.batcher.has_pending() {
            // The flush redraws the indicator with the new frame
            self.scheduler.cancel(Timer::FlushBatch);
            self.flush_batch();
            return;
        }

        let was_at_bottom = self.is_at_bottom();
        self.redraw_indicator();
        if was_at_bottom && self.scroll.auto_scroll_enabled() {
            self.surface.scroll_to_bottom();
        }
    }

    /// Rewrite the indicator line, appending it if it is not displayed
    fn redraw_indicator(&mut self) {
        let mut text = self.indicator_text();
        if let Some(id) = self.indicator.line() {
            let mut result = self.surface.replace_line(id, &text);
            if let Err(RenderFault::ContentTooLarge { limit, .. }) = result {
                clip_line(&mut text, limit);
                result = self.surface.replace_line(id, &text);
            }
            match result {
                Ok(()) => return,
                Err(RenderFault::UnknownLine(_)) => {
                    warn!("Indicator line {} vanished, re-appending", id);
                }
                Err(fault) => {
                    error!("Failed to update loading indicator: {}", fault);
                    return;
                }
            }
        }

        match self.surface.append_line(&text) {
            Ok(id) => self.indicator.set_line(Some(id)),
            Err(fault) => {
                self.indicator.set_line(None);
                error!("Failed to show loading indicator: {}", fault);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // User scrolling
    // ─────────────────────────────────────────────────────────────────────

    pub fn begin_user_scroll(&mut self) {
        let (position, max) = self.scroll_bounds();
        self.scroll.drag_started(position, max);
    }

    /// Move the view during a user gesture
    pub fn user_scroll_to(&mut self, position: usize) {
        self.surface.set_scroll_position(position);
        let (position, max) = self.scroll_bounds();
        self.scroll.position_changed(position, max);
    }

    pub fn end_user_scroll(&mut self) {
        let (position, max) = self.scroll_bounds();
        self.scroll.drag_ended(position, max);
    }

    /// One complete gesture moving the view by `delta` lines
    pub fn user_scroll_by(&mut self, delta: isize) {
        self.begin_user_scroll();
        let target = self.surface.scroll_position().saturating_add_signed(delta);
        self.user_scroll_to(target);
        self.end_user_scroll();
    }

    /// One complete gesture jumping to the end
    pub fn user_scroll_to_bottom(&mut self) {
        self.begin_user_scroll();
        let max = self.surface.max_scroll();
        self.user_scroll_to(max);
        self.end_user_scroll();
    }

    /// One complete gesture jumping to the start
    pub fn user_scroll_to_top(&mut self) {
        self.begin_user_scroll();
        self.user_scroll_to(0);
        self.end_user_scroll();
    }

    fn scroll_bounds(&self) -> (usize, usize) {
        (self.surface.scroll_position(), self.surface.max_scroll())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Formatting
    // ─────────────────────────────────────────────────────────────────────

    fn prefix_now(&self) -> String {
        self.settings.timestamp_format.prefix(&Local::now())
    }

    fn indicator_text(&self) -> String {
        self.indicator.render(&self.settings.indicator_text)
    }

    fn render_record(&self, record: &LogRecord) -> String {
        let prefix = self.settings.timestamp_format.prefix(&record.timestamp);
        if self.settings.show_levels {
            format!(
                "{}[{}]{} {}",
                prefix,
                record.level.name(),
                record.level.padding(),
                record.text
            )
        } else {
            format!("{}{}", prefix, record.text)
        }
    }

    fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.settings.animation_interval_ms)
    }
}

impl<S: DisplaySurface> LogWidget<S, TimerQueue> {
    /// Pump sinks and deliver every timer due at `now`; returns how many fired
    pub fn run_due_timers(&mut self, now: Instant) -> usize {
        self.pump();
        let due = self.scheduler.take_due(now);
        let count = due.len();
        for timer in due {
            self.on_timer(timer);
        }
        count
    }

    /// Time until the next timer, for event loop polling
    pub fn time_until_next_timer(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_next(now)
    }
}

impl<S: DisplaySurface, T: Scheduler> std::fmt::Debug for LogWidget<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogWidget")
            .field("loading", &self.indicator.state())
            .field("pending", &self.batcher.pending_count())
            .field("queued", &self.indicator.queued_len())
            .field("scroll", &self.scroll.state())
            .finish()
    }
}

/// Marker ending a clipped line
const CLIP_MARKER: char = '…';

/// Shorten `line` to at most `limit` chars, ending in [`CLIP_MARKER`]; returns whether it changed
fn clip_line(line: &mut String, limit: usize) -> bool {
    let Some((cut, _)) = line.char_indices().nth(limit) else {
        return false;
    };
    if limit == 0 {
        line.clear();
        return true;
    }
    let keep = line[..cut]
        .char_indices()
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0);
    line.truncate(keep);
    line.push(CLIP_MARKER);
    true
}

#[cfg(test)]
mod tests;
