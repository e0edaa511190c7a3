//! Deferred work for the log widget
//!
//! The widget never sleeps or spawns. It asks a [`Scheduler`] to call
//! [`crate::LogWidget::on_timer`] later, and the host event loop delivers
//! the due timers on the UI thread.

use std::time::{Duration, Instant};

/// Timers the widget may arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Deferred batch flush
    FlushBatch,

    /// Loading animation step; ticks from an older indicator carry an older generation
    LoadingTick { generation: u64 },

    /// One-shot scroll to bottom shortly after loading starts
    SettleScroll,
}

/// Something that can deliver [`Timer`]s back to the widget
pub trait Scheduler {
    /// Arm `timer` to fire after `delay`; re-arming an armed timer restarts it
    fn schedule(&mut self, timer: Timer, delay: Duration);

    /// Disarm `timer` if armed
    fn cancel(&mut self, timer: Timer);
}

#[derive(Debug, Clone)]
struct Entry {
    deadline: Instant,
    seq: u64,
    timer: Timer,
}

/// Deadline-ordered timer list polled by an event loop
#[derive(Debug, Default, Clone)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scheduled(&self, timer: Timer) -> bool {
        self.entries.iter().any(|e| e.timer == timer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest armed deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// How long an event loop may sleep before the next timer is due
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Remove and return every timer due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<Timer> {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|e| {
            if e.deadline <= now {
                due.push(e.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| (e.deadline, e.seq));
        due.into_iter().map(|e| e.timer).collect()
    }

    /// Disarm `timer` regardless of its deadline; true if it was armed
    pub fn take(&mut self, timer: Timer) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.timer != timer);
        self.entries.len() != before
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, timer: Timer, delay: Duration) {
        self.entries.retain(|e| e.timer != timer);
        self.seq += 1;
        self.entries.push(Entry {
            deadline: Instant::now() + delay,
            seq: self.seq,
            timer,
        });
    }

    fn cancel(&mut self, timer: Timer) {
        self.entries.retain(|e| e.timer != timer);
    }
}
