use super::*;
use crate::surface::{MemorySurface, MockDisplaySurface};
use std::sync::{Arc, Mutex};

type TestWidget = LogWidget<MemorySurface, TimerQueue>;

fn widget() -> TestWidget {
    LogWidget::with_defaults(MemorySurface::new(), TimerQueue::new())
}

/// Lines with the leading "[timestamp] " removed
fn texts(widget: &TestWidget) -> Vec<String> {
    widget
        .surface()
        .lines()
        .iter()
        .map(|line| {
            line.split_once("] ")
                .map(|(_, rest)| rest.to_string())
                .unwrap_or_else(|| line.clone())
        })
        .collect()
}

fn flush<S: DisplaySurface>(widget: &mut LogWidget<S, TimerQueue>) {
    if widget.scheduler_mut().take(Timer::FlushBatch) {
        widget.on_timer(Timer::FlushBatch);
    }
}

fn tick<S: DisplaySurface>(widget: &mut LogWidget<S, TimerQueue>) {
    let generation = widget.indicator().generation();
    widget.on_timer(Timer::LoadingTick { generation });
}

// ─────────────────────────────────────────────────────────────────────────
// Batching
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_messages_wait_for_deferred_flush() {
    let mut w = widget();
    w.append_message("one");
    w.append_message("two");

    assert!(w.surface().is_empty());
    assert!(w.scheduler().is_scheduled(Timer::FlushBatch));

    flush(&mut w);
    assert_eq!(texts(&w), vec!["one", "two"]);
    assert_eq!(w.pending_count(), 0);
}

#[test]
fn test_tenth_message_flushes_immediately() {
    let mut w = widget();
    for i in 0..10 {
        w.append_message(format!("m{}", i));
    }

    assert_eq!(w.surface().len(), 10);
    assert!(!w.scheduler().is_scheduled(Timer::FlushBatch));
}

#[test]
fn test_fifty_messages_in_order() {
    let mut w = widget();
    for i in 1..=50 {
        w.append_message(format!("Test message {}", i));
    }
    flush(&mut w);

    let expected: Vec<String> = (1..=50).map(|i| format!("Test message {}", i)).collect();
    assert_eq!(texts(&w), expected);
    assert!(w.is_at_bottom());
}

#[test]
fn test_line_starts_with_bracketed_timestamp() {
    let mut w = widget();
    w.append_message("hello");
    flush(&mut w);

    let line = &w.surface().lines()[0];
    // "[YYYY-MM-DD HH:MM:SS] hello"
    assert_eq!(line.len(), 21 + 1 + 5);
    assert!(line.starts_with('['));
    assert_eq!(&line[20..], "] hello");
}

#[test]
fn test_set_timestamp_format() {
    let mut w = widget();
    w.append_message("before");
    flush(&mut w);

    w.set_timestamp_format("<%H:%M>").unwrap();
    assert!(w.set_timestamp_format("%Q").is_err());
    w.append_message("after");
    flush(&mut w);

    let lines = w.surface().lines();
    assert!(lines[0].starts_with('['));
    assert!(lines[1].starts_with('<'));
    assert_eq!(&lines[1][7..], " after");
}

#[test]
fn test_show_levels_adds_padded_level() {
    let settings = WidgetSettings {
        show_levels: true,
        ..WidgetSettings::default()
    };
    let mut w = LogWidget::new(MemorySurface::new(), TimerQueue::new(), settings);
    w.ingest(LogRecord::new(LogLevel::Error, "boom"));
    flush(&mut w);

    assert_eq!(texts(&w), vec!["[ERROR]    boom"]);
}

#[test]
fn test_sink_records_applied_on_pump() {
    let mut w = widget();
    let sink = w.sink();
    let worker = std::thread::spawn(move || {
        for i in 0..5 {
            sink.append_message(format!("from thread {}", i));
        }
    });
    worker.join().unwrap();

    assert!(w.surface().is_empty());
    assert_eq!(w.pump(), 5);
    flush(&mut w);
    assert_eq!(w.surface().len(), 5);
    assert_eq!(texts(&w)[4], "from thread 4");
}

#[test]
fn test_clear_resets_display() {
    let mut w = widget();
    w.append_message("old");
    flush(&mut w);
    w.append_message("pending");

    w.clear();
    flush(&mut w);

    assert!(w.surface().is_empty());
    assert_eq!(w.pending_count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────
// Loading indicator - queue mode
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_queue_mode_releases_after_completion() {
    let mut w = widget();
    w.append_message("before");
    flush(&mut w);

    w.set_loading_on(LoadingOptions::queued());
    assert_eq!(w.loading_state(), LoadingState::OnQueuing);
    w.append_message("A");
    w.append_message("B");
    flush(&mut w);

    assert_eq!(texts(&w), vec!["before", "Loading"]);
    assert_eq!(w.queued_count(), 2);

    w.set_loading_off("Done");

    assert_eq!(texts(&w), vec!["before", "A", "B", "Done"]);
    assert_eq!(w.loading_state(), LoadingState::Off);
    assert_eq!(w.queued_count(), 0);
}

#[test]
fn test_pending_batch_flushed_before_indicator() {
    let mut w = widget();
    w.append_message("a");
    w.set_loading_on(LoadingOptions::queued());

    assert_eq!(texts(&w), vec!["a", "Loading"]);
}

#[test]
fn test_default_completion_message() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::default());
    w.set_loading_off(Completion::Default);

    assert_eq!(texts(&w), vec!["Loading operation completed"]);
}

#[test]
fn test_silent_completion() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::default());
    w.set_loading_off(Some(""));

    assert!(w.surface().is_empty());
}

#[test]
fn test_records_sent_before_off_precede_completion() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::queued());
    w.sink().append_message("late");

    w.set_loading_off(Completion::Default);

    assert_eq!(texts(&w), vec!["late", "Loading operation completed"]);
}

#[test]
fn test_off_when_off_is_noop() {
    let mut w = widget();
    w.set_loading_off("Done");
    assert!(w.surface().is_empty());
}

#[test]
fn test_clear_while_loading_keeps_indicator_and_queue() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::queued());
    w.append_message("q");

    w.clear();
    assert_eq!(texts(&w), vec!["Loading"]);
    assert_eq!(w.queued_count(), 1);

    w.set_loading_off(Completion::Default);
    assert_eq!(texts(&w), vec!["q", "Loading operation completed"]);
}

// ─────────────────────────────────────────────────────────────────────────
// Loading indicator - passthrough mode
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_passthrough_keeps_indicator_last() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::passthrough());
    w.append_message("X");
    flush(&mut w);

    assert_eq!(texts(&w), vec!["X", "Loading"]);
    assert_eq!(w.loading_state(), LoadingState::OnPassthrough);

    w.set_loading_off("Finished");
    assert_eq!(texts(&w), vec!["X", "Finished"]);
}

#[test]
fn test_passthrough_tick_flushes_pending() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::passthrough());
    w.append_message("X");

    tick(&mut w);

    assert_eq!(texts(&w), vec!["X", "Loading."]);
    assert_eq!(w.pending_count(), 0);
}

#[test]
fn test_queue_messages_false_means_passthrough() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::default().queue_messages(false));
    assert_eq!(w.loading_state(), LoadingState::OnPassthrough);
    w.set_loading_off(Completion::Silent);

    // The preference sticks for later calls
    assert!(!w.settings().queue_messages);
    w.set_loading_on(LoadingOptions::default());
    assert_eq!(w.loading_state(), LoadingState::OnPassthrough);
}

// ─────────────────────────────────────────────────────────────────────────
// Animation
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn test_tick_cycles_dots() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::queued());

    let mut seen = Vec::new();
    for _ in 0..4 {
        tick(&mut w);
        seen.push(texts(&w).last().cloned().unwrap());
    }
    assert_eq!(seen, vec!["Loading.", "Loading..", "Loading...", "Loading"]);
}

#[test]
fn test_tick_rearms_itself() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::queued());
    let generation = w.indicator().generation();

    assert!(w.scheduler_mut().take(Timer::LoadingTick { generation }));
    w.on_timer(Timer::LoadingTick { generation });
    assert!(w.scheduler().is_scheduled(Timer::LoadingTick { generation }));
}

#[test]
fn test_stale_tick_ignored() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::queued());
    let old = w.indicator().generation();
    w.set_loading_off(Completion::Silent);
    w.set_loading_on(LoadingOptions::queued());
    let current = w.indicator().generation();

    w.on_timer(Timer::LoadingTick { generation: old });

    assert_eq!(w.indicator().frame(), 0);
    assert!(!w.scheduler().is_scheduled(Timer::LoadingTick { generation: old }));
    assert!(w.scheduler().is_scheduled(Timer::LoadingTick { generation: current }));
}

#[test]
fn test_tick_after_off_does_nothing() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::queued());
    let generation = w.indicator().generation();
    w.set_loading_off(Completion::Silent);

    w.on_timer(Timer::LoadingTick { generation });

    assert!(w.surface().is_empty());
    assert!(!w.scheduler().is_scheduled(Timer::LoadingTick { generation }));
}

#[test]
fn test_double_on_leaves_single_indicator() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::queued());
    w.append_message("held");
    w.set_loading_on(LoadingOptions::passthrough());

    let indicators = texts(&w)
        .iter()
        .filter(|t| t.starts_with("Loading"))
        .count();
    assert_eq!(indicators, 1);
    assert_eq!(texts(&w), vec!["held", "Loading"]);
    assert_eq!(w.loading_state(), LoadingState::OnPassthrough);
}

#[test]
fn test_vanished_indicator_is_reappended() {
    let mut w = widget();
    w.set_loading_on(LoadingOptions::queued());
    w.surface_mut().clear();

    tick(&mut w);

    assert_eq!(texts(&w), vec!["Loading."]);
}

// ─────────────────────────────────────────────────────────────────────────
// Auto-scroll
// ─────────────────────────────────────────────────────────────────────────

fn fill(w: &mut TestWidget, count: usize) {
    for i in 0..count {
        w.append_message(format!("line {}", i));
    }
    flush(w);
}

#[test]
fn test_follows_new_content_at_bottom() {
    let mut w = widget();
    fill(&mut w, 40);
    assert_eq!(w.surface().scroll_position(), w.surface().max_scroll());

    fill(&mut w, 15);
    assert_eq!(w.surface().scroll_position(), w.surface().max_scroll());
}

#[test]
fn test_scrolling_away_pauses_and_returning_resumes() {
    let mut w = widget();
    let changes = Arc::new(Mutex::new(Vec::new()));
    let observed = changes.clone();
    w.on_scroll_state_changed(move |enabled| observed.lock().unwrap().push(enabled));

    fill(&mut w, 40);
    w.user_scroll_by(-15);
    assert!(!w.auto_scroll_enabled());
    let parked = w.surface().scroll_position();

    fill(&mut w, 10);
    assert_eq!(w.surface().scroll_position(), parked);

    w.user_scroll_to_bottom();
    assert!(w.auto_scroll_enabled());
    fill(&mut w, 10);
    assert_eq!(w.surface().scroll_position(), w.surface().max_scroll());

    assert_eq!(*changes.lock().unwrap(), vec![false, true]);
}

#[test]
fn test_loading_does_not_force_scroll_when_paused() {
    let mut w = widget();
    fill(&mut w, 40);
    w.user_scroll_to_top();
    assert!(!w.auto_scroll_enabled());

    w.set_loading_on(LoadingOptions::queued());
    w.on_timer(Timer::SettleScroll);
    w.set_loading_off(Completion::Default);

    assert_eq!(w.surface().scroll_position(), 0);
    assert!(!w.auto_scroll_enabled());
}

#[test]
fn test_small_scroll_stays_following() {
    let mut w = widget();
    fill(&mut w, 40);
    w.user_scroll_by(-3);
    assert!(w.auto_scroll_enabled());
}

// ─────────────────────────────────────────────────────────────────────────
// Display failures
// ─────────────────────────────────────────────────────────────────────────

fn mock_surface() -> MockDisplaySurface {
    let mut surface = MockDisplaySurface::new();
    surface.expect_scroll_position().return_const(0usize);
    surface.expect_max_scroll().return_const(0usize);
    surface.expect_scroll_to_bottom().return_const(());
    surface
}

fn ids(count: usize) -> Vec<LineId> {
    (100..100 + count as u64).map(LineId::new).collect()
}

#[test]
fn test_failed_flush_keeps_lines_and_retries() {
    let mut surface = mock_surface();
    let mut seq = mockall::Sequence::new();
    surface
        .expect_append_lines()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(RenderFault::NotReady("not laid out".into())));
    surface
        .expect_append_lines()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|lines: &[String]| lines.len() == 2 && lines[1].ends_with("second"))
        .returning(|lines| Ok(ids(lines.len())));

    let mut w = LogWidget::with_defaults(surface, TimerQueue::new());
    w.append_message("first");
    flush(&mut w);

    assert_eq!(w.pending_count(), 1);
    assert!(w.scheduler().is_scheduled(Timer::FlushBatch));

    w.append_message("second");
    flush(&mut w);
    assert_eq!(w.pending_count(), 0);
}

#[test]
fn test_failed_off_keeps_loading_and_queue() {
    let mut surface = mock_surface();
    let indicator = LineId::new(7);
    surface
        .expect_append_line()
        .times(1)
        .returning(move |_| Ok(indicator));

    let mut seq = mockall::Sequence::new();
    surface
        .expect_splice_line()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(RenderFault::NotReady("not laid out".into())));
    surface
        .expect_splice_line()
        .times(1)
        .in_sequence(&mut seq)
        .withf(move |id: &LineId, lines: &[String]| *id == indicator && lines.len() == 2)
        .returning(|_, lines| Ok(ids(lines.len())));

    let mut w = LogWidget::with_defaults(surface, TimerQueue::new());
    w.set_loading_on(LoadingOptions::queued());
    w.append_message("held");

    w.set_loading_off("Done");
    assert!(w.is_loading());
    assert_eq!(w.queued_count(), 1);

    w.set_loading_off("Done");
    assert!(!w.is_loading());
    assert_eq!(w.queued_count(), 0);
}

#[test]
fn test_unknown_indicator_on_off_appends_instead() {
    let mut surface = mock_surface();
    let indicator = LineId::new(3);
    surface
        .expect_append_line()
        .times(1)
        .returning(move |_| Ok(indicator));
    surface
        .expect_splice_line()
        .times(1)
        .returning(move |_, _| Err(RenderFault::UnknownLine(indicator)));
    surface
        .expect_append_lines()
        .times(1)
        .withf(|lines: &[String]| lines.len() == 1 && lines[0].ends_with("Done"))
        .returning(|lines| Ok(ids(lines.len())));

    let mut w = LogWidget::with_defaults(surface, TimerQueue::new());
    w.set_loading_on(LoadingOptions::queued());
    w.set_loading_off("Done");

    assert!(!w.is_loading());
}

fn long_text(len: usize) -> String {
    "x".repeat(len)
}

fn clipped_widget(limit: usize) -> TestWidget {
    LogWidget::with_defaults(
        MemorySurface::new().with_max_line_len(Some(limit)),
        TimerQueue::new(),
    )
}

#[test]
fn test_clip_line() {
    let mut line = "abcdef".to_string();
    assert!(clip_line(&mut line, 4));
    assert_eq!(line, "abc…");

    let mut short = "abc".to_string();
    assert!(!clip_line(&mut short, 3));
    assert_eq!(short, "abc");

    let mut wide = "ééééé".to_string();
    assert!(clip_line(&mut wide, 2));
    assert_eq!(wide, "é…");
}

#[test]
fn test_overlong_message_is_clipped_and_later_ones_flow() {
    let mut w = clipped_widget(60);
    w.append_message(long_text(100));
    flush(&mut w);
    w.append_message("after");
    flush(&mut w);

    let lines = w.surface().lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].chars().count(), 60);
    assert!(lines[0].ends_with('…'));
    assert!(lines[1].ends_with("after"));
    assert_eq!(w.pending_count(), 0);
    assert!(!w.scheduler().is_scheduled(Timer::FlushBatch));
}

#[test]
fn test_overlong_message_in_passthrough_does_not_stall_loading() {
    let mut w = clipped_widget(60);
    w.set_loading_on(LoadingOptions::passthrough());
    w.append_message(long_text(100));
    for i in 0..25 {
        w.append_message(format!("short {}", i));
    }
    for _ in 0..4 {
        tick(&mut w);
    }
    assert_eq!(w.pending_count(), 0);

    w.set_loading_off(Completion::Default);
    assert!(!w.is_loading());

    let lines = texts(&w);
    assert_eq!(lines.len(), 27);
    assert_eq!(lines[1], "short 0");
    assert_eq!(lines[25], "short 24");
    assert_eq!(lines[26], "Loading operation completed");
}

#[test]
fn test_overlong_queued_message_is_clipped_on_off() {
    let mut w = clipped_widget(60);
    w.set_loading_on(LoadingOptions::queued());
    w.append_message("before");
    w.append_message(long_text(100));

    w.set_loading_off("Done");
    assert!(!w.is_loading());

    let lines = w.surface().lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("before"));
    assert!(lines[1].ends_with('…'));
    assert!(lines[2].ends_with("Done"));
}

#[test]
fn test_permanent_off_failure_still_ends_loading() {
    let mut surface = mock_surface();
    let indicator = LineId::new(9);
    surface
        .expect_append_line()
        .times(1)
        .returning(move |_| Ok(indicator));
    surface
        .expect_splice_line()
        .times(2)
        .returning(|_, _| Err(RenderFault::ContentTooLarge { len: 10, limit: 5 }));
    surface
        .expect_remove_line()
        .times(1)
        .withf(move |id: &LineId| *id == indicator)
        .returning(|_| Ok(()));

    let mut w = LogWidget::with_defaults(surface, TimerQueue::new());
    w.set_loading_on(LoadingOptions::queued());
    w.append_message("held");

    w.set_loading_off("Done");
    assert!(!w.is_loading());
    assert_eq!(w.queued_count(), 0);
}
