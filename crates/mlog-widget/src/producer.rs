//! Background producers that feed a widget
//!
//! Each producer runs as a tokio task holding a [`ProducerContext`]. Stopping
//! the pool signals cancellation through a watch channel, waits a bounded
//! time for producers to notice, then aborts the rest. Every producer reports
//! a [`ProducerEvent`] when it ends, whether it completed, failed, panicked or
//! was aborted.

use std::future::Future;
use std::time::Duration;

use mlog_core::prelude::*;
use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinHandle};

use crate::sink::LogSink;

pub type ProducerId = usize;

/// How a producer ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerOutcome {
    Completed,
    /// Stopped because cancellation was requested, or aborted after the timeout
    Cancelled,
    Failed(String),
    Panicked,
}

/// Sent once per producer when it ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerEvent {
    pub id: ProducerId,
    pub name: String,
    pub outcome: ProducerOutcome,
}

/// Handed to each producer
#[derive(Debug, Clone)]
pub struct ProducerContext {
    id: ProducerId,
    sink: LogSink,
    cancel: watch::Receiver<bool>,
}

impl ProducerContext {
    pub fn id(&self) -> ProducerId {
        self.id
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Resolves once cancellation is requested
    pub async fn cancelled(&mut self) {
        while !*self.cancel.borrow_and_update() {
            if self.cancel.changed().await.is_err() {
                return;
            }
        }
    }

    /// Sleep unless cancelled first; false if cancelled
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.cancelled() => false,
        }
    }
}

struct Running {
    id: ProducerId,
    name: String,
    handle: JoinHandle<()>,
    work: AbortHandle,
}

/// Result of [`ProducerPool::stop`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopReport {
    /// Producers that ended within the timeout
    pub stopped: usize,
    /// Producers aborted after the timeout
    pub aborted: usize,
}

/// Owns running producers
///
/// Must be used from inside a tokio runtime.
pub struct ProducerPool {
    next_id: ProducerId,
    running: Vec<Running>,
    cancel_tx: watch::Sender<bool>,
    events_tx: mpsc::UnboundedSender<ProducerEvent>,
    events_rx: mpsc::UnboundedReceiver<ProducerEvent>,
    active: usize,
}

impl Default for ProducerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ProducerPool {
    pub fn new() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            next_id: 0,
            running: Vec::new(),
            cancel_tx,
            events_tx,
            events_rx,
            active: 0,
        }
    }

    /// Start a producer; its [`ProducerEvent`] arrives when it ends
    pub fn spawn<F, Fut>(&mut self, name: impl Into<String>, sink: LogSink, work: F) -> ProducerId
    where
        F: FnOnce(ProducerContext) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        let name = name.into();

        let ctx = ProducerContext {
            id,
            sink,
            cancel: self.cancel_tx.subscribe(),
        };
        let cancel = self.cancel_tx.subscribe();
        let events = self.events_tx.clone();

        let task = tokio::spawn(work(ctx));
        let work_abort = task.abort_handle();
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let outcome = match task.await {
                Ok(Ok(())) if *cancel.borrow() => ProducerOutcome::Cancelled,
                Ok(Ok(())) => ProducerOutcome::Completed,
                Ok(Err(e)) => {
                    error!("Producer {} failed: {}", task_name, e);
                    ProducerOutcome::Failed(e.to_string())
                }
                Err(e) if e.is_panic() => {
                    error!("Producer {} panicked", task_name);
                    ProducerOutcome::Panicked
                }
                Err(_) => ProducerOutcome::Cancelled,
            };
            debug!("Producer {} finished: {:?}", task_name, outcome);
            let _ = events.send(ProducerEvent {
                id,
                name: task_name,
                outcome,
            });
        });

        debug!("Started producer {} ({})", id, name);
        self.running.push(Running {
            id,
            name,
            handle,
            work: work_abort,
        });
        self.active += 1;
        id
    }

    /// Producers started and not yet reported finished
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Collect finish events without waiting
    pub fn poll_events(&mut self) -> Vec<ProducerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(self.record_finished(event));
        }
        events
    }

    /// Wait for the next finish event
    pub async fn next_event(&mut self) -> Option<ProducerEvent> {
        if self.active == 0 {
            return None;
        }
        let event = self.events_rx.recv().await?;
        Some(self.record_finished(event))
    }

    fn record_finished(&mut self, event: ProducerEvent) -> ProducerEvent {
        self.active = self.active.saturating_sub(1);
        self.running.retain(|r| r.id != event.id);
        event
    }

    /// Signal cancellation and wait up to `timeout` for producers to end
    ///
    /// Producers still running after the timeout are aborted. The pool can
    /// be reused afterwards.
    pub async fn stop(&mut self, timeout: Duration) -> StopReport {
        if self.running.is_empty() {
            return StopReport::default();
        }
        info!("Stopping {} producers", self.running.len());
        self.cancel_tx.send_replace(true);

        let deadline = tokio::time::Instant::now() + timeout;
        let mut report = StopReport::default();

        for running in &mut self.running {
            match tokio::time::timeout_at(deadline, &mut running.handle).await {
                Ok(_) => report.stopped += 1,
                Err(_) => {
                    warn!(
                        "Producer {} ({}) did not stop in time, aborting",
                        running.id, running.name
                    );
                    running.work.abort();
                    report.aborted += 1;
                }
            }
        }

        self.running.clear();
        self.cancel_tx.send_replace(false);
        report
    }
}

impl Drop for ProducerPool {
    fn drop(&mut self) {
        for running in &self.running {
            running.work.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlog_core::LogRecord;

    fn sink() -> (LogSink, mpsc::UnboundedReceiver<LogRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (LogSink::new(tx), rx)
    }

    #[tokio::test]
    async fn test_completed_producer_reports_and_delivers() {
        let (sink, mut rx) = sink();
        let mut pool = ProducerPool::new();

        pool.spawn("writer", sink, |ctx| async move {
            for i in 0..5 {
                ctx.sink().append_message(format!("msg {}", i));
            }
            Ok(())
        });

        let event = pool.next_event().await.unwrap();
        assert_eq!(event.outcome, ProducerOutcome::Completed);
        assert_eq!(event.name, "writer");
        assert_eq!(pool.active_count(), 0);

        let texts: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, vec!["msg 0", "msg 1", "msg 2", "msg 3", "msg 4"]);
    }

    #[tokio::test]
    async fn test_failed_producer_still_reports() {
        let (sink, _rx) = sink();
        let mut pool = ProducerPool::new();

        pool.spawn("broken", sink, |_ctx| async move {
            Err(Error::producer("simulated failure"))
        });

        let event = pool.next_event().await.unwrap();
        assert!(matches!(event.outcome, ProducerOutcome::Failed(ref m) if m.contains("simulated failure")));
        assert_eq!(pool.active_count(), 0);
    }

    #[tokio::test]
    async fn test_panicking_producer_still_reports() {
        let (sink, _rx) = sink();
        let mut pool = ProducerPool::new();

        pool.spawn("panicky", sink, |_ctx| async move {
            if true {
                panic!("producer blew up");
            }
            Ok(())
        });

        let event = pool.next_event().await.unwrap();
        assert_eq!(event.outcome, ProducerOutcome::Panicked);
    }

    #[tokio::test]
    async fn test_stop_cancels_cooperative_producers() {
        let (sink, _rx) = sink();
        let mut pool = ProducerPool::new();

        for i in 0..3 {
            pool.spawn(format!("loop {}", i), sink.clone(), |mut ctx| async move {
                while ctx.sleep(Duration::from_millis(5)).await {
                    ctx.sink().append_message("tick");
                }
                Ok(())
            });
        }

        let report = pool.stop(Duration::from_secs(2)).await;
        assert_eq!(report, StopReport { stopped: 3, aborted: 0 });

        let events = pool.poll_events();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.outcome == ProducerOutcome::Cancelled));
        assert_eq!(pool.active_count(), 0);
    }

    #[tokio::test]
    async fn test_stop_aborts_stubborn_producer() {
        let (sink, _rx) = sink();
        let mut pool = ProducerPool::new();

        pool.spawn("stubborn", sink, |_ctx| async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });

        let report = pool.stop(Duration::from_millis(20)).await;
        assert_eq!(report.aborted, 1);

        let event = pool.next_event().await.unwrap();
        assert_eq!(event.outcome, ProducerOutcome::Cancelled);
        assert_eq!(pool.active_count(), 0);
    }

    #[tokio::test]
    async fn test_pool_reusable_after_stop() {
        let (sink, _rx) = sink();
        let mut pool = ProducerPool::new();
        pool.stop(Duration::from_millis(10)).await;

        pool.spawn("later", sink, |ctx| async move {
            assert!(!ctx.is_cancelled());
            Ok(())
        });

        let event = pool.next_event().await.unwrap();
        assert_eq!(event.outcome, ProducerOutcome::Completed);
    }
}
