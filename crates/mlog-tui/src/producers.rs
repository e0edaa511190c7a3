//! Demo workers that log from background tasks

use std::time::Duration;

use mlog_core::prelude::*;
use mlog_widget::ProducerContext;
use rand::Rng;

/// Random delay range for worker steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jitter {
    pub min: Duration,
    pub max: Duration,
}

impl Jitter {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub const fn fixed(delay: Duration) -> Self {
        Self::new(delay, delay)
    }

    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// Delays used by the demo workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoTiming {
    /// How long the timed loading operation lasts
    pub loading: Duration,
    /// Delay between progress reports of the simulated work
    pub work_step: Duration,
    pub stress: Jitter,
    pub direct: Jitter,
}

impl Default for DemoTiming {
    fn default() -> Self {
        Self {
            loading: Duration::from_secs(3),
            work_step: Duration::from_secs(1),
            stress: Jitter::new(Duration::from_millis(100), Duration::from_millis(1000)),
            direct: Jitter::new(Duration::from_millis(100), Duration::from_millis(500)),
        }
    }
}

impl DemoTiming {
    /// Near-zero delays for tests
    pub fn instant() -> Self {
        let tick = Duration::from_millis(1);
        Self {
            loading: tick,
            work_step: tick,
            stress: Jitter::fixed(tick),
            direct: Jitter::fixed(tick),
        }
    }
}

/// Number of steps of the simulated work
pub const WORK_STEPS: usize = 5;

/// Send one line to the widget; fails once the widget is gone
fn report(ctx: &ProducerContext, text: String) -> Result<()> {
    if ctx.sink().append_message(text) {
        Ok(())
    } else {
        Err(Error::producer("log widget closed"))
    }
}

/// Waits out the loading period
pub async fn loading_worker(mut ctx: ProducerContext, duration: Duration) -> Result<()> {
    ctx.sleep(duration).await;
    Ok(())
}

/// Reports progress at a fixed pace
pub async fn work_worker(mut ctx: ProducerContext, step: Duration) -> Result<()> {
    for i in 1..=WORK_STEPS {
        if !ctx.sleep(step).await {
            break;
        }
        report(&ctx, format!("Task progress: {}/{}", i, WORK_STEPS))?;
    }
    Ok(())
}

/// Stress worker `worker` runs `5 + 2 * (worker - 1)` steps with random pauses
pub fn stress_iterations(worker: usize) -> usize {
    5 + 2 * worker.saturating_sub(1)
}

pub async fn stress_worker(mut ctx: ProducerContext, worker: usize, jitter: Jitter) -> Result<()> {
    let iterations = stress_iterations(worker);
    for i in 1..=iterations {
        let delay = jitter.sample();
        if !ctx.sleep(delay).await {
            break;
        }
        report(
            &ctx,
            format!("Thread {}: Worker {}: Step {}/{}", worker, worker, i, iterations),
        )?;
    }
    Ok(())
}

/// Direct message worker `worker` sends `8 + 3 * (worker - 1)` messages
pub fn direct_message_count(worker: usize) -> usize {
    8 + 3 * worker.saturating_sub(1)
}

pub async fn direct_worker(mut ctx: ProducerContext, worker: usize, jitter: Jitter) -> Result<()> {
    let count = direct_message_count(worker);
    for i in 1..=count {
        let delay = jitter.sample();
        if !ctx.sleep(delay).await {
            break;
        }
        report(
            &ctx,
            format!("Direct message from Thread {}: #{}/{}", worker, i, count),
        )?;
    }
    Ok(())
}
