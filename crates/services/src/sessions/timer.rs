use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Once-per-second countdown source for a quiz in progress.
///
/// The ticking task lives exactly as long as this value: dropping the timer
/// aborts the task, so a finished or abandoned quiz can never be ticked.
#[derive(Debug)]
pub struct CountdownTimer {
    ticks: mpsc::Receiver<()>,
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    /// Start ticking every second. Must be called inside a tokio runtime.
    #[must_use]
    pub fn start() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        let (tx, ticks) = mpsc::channel(16);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            // Catch up on missed seconds so the countdown tracks wall time.
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { ticks, handle }
    }

    /// Wait for the next tick. Returns `None` if the ticking task has ended.
    ///
    /// Cancel-safe: dropping the future before it completes loses no tick.
    pub async fn next_tick(&mut self) -> Option<()> {
        self.ticks.recv().await
    }

    /// Stop the countdown.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let start = Instant::now();
        let mut timer = CountdownTimer::start();
        for expected in 1..=3_u64 {
            timer.next_tick().await.unwrap();
            assert_eq!(start.elapsed().as_secs(), expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_stops_the_task() {
        let timer = CountdownTimer::start();
        let task = timer.handle.abort_handle();
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(task.is_finished());
    }
}
