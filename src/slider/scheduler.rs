//! Cancellable timers that feed messages back into the slider task
//!
//! Every task is a child of the scheduler's root token, so cancelling the root on
//! teardown releases all outstanding timers at once.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::slider::machine::SliderMessage;

/// Handle to one scheduled timer
#[derive(Debug)]
pub struct ScheduledTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns timers that deliver [`SliderMessage`]s to the slider queue
#[derive(Debug)]
pub struct TaskScheduler {
    sender: mpsc::Sender<SliderMessage>,
    root: CancellationToken,
}

impl TaskScheduler {
    pub fn new(sender: mpsc::Sender<SliderMessage>, root: CancellationToken) -> Self {
        Self { sender, root }
    }

    /// Delivers `message` once after `delay`
    pub fn once(&self, delay: Duration, message: SliderMessage) -> ScheduledTask {
        let token = self.root.child_token();
        let task_token = token.clone();
        let sender = self.sender.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!("One-shot timer for {:?} cancelled", message);
                }
                _ = sleep(delay) => {
                    if let Err(e) = sender.send(message).await {
                        debug!("Slider gone, dropping timer message: {}", e);
                    }
                }
            }
        });

        ScheduledTask { token, handle }
    }

    /// Delivers `message` every `period`, first after one full period
    pub fn every(&self, period: Duration, message: SliderMessage) -> ScheduledTask {
        let token = self.root.child_token();
        let task_token = token.clone();
        let sender = self.sender.clone();
        let mut ticker = interval_at(Instant::now() + period, period);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!("Periodic timer for {:?} cancelled", message);
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = sender.send(message.clone()).await {
                            debug!("Slider gone, stopping periodic timer: {}", e);
                            break;
                        }
                    }
                }
            }
        });

        ScheduledTask { token, handle }
    }

    /// Cancels every task this scheduler spawned
    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn once_fires_after_delay() {
        let (tx, mut rx) = mpsc::channel(8);
        let scheduler = TaskScheduler::new(tx, CancellationToken::new());
        let task = scheduler.once(
            Duration::from_millis(1000),
            SliderMessage::TransitionElapsed { sequence: 7 },
        );
        settle().await;

        tokio::time::advance(Duration::from_millis(999)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(
            rx.try_recv().ok(),
            Some(SliderMessage::TransitionElapsed { sequence: 7 })
        );
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_periodic_timer_stops_ticking() {
        let (tx, mut rx) = mpsc::channel(8);
        let scheduler = TaskScheduler::new(tx, CancellationToken::new());
        let task = scheduler.every(
            Duration::from_millis(500),
            SliderMessage::AutoplayTick { epoch: 1 },
        );
        settle().await;

        tokio::time::advance(Duration::from_millis(501)).await;
        settle().await;
        assert_eq!(
            rx.try_recv().ok(),
            Some(SliderMessage::AutoplayTick { epoch: 1 })
        );

        task.cancel();
        settle().await;
        tokio::time::advance(Duration::from_millis(2000)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_children() {
        let (tx, mut rx) = mpsc::channel(8);
        let scheduler = TaskScheduler::new(tx, CancellationToken::new());
        let _task = scheduler.once(Duration::from_millis(100), SliderMessage::Next);

        scheduler.shutdown();
        settle().await;
        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }
}
