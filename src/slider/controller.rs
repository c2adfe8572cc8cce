//! Slider Handle - public API for the hero slider
//!
//! Spawns the slider task, which owns the [`SliderMachine`], the presentation surface and
//! every timer. Hosts talk to it exclusively through [`SliderHandle`]; the handle
//! translates calls into [`SliderMessage`]s and exposes read-only [`SliderSnapshot`]s
//! over a watch channel.
//!
//! ```text
//! SliderHandle ─[SliderMessage]→ slider task ─[SurfacePatch]→ PresentationSurface
//!       ▲                          │      ▲
//!       └──[SliderSnapshot]────────┘      └── TaskScheduler (transition end, autoplay)
//! ```
//!
//! Dropping the handle or calling [`SliderHandle::shutdown`] cancels the task and all
//! of its timers. A transition timer that still fires afterwards finds the queue closed
//! and does nothing.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::slider::machine::{Directive, SliderMachine, SliderMessage};
use crate::slider::scheduler::{ScheduledTask, TaskScheduler};
use crate::slider::surface::PresentationSurface;
use crate::slider::SliderError;

const QUEUE_CAPACITY: usize = 64;

/// Configuration for the hero slider
///
/// # Examples
///
/// ```rust
/// use heroslider::slider::SliderSettings;
///
/// // Manual carousel with a faster fade
/// let settings = SliderSettings {
///     auto_play: false,
///     transition_ms: 400,
///     ..SliderSettings::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderSettings {
    /// Advance automatically every `interval_ms`
    pub auto_play: bool,

    /// Time between automatic advances in milliseconds
    pub interval_ms: u64,

    /// Time the transition guard is held in milliseconds
    ///
    /// Matches the cross-fade duration of the renderer.
    pub transition_ms: u64,

    /// Minimum horizontal displacement for a swipe to navigate
    pub swipe_threshold: f32,
}

impl Default for SliderSettings {
    fn default() -> Self {
        Self {
            auto_play: true,
            interval_ms: 5000,
            transition_ms: 1000,
            swipe_threshold: 50.0,
        }
    }
}

impl SliderSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn validate(&self) -> Result<(), SliderError> {
        if self.interval_ms == 0 {
            return Err(SliderError::InvalidSettings(
                "interval_ms must be greater than zero".to_string(),
            ));
        }
        if !self.swipe_threshold.is_finite() || self.swipe_threshold < 0.0 {
            return Err(SliderError::InvalidSettings(format!(
                "swipe_threshold must be a non-negative number, got {}",
                self.swipe_threshold
            )));
        }
        Ok(())
    }

    /// Whether autoplay ticks can land inside the transition guard
    ///
    /// With `interval_ms <= transition_ms` some ticks arrive while a transition is still
    /// in flight and are rejected, so autoplay advances slower than configured.
    pub fn autoplay_outpaced(&self) -> bool {
        self.auto_play && self.interval_ms <= self.transition_ms
    }
}

/// Read-only view of the slider published after every message
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SliderSnapshot {
    pub enabled: bool,
    pub current_index: usize,
    pub slide_count: usize,
    pub transitioning: bool,
    pub autoplay_running: bool,
}

impl SliderSnapshot {
    fn of(machine: &SliderMachine, autoplay_running: bool) -> Self {
        Self {
            enabled: machine.is_enabled(),
            current_index: machine.current_index(),
            slide_count: machine.slide_count(),
            transitioning: machine.is_transitioning(),
            autoplay_running,
        }
    }
}

/// Public handle for a running hero slider
///
/// Not cloneable; the host that owns it owns the slider's lifetime.
#[derive(Debug)]
pub struct SliderHandle {
    sender: mpsc::Sender<SliderMessage>,
    snapshot: watch::Receiver<SliderSnapshot>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SliderHandle {
    /// Builds the slider from `surface` and spawns its task
    ///
    /// Must be called from within a tokio runtime. With zero or one slide no task is
    /// spawned and every operation on the handle is a no-op.
    ///
    /// # Errors
    ///
    /// * [`SliderError::InvalidSettings`] - settings failed validation
    /// * [`SliderError::MissingContainer`] - slides exist but their container does not
    pub fn spawn(
        surface: Box<dyn PresentationSurface>,
        settings: SliderSettings,
    ) -> Result<Self, SliderError> {
        info!("Initializing hero slider with settings: {:?}", settings);
        settings.validate()?;
        if settings.autoplay_outpaced() {
            warn!(
                "Autoplay interval {} ms does not exceed transition {} ms, some ticks will be rejected",
                settings.interval_ms, settings.transition_ms
            );
        }

        let machine = SliderMachine::build(surface, settings)?;
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let shutdown = CancellationToken::new();

        let autoplay = machine.is_enabled() && machine.settings().auto_play;
        let (snapshot_sender, snapshot) =
            watch::channel(SliderSnapshot::of(&machine, autoplay));

        if !machine.is_enabled() {
            info!("Hero slider inert, no task spawned");
            return Ok(Self {
                sender,
                snapshot,
                shutdown,
                task: None,
            });
        }

        let scheduler = TaskScheduler::new(sender.clone(), shutdown.child_token());
        let loop_shutdown = shutdown.clone();
        let task = tokio::spawn(async move {
            info!("Hero slider task started");
            run_slider_loop(machine, receiver, scheduler, snapshot_sender, loop_shutdown).await;
            info!("Hero slider task finished");
        });

        info!("Hero slider successfully started");
        Ok(Self {
            sender,
            snapshot,
            shutdown,
            task: Some(task),
        })
    }

    pub fn next(&self) -> Result<(), SliderError> {
        self.dispatch(SliderMessage::Next)
    }

    pub fn previous(&self) -> Result<(), SliderError> {
        self.dispatch(SliderMessage::Previous)
    }

    /// Jumps straight to `index`, bypassing the wrap-around of next/previous
    pub fn go_to(&self, index: usize) -> Result<(), SliderError> {
        let snapshot = self.snapshot();
        if snapshot.enabled && index >= snapshot.slide_count {
            return Err(SliderError::IndexOutOfRange {
                index,
                count: snapshot.slide_count,
            });
        }
        self.dispatch(SliderMessage::GoTo(index))
    }

    pub fn indicator_clicked(&self, index: usize) -> Result<(), SliderError> {
        debug!("Indicator {} clicked", index);
        self.go_to(index)
    }

    pub fn touch_start(&self, x: f32) -> Result<(), SliderError> {
        self.dispatch(SliderMessage::TouchStart { x })
    }

    pub fn touch_end(&self, x: f32) -> Result<(), SliderError> {
        self.dispatch(SliderMessage::TouchEnd { x })
    }

    pub fn pointer_enter(&self) -> Result<(), SliderError> {
        self.dispatch(SliderMessage::PointerEnter)
    }

    pub fn pointer_leave(&self) -> Result<(), SliderError> {
        self.dispatch(SliderMessage::PointerLeave)
    }

    pub fn subscribe(&self) -> watch::Receiver<SliderSnapshot> {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> SliderSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Stops the slider task and waits for it to release its timers
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Hero slider task ended abnormally: {}", e);
            }
        }
    }

    fn dispatch(&self, message: SliderMessage) -> Result<(), SliderError> {
        if self.task.is_none() {
            debug!("Hero slider inert, dropping {:?}", message);
            return Ok(());
        }

        match self.sender.try_send(message) {
            Ok(_) => Ok(()),
            Err(mpsc::error::TrySendError::Full(message)) => {
                warn!("Hero slider queue full, dropping {:?}", message);
                Err(SliderError::ChannelError("slider queue full".to_string()))
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SliderError::Stopped),
        }
    }
}

impl Drop for SliderHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Autoplay timer plus the epoch that tags its ticks
struct Autoplay {
    task: ScheduledTask,
    epoch: u64,
}

async fn run_slider_loop(
    mut machine: SliderMachine,
    mut receiver: mpsc::Receiver<SliderMessage>,
    scheduler: TaskScheduler,
    snapshot_sender: watch::Sender<SliderSnapshot>,
    shutdown: CancellationToken,
) {
    let interval = machine.settings().interval();
    let mut epoch = 0;
    let mut autoplay: Option<Autoplay> = None;
    let mut pending_transition: Option<ScheduledTask> = None;

    if machine.settings().auto_play {
        autoplay = Some(start_autoplay(&scheduler, interval, &mut epoch));
    }
    snapshot_sender.send_replace(SliderSnapshot::of(&machine, autoplay.is_some()));

    loop {
        let message = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Hero slider shutdown requested");
                break;
            }
            message = receiver.recv() => match message {
                Some(message) => message,
                None => {
                    warn!("Hero slider queue closed");
                    break;
                }
            },
        };

        if let SliderMessage::AutoplayTick { epoch: tick_epoch } = message {
            let live = autoplay.as_ref().is_some_and(|a| a.epoch == tick_epoch);
            if !live {
                debug!("Discarding tick from autoplay timer #{}", tick_epoch);
                continue;
            }
        }

        debug!("Hero slider handling {:?}", message);
        let (next_machine, directive) = machine.step(message);
        machine = next_machine;

        match directive {
            Some(Directive::ScheduleTransitionEnd { sequence, after }) => {
                pending_transition = Some(
                    scheduler.once(after, SliderMessage::TransitionElapsed { sequence }),
                );
            }
            Some(Directive::PauseAutoplay) => {
                if let Some(current) = autoplay.take() {
                    info!("Autoplay #{} paused", current.epoch);
                    current.task.cancel();
                }
            }
            Some(Directive::ResumeAutoplay) => {
                if let Some(current) = autoplay.take() {
                    current.task.cancel();
                }
                autoplay = Some(start_autoplay(&scheduler, interval, &mut epoch));
            }
            None => {}
        }

        snapshot_sender.send_replace(SliderSnapshot::of(&machine, autoplay.is_some()));
    }

    if let Some(current) = autoplay.take() {
        current.task.cancel();
    }
    if let Some(task) = pending_transition.take() {
        task.cancel();
    }
    scheduler.shutdown();
    debug!("Hero slider timers released");
}

fn start_autoplay(scheduler: &TaskScheduler, interval: Duration, epoch: &mut u64) -> Autoplay {
    *epoch += 1;
    info!(
        "Autoplay #{} started with {} ms interval",
        epoch,
        interval.as_millis()
    );
    Autoplay {
        task: scheduler.every(interval, SliderMessage::AutoplayTick { epoch: *epoch }),
        epoch: *epoch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slider::surface::{MemorySurface, SlideView};

    fn surface(n: usize) -> MemorySurface {
        MemorySurface::new(
            (0..n)
                .map(|i| SlideView::new(format!("Slide {i}"), "", (0, 0, 0)))
                .collect(),
        )
    }

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    async fn wait(ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        settle().await;
    }

    fn manual() -> SliderSettings {
        SliderSettings {
            auto_play: false,
            ..SliderSettings::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transition_guard_clears_after_transition_duration() {
        let surface = surface(4);
        let handle = SliderHandle::spawn(Box::new(surface.clone()), manual()).expect("spawn");
        settle().await;

        handle.next().expect("next");
        settle().await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.current_index, 1);
        assert!(snapshot.transitioning);
        assert_eq!(surface.model().active_indicators(), vec![1]);

        // rejected while the guard is held
        handle.previous().expect("previous");
        settle().await;
        assert_eq!(handle.snapshot().current_index, 1);

        wait(1001).await;
        assert!(!handle.snapshot().transitioning);

        handle.previous().expect("previous");
        settle().await;
        assert_eq!(handle.snapshot().current_index, 0);

        wait(1001).await;
        handle.previous().expect("previous");
        settle().await;
        assert_eq!(handle.snapshot().current_index, 3);
        assert_eq!(surface.model().visible_slides(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_advances_once_per_interval_and_pauses_on_hover() {
        let handle =
            SliderHandle::spawn(Box::new(surface(4)), SliderSettings::default()).expect("spawn");
        settle().await;
        assert!(handle.snapshot().autoplay_running);

        wait(4990).await;
        assert_eq!(handle.snapshot().current_index, 0);
        wait(20).await;
        assert_eq!(handle.snapshot().current_index, 1);
        wait(5000).await;
        assert_eq!(handle.snapshot().current_index, 2);

        handle.pointer_enter().expect("enter");
        settle().await;
        assert!(!handle.snapshot().autoplay_running);
        wait(20_000).await;
        assert_eq!(handle.snapshot().current_index, 2);

        handle.pointer_leave().expect("leave");
        settle().await;
        assert!(handle.snapshot().autoplay_running);
        wait(4990).await;
        assert_eq!(handle.snapshot().current_index, 2);
        wait(20).await;
        assert_eq!(handle.snapshot().current_index, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_pointer_leave_does_not_stack_timers() {
        let handle =
            SliderHandle::spawn(Box::new(surface(6)), SliderSettings::default()).expect("spawn");
        settle().await;

        for _ in 0..3 {
            handle.pointer_leave().expect("leave");
        }
        settle().await;

        wait(5010).await;
        assert_eq!(handle.snapshot().current_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn swipe_and_indicator_navigation() {
        let surface = surface(4);
        let handle = SliderHandle::spawn(Box::new(surface.clone()), manual()).expect("spawn");
        settle().await;

        handle.touch_start(300.0).expect("touch start");
        handle.touch_end(200.0).expect("touch end");
        settle().await;
        assert_eq!(handle.snapshot().current_index, 1);

        wait(1001).await;
        handle.indicator_clicked(3).expect("indicator");
        settle().await;
        assert_eq!(handle.snapshot().current_index, 3);
        assert_eq!(surface.model().active_indicators(), vec![3]);

        wait(1001).await;
        handle.touch_start(100.0).expect("touch start");
        handle.touch_end(120.0).expect("touch end");
        settle().await;
        assert_eq!(handle.snapshot().current_index, 3);
        assert!(!handle.snapshot().transitioning);
    }

    #[tokio::test(start_paused = true)]
    async fn go_to_out_of_range_is_an_error() {
        let handle = SliderHandle::spawn(Box::new(surface(3)), manual()).expect("spawn");
        let result = handle.go_to(3);
        assert!(matches!(
            result,
            Err(SliderError::IndexOutOfRange { index: 3, count: 3 })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn single_slide_handle_is_inert() {
        let surface = surface(1);
        let handle =
            SliderHandle::spawn(Box::new(surface.clone()), SliderSettings::default()).expect("spawn");
        settle().await;

        assert!(handle.next().is_ok());
        assert!(handle.go_to(5).is_ok());
        assert!(handle.pointer_leave().is_ok());
        wait(10_000).await;

        let snapshot = handle.snapshot();
        assert!(!snapshot.enabled);
        assert!(!snapshot.autoplay_running);
        assert_eq!(snapshot.current_index, 0);
        assert!(!surface.model().controls_mounted);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_settings_are_rejected() {
        let settings = SliderSettings {
            interval_ms: 0,
            ..SliderSettings::default()
        };
        let result = SliderHandle::spawn(Box::new(surface(3)), settings);
        assert!(matches!(result, Err(SliderError::InvalidSettings(_))));

        for threshold in [f32::NAN, f32::INFINITY, -1.0] {
            let settings = SliderSettings {
                swipe_threshold: threshold,
                ..SliderSettings::default()
            };
            let result = SliderHandle::spawn(Box::new(surface(3)), settings);
            assert!(
                matches!(result, Err(SliderError::InvalidSettings(_))),
                "threshold {threshold} accepted"
            );
        }
    }

    #[test]
    fn autoplay_outpaced_by_transition_is_detected() {
        assert!(!SliderSettings::default().autoplay_outpaced());

        let slow_fade = SliderSettings {
            interval_ms: 800,
            transition_ms: 800,
            ..SliderSettings::default()
        };
        assert!(slow_fade.autoplay_outpaced());
        assert!(slow_fade.validate().is_ok());

        let manual = SliderSettings {
            auto_play: false,
            ..slow_fade
        };
        assert!(!manual.autoplay_outpaced());
    }

    #[tokio::test(start_paused = true)]
    async fn queued_tick_from_paused_autoplay_is_discarded() {
        let handle =
            SliderHandle::spawn(Box::new(surface(4)), SliderSettings::default()).expect("spawn");
        settle().await;

        handle.pointer_enter().expect("enter");
        handle.pointer_leave().expect("leave");
        settle().await;

        // tick from the first autoplay timer, already replaced by the resume
        handle
            .sender
            .try_send(SliderMessage::AutoplayTick { epoch: 1 })
            .expect("queue tick");
        settle().await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.current_index, 0);
        assert!(!snapshot.transitioning);

        wait(5010).await;
        assert_eq!(handle.snapshot().current_index, 1);
        wait(3000).await;
        assert_eq!(handle.snapshot().current_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_mid_transition_is_safe() {
        let surface = surface(3);
        let handle =
            SliderHandle::spawn(Box::new(surface.clone()), SliderSettings::default()).expect("spawn");
        settle().await;

        handle.next().expect("next");
        settle().await;
        handle.shutdown().await;

        wait(20_000).await;
        assert_eq!(surface.model().visible_slides(), vec![1]);
        assert_eq!(surface.model().active_indicators(), vec![1]);
    }
}
