//! Slider state machine with statum typestates
//!
//! Three states with compile-time transition safety:
//!
//! ```text
//!                  ┌──────────── navigate ────────────┐
//!                  │                                  ▼
//! Disabled     Idle ◄──── TransitionElapsed ──── Transitioning
//! (N <= 1)
//! ```
//!
//! [`SliderMachine`] wraps the typed states so the slider task can feed every incoming
//! [`SliderMessage`] through one function, [`SliderMachine::step`]. Timers are not
//! started here; `step` returns a [`Directive`] and the controller acts on it.

use chrono::{DateTime, Local};
use statum::{machine, state};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::slider::controller::SliderSettings;
use crate::slider::gesture::{SwipeDirection, SwipeTracker};
use crate::slider::surface::{PresentationSurface, SurfacePatch};
use crate::slider::SliderError;

/// Input consumed by the slider task
#[derive(Debug, Clone, PartialEq)]
pub enum SliderMessage {
    Next,
    Previous,
    GoTo(usize),
    TouchStart { x: f32 },
    TouchEnd { x: f32 },
    PointerEnter,
    PointerLeave,
    /// Periodic advance; `epoch` identifies the autoplay timer that produced it
    AutoplayTick { epoch: u64 },
    /// One-shot completion of the transition with this sequence number
    TransitionElapsed { sequence: u64 },
}

/// Timer work requested by a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    ScheduleTransitionEnd { sequence: u64, after: Duration },
    PauseAutoplay,
    ResumeAutoplay,
}

/// Data held while a cross-fade is in flight
#[derive(Debug, Clone)]
pub struct TransitionWindow {
    pub sequence: u64,
    pub from: usize,
    pub to: usize,
    pub started_at: DateTime<Local>,
}

#[state]
#[derive(Debug, Clone)]
pub enum SlideState {
    Disabled,                        // zero or one slide, nothing mounted
    Idle,                            // ready to navigate
    Transitioning(TransitionWindow), // guard held until the window elapses
}

#[machine]
pub struct HeroSlider<S: SlideState> {
    surface: Box<dyn PresentationSurface>,
    settings: SliderSettings,
    slide_count: usize,
    current_index: usize,
    next_sequence: u64,
    swipe: SwipeTracker,
}

impl<S: SlideState> HeroSlider<S> {
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn settings(&self) -> &SliderSettings {
        &self.settings
    }
}

impl HeroSlider<Disabled> {
    pub fn create(surface: Box<dyn PresentationSurface>, settings: SliderSettings) -> Self {
        let slide_count = surface.slide_count();
        let swipe = SwipeTracker::new(settings.swipe_threshold);
        debug!("Creating hero slider over {} slides", slide_count);

        Self::new(
            surface,
            settings,
            slide_count,
            0, // current_index
            0, // next_sequence
            swipe,
        )
    }

    /// Mounts indicators and controls, shows the first slide and becomes Idle
    pub fn enable(mut self) -> HeroSlider<Idle> {
        info!("Enabling hero slider with {} slides", self.slide_count);
        self.surface.mount_navigation(self.slide_count);
        self.surface
            .apply(&SurfacePatch::show_only(self.current_index, self.slide_count));
        self.transition()
    }
}

impl HeroSlider<Idle> {
    /// Cross-fades to `target` and takes the transition guard
    ///
    /// Caller guarantees `target < slide_count` and `target != current_index`.
    pub fn begin_transition(mut self, target: usize) -> HeroSlider<Transitioning> {
        let window = TransitionWindow {
            sequence: self.next_sequence,
            from: self.current_index,
            to: target,
            started_at: Local::now(),
        };
        self.next_sequence += 1;

        self.surface
            .apply(&SurfacePatch::cross_fade(self.current_index, target));
        self.current_index = target;

        debug!(
            "Transition #{} {} -> {} started at {}",
            window.sequence,
            window.from,
            window.to,
            window.started_at.format("%H:%M:%S.%3f")
        );
        self.transition_with(window)
    }
}

impl HeroSlider<Transitioning> {
    pub fn window(&self) -> Option<&TransitionWindow> {
        self.get_state_data()
    }

    /// Releases the transition guard
    pub fn finish(self) -> HeroSlider<Idle> {
        if let Some(window) = self.window() {
            let elapsed = Local::now() - window.started_at;
            debug!(
                "Transition #{} finished after {} ms",
                window.sequence,
                elapsed.num_milliseconds()
            );
        }
        self.transition()
    }
}

/// Runtime wrapper over the typed slider states
pub enum SliderMachine {
    Disabled(HeroSlider<Disabled>),
    Idle(HeroSlider<Idle>),
    Transitioning(HeroSlider<Transitioning>),
}

impl SliderMachine {
    /// Reads the surface and builds the slider
    ///
    /// Fails only when slides exist without a container. Zero or one slide produces a
    /// disabled machine that ignores every message.
    pub fn build(
        surface: Box<dyn PresentationSurface>,
        settings: SliderSettings,
    ) -> Result<Self, SliderError> {
        let slide_count = surface.slide_count();
        if slide_count > 0 && !surface.has_container() {
            return Err(SliderError::MissingContainer(slide_count));
        }

        let slider = HeroSlider::<Disabled>::create(surface, settings);
        if slide_count <= 1 {
            info!(
                "Hero slider disabled: {} slide(s), nothing to navigate",
                slide_count
            );
            return Ok(SliderMachine::Disabled(slider));
        }

        Ok(SliderMachine::Idle(slider.enable()))
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, SliderMachine::Disabled(_))
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self, SliderMachine::Transitioning(_))
    }

    pub fn current_index(&self) -> usize {
        match self {
            SliderMachine::Disabled(s) => s.current_index(),
            SliderMachine::Idle(s) => s.current_index(),
            SliderMachine::Transitioning(s) => s.current_index(),
        }
    }

    pub fn slide_count(&self) -> usize {
        match self {
            SliderMachine::Disabled(s) => s.slide_count(),
            SliderMachine::Idle(s) => s.slide_count(),
            SliderMachine::Transitioning(s) => s.slide_count(),
        }
    }

    pub fn settings(&self) -> &SliderSettings {
        match self {
            SliderMachine::Disabled(s) => s.settings(),
            SliderMachine::Idle(s) => s.settings(),
            SliderMachine::Transitioning(s) => s.settings(),
        }
    }

    fn swipe_mut(&mut self) -> &mut SwipeTracker {
        match self {
            SliderMachine::Disabled(s) => &mut s.swipe,
            SliderMachine::Idle(s) => &mut s.swipe,
            SliderMachine::Transitioning(s) => &mut s.swipe,
        }
    }

    /// Applies one message and returns the follow-up timer work, if any
    pub fn step(self, message: SliderMessage) -> (SliderMachine, Option<Directive>) {
        if !self.is_enabled() {
            debug!("Slider disabled, ignoring {:?}", message);
            return (self, None);
        }

        let count = self.slide_count();
        match message {
            SliderMessage::Next | SliderMessage::AutoplayTick { .. } => {
                let target = next_index(self.current_index(), count);
                self.navigate(target)
            }
            SliderMessage::Previous => {
                let target = previous_index(self.current_index(), count);
                self.navigate(target)
            }
            SliderMessage::GoTo(index) if index < count => self.navigate(index),
            SliderMessage::GoTo(index) => {
                warn!("Ignoring slide index {} (slide count {})", index, count);
                (self, None)
            }
            SliderMessage::TouchStart { x } => {
                let mut machine = self;
                machine.swipe_mut().begin(x);
                (machine, None)
            }
            SliderMessage::TouchEnd { x } => {
                let mut machine = self;
                match machine.swipe_mut().end(x) {
                    Some(SwipeDirection::Next) => machine.step(SliderMessage::Next),
                    Some(SwipeDirection::Previous) => machine.step(SliderMessage::Previous),
                    None => (machine, None),
                }
            }
            SliderMessage::PointerEnter => {
                let directive = self.settings().auto_play.then_some(Directive::PauseAutoplay);
                (self, directive)
            }
            SliderMessage::PointerLeave => {
                let directive = self
                    .settings()
                    .auto_play
                    .then_some(Directive::ResumeAutoplay);
                (self, directive)
            }
            SliderMessage::TransitionElapsed { sequence } => self.complete_transition(sequence),
        }
    }

    fn navigate(self, target: usize) -> (SliderMachine, Option<Directive>) {
        match self {
            SliderMachine::Idle(slider) if slider.current_index() == target => {
                debug!("Slide {} already showing", target);
                (SliderMachine::Idle(slider), None)
            }
            SliderMachine::Idle(slider) => {
                let slider = slider.begin_transition(target);
                let after = slider.settings().transition();
                let directive = slider
                    .window()
                    .map(|window| Directive::ScheduleTransitionEnd {
                        sequence: window.sequence,
                        after,
                    });
                (SliderMachine::Transitioning(slider), directive)
            }
            SliderMachine::Transitioning(slider) => {
                debug!(
                    "Transition in flight, rejecting navigation to slide {}",
                    target
                );
                (SliderMachine::Transitioning(slider), None)
            }
            disabled @ SliderMachine::Disabled(_) => (disabled, None),
        }
    }

    fn complete_transition(self, sequence: u64) -> (SliderMachine, Option<Directive>) {
        match self {
            SliderMachine::Transitioning(slider) => {
                let current = slider
                    .window()
                    .is_some_and(|window| window.sequence == sequence);
                if current {
                    (SliderMachine::Idle(slider.finish()), None)
                } else {
                    debug!("Ignoring stale transition completion #{}", sequence);
                    (SliderMachine::Transitioning(slider), None)
                }
            }
            other => {
                debug!(
                    "Transition completion #{} with no transition in flight",
                    sequence
                );
                (other, None)
            }
        }
    }
}

impl fmt::Debug for SliderMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            SliderMachine::Disabled(_) => "Disabled",
            SliderMachine::Idle(_) => "Idle",
            SliderMachine::Transitioning(_) => "Transitioning",
        };
        f.debug_struct("SliderMachine")
            .field("state", &state)
            .field("current_index", &self.current_index())
            .field("slide_count", &self.slide_count())
            .finish()
    }
}

/// Index after `current`, wrapping from last to first
pub fn next_index(current: usize, count: usize) -> usize {
    (current + 1) % count
}

/// Index before `current`, wrapping from first to last
pub fn previous_index(current: usize, count: usize) -> usize {
    (current + count - 1) % count
}
