//! Hero slider subsystem
//!
//! A cross-fading image carousel driven by messages:
//!
//! 1. [`surface`] - Presentation seam (slides, indicators, prev/next controls)
//! 2. [`machine`] - Statum typestate machine and the single `step` transition function
//! 3. [`gesture`] - Per-instance swipe tracking
//! 4. [`scheduler`] - Cancellable one-shot and periodic timers
//! 5. [`controller`] - Spawned slider task and the public [`SliderHandle`]
//!
//! # Architecture
//!
//! ```text
//! Host input ──► SliderHandle ──► mpsc ──► SliderMachine::step ──► PresentationSurface
//!                                  ▲              │
//!                                  │          Directive
//!                             TaskScheduler ◄─────┘
//!                        (transition end, autoplay)
//! ```
//!
//! Every state change happens inside one tokio task, so at most one transition is in
//! flight and indicator/slide attributes always change in a single surface patch.

pub mod controller;
pub mod gesture;
pub mod machine;
pub mod scheduler;
pub mod surface;

pub use controller::{SliderHandle, SliderSettings, SliderSnapshot};
pub use gesture::{SwipeDirection, SwipeTracker};
pub use machine::{Directive, SliderMachine, SliderMessage};
pub use surface::{MemorySurface, PresentationSurface, SlideView, SurfaceModel, SurfacePatch};

/// Errors surfaced by the slider subsystem
#[derive(Debug, thiserror::Error)]
pub enum SliderError {
    /// Slides exist but the surface has no container to mount controls into
    #[error("Slide container missing for {0} slides")]
    MissingContainer(usize),

    /// Settings rejected at spawn time
    #[error("Invalid slider settings: {0}")]
    InvalidSettings(String),

    /// Programmatic navigation to a slide that does not exist
    #[error("Slide index {index} out of range (slide count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// The slider queue could not accept a message
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// The slider task is no longer running
    #[error("Slider task stopped")]
    Stopped,
}
