//! Swipe detection for touch input on the slider surface

use tracing::debug;

/// Navigation implied by a completed swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved left, show the next slide
    Next,
    /// Finger moved right, show the previous slide
    Previous,
}

/// Tracks one gesture at a time for a single slider instance
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    /// Records the horizontal coordinate where the touch began
    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finishes the gesture and classifies it
    ///
    /// Displacement is `start - end`; it must exceed the threshold strictly. A touch-end
    /// without a matching touch-start yields nothing.
    pub fn end(&mut self, x: f32) -> Option<SwipeDirection> {
        let start = self.start_x.take()?;
        let diff = start - x;

        if diff.abs() > self.threshold {
            let direction = if diff > 0.0 {
                SwipeDirection::Next
            } else {
                SwipeDirection::Previous
            };
            debug!("Swipe {:?} (displacement {:.1})", direction, diff);
            Some(direction)
        } else {
            debug!(
                "Swipe displacement {:.1} within threshold {:.1}, ignoring",
                diff, self.threshold
            );
            None
        }
    }
}
