//! Presentation seam for the hero slider
//!
//! The slider never touches a renderer directly. It reads the slide collection through
//! [`PresentationSurface`] and writes visibility/activation attributes as whole
//! [`SurfacePatch`]es, so a renderer never observes half of a slide change.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Opacity of a visible slide
pub const VISIBLE: f32 = 1.0;
/// Opacity of a hidden slide
pub const HIDDEN: f32 = 0.0;

/// Surface the slider renders onto
///
/// Implementations are owned by the slider task and must be `Send`.
pub trait PresentationSurface: Send {
    /// Whether the slide container exists
    fn has_container(&self) -> bool;

    /// Number of slide elements found in the container
    fn slide_count(&self) -> usize;

    /// Inserts one indicator per slide plus previous/next controls
    fn mount_navigation(&mut self, indicators: usize);

    /// Applies a set of attribute changes as one unit
    fn apply(&mut self, patch: &SurfacePatch);
}

/// Batched attribute changes for slides and indicators
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfacePatch {
    pub opacity: Vec<(usize, f32)>,
    pub indicators: Vec<(usize, bool)>,
}

impl SurfacePatch {
    /// Shows `index`, hides every other slide and activates only its indicator
    pub fn show_only(index: usize, slide_count: usize) -> Self {
        let opacity = (0..slide_count)
            .map(|i| (i, if i == index { VISIBLE } else { HIDDEN }))
            .collect();
        let indicators = (0..slide_count).map(|i| (i, i == index)).collect();
        Self {
            opacity,
            indicators,
        }
    }

    /// Fades `from` out and `to` in, moving the active indicator along
    pub fn cross_fade(from: usize, to: usize) -> Self {
        Self {
            opacity: vec![(from, HIDDEN), (to, VISIBLE)],
            indicators: vec![(from, false), (to, true)],
        }
    }
}

/// A single slide as the renderer sees it
#[derive(Debug, Clone, PartialEq)]
pub struct SlideView {
    pub title: String,
    pub caption: String,
    pub accent: (u8, u8, u8),
    pub opacity: f32,
}

impl SlideView {
    pub fn new(title: impl Into<String>, caption: impl Into<String>, accent: (u8, u8, u8)) -> Self {
        Self {
            title: title.into(),
            caption: caption.into(),
            accent,
            opacity: HIDDEN,
        }
    }
}

/// Renderer-facing state of the slider region
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceModel {
    pub container: bool,
    pub slides: Vec<SlideView>,
    pub indicators: Vec<bool>,
    pub controls_mounted: bool,
}

impl SurfaceModel {
    /// Indices of slides with non-zero opacity
    pub fn visible_slides(&self) -> Vec<usize> {
        self.slides
            .iter()
            .enumerate()
            .filter(|(_, slide)| slide.opacity > HIDDEN)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of indicators marked active
    pub fn active_indicators(&self) -> Vec<usize> {
        self.indicators
            .iter()
            .enumerate()
            .filter(|(_, active)| **active)
            .map(|(i, _)| i)
            .collect()
    }
}

/// In-memory surface shared between the slider task and a renderer
///
/// Cloning yields another handle onto the same model. The egui host reads it every
/// frame; tests inspect it after driving the slider.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    model: Arc<Mutex<SurfaceModel>>,
}

impl MemorySurface {
    /// Surface with a container holding the given slides
    pub fn new(slides: Vec<SlideView>) -> Self {
        Self {
            model: Arc::new(Mutex::new(SurfaceModel {
                container: true,
                slides,
                indicators: Vec::new(),
                controls_mounted: false,
            })),
        }
    }

    /// Surface whose container was never found, while `slides` elements still exist
    pub fn without_container(slides: Vec<SlideView>) -> Self {
        let surface = Self::new(slides);
        surface.lock().container = false;
        surface
    }

    /// Copy of the current model
    pub fn model(&self) -> SurfaceModel {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceModel> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PresentationSurface for MemorySurface {
    fn has_container(&self) -> bool {
        self.lock().container
    }

    fn slide_count(&self) -> usize {
        self.lock().slides.len()
    }

    fn mount_navigation(&mut self, indicators: usize) {
        let mut model = self.lock();
        model.indicators = vec![false; indicators];
        model.controls_mounted = true;
        debug!("Mounted {} indicators and prev/next controls", indicators);
    }

    fn apply(&mut self, patch: &SurfacePatch) {
        let mut model = self.lock();
        for &(index, opacity) in &patch.opacity {
            if let Some(slide) = model.slides.get_mut(index) {
                slide.opacity = opacity;
            }
        }
        for &(index, active) in &patch.indicators {
            if let Some(indicator) = model.indicators.get_mut(index) {
                *indicator = active;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slides(n: usize) -> Vec<SlideView> {
        (0..n)
            .map(|i| SlideView::new(format!("Slide {i}"), "", (10, 20, 30)))
            .collect()
    }

    #[test]
    fn cross_fade_patch_moves_visibility_and_indicator_together() {
        let mut surface = MemorySurface::new(slides(3));
        surface.mount_navigation(3);
        surface.apply(&SurfacePatch::show_only(0, 3));
        surface.apply(&SurfacePatch::cross_fade(0, 2));

        let model = surface.model();
        assert_eq!(model.visible_slides(), vec![2]);
        assert_eq!(model.active_indicators(), vec![2]);
    }

    #[test]
    fn patch_ignores_unknown_indices() {
        let mut surface = MemorySurface::new(slides(2));
        surface.mount_navigation(2);
        surface.apply(&SurfacePatch::cross_fade(0, 7));

        let model = surface.model();
        assert!(model.visible_slides().is_empty());
        assert!(model.active_indicators().is_empty());
    }

    #[test]
    fn missing_container_is_reported() {
        let surface = MemorySurface::without_container(slides(2));
        assert!(!surface.has_container());
        assert_eq!(surface.slide_count(), 2);
    }
}
