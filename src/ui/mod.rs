//! # Hero slider window
//!
//! Immediate-mode host for the slider. Each frame reads the shared [`MemorySurface`]
//! and paints what the slider task last wrote there: slide opacities, indicator state
//! and, once navigation is mounted, the dots and ‹ › controls.
//!
//! The window never changes slider state itself. Clicks, hover, drags and arrow keys
//! are translated into [`SliderHandle`] calls:
//!
//! | Input                         | Slider call                  |
//! |-------------------------------|------------------------------|
//! | click on dot *i*              | `indicator_clicked(i)`       |
//! | click on ‹ / ›, arrow keys    | `previous()` / `next()`      |
//! | pointer enters / leaves slide | `pointer_enter/leave()`      |
//! | drag start / drag release     | `touch_start/touch_end(x)`   |
//!
//! Opacity changes are eased over the configured transition time with egui's
//! animation helpers, so the cross-fade visually matches the transition guard.

pub mod common;

use eframe::egui::{self, Context, Key, Sense};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::slider::{MemorySurface, SliderError, SliderHandle};

/// eframe application hosting one hero slider
pub struct HeroSliderUI {
    surface: MemorySurface,
    slider: SliderHandle,
    fade_seconds: f32,
    frame_interval: Duration,
    hovering: bool,
}

impl HeroSliderUI {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        surface: MemorySurface,
        slider: SliderHandle,
        transition: Duration,
        fps: u8,
    ) -> Self {
        info!("Creating hero slider window");
        Self {
            surface,
            slider,
            fade_seconds: transition.as_secs_f32(),
            frame_interval: Duration::from_millis(1000 / u64::from(fps.max(1))),
            hovering: false,
        }
    }

    fn report(action: &str, result: Result<(), SliderError>) {
        if let Err(e) = result {
            warn!("Slider {} failed: {}", action, e);
        }
    }

    fn show_slider(&mut self, ui: &mut egui::Ui) {
        let rect = ui.available_rect_before_wrap();
        let region = ui.interact(rect, ui.id().with("hero_region"), Sense::click_and_drag());
        let model = self.surface.model();
        let painter = ui.painter_at(rect);
        let ctx = ui.ctx().clone();

        for (index, slide) in model.slides.iter().enumerate() {
            let opacity = ctx.animate_value_with_time(
                ui.id().with(("slide_opacity", index)),
                slide.opacity,
                self.fade_seconds,
            );
            if opacity > 0.0 {
                common::paint_slide(&painter, rect, slide, opacity);
            }
        }

        if model.controls_mounted {
            for (index, center) in common::dot_centers(rect, model.indicators.len())
                .into_iter()
                .enumerate()
            {
                let hit = egui::Rect::from_center_size(
                    center,
                    egui::Vec2::splat(common::DOT_RADIUS * 3.0),
                );
                let dot = ui.interact(hit, ui.id().with(("slider_dot", index)), Sense::click());
                let active = model.indicators.get(index).copied().unwrap_or(false);
                common::paint_dot(&painter, center, active);
                if dot.clicked() {
                    Self::report("indicator", self.slider.indicator_clicked(index));
                }
            }

            let (previous_rect, next_rect) = common::control_rects(rect);
            if ui
                .put(previous_rect, egui::Button::new(egui::RichText::new("‹").size(28.0)))
                .clicked()
            {
                Self::report("previous", self.slider.previous());
            }
            if ui
                .put(next_rect, egui::Button::new(egui::RichText::new("›").size(28.0)))
                .clicked()
            {
                Self::report("next", self.slider.next());
            }
        }

        self.track_hover(&ctx, rect);
        self.track_drag(&ctx, &region);
    }

    fn track_hover(&mut self, ctx: &Context, rect: egui::Rect) {
        let hovered = ctx.pointer_hover_pos().is_some_and(|pos| rect.contains(pos));
        if hovered == self.hovering {
            return;
        }
        self.hovering = hovered;
        if hovered {
            debug!("Pointer entered hero slider");
            Self::report("pointer enter", self.slider.pointer_enter());
        } else {
            debug!("Pointer left hero slider");
            Self::report("pointer leave", self.slider.pointer_leave());
        }
    }

    fn track_drag(&mut self, ctx: &Context, region: &egui::Response) {
        if region.drag_started() {
            if let Some(origin) = ctx.input(|i| i.pointer.press_origin()) {
                Self::report("touch start", self.slider.touch_start(origin.x));
            }
        }
        if region.drag_stopped() {
            if let Some(pos) = ctx.input(|i| i.pointer.latest_pos()) {
                Self::report("touch end", self.slider.touch_end(pos.x));
            }
        }
    }

    fn handle_keys(&mut self, ctx: &Context) {
        let (left, right) =
            ctx.input(|i| (i.key_pressed(Key::ArrowLeft), i.key_pressed(Key::ArrowRight)));
        if left {
            Self::report("previous", self.slider.previous());
        }
        if right {
            Self::report("next", self.slider.next());
        }
    }
}

impl eframe::App for HeroSliderUI {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                self.show_slider(ui);
            });

        ctx.request_repaint_after(self.frame_interval);
    }
}
