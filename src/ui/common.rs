//! Painting helpers for the hero slider window

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Vec2};

use crate::slider::SlideView;

pub const DOT_RADIUS: f32 = 6.0;
pub const DOT_SPACING: f32 = 22.0;
pub const CONTROL_SIZE: Vec2 = Vec2::new(48.0, 48.0);

const INACTIVE_DOT: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 90);

pub fn accent_color((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Paints one slide with the given opacity
pub fn paint_slide(painter: &Painter, rect: Rect, slide: &SlideView, opacity: f32) {
    painter.rect_filled(rect, 0.0, accent_color(slide.accent).gamma_multiply(opacity));

    let text = Color32::WHITE.gamma_multiply(opacity);
    painter.text(
        rect.center() - Vec2::new(0.0, 24.0),
        Align2::CENTER_CENTER,
        &slide.title,
        FontId::proportional(44.0),
        text,
    );
    if !slide.caption.is_empty() {
        painter.text(
            rect.center() + Vec2::new(0.0, 32.0),
            Align2::CENTER_CENTER,
            &slide.caption,
            FontId::proportional(20.0),
            text.gamma_multiply(0.8),
        );
    }
}

/// Centers of the indicator dots along the bottom edge of `rect`
pub fn dot_centers(rect: Rect, count: usize) -> Vec<Pos2> {
    let width = DOT_SPACING * count.saturating_sub(1) as f32;
    let first = Pos2::new(rect.center().x - width / 2.0, rect.bottom() - 32.0);
    (0..count)
        .map(|i| first + Vec2::new(DOT_SPACING * i as f32, 0.0))
        .collect()
}

pub fn paint_dot(painter: &Painter, center: Pos2, active: bool) {
    let color = if active { Color32::WHITE } else { INACTIVE_DOT };
    painter.circle_filled(center, DOT_RADIUS, color);
}

/// Rects of the previous and next controls, vertically centered on the slide
pub fn control_rects(rect: Rect) -> (Rect, Rect) {
    let y = rect.center().y;
    let previous = Rect::from_center_size(Pos2::new(rect.left() + 40.0, y), CONTROL_SIZE);
    let next = Rect::from_center_size(Pos2::new(rect.right() - 40.0, y), CONTROL_SIZE);
    (previous, next)
}
