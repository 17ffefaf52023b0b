pub use kurbo::{Insets, Point, Rect, Size, Vec2};

/// Strict axis-aligned overlap test. Rectangles sharing only an edge do not overlap.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(b.x0 >= a.x1 || b.x1 <= a.x0 || b.y0 >= a.y1 || b.y1 <= a.y0)
}

/// Round to a fixed number of decimal places, normalizing `-0.0` to `0.0`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals.min(9) as i32);
    let rounded = (value * scale).round() / scale;
    // -0.0 + 0.0 == +0.0
    rounded + 0.0
}

/// Shrink a border-box rectangle by its padding, yielding the content box.
///
/// Padding larger than the box collapses the affected axis to zero size.
pub fn content_box(border_box: Rect, padding: Insets) -> Rect {
    let x0 = border_box.x0 + padding.x0;
    let y0 = border_box.y0 + padding.y0;
    let x1 = (border_box.x1 - padding.x1).max(x0);
    let y1 = (border_box.y1 - padding.y1).max(y0);
    Rect::new(x0, y0, x1, y1)
}
