use std::rc::Rc;

use crate::foundation::core::{Insets, Rect, Size, Vec2, round_to};

/// A page element the bridge can track.
///
/// Implementations wrap a live element (e.g. a `web_sys::HtmlElement`) or a test double.
/// Geometry is read on demand; the bridge never caches the element itself beyond a weak
/// reference.
pub trait BlockElement {
    /// Stable element id.
    fn id(&self) -> String;
    /// Value of the element's `data-blocktype` marker, if any.
    fn block_type(&self) -> Option<String>;
    /// Add `class` to the element.
    fn add_class(&self, class: &str);
    /// Border box relative to the viewport.
    fn bounding_client_rect(&self) -> Rect;
    /// Computed padding.
    fn padding(&self) -> Insets;
    /// Whether the element is attached under a parent; detached elements are skipped.
    fn has_parent(&self) -> bool;
    /// Write the visual-only `transform` style.
    fn set_transform(&self, transform: &str);
}

/// The document and window the bridge observes.
pub trait Host {
    /// Current page scroll offset.
    fn scroll_offset(&self) -> Vec2;
    /// Current viewport size.
    fn viewport_size(&self) -> Size;
    /// Elements carrying the block class marker, in document order.
    fn query_blocks(&self) -> Vec<Rc<dyn BlockElement>>;
}

impl<T: Host + ?Sized> Host for Rc<T> {
    fn scroll_offset(&self) -> Vec2 {
        (**self).scroll_offset()
    }

    fn viewport_size(&self) -> Size {
        (**self).viewport_size()
    }

    fn query_blocks(&self) -> Vec<Rc<dyn BlockElement>> {
        (**self).query_blocks()
    }
}

/// Partial geometry update for a tracked block, in page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlockPatch {
    /// New left edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New top edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl BlockPatch {
    /// Patch replacing every field with `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: Some(rect.x0),
            y: Some(rect.y0),
            width: Some(rect.width()),
            height: Some(rect.height()),
        }
    }

    /// Apply to `rect`, ignoring non-finite and negative sizes.
    pub fn apply(&self, rect: Rect) -> Rect {
        let pick = |v: Option<f64>, cur: f64, allow_negative: bool| match v {
            Some(v) if v.is_finite() && (allow_negative || v >= 0.0) => v,
            _ => cur,
        };
        let x = pick(self.x, rect.x0, true);
        let y = pick(self.y, rect.y0, true);
        let w = pick(self.width, rect.width(), false);
        let h = pick(self.height, rect.height(), false);
        Rect::new(x, y, x + w, y + h)
    }
}

/// Visual offset written to a tracked element each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementTransform {
    /// Displacement of the simulated body from its anchor, in pixels.
    pub translate: Vec2,
    /// Body rotation in radians.
    pub rotation_rad: f64,
}

impl ElementTransform {
    /// Round every component to `decimals` places.
    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            translate: Vec2::new(
                round_to(self.translate.x, decimals),
                round_to(self.translate.y, decimals),
            ),
            rotation_rad: round_to(self.rotation_rad, decimals),
        }
    }

    /// CSS `transform` value.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}rad)",
            self.translate.x, self.translate.y, self.rotation_rad
        )
    }
}
