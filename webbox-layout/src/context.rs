//! Per-pass state threaded through the recursive layout calls: the
//! viewport/options bundle, the intrinsic-size cache, and the BFC object
//! (§4.6, §9 "shared mutable float context" design note).

use std::cell::RefCell;
use std::collections::HashMap;

use webbox_css::style::{Clear, Float};
use webbox_css::values::AxisExtent;
use webbox_dom::{NodeId, Rect};
use webbox_text::TextShaper;

/// The containing block a node's children resolve percentages against
/// (§3 glossary: "the rectangle against which an element's percentages and
/// auto sizing are resolved"). Width/height may each be indefinite — a
/// `height: auto` ancestor chain up to the viewport is the common case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainingBlock {
    pub width: AxisExtent,
    pub height: AxisExtent,
}

impl ContainingBlock {
    pub fn definite(width: f32, height: f32) -> Self {
        ContainingBlock { width: AxisExtent::Definite(width), height: AxisExtent::Definite(height) }
    }
}

/// The result of placing one in-flow box: its view node plus the pieces an
/// ancestor block needs to keep placing siblings — the outer (margin-box)
/// size, and the top/bottom margins un-collapsed so the caller can apply
/// sibling margin collapsing itself (§4.6 steps 2-4).
#[derive(Debug, Clone, Copy)]
pub struct FlowBox {
    pub view_id: NodeId,
    pub outer_width: f32,
    pub outer_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width_css_px: f32,
    pub height_css_px: f32,
    pub root_font_size_px: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { width_css_px: 800.0, height_css_px: 600.0, root_font_size_px: 16.0 }
    }
}

/// `(given_scale, pixel_ratio)` (§6 input #5). Layout records the product
/// on the root view but otherwise never consults it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentScale {
    pub given_scale: f32,
    pub pixel_ratio: f32,
}

impl Default for DocumentScale {
    fn default() -> Self {
        DocumentScale { given_scale: 1.0, pixel_ratio: 1.0 }
    }
}

impl DocumentScale {
    pub fn combined(&self) -> f32 {
        self.given_scale * self.pixel_ratio
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// §5: recursion-depth guard, default 1024.
    pub max_depth: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions { max_depth: 1024 }
    }
}

/// Per-pass layout context: the text-shaping capability (§9 "text-service
/// interface" design note — injected here, never reached for globally), the
/// viewport, and the intrinsic-size memoisation table (§4.3, §5).
pub struct LayoutContext<'a> {
    pub text_shaper: &'a dyn TextShaper,
    pub viewport: Viewport,
    pub options: LayoutOptions,
    intrinsic_cache: RefCell<HashMap<NodeId, (f32, f32)>>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(text_shaper: &'a dyn TextShaper, viewport: Viewport, options: LayoutOptions) -> Self {
        LayoutContext { text_shaper, viewport, options, intrinsic_cache: RefCell::new(HashMap::new()) }
    }

    pub fn cached_intrinsic(&self, node: NodeId) -> Option<(f32, f32)> {
        self.intrinsic_cache.borrow().get(&node).copied()
    }

    pub fn store_intrinsic(&self, node: NodeId, value: (f32, f32)) {
        self.intrinsic_cache.borrow_mut().insert(node, value);
    }
}

/// One block-formatting-context object (§4.6): active left/right floats,
/// the running `y` advance, and the trailing margin carried for collapsing.
/// Threaded by `&mut` reference through the block-layout recursion (§9); a
/// subtree that establishes a new BFC gets a fresh one rather than sharing
/// the ancestor's.
#[derive(Debug, Clone)]
pub struct BfcContext {
    /// Floats in BFC-local coordinates, sorted by `bottom` ascending.
    left_floats: Vec<Rect>,
    right_floats: Vec<Rect>,
    pub bfc_width: f32,
    pub y: f32,
    pub trailing_margin: f32,
}

impl BfcContext {
    pub fn new(bfc_width: f32) -> Self {
        BfcContext { left_floats: Vec::new(), right_floats: Vec::new(), bfc_width, y: 0.0, trailing_margin: 0.0 }
    }

    pub fn add_float(&mut self, side: Float, rect: Rect) {
        match side {
            Float::Left => {
                self.left_floats.push(rect);
                self.left_floats.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
            }
            Float::Right => {
                self.right_floats.push(rect);
                self.right_floats.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
            }
            Float::None => {}
        }
    }

    /// The left/right extent of floats overlapping the horizontal band
    /// `[y, y + height)`, narrowing the band for in-flow content (§4.5
    /// step 2, §4.6.2).
    pub fn band_at(&self, y: f32, height: f32) -> (f32, f32) {
        let overlaps = |r: &Rect| r.y < y + height && r.y + r.height > y;
        let left_edge = self
            .left_floats
            .iter()
            .filter(|r| overlaps(r))
            .map(|r| r.x + r.width)
            .fold(0.0f32, f32::max);
        let right_edge = self
            .right_floats
            .iter()
            .filter(|r| overlaps(r))
            .map(|r| r.x)
            .fold(self.bfc_width, f32::min);
        (left_edge, right_edge)
    }

    /// Finds the topmost `y` at or after `from_y` where a float of
    /// `width` fits on `side` without overlapping an existing float of
    /// the same or the opposite side's exclusion (§4.6.2).
    pub fn find_float_slot(&self, side: Float, from_y: f32, width: f32) -> f32 {
        let mut y = from_y;
        loop {
            let (left_edge, right_edge) = self.band_at(y, 0.01);
            let fits = match side {
                Float::Left => left_edge + width <= right_edge,
                Float::Right => right_edge - width >= left_edge,
                Float::None => true,
            };
            if fits {
                return y;
            }
            let next_bottom = self
                .left_floats
                .iter()
                .chain(self.right_floats.iter())
                .map(|r| r.y + r.height)
                .filter(|b| *b > y)
                .fold(None, |acc: Option<f32>, b| Some(acc.map_or(b, |a| a.min(b))));
            match next_bottom {
                Some(b) => y = b,
                None => return y,
            }
        }
    }

    pub fn clear_y(&self, clear: Clear) -> f32 {
        let left_bottom = self.left_floats.iter().map(|r| r.y + r.height).fold(0.0f32, f32::max);
        let right_bottom = self.right_floats.iter().map(|r| r.y + r.height).fold(0.0f32, f32::max);
        match clear {
            Clear::None => 0.0,
            Clear::Left => left_bottom,
            Clear::Right => right_bottom,
            Clear::Both => left_bottom.max(right_bottom),
        }
    }

    /// Used when this BFC's owner has `height: auto`: auto height must
    /// expand to contain any descendant floats that have not cleared
    /// (§4.6 step 5).
    pub fn max_float_bottom(&self) -> f32 {
        let l = self.left_floats.iter().map(|r| r.y + r.height).fold(0.0f32, f32::max);
        let r = self.right_floats.iter().map(|r| r.y + r.height).fold(0.0f32, f32::max);
        l.max(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_narrows_around_a_left_float() {
        let mut bfc = BfcContext::new(300.0);
        bfc.add_float(Float::Left, Rect { x: 0.0, y: 0.0, width: 100.0, height: 50.0 });
        let (left, right) = bfc.band_at(10.0, 10.0);
        assert_eq!(left, 100.0);
        assert_eq!(right, 300.0);
    }

    #[test]
    fn max_float_bottom_expands_auto_height() {
        let mut bfc = BfcContext::new(300.0);
        bfc.add_float(Float::Left, Rect { x: 0.0, y: 0.0, width: 100.0, height: 50.0 });
        assert_eq!(bfc.max_float_bottom(), 50.0);
    }
}
