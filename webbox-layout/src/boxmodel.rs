//! Shared box-model resolution: margin/padding/border edges and the
//! `box-sizing` interpretation of a declared width/height (§3 invariant:
//! "border-box semantics applied uniformly ... the input side is the only
//! place `box-sizing` affects interpretation"). Factored out of
//! block/flex/grid/table, which all need the same edge + clamp arithmetic.

use webbox_css::style::{BoxSizing, ComputedStyle, Edges};
use webbox_css::values::CssValue;
use webbox_dom::Offsets;

use crate::length::{resolve_or, Axis, LengthResolutionContext};

/// Margin and padding percentages both resolve against the containing
/// block's *width*, even on the top/bottom edges (CSS 2.1 §8.3, §8.4) —
/// `axis` below is always `Horizontal` regardless of which physical edge
/// is being resolved.
pub fn resolve_edges(edges: &Edges<CssValue>, lctx: &LengthResolutionContext) -> Offsets {
    Offsets {
        top: resolve_or(&edges.top, lctx, Axis::Horizontal, 0.0),
        right: resolve_or(&edges.right, lctx, Axis::Horizontal, 0.0),
        bottom: resolve_or(&edges.bottom, lctx, Axis::Horizontal, 0.0),
        left: resolve_or(&edges.left, lctx, Axis::Horizontal, 0.0),
    }
}

pub fn border_widths(style: &ComputedStyle) -> Offsets {
    Offsets {
        top: style.border.top.width,
        right: style.border.right.width,
        bottom: style.border.bottom.width,
        left: style.border.left.width,
    }
}

/// The geometry every box needs regardless of formatting context: resolved
/// margin, padding, and border widths.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxMetrics {
    pub margin: Offsets,
    pub padding: Offsets,
    pub border: Offsets,
}

impl BoxMetrics {
    pub fn resolve(style: &ComputedStyle, lctx: &LengthResolutionContext) -> Self {
        BoxMetrics {
            margin: resolve_edges(&style.margin, lctx),
            padding: resolve_edges(&style.padding, lctx),
            border: border_widths(style),
        }
    }
}

/// Converts a declared (non-auto) width/height to a *content-box* size,
/// per `box-sizing` (§3 invariant). `border_box` semantics subtract the
/// padding+border the declared value already includes; `content-box`
/// leaves it unchanged.
pub fn declared_to_content(declared: f32, box_sizing: BoxSizing, padding_plus_border: f32) -> f32 {
    match box_sizing {
        BoxSizing::ContentBox => declared,
        BoxSizing::BorderBox => (declared - padding_plus_border).max(0.0),
    }
}

/// Clamps a resolved content-box dimension against `min-*`/`max-*`, which
/// are themselves resolved against the same containing block (§4.6 step 6:
/// "Apply `min-height` and `max-height` clamping", mirrored for width).
pub fn clamp_content_size(
    content_size: f32,
    min: &CssValue,
    max: &CssValue,
    box_sizing: BoxSizing,
    padding_plus_border: f32,
    lctx: &LengthResolutionContext,
    axis: Axis,
) -> f32 {
    let mut v = content_size;
    if let Some(min_px) = definite(min, lctx, axis) {
        v = v.max(declared_to_content(min_px, box_sizing, padding_plus_border));
    }
    if let Some(max_px) = definite(max, lctx, axis) {
        v = v.min(declared_to_content(max_px, box_sizing, padding_plus_border).max(0.0));
    }
    v.max(0.0)
}

fn definite(value: &CssValue, lctx: &LengthResolutionContext, axis: Axis) -> Option<f32> {
    match crate::length::resolve(value, lctx, axis) {
        webbox_css::values::Resolved::Px(v) => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_box_subtracts_padding_and_border() {
        assert_eq!(declared_to_content(200.0, BoxSizing::BorderBox, 20.0), 180.0);
    }

    #[test]
    fn content_box_leaves_declared_size_unchanged() {
        assert_eq!(declared_to_content(200.0, BoxSizing::ContentBox, 20.0), 200.0);
    }
}
