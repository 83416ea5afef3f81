//! Positioned layout (§4.10): resolves the box of an absolutely or
//! fixed-positioned element against its containing block, deriving any
//! `auto` inset/size from the element's static position and intrinsic
//! size per CSS 2.1 §10.3.7/§10.6.4.
//!
//! **Documented simplification.** The distilled spec's containing-block
//! rule ("nearest ancestor that establishes one") is approximated here by
//! the caller (`block::layout_block`): the immediate DOM parent if it
//! establishes a containing block, the viewport otherwise. A full ancestor
//! walk would need the whole ancestor chain's positioning threaded through
//! every recursive call; recorded as an Open Question resolution in
//! `DESIGN.md`.

use webbox_css::style::{ComputedStyle, DisplayInner};
use webbox_css::values::{AxisExtent, Resolved};
use webbox_dom::{Arena, Document, NodeId, ViewNode};

use crate::boxmodel::{clamp_content_size, declared_to_content, BoxMetrics};
use crate::context::{BfcContext, ContainingBlock, LayoutContext};
use crate::error::LayoutResult;
use crate::length::{resolve, Axis, LengthResolutionContext};

fn lctx_of(style: &ComputedStyle, cb_w: f32, cb_h: f32, ctx: &LayoutContext) -> LengthResolutionContext {
    LengthResolutionContext {
        containing_block_width: AxisExtent::Definite(cb_w),
        containing_block_height: AxisExtent::Definite(cb_h),
        font_size_px: style.font_size_px,
        root_font_size_px: ctx.viewport.root_font_size_px,
        viewport_width_px: ctx.viewport.width_css_px,
        viewport_height_px: ctx.viewport.height_css_px,
    }
}

/// Resolves one absolutely/fixed-positioned child against a containing
/// block of size `cb_w x cb_h`, whose content box origin is the caller's
/// coordinate space. `static_x`/`static_y` is the position the element
/// would have occupied had it stayed in normal flow (used whenever an
/// inset pair leaves the axis under-constrained, §4.10 step 2). Returns
/// the new view node, and its final `(x, y)` in the containing block's
/// coordinate space.
#[allow(clippy::too_many_arguments)]
pub fn resolve_absolute<D: Document>(
    dom: &D,
    node: NodeId,
    view: &mut Arena<ViewNode>,
    ctx: &LayoutContext,
    cb_w: f32,
    cb_h: f32,
    static_x: f32,
    static_y: f32,
    depth: u32,
) -> LayoutResult<(NodeId, f32, f32)> {
    let style = dom.style(node);
    let lctx = lctx_of(style, cb_w, cb_h, ctx);
    let metrics = BoxMetrics::resolve(style, &lctx);
    let pad_border_h = metrics.padding.horizontal() + metrics.border.horizontal();
    let pad_border_v = metrics.padding.vertical() + metrics.border.vertical();

    let left = resolve(&style.inset.left, &lctx, Axis::Horizontal);
    let right = resolve(&style.inset.right, &lctx, Axis::Horizontal);
    let top = resolve(&style.inset.top, &lctx, Axis::Vertical);
    let bottom = resolve(&style.inset.bottom, &lctx, Axis::Vertical);

    let (min_c, max_c) = crate::intrinsic::intrinsic_sizes(dom, node, ctx);

    let width = match resolve(&style.width, &lctx, Axis::Horizontal) {
        Resolved::Px(w) => declared_to_content(w, style.box_sizing, pad_border_h),
        _ => match (as_px(left), as_px(right)) {
            (Some(l), Some(r)) => (cb_w - l - r - pad_border_h).max(0.0),
            // Shrink-to-fit (§4.10): available width is the space between
            // whichever inset is resolved and the containing block's far
            // edge, or from the static position when both are auto.
            (Some(l), None) => {
                let available_width = (cb_w - l - pad_border_h).max(0.0);
                available_width.max(min_c).min(max_c.max(min_c))
            }
            (None, Some(r)) => {
                let available_width = (cb_w - r - pad_border_h).max(0.0);
                available_width.max(min_c).min(max_c.max(min_c))
            }
            (None, None) => {
                let available_width = (cb_w - static_x - pad_border_h).max(0.0);
                available_width.max(min_c).min(max_c.max(min_c))
            }
        },
    };
    let width = clamp_content_size(width, &style.min_width, &style.max_width, style.box_sizing, pad_border_h, &lctx, Axis::Horizontal);

    let child_cb = ContainingBlock::definite(width, cb_h.max(0.0));
    let child_lctx = lctx_of(style, width, cb_h, ctx);
    let height_resolved = resolve(&style.height, &child_lctx, Axis::Vertical);

    let mut scratch_bfc = BfcContext::new(width);
    let view_id = match style.display.inner {
        DisplayInner::Flex => {
            crate::flex::layout_flex(dom, node, view, ctx, child_cb, &mut scratch_bfc, (0.0, 0.0), depth)?.view_id
        }
        DisplayInner::Grid => {
            crate::grid::layout_grid(dom, node, view, ctx, child_cb, &mut scratch_bfc, (0.0, 0.0), depth)?.view_id
        }
        DisplayInner::Table => {
            crate::table::layout_table(dom, node, view, ctx, child_cb, &mut scratch_bfc, (0.0, 0.0), depth)?.view_id
        }
        _ => crate::block::layout_block(dom, node, view, ctx, child_cb, &mut scratch_bfc, (0.0, 0.0), depth)?.view_id,
    };

    let height = match height_resolved {
        Resolved::Px(h) => declared_to_content(h, style.box_sizing, pad_border_v),
        _ => match (as_px(top), as_px(bottom)) {
            (Some(t), Some(b)) if !matches!(height_resolved, Resolved::Px(_)) => (cb_h - t - b - pad_border_v).max(0.0),
            _ => view.get(view_id).content_height,
        },
    };
    let height = clamp_content_size(height, &style.min_height, &style.max_height, style.box_sizing, pad_border_v, &lctx, Axis::Vertical);

    let outer_w = width + pad_border_h + metrics.margin.horizontal();
    let outer_h = height + pad_border_v + metrics.margin.vertical();

    let x = match (as_px(left), as_px(right)) {
        (Some(l), _) => l + metrics.margin.left,
        (None, Some(r)) => (cb_w - r - outer_w).max(0.0) + metrics.margin.left,
        (None, None) => static_x,
    };
    let y = match (as_px(top), as_px(bottom)) {
        (Some(t), _) => t + metrics.margin.top,
        (None, Some(b)) => (cb_h - b - outer_h).max(0.0) + metrics.margin.top,
        (None, None) => static_y,
    };

    let node_mut = view.get_mut(view_id);
    node_mut.content_width = width;
    node_mut.content_height = height;
    node_mut.padding = metrics.padding;
    node_mut.border = metrics.border;
    node_mut.margin = metrics.margin;
    node_mut.bounds.width = width + pad_border_h;
    node_mut.bounds.height = height + pad_border_v;

    Ok((view_id, x, y))
}

fn as_px(r: Resolved) -> Option<f32> {
    match r {
        Resolved::Px(v) => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webbox_dom::fixture::{FixtureDocument, FixtureNode};
    use webbox_text::SimpleTextShaper;

    #[test]
    fn shrink_to_fit_width_falls_between_min_and_max_content() {
        let mut node = ComputedStyle::default();
        node.position = webbox_css::style::Position::Absolute;
        node.inset.top = webbox_css::values::CssValue::px(0.0);
        node.inset.left = webbox_css::values::CssValue::px(0.0);

        let doc = FixtureDocument::from_root(FixtureNode::element("div").with_style(node));
        let shaper = SimpleTextShaper::new();
        let ctx = LayoutContext::new(&shaper, crate::context::Viewport::default(), crate::context::LayoutOptions::default());
        let mut view: Arena<ViewNode> = Arena::new();
        let (view_id, x, y) = resolve_absolute(&doc, doc.root(), &mut view, &ctx, 800.0, 600.0, 0.0, 0.0, 0).unwrap();
        // An empty div's min/max-content are both 0, so shrink-to-fit
        // collapses to a zero-width box placed at its resolved inset.
        assert_eq!(view.get(view_id).content_width, 0.0);
        assert_eq!(x, 0.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn shrink_to_fit_width_clamps_to_available_width_not_max_content() {
        let mut node = ComputedStyle::default();
        node.position = webbox_css::style::Position::Absolute;
        node.inset.top = webbox_css::values::CssValue::px(0.0);
        node.inset.left = webbox_css::values::CssValue::px(0.0);

        // Unwrapped, this text's max-content width is much wider than the
        // 100px containing block below; shrink-to-fit must clamp to the
        // available width rather than blowing out to max-content.
        let doc = FixtureDocument::from_root(
            FixtureNode::element("div")
                .with_style(node)
                .with_child(FixtureNode::text("a long run of several wrapping words here")),
        );
        let shaper = SimpleTextShaper::new();
        let ctx = LayoutContext::new(&shaper, crate::context::Viewport::default(), crate::context::LayoutOptions::default());
        let mut view: Arena<ViewNode> = Arena::new();
        let (view_id, _, _) = resolve_absolute(&doc, doc.root(), &mut view, &ctx, 100.0, 600.0, 0.0, 0.0, 0).unwrap();
        assert!(view.get(view_id).content_width <= 100.0);
    }
}
