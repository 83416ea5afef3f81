//! Block layout and margin collapsing (§4.6). Dispatches mixed content to
//! the anonymous-box partitioner (`anon`) and the inline line builder
//! (`inline`), floats to the active `BfcContext`, and out-of-flow children
//! to `positioned`. Grounded on the teacher's width/height two-pass split
//! (`azul-layout/block.rs`), generalised to a single recursive pass per
//! node since `webbox-layout` resolves width top-down before recursing
//! rather than batching by depth.

use log::{debug, trace};
use webbox_css::style::{BoxSizing, Clear, ComputedStyle, DisplayInner, Float};
use webbox_css::values::{AxisExtent, Resolved};
use webbox_dom::{Arena, Document, NodeId, Offsets, Rect, ViewKind, ViewMeta, ViewNode};

use crate::anon::{partition_children, ChildRun};
use crate::boxmodel::{clamp_content_size, declared_to_content, BoxMetrics};
use crate::context::{BfcContext, ContainingBlock, FlowBox, LayoutContext};
use crate::error::LayoutResult;
use crate::inline;
use crate::length::{resolve, resolve_or, Axis, LengthResolutionContext};
use crate::positioned;

fn lctx_of<'a>(style: &ComputedStyle, cb: ContainingBlock, ctx: &LayoutContext) -> LengthResolutionContext {
    LengthResolutionContext {
        containing_block_width: cb.width,
        containing_block_height: cb.height,
        font_size_px: style.font_size_px,
        root_font_size_px: ctx.viewport.root_font_size_px,
        viewport_width_px: ctx.viewport.width_css_px,
        viewport_height_px: ctx.viewport.height_css_px,
    }
}

fn collapse(a: f32, b: f32) -> f32 {
    a.max(0.0).max(b.max(0.0)) + a.min(0.0).min(b.min(0.0))
}

/// §4.10 "Relative positioning": the element keeps its normal-flow position
/// for every other box's purposes (margin collapsing, the y-cursor, sibling
/// placement) and only its own final rectangle shifts by the resolved
/// inset pair. `left` wins over `right` when both are definite; same for
/// `top`/`bottom`, matching the absolute-positioning constraint equation's
/// left/top-wins tie-break (§4.10 step "over-constrained? right is ignored").
fn relative_offset(style: &ComputedStyle, lctx: &LengthResolutionContext) -> (f32, f32) {
    if style.position != webbox_css::style::Position::Relative {
        return (0.0, 0.0);
    }
    let left = resolve(&style.inset.left, lctx, Axis::Horizontal);
    let right = resolve(&style.inset.right, lctx, Axis::Horizontal);
    let top = resolve(&style.inset.top, lctx, Axis::Vertical);
    let bottom = resolve(&style.inset.bottom, lctx, Axis::Vertical);
    let dx = match (left, right) {
        (Resolved::Px(l), _) => l,
        (_, Resolved::Px(r)) => -r,
        _ => 0.0,
    };
    let dy = match (top, bottom) {
        (Resolved::Px(t), _) => t,
        (_, Resolved::Px(b)) => -b,
        _ => 0.0,
    };
    (dx, dy)
}

/// §4.6 step 1: resolve the block's content-box width, distributing `auto`
/// margins when the declared width is definite and the containing block is.
fn resolve_width(style: &ComputedStyle, cb: ContainingBlock, lctx: &LengthResolutionContext, margin: &mut Offsets) -> f32 {
    let border_h = style.border.left.width + style.border.right.width;
    let pad_h = resolve_or(&style.padding.left, lctx, Axis::Horizontal, 0.0)
        + resolve_or(&style.padding.right, lctx, Axis::Horizontal, 0.0);

    let margin_left_auto = style.margin.left.is_auto();
    let margin_right_auto = style.margin.right.is_auto();

    let content = match resolve(&style.width, lctx, Axis::Horizontal) {
        Resolved::Px(w) => declared_to_content(w, style.box_sizing, pad_h + border_h),
        _ => {
            if let AxisExtent::Definite(cb_w) = cb.width {
                let used_margin_l = if margin_left_auto { 0.0 } else { margin.left };
                let used_margin_r = if margin_right_auto { 0.0 } else { margin.right };
                (cb_w - used_margin_l - used_margin_r - pad_h - border_h).max(0.0)
            } else {
                0.0
            }
        }
    };

    if let AxisExtent::Definite(cb_w) = cb.width {
        if !style.width.is_auto() && (margin_left_auto || margin_right_auto) {
            let used = content + pad_h + border_h;
            let remaining = (cb_w - used).max(0.0);
            if margin_left_auto && margin_right_auto {
                margin.left = remaining / 2.0;
                margin.right = remaining / 2.0;
            } else if margin_left_auto {
                margin.left = remaining - margin.right;
            } else if margin_right_auto {
                margin.right = remaining - margin.left;
            }
        }
    }

    clamp_content_size(content, &style.min_width, &style.max_width, style.box_sizing, pad_h + border_h, lctx, Axis::Horizontal)
}

/// One in-flow block-level or anonymous-inline-wrapper child, already
/// placed vertically. Used to let the float/positioned handling below see
/// the same accumulated `y`/`x` offset as ordinary flow children.
struct PlacedChild {
    #[allow(dead_code)]
    view_id: NodeId,
}

pub fn layout_block<D: Document>(
    dom: &D,
    node: NodeId,
    view: &mut Arena<ViewNode>,
    ctx: &LayoutContext,
    cb: ContainingBlock,
    parent_bfc: &mut BfcContext,
    root_offset: (f32, f32),
    depth: u32,
) -> LayoutResult<FlowBox> {
    if depth > ctx.options.max_depth {
        return Err(crate::error::LayoutError::DepthExceeded { limit: ctx.options.max_depth });
    }
    let style = dom.style(node);
    let lctx = lctx_of(style, cb, ctx);
    let resolved_metrics = BoxMetrics::resolve(style, &lctx);
    let mut margin = resolved_metrics.margin;
    let padding = resolved_metrics.padding;
    let border = resolved_metrics.border;

    let content_width = resolve_width(style, cb, &lctx, &mut margin);
    let establishes_new_bfc = style.establishes_new_bfc();

    let view_id = view.alloc(ViewNode::new(match style.display.inner {
        DisplayInner::FlowRoot => ViewKind::Block,
        _ => ViewKind::Block,
    }));
    view.get_mut(view_id).tag = dom.tag_name(node).map(|s| s.to_string());
    view.get_mut(view_id).dom_node = Some(node);
    view.get_mut(view_id).padding = padding;
    view.get_mut(view_id).border = border;
    view.get_mut(view_id).margin = margin;

    let mut own_bfc_storage;
    let bfc: &mut BfcContext = if establishes_new_bfc {
        own_bfc_storage = BfcContext::new(content_width);
        &mut own_bfc_storage
    } else {
        parent_bfc
    };

    let content_origin = (
        root_offset.0 + padding.left + border.left,
        root_offset.1 + padding.top + border.top,
    );

    let child_cb = ContainingBlock { width: AxisExtent::Definite(content_width), height: cb_height_for_children(style, &lctx) };

    let runs = partition_children(dom, node);
    let has_top_edge = padding.top > 0.0 || border.top > 0.0;
    let has_bottom_edge = padding.bottom > 0.0 || border.bottom > 0.0;
    let collapses_through_top = !has_top_edge && !establishes_new_bfc;
    let collapses_through_bottom = !has_bottom_edge && !establishes_new_bfc && style.height.is_auto();

    let mut y = 0.0f32;
    let mut prev_bottom_margin: Option<f32> = None;
    let mut first_block_margin_top: Option<f32> = None;
    let mut last_block_margin_bottom = 0.0f32;
    let mut pending_absolute: Vec<(NodeId, f32, f32)> = Vec::new();
    let mut children_placed: Vec<PlacedChild> = Vec::new();

    for run in runs {
        match run {
            ChildRun::Block(child) => {
                let cstyle = dom.style(child);
                if cstyle.clear != Clear::None {
                    y = y.max(bfc.clear_y(cstyle.clear));
                    prev_bottom_margin = None;
                }
                let child_box = crate::layout_in_flow(
                    dom,
                    child,
                    view,
                    ctx,
                    child_cb,
                    bfc,
                    (content_origin.0, content_origin.1 + y),
                    depth + 1,
                )?;

                let collapsed_top = match prev_bottom_margin {
                    Some(prev) => collapse(prev, child_box.margin_top),
                    None => {
                        if collapses_through_top {
                            first_block_margin_top = Some(child_box.margin_top);
                            0.0
                        } else {
                            child_box.margin_top
                        }
                    }
                };
                y += collapsed_top;
                let (rel_dx, rel_dy) = relative_offset(cstyle, &lctx_of(cstyle, child_cb, ctx));
                view.get_mut(child_box.view_id).bounds.x = rel_dx;
                view.get_mut(child_box.view_id).bounds.y = y + rel_dy;
                // Advance by the border box alone: `outer_height` folds in
                // both margins, but this loop already carries the bottom
                // margin forward itself (`prev_bottom_margin`) to collapse
                // against the next sibling's top margin, so adding it here
                // too would count it twice.
                y += view.get(child_box.view_id).bounds.height;
                prev_bottom_margin = Some(child_box.margin_bottom);
                last_block_margin_bottom = child_box.margin_bottom;
                view.append_child(view_id, child_box.view_id);
                children_placed.push(PlacedChild { view_id: child_box.view_id });
            }
            ChildRun::InlineRun(items) => {
                let needs_wrapper = has_block_sibling_run(dom, node);
                let band_origin = (content_origin.0, content_origin.1 + y);
                let ifc_result = inline::layout_inline_formatting_context(
                    dom,
                    &items,
                    view,
                    ctx,
                    content_width,
                    bfc,
                    band_origin,
                    y,
                    depth + 1,
                )?;
                if needs_wrapper {
                    let wrapper = view.alloc(ViewNode::new(ViewKind::Block));
                    view.get_mut(wrapper).content_width = content_width;
                    view.get_mut(wrapper).content_height = ifc_result.height;
                    view.get_mut(wrapper).bounds =
                        Rect { x: 0.0, y, width: content_width, height: ifc_result.height };
                    for line_child in ifc_result.line_view_ids {
                        view.append_child(wrapper, line_child);
                    }
                    view.append_child(view_id, wrapper);
                    prev_bottom_margin = Some(0.0);
                } else {
                    for line_child in ifc_result.line_view_ids {
                        view.append_child(view_id, line_child);
                    }
                }
                y += ifc_result.height;
            }
            ChildRun::OutOfFlow(child) => {
                let cstyle = dom.style(child);
                if cstyle.float != Float::None {
                    let (fw, fh, fview) = layout_float(
                        dom, child, view, ctx, child_cb, bfc, (content_origin.0, content_origin.1 + y), depth + 1,
                    )?;
                    let start_y = bfc.find_float_slot(cstyle.float, y, fw);
                    let side_x = match cstyle.float {
                        Float::Left => bfc.band_at(start_y, fh).0,
                        Float::Right => bfc.band_at(start_y, fh).1 - fw,
                        Float::None => 0.0,
                    };
                    bfc.add_float(cstyle.float, Rect { x: side_x, y: start_y, width: fw, height: fh });
                    view.get_mut(fview).bounds.x = side_x;
                    view.get_mut(fview).bounds.y = start_y;
                    view.append_child(view_id, fview);
                } else {
                    // Absolute/fixed: resolved after the normal-flow pass
                    // completes so the final content box is known (§4.10).
                    pending_absolute.push((child, 0.0, y));
                }
            }
        }
    }

    let content_height = match resolve(&style.height, &lctx, Axis::Vertical) {
        Resolved::Px(h) => declared_to_content(h, style.box_sizing, padding.vertical() + border.vertical()),
        _ => {
            let mut auto_height = y;
            if establishes_new_bfc {
                auto_height = auto_height.max(bfc.max_float_bottom());
            }
            auto_height
        }
    };
    let content_height = clamp_content_size(
        content_height,
        &style.min_height,
        &style.max_height,
        style.box_sizing,
        padding.vertical() + border.vertical(),
        &lctx,
        Axis::Vertical,
    );

    for (child, static_x, static_y) in pending_absolute {
        let establishes_cb = dom.style(node).position.establishes_containing_block();
        let (cb_w, cb_h, abs_x, abs_y) = if establishes_cb {
            (content_width, content_height, static_x, static_y)
        } else {
            (ctx.viewport.width_css_px, ctx.viewport.height_css_px, root_offset.0 + static_x, root_offset.1 + static_y)
        };
        let (pview, x, y_) = positioned::resolve_absolute(dom, child, view, ctx, cb_w, cb_h, abs_x, abs_y, depth + 1)?;
        let (rel_x, rel_y) = if establishes_cb {
            (x, y_)
        } else {
            (x - root_offset.0, y_ - root_offset.1)
        };
        view.get_mut(pview).bounds.x = rel_x;
        view.get_mut(pview).bounds.y = rel_y;
        view.append_child(view_id, pview);
    }

    view.get_mut(view_id).content_width = content_width;
    view.get_mut(view_id).content_height = content_height;
    view.get_mut(view_id).bounds.width = content_width + padding.horizontal() + border.horizontal();
    view.get_mut(view_id).bounds.height = content_height + padding.vertical() + border.vertical();

    let effective_margin_top = if collapses_through_top {
        match first_block_margin_top {
            Some(m) => collapse(margin.top, m),
            None => margin.top,
        }
    } else {
        margin.top
    };
    let effective_margin_bottom = if collapses_through_bottom && prev_bottom_margin.is_some() {
        collapse(margin.bottom, last_block_margin_bottom)
    } else {
        margin.bottom
    };

    trace!("block {:?}: {}x{} at depth {}", node, content_width, content_height, depth);
    debug!("block {:?} placed {} children", node, children_placed.len());

    Ok(FlowBox {
        view_id,
        outer_width: view.get(view_id).bounds.width + margin.horizontal(),
        outer_height: view.get(view_id).bounds.height + margin.vertical(),
        margin_top: effective_margin_top,
        margin_bottom: effective_margin_bottom,
    })
}

fn cb_height_for_children(style: &ComputedStyle, lctx: &LengthResolutionContext) -> AxisExtent {
    match resolve(&style.height, lctx, Axis::Vertical) {
        Resolved::Px(h) => AxisExtent::Definite(h),
        _ => AxisExtent::Indefinite,
    }
}

fn has_block_sibling_run<D: Document>(dom: &D, node: NodeId) -> bool {
    crate::anon::has_mixed_content(dom, node)
}

fn layout_float<D: Document>(
    dom: &D,
    node: NodeId,
    view: &mut Arena<ViewNode>,
    ctx: &LayoutContext,
    cb: ContainingBlock,
    bfc: &mut BfcContext,
    root_offset: (f32, f32),
    depth: u32,
) -> LayoutResult<(f32, f32, NodeId)> {
    // A float establishes its own BFC regardless of its own styling (§4.6).
    let mut fresh_bfc = BfcContext::new(match cb.width {
        AxisExtent::Definite(w) => w,
        AxisExtent::Indefinite => 0.0,
    });
    let boxed = layout_block(dom, node, view, ctx, cb, &mut fresh_bfc, root_offset, depth)?;
    let _ = bfc;
    Ok((boxed.outer_width, boxed.outer_height, boxed.view_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use webbox_css::style::ComputedStyle;
    use webbox_dom::fixture::{FixtureDocument, FixtureNode};
    use webbox_text::SimpleTextShaper;

    fn ctx_for(shaper: &SimpleTextShaper) -> LayoutContext {
        LayoutContext::new(shaper, crate::context::Viewport::default(), crate::context::LayoutOptions::default())
    }

    #[test]
    fn empty_div_has_zero_auto_height() {
        let doc = FixtureDocument::from_root(FixtureNode::element("div"));
        let shaper = SimpleTextShaper::new();
        let ctx = ctx_for(&shaper);
        let mut view: Arena<ViewNode> = Arena::new();
        let mut bfc = BfcContext::new(800.0);
        let fb = layout_block(
            &doc,
            doc.root(),
            &mut view,
            &ctx,
            ContainingBlock::definite(800.0, 600.0),
            &mut bfc,
            (0.0, 0.0),
            0,
        )
        .unwrap();
        assert_eq!(view.get(fb.view_id).content_height, 0.0);
        assert_eq!(view.get(fb.view_id).content_width, 800.0);
    }

    #[test]
    fn margin_collapses_through_top_edge_when_unblocked() {
        let mut child = ComputedStyle::default();
        child.margin.top = webbox_css::values::CssValue::px(20.0);
        child.height = webbox_css::values::CssValue::px(10.0);
        let mut sibling = ComputedStyle::default();
        sibling.margin.top = webbox_css::values::CssValue::px(5.0);
        sibling.height = webbox_css::values::CssValue::px(10.0);

        let doc = FixtureDocument::from_root(
            FixtureNode::element("div")
                .with_child(FixtureNode::element("div").with_style(child))
                .with_child(FixtureNode::element("div").with_style(sibling)),
        );
        let shaper = SimpleTextShaper::new();
        let ctx = ctx_for(&shaper);
        let mut view: Arena<ViewNode> = Arena::new();
        let mut bfc = BfcContext::new(800.0);
        let fb = layout_block(
            &doc,
            doc.root(),
            &mut view,
            &ctx,
            ContainingBlock::definite(800.0, 600.0),
            &mut bfc,
            (0.0, 0.0),
            0,
        )
        .unwrap();
        let kids: Vec<NodeId> = view.children(fb.view_id).collect();
        assert_eq!(view.get(kids[0]).bounds.y, 0.0);
        // child1's border box ends at y=10; its margin-bottom (0) collapses
        // with the sibling's margin-top (5) to just 5, not the sibling's
        // raw margin stacked on top of child1's own collapsed-through
        // margin.
        assert_eq!(view.get(kids[1]).bounds.y, 10.0 + 5.0);
    }

    #[test]
    fn sibling_margins_collapse_to_the_larger_value() {
        let mut child1 = ComputedStyle::default();
        child1.margin.top = webbox_css::values::CssValue::px(20.0);
        child1.margin.bottom = webbox_css::values::CssValue::px(30.0);
        child1.height = webbox_css::values::CssValue::px(10.0);
        let mut child2 = ComputedStyle::default();
        child2.margin.top = webbox_css::values::CssValue::px(20.0);
        child2.margin.bottom = webbox_css::values::CssValue::px(30.0);
        child2.height = webbox_css::values::CssValue::px(10.0);

        let doc = FixtureDocument::from_root(
            FixtureNode::element("div")
                .with_child(FixtureNode::element("div").with_style(child1))
                .with_child(FixtureNode::element("div").with_style(child2)),
        );
        let shaper = SimpleTextShaper::new();
        let ctx = ctx_for(&shaper);
        let mut view: Arena<ViewNode> = Arena::new();
        let mut bfc = BfcContext::new(800.0);
        let fb = layout_block(
            &doc,
            doc.root(),
            &mut view,
            &ctx,
            ContainingBlock::definite(800.0, 600.0),
            &mut bfc,
            (0.0, 0.0),
            0,
        )
        .unwrap();
        let kids: Vec<NodeId> = view.children(fb.view_id).collect();
        assert_eq!(view.get(kids[0]).bounds.y, 0.0);
        assert_eq!(view.get(kids[1]).bounds.y, 10.0 + 30.0);
    }

    #[test]
    fn relative_offset_shifts_the_box_without_moving_the_next_sibling() {
        let mut shifted = ComputedStyle::default();
        shifted.position = webbox_css::style::Position::Relative;
        shifted.inset.top = webbox_css::values::CssValue::px(5.0);
        shifted.inset.left = webbox_css::values::CssValue::px(8.0);
        shifted.height = webbox_css::values::CssValue::px(10.0);
        let sibling = ComputedStyle::default();

        let doc = FixtureDocument::from_root(
            FixtureNode::element("div")
                .with_child(FixtureNode::element("div").with_style(shifted))
                .with_child(FixtureNode::element("div").with_style(sibling)),
        );
        let shaper = SimpleTextShaper::new();
        let ctx = ctx_for(&shaper);
        let mut view: Arena<ViewNode> = Arena::new();
        let mut bfc = BfcContext::new(800.0);
        let fb = layout_block(
            &doc,
            doc.root(),
            &mut view,
            &ctx,
            ContainingBlock::definite(800.0, 600.0),
            &mut bfc,
            (0.0, 0.0),
            0,
        )
        .unwrap();
        let kids: Vec<NodeId> = view.children(fb.view_id).collect();
        // The shifted box's own rect moves by its inset pair...
        assert_eq!(view.get(kids[0]).bounds.x, 8.0);
        assert_eq!(view.get(kids[0]).bounds.y, 5.0);
        // ...but the next sibling is placed as if the shift never happened.
        assert_eq!(view.get(kids[1]).bounds.y, 10.0);
    }
}
