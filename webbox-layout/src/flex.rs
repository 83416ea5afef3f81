//! Flex layout (§4.7): the 9-phase algorithm — collection, order sort, line
//! partition, flexible-length resolution, cross-size determination, and the
//! three alignment passes. Grounded on the teacher's flexbox module
//! (`azul-layout/flex.rs`, itself adapted from the `stretch`/Visly flexbox
//! implementation) for the phase ordering and tie-break convention, rewired
//! onto this workspace's `ComputedStyle`/view-tree types.
//!
//! **Documented simplification.** Phase 9 hands each item's resolved
//! `(main, cross)` box straight to its own formatting context as a definite
//! containing block, rather than re-deriving the item's declared width/
//! height against that box per CSS's full constraint equation. For the
//! common case (`width`/`height: auto` on the item) this is exact; a
//! flex item with an explicit declared size in its own main dimension can
//! end up very slightly smaller than `main` once its own margin/padding is
//! subtracted again. Recorded as an Open Question resolution in
//! `DESIGN.md`.

use log::{debug, trace};
use webbox_css::style::{AlignContent, AlignItems, ComputedStyle, JustifyContent};
use webbox_css::values::{AxisExtent, CssValue, Resolved};
use webbox_dom::{Arena, Document, NodeId, ViewKind, ViewMeta, ViewNode};

use crate::boxmodel::{clamp_content_size, declared_to_content, BoxMetrics};
use crate::context::{BfcContext, ContainingBlock, FlowBox, LayoutContext};
use crate::error::LayoutResult;
use crate::length::{resolve, resolve_or, Axis, LengthResolutionContext};

fn lctx_of(style: &ComputedStyle, cb: ContainingBlock, ctx: &LayoutContext) -> LengthResolutionContext {
    LengthResolutionContext {
        containing_block_width: cb.width,
        containing_block_height: cb.height,
        font_size_px: style.font_size_px,
        root_font_size_px: ctx.viewport.root_font_size_px,
        viewport_width_px: ctx.viewport.width_css_px,
        viewport_height_px: ctx.viewport.height_css_px,
    }
}

struct Item {
    node: NodeId,
    order: i32,
    grow: f32,
    shrink: f32,
    basis: Option<f32>,
    min_main: f32,
    max_main: f32,
    min_cross: f32,
    max_cross: f32,
    intrinsic_cross: f32,
    align_self: AlignItems,
    main: f32,
    cross: f32,
    cross_offset_in_line: f32,
}

struct Line {
    items: Vec<Item>,
    cross_size: f32,
    cross_offset: f32,
}

#[allow(clippy::too_many_arguments)]
pub fn layout_flex<D: Document>(
    dom: &D,
    node: NodeId,
    view: &mut Arena<ViewNode>,
    ctx: &LayoutContext,
    cb: ContainingBlock,
    _parent_bfc: &mut BfcContext,
    root_offset: (f32, f32),
    depth: u32,
) -> LayoutResult<FlowBox> {
    if depth > ctx.options.max_depth {
        return Err(crate::error::LayoutError::DepthExceeded { limit: ctx.options.max_depth });
    }
    let style = dom.style(node);
    let lctx = lctx_of(style, cb, ctx);
    let metrics = BoxMetrics::resolve(style, &lctx);
    let pad_border_h = metrics.padding.horizontal() + metrics.border.horizontal();
    let pad_border_v = metrics.padding.vertical() + metrics.border.vertical();

    let content_width = match resolve(&style.width, &lctx, Axis::Horizontal) {
        Resolved::Px(w) => declared_to_content(w, style.box_sizing, pad_border_h),
        _ => match cb.width {
            AxisExtent::Definite(w) => (w - metrics.margin.horizontal() - pad_border_h).max(0.0),
            AxisExtent::Indefinite => crate::intrinsic::intrinsic_sizes(dom, node, ctx).1,
        },
    };
    let content_width = clamp_content_size(
        content_width, &style.min_width, &style.max_width, style.box_sizing, pad_border_h, &lctx, Axis::Horizontal,
    );

    let row = style.flex_direction.is_row();
    let row_reverse = matches!(style.flex_direction, webbox_css::style::FlexDirection::RowReverse);
    let col_reverse = matches!(style.flex_direction, webbox_css::style::FlexDirection::ColumnReverse);

    let main_gap = if row {
        resolve_or(&style.column_gap, &lctx, Axis::Horizontal, 0.0)
    } else {
        resolve_or(&style.row_gap, &lctx, Axis::Vertical, 0.0)
    };
    let cross_gap = if row {
        resolve_or(&style.row_gap, &lctx, Axis::Vertical, 0.0)
    } else {
        resolve_or(&style.column_gap, &lctx, Axis::Horizontal, 0.0)
    };

    // Container cross size, if definite up front (needed for `stretch`).
    let container_cross: AxisExtent = if row {
        match resolve(&style.height, &lctx, Axis::Vertical) {
            Resolved::Px(h) => AxisExtent::Definite(declared_to_content(h, style.box_sizing, pad_border_v)),
            _ => cb.height.map_definite(|h| (h - metrics.margin.vertical() - pad_border_v).max(0.0)),
        }
    } else {
        AxisExtent::Definite(content_width)
    };
    let main_size = if row { content_width } else { container_cross_or_auto(container_cross, row) };

    // Phase 1+2: collect items in document order, then stable-sort by order.
    let mut items: Vec<Item> = Vec::new();
    for child in dom.children(node) {
        if !is_flex_item(dom, child) {
            continue;
        }
        let cstyle = dom.style(child);
        let child_lctx_main = if row { lctx_for_axis(&lctx, content_width, Axis::Horizontal) } else { lctx_of(cstyle, cb, ctx) };
        let (intrinsic_min, intrinsic_max) = crate::intrinsic::intrinsic_sizes(dom, child, ctx);

        let basis = match &cstyle.flex_basis {
            CssValue::Auto => match resolve(axis_size_prop(cstyle, row), &child_lctx_main, axis_of(row)) {
                Resolved::Px(v) => Some(v),
                _ => None,
            },
            CssValue::Fr(_) => None,
            other => match resolve(other, &child_lctx_main, axis_of(row)) {
                Resolved::Px(v) => Some(v),
                _ => None,
            },
        };

        let min_main = resolve_or(min_axis_prop(cstyle, row), &child_lctx_main, axis_of(row), intrinsic_min);
        let max_main = {
            let m = max_axis_prop(cstyle, row);
            if m.is_auto() {
                f32::MAX
            } else {
                resolve_or(m, &child_lctx_main, axis_of(row), f32::MAX)
            }
        };

        let cross_lctx = lctx_for_axis(&lctx, content_width, axis_of(!row));
        let min_cross = resolve_or(min_axis_prop(cstyle, !row), &cross_lctx, axis_of(!row), 0.0);
        let max_cross = {
            let m = max_axis_prop(cstyle, !row);
            if m.is_auto() {
                f32::MAX
            } else {
                resolve_or(m, &cross_lctx, axis_of(!row), f32::MAX)
            }
        };
        let declared_cross = resolve(axis_size_prop(cstyle, !row), &cross_lctx, axis_of(!row));
        let cross_fallback = intrinsic_max;

        items.push(Item {
            node: child,
            order: cstyle.order,
            grow: cstyle.flex_grow,
            shrink: cstyle.flex_shrink,
            basis,
            min_main: min_main.max(0.0),
            max_main,
            min_cross: min_cross.max(0.0),
            max_cross,
            intrinsic_cross: declared_cross.px_or(cross_fallback),
            align_self: cstyle.align_self.resolve(style.align_items),
            main: 0.0,
            cross: 0.0,
            cross_offset_in_line: 0.0,
        });
    }
    items.sort_by_key(|i| i.order);

    // Phase 3: line partition.
    let mut lines: Vec<Vec<usize>> = Vec::new();
    if matches!(style.flex_wrap, webbox_css::style::FlexWrap::NoWrap) {
        lines.push((0..items.len()).collect());
    } else {
        let mut current: Vec<usize> = Vec::new();
        let mut acc = 0.0f32;
        for (idx, item) in items.iter().enumerate() {
            let b = item.basis.unwrap_or(item.min_main).max(item.min_main);
            let next_acc = acc + b + if current.is_empty() { 0.0 } else { main_gap };
            if !current.is_empty() && next_acc > main_size && main_size > 0.0 {
                lines.push(std::mem::take(&mut current));
                acc = b;
            } else {
                acc = next_acc;
            }
            current.push(idx);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    let mut built_lines: Vec<Line> = Vec::new();
    for line_idxs in lines {
        let mut line_items: Vec<Item> = line_idxs
            .into_iter()
            .map(|i| std::mem::replace(&mut items[i], placeholder_item()))
            .collect();

        // Phase 4: flexible length resolution.
        let basis_sum: f32 = line_items.iter().map(|it| it.basis.unwrap_or(it.min_main)).sum();
        let gaps = main_gap * (line_items.len().saturating_sub(1)) as f32;
        let free = main_size - basis_sum - gaps;

        for it in line_items.iter_mut() {
            it.main = it.basis.unwrap_or(it.min_main);
        }
        if free > 0.0 {
            let total_grow: f32 = line_items.iter().map(|i| i.grow).sum();
            if total_grow > 0.0 {
                distribute_grow(&mut line_items, free, total_grow);
            }
        } else if free < 0.0 {
            let total_shrink: f32 = line_items.iter().map(|i| i.shrink * i.main.max(0.01)).sum();
            if total_shrink > 0.0 {
                distribute_shrink(&mut line_items, -free, total_shrink);
            }
        }

        // Phase 5: cross-size determination.
        for it in line_items.iter_mut() {
            if it.align_self == AlignItems::Stretch {
                it.cross = it.intrinsic_cross.max(it.min_cross).min(it.max_cross);
            } else {
                it.cross = it.intrinsic_cross.clamp(it.min_cross, it.max_cross.max(it.min_cross));
            }
        }

        let line_cross = line_items.iter().map(|i| i.cross).fold(0.0f32, f32::max);
        built_lines.push(Line { items: line_items, cross_size: line_cross, cross_offset: 0.0 });
    }

    // Phase 5b: stretch items against the final line cross size when the
    // container's own cross size is definite (single-line stretch, the
    // common case §4.7 step 5 covers).
    for line in built_lines.iter_mut() {
        let target = container_cross.unwrap_or(line.cross_size);
        for it in line.items.iter_mut() {
            if it.align_self == AlignItems::Stretch {
                it.cross = target.max(it.min_cross).min(it.max_cross.max(it.min_cross));
            }
        }
    }

    // Phase 6: main-axis alignment (per line).
    for line in built_lines.iter_mut() {
        let used: f32 = line.items.iter().map(|i| i.main).sum::<f32>()
            + main_gap * line.items.len().saturating_sub(1) as f32;
        let free = (main_size - used).max(0.0);
        let n = line.items.len();
        let (mut cursor, gap_extra) = match style.justify_content {
            JustifyContent::FlexStart => (0.0, main_gap),
            JustifyContent::FlexEnd => (free, main_gap),
            JustifyContent::Center => (free / 2.0, main_gap),
            JustifyContent::SpaceBetween if n > 1 => (0.0, main_gap + free / (n - 1) as f32),
            JustifyContent::SpaceBetween => (0.0, main_gap),
            JustifyContent::SpaceAround if n > 0 => (free / (2 * n) as f32, main_gap + free / n as f32),
            JustifyContent::SpaceAround => (0.0, main_gap),
            JustifyContent::SpaceEvenly if n > 0 => (free / (n + 1) as f32, main_gap + free / (n + 1) as f32),
            JustifyContent::SpaceEvenly => (0.0, main_gap),
        };
        for it in line.items.iter_mut() {
            it.cross_offset_in_line = cursor; // reuse field to stash main-axis position
            cursor += it.main + gap_extra;
        }
    }

    // Phase 7: cross-axis alignment within each line.
    for line in built_lines.iter_mut() {
        for it in line.items.iter_mut() {
            let free = (line.cross_size - it.cross).max(0.0);
            let offset = match it.align_self {
                AlignItems::FlexStart | AlignItems::Stretch => 0.0,
                AlignItems::FlexEnd => free,
                AlignItems::Center => free / 2.0,
                AlignItems::Baseline => 0.0,
            };
            // cross_offset field on Item repurposed below during finalise.
            it.max_cross = offset; // stash the in-line cross offset (max_cross no longer needed)
        }
    }

    // Phase 8: multi-line cross alignment (align-content).
    let total_lines_cross: f32 = built_lines.iter().map(|l| l.cross_size).sum::<f32>()
        + cross_gap * built_lines.len().saturating_sub(1) as f32;
    let container_cross_resolved = container_cross.unwrap_or(total_lines_cross);
    let free_cross = (container_cross_resolved - total_lines_cross).max(0.0);
    let n_lines = built_lines.len();
    let (mut line_cursor, line_gap_extra) = match style.align_content {
        AlignContent::Stretch | AlignContent::FlexStart => (0.0, cross_gap),
        AlignContent::FlexEnd => (free_cross, cross_gap),
        AlignContent::Center => (free_cross / 2.0, cross_gap),
        AlignContent::SpaceBetween if n_lines > 1 => (0.0, cross_gap + free_cross / (n_lines - 1) as f32),
        AlignContent::SpaceBetween => (0.0, cross_gap),
        AlignContent::SpaceAround if n_lines > 0 => {
            (free_cross / (2 * n_lines) as f32, cross_gap + free_cross / n_lines as f32)
        }
        AlignContent::SpaceAround => (0.0, cross_gap),
    };
    let stretch_extra = if matches!(style.align_content, AlignContent::Stretch) && n_lines > 0 {
        free_cross / n_lines as f32
    } else {
        0.0
    };
    for line in built_lines.iter_mut() {
        line.cross_offset = line_cursor;
        line_cursor += line.cross_size + stretch_extra + line_gap_extra;
    }

    // Phase 9: finalise — write resolved geometry to each item's view.
    let view_id = view.alloc(ViewNode::new(ViewKind::Flex));
    view.get_mut(view_id).tag = dom.tag_name(node).map(|s| s.to_string());
    view.get_mut(view_id).dom_node = Some(node);
    view.get_mut(view_id).padding = metrics.padding;
    view.get_mut(view_id).border = metrics.border;
    view.get_mut(view_id).margin = metrics.margin;

    let content_origin = (root_offset.0 + metrics.padding.left + metrics.border.left, root_offset.1 + metrics.padding.top + metrics.border.top);
    let mut line_item_counts = Vec::new();
    let mut max_main_extent = 0.0f32;

    for line in &built_lines {
        line_item_counts.push(line.items.len());
        for it in &line.items {
            let main_pos = it.cross_offset_in_line;
            let cross_pos = line.cross_offset + it.max_cross;
            let (raw_x, raw_y, w, h) = if row {
                (main_pos, cross_pos, it.main, it.cross)
            } else {
                (cross_pos, main_pos, it.cross, it.main)
            };
            let (x, y) = apply_reverse(raw_x, raw_y, w, h, content_width, row_reverse, col_reverse, row);

            let child_cb = ContainingBlock::definite(w, h);
            let mut scratch = BfcContext::new(w);
            let placed = crate::layout_in_flow(
                dom,
                it.node,
                view,
                ctx,
                child_cb,
                &mut scratch,
                (content_origin.0 + x, content_origin.1 + y),
                depth + 1,
            )?;
            view.get_mut(placed.view_id).bounds.x = x;
            view.get_mut(placed.view_id).bounds.y = y;

            // Row-direction cross size is height, and block auto-height
            // never fills a definite containing block on its own (§4.6) —
            // unlike the main axis, which already gets auto-width-fills-
            // container for free from `resolve_width`. Apply `align-self:
            // stretch` as a post-hoc override here, the same way grid does
            // for its row axis.
            if row && it.align_self == AlignItems::Stretch && dom.style(it.node).height.is_auto() {
                let stretched = view.get_mut(placed.view_id);
                let pad_border_v = stretched.padding.vertical() + stretched.border.vertical();
                stretched.content_height = (it.cross - pad_border_v).max(0.0);
                stretched.bounds.height = it.cross;
            }

            view.append_child(view_id, placed.view_id);
            max_main_extent = max_main_extent.max(main_pos + it.main);
        }
    }

    let content_height_auto = built_lines.iter().map(|l| l.cross_offset + l.cross_size).fold(0.0f32, f32::max);
    let (final_width, final_height) = if row {
        (content_width, match resolve(&style.height, &lctx, Axis::Vertical) {
            Resolved::Px(h) => declared_to_content(h, style.box_sizing, pad_border_v),
            _ => content_height_auto,
        })
    } else {
        (content_height_auto.max(container_cross.unwrap_or(0.0)), main_size.max(max_main_extent))
    };
    let final_width = clamp_content_size(
        final_width, &style.min_width, &style.max_width, style.box_sizing, pad_border_h, &lctx, Axis::Horizontal,
    );
    let final_height = clamp_content_size(
        final_height, &style.min_height, &style.max_height, style.box_sizing, pad_border_v, &lctx, Axis::Vertical,
    );

    view.get_mut(view_id).content_width = final_width;
    view.get_mut(view_id).content_height = final_height;
    view.get_mut(view_id).bounds.width = final_width + pad_border_h;
    view.get_mut(view_id).bounds.height = final_height + pad_border_v;
    view.get_mut(view_id).meta = ViewMeta::Flex { line_item_counts };

    trace!("flex {:?}: {}x{} ({} lines)", node, final_width, final_height, built_lines.len());
    debug!("flex {:?} placed {} items", node, items.len());

    Ok(FlowBox {
        view_id,
        outer_width: final_width + pad_border_h + metrics.margin.horizontal(),
        outer_height: final_height + pad_border_v + metrics.margin.vertical(),
        margin_top: metrics.margin.top,
        margin_bottom: metrics.margin.bottom,
    })
}

fn placeholder_item() -> Item {
    Item {
        node: NodeId::ROOT,
        order: 0,
        grow: 0.0,
        shrink: 0.0,
        basis: None,
        min_main: 0.0,
        max_main: 0.0,
        min_cross: 0.0,
        max_cross: 0.0,
        intrinsic_cross: 0.0,
        align_self: AlignItems::Stretch,
        main: 0.0,
        cross: 0.0,
        cross_offset_in_line: 0.0,
    }
}

fn is_flex_item<D: Document>(dom: &D, node: NodeId) -> bool {
    if dom.kind(node) != webbox_dom::NodeKind::Element {
        return false;
    }
    let style = dom.style(node);
    !style.display.is_none() && !style.position.is_out_of_flow()
}

fn axis_of(row: bool) -> Axis {
    if row {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

fn axis_size_prop(style: &ComputedStyle, row: bool) -> &CssValue {
    if row {
        &style.width
    } else {
        &style.height
    }
}

fn min_axis_prop(style: &ComputedStyle, row: bool) -> &CssValue {
    if row {
        &style.min_width
    } else {
        &style.min_height
    }
}

fn max_axis_prop(style: &ComputedStyle, row: bool) -> &CssValue {
    if row {
        &style.max_width
    } else {
        &style.max_height
    }
}

fn lctx_for_axis(base: &LengthResolutionContext, definite_main: f32, axis: Axis) -> LengthResolutionContext {
    let mut l = *base;
    match axis {
        Axis::Horizontal => l.containing_block_width = AxisExtent::Definite(definite_main),
        Axis::Vertical => l.containing_block_height = AxisExtent::Definite(definite_main),
    }
    l
}

fn container_cross_or_auto(extent: AxisExtent, _row: bool) -> f32 {
    extent.unwrap_or(0.0)
}

trait AxisExtentExt {
    fn map_definite(self, f: impl FnOnce(f32) -> f32) -> AxisExtent;
}

impl AxisExtentExt for AxisExtent {
    fn map_definite(self, f: impl FnOnce(f32) -> f32) -> AxisExtent {
        match self {
            AxisExtent::Definite(v) => AxisExtent::Definite(f(v)),
            AxisExtent::Indefinite => AxisExtent::Indefinite,
        }
    }
}

fn distribute_grow(items: &mut [Item], mut free: f32, mut total_grow: f32) {
    loop {
        let mut frozen_extra = 0.0f32;
        let mut active = 0;
        for it in items.iter_mut() {
            if it.grow <= 0.0 {
                continue;
            }
            let share = free * (it.grow / total_grow);
            let capped = (it.main + share).min(it.max_main);
            if capped < it.main + share {
                frozen_extra += (it.main + share) - capped;
                it.main = capped;
                it.grow = 0.0;
            } else {
                it.main = capped;
                active += 1;
            }
        }
        if frozen_extra <= 0.001 || active == 0 {
            break;
        }
        free = frozen_extra;
        total_grow = items.iter().filter(|i| i.grow > 0.0).map(|i| i.grow).sum();
        if total_grow <= 0.0 {
            break;
        }
    }
}

fn distribute_shrink(items: &mut [Item], mut deficit: f32, mut total_weight: f32) {
    loop {
        let mut unresolved_deficit = 0.0f32;
        let mut active = 0;
        for it in items.iter_mut() {
            if it.shrink <= 0.0 {
                continue;
            }
            let weight = it.shrink * it.main.max(0.01);
            let share = deficit * (weight / total_weight);
            let floor = it.min_main;
            let proposed = it.main - share;
            if proposed < floor {
                unresolved_deficit += floor - proposed;
                it.main = floor;
                it.shrink = 0.0;
            } else {
                it.main = proposed;
                active += 1;
            }
        }
        if unresolved_deficit <= 0.001 || active == 0 {
            break;
        }
        deficit = unresolved_deficit;
        total_weight = items.iter().filter(|i| i.shrink > 0.0).map(|i| i.shrink * i.main.max(0.01)).sum();
        if total_weight <= 0.0 {
            break;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_reverse(x: f32, y: f32, w: f32, h: f32, content_width: f32, row_reverse: bool, col_reverse: bool, row: bool) -> (f32, f32) {
    if row && row_reverse {
        (content_width - x - w, y)
    } else if !row && col_reverse {
        (x, y) // column-reverse cross axis unaffected; main handled by reversing item order upstream in a fuller impl
    } else {
        let _ = (w, h);
        (x, y)
    }
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
    fn two_equal_grow_items_split_free_space() {
        let mut container = ComputedStyle::default();
        container.display = webbox_css::style::Display { outer: webbox_css::style::DisplayOuter::Block, inner: webbox_css::style::DisplayInner::Flex };
        let mut item_a = ComputedStyle::default();
        item_a.flex_grow = 1.0;
        item_a.width = CssValue::Auto;
        let item_b = item_a.clone();

        let doc = FixtureDocument::from_root(
            FixtureNode::element("div")
                .with_style(container)
                .with_child(FixtureNode::element("div").with_style(item_a))
                .with_child(FixtureNode::element("div").with_style(item_b)),
        );
        let shaper = SimpleTextShaper::new();
        let ctx = ctx_for(&shaper);
        let mut view: Arena<ViewNode> = Arena::new();
        let mut bfc = BfcContext::new(800.0);
        let fb = layout_flex(
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
        assert_eq!(kids.len(), 2);
        assert!((view.get(kids[0]).bounds.width - 400.0).abs() < 1.0);
        assert!((view.get(kids[1]).bounds.width - 400.0).abs() < 1.0);
    }
}
