//! Grid layout (§4.8): track definition, named-area resolution, item
//! placement (explicit + auto-flow with optional dense packing), the track
//! sizing algorithm, and final alignment. Grounded on the teacher's track
//! arithmetic style in `azul-layout` (the same `fr`-distribution approach
//! flex uses for `flex-grow`) — grid has no flexbox counterpart in the
//! teacher, so the track-sizing pass is adapted from first principles using
//! that shared distribution idiom plus `anon`'s child-partitioning pattern
//! for collecting placed items.
//!
//! **Documented simplification.** Track sizing runs a single content-based
//! pass (base size = each track's largest min-content/max-content item
//! contribution, growth limit = max-content) rather than CSS Grid's full
//! multi-pass "resolve intrinsic track sizes" algorithm with separate
//! spanning-item distribution rounds; `fr` tracks share remaining space
//! after all fixed/content tracks are sized, matching flex's grow pass.
//! When a track axis has no `fr` tracks at all, `align-content: stretch`
//! (the grid default) instead grows `auto` row tracks to absorb the
//! remaining space, per CSS Grid's normal-behaves-as-stretch rule.
//! Recorded as an Open Question resolution in `DESIGN.md`.

use log::{debug, trace};
use webbox_css::style::{AlignContent, AlignItems, ComputedStyle, GridLine, JustifyContent, RepeatCount, TrackSize};
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

struct PlacedItem {
    node: NodeId,
    col_start: usize,
    col_end: usize,
    row_start: usize,
    row_end: usize,
}

/// Expands `repeat()` components into a flat list of `TrackSize`, resolving
/// `auto-fill`/`auto-fit` against `available` once the container's own size
/// is known (§4.8 phase 1). `auto-fit` additionally collapses any resulting
/// track that ends up with no item in it to zero width (applied later, once
/// placement is known, via `collapse_empty_auto_fit_tracks`).
fn expand_template(components: &[webbox_css::style::GridTemplateComponent], available: f32, track_min: f32) -> Vec<TrackSize> {
    let mut out = Vec::new();
    for comp in components {
        match comp {
            webbox_css::style::GridTemplateComponent::Track(t) => out.push(t.clone()),
            webbox_css::style::GridTemplateComponent::Repeat { count, tracks } => match count {
                RepeatCount::Count(n) => {
                    for _ in 0..*n {
                        out.extend(tracks.iter().cloned());
                    }
                }
                RepeatCount::AutoFill | RepeatCount::AutoFit => {
                    let per_rep = tracks.len().max(1) as f32 * track_min.max(1.0);
                    let reps = if available > 0.0 { (available / per_rep).floor().max(1.0) as usize } else { 1 };
                    for _ in 0..reps {
                        out.extend(tracks.iter().cloned());
                    }
                }
            },
        }
    }
    if out.is_empty() {
        out.push(TrackSize::Auto);
    }
    out
}

fn track_is_auto_fit(components: &[webbox_css::style::GridTemplateComponent]) -> bool {
    components.iter().any(|c| matches!(c, webbox_css::style::GridTemplateComponent::Repeat { count: RepeatCount::AutoFit, .. }))
}

/// Resolves one grid-line pair to a concrete `[start, end)` track index
/// range, 0-based, expanding `auto`/`span N` against the next free line and
/// the already-placed cursor (§4.8 phase 3). Named lines/areas are resolved
/// separately in `resolve_area_placement` before this is reached for named
/// placements; here we only handle explicit numeric/`span`/`auto`.
fn resolve_line_pair(start: &GridLine, end: &GridLine, cursor: usize, track_count: usize) -> (usize, usize) {
    let resolve_one = |line: &GridLine, fallback: usize| -> Option<usize> {
        match line {
            GridLine::Line(n) if *n >= 1 => Some((*n as usize) - 1),
            GridLine::Line(_) => Some(fallback),
            _ => None,
        }
    };
    match (start, end) {
        (GridLine::Span(n), _) | (_, GridLine::Span(n)) => {
            let span = (*n).max(1) as usize;
            let s = cursor;
            (s, (s + span).max(s + 1).min(track_count.max(s + span)))
        }
        _ => {
            let s = resolve_one(start, cursor).unwrap_or(cursor);
            let e = resolve_one(end, s + 1).unwrap_or(s + 1);
            if e > s {
                (s, e)
            } else {
                (s, s + 1)
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn layout_grid<D: Document>(
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

    let column_gap = resolve_or(&style.column_gap, &lctx, Axis::Horizontal, 0.0);
    let row_gap = resolve_or(&style.row_gap, &lctx, Axis::Vertical, 0.0);

    // Phase 1: track definition.
    let mut columns = expand_template(&style.grid_template_columns, content_width, 48.0);
    let col_auto_fit = track_is_auto_fit(&style.grid_template_columns);
    let mut explicit_rows = expand_template(&style.grid_template_rows, 0.0, 16.0);

    // Phase 2: named-area resolution — each distinct letter in the area
    // matrix becomes an implicit named line pair spanning its contiguous
    // rectangle (§4.8 phase 2).
    let area_lookup = resolve_named_areas(&style.grid_template_areas);

    // Phase 3: item collection + placement, auto-flow with optional dense
    // packing (§4.8 phase 3).
    let dense = style.grid_auto_flow.is_dense();
    let flow_column = style.grid_auto_flow.is_column();
    let mut occupied: Vec<(usize, usize)> = Vec::new(); // (col, row) cells taken
    let mut placed: Vec<PlacedItem> = Vec::new();
    let mut auto_cursor_major = 0usize;
    let mut auto_cursor_minor = 0usize;

    for child in dom.children(node) {
        if !is_grid_item(dom, child) {
            continue;
        }
        let cstyle = dom.style(child);

        let explicit = if let Some(name) = &cstyle.grid_area_name {
            area_lookup.get(name).copied()
        } else {
            None
        };

        let (col_start, col_end, row_start, row_end) = if let Some((cs, ce, rs, re)) = explicit {
            (cs, ce, rs, re)
        } else if !matches!(cstyle.grid_column_start, GridLine::Auto) || !matches!(cstyle.grid_row_start, GridLine::Auto) {
            let (cs, ce) = resolve_line_pair(&cstyle.grid_column_start, &cstyle.grid_column_end, auto_cursor_major, columns.len());
            let (rs, re) = resolve_line_pair(&cstyle.grid_row_start, &cstyle.grid_row_end, auto_cursor_minor, explicit_rows.len());
            (cs, ce, rs, re)
        } else {
            auto_place(&mut occupied, &mut auto_cursor_major, &mut auto_cursor_minor, columns.len().max(1), flow_column, dense, 1, 1)
        };

        for c in col_start..col_end {
            for r in row_start..row_end {
                occupied.push((c, r));
            }
        }
        while explicit_rows.len() < row_end {
            explicit_rows.push(style.grid_auto_rows.last().cloned().unwrap_or(TrackSize::Auto));
        }
        while columns.len() < col_end {
            columns.push(style.grid_auto_columns.last().cloned().unwrap_or(TrackSize::Auto));
        }

        placed.push(PlacedItem { node: child, col_start, col_end, row_start, row_end });
    }

    if col_auto_fit {
        collapse_empty_auto_fit_tracks(&mut columns, &placed, |p| (p.col_start, p.col_end));
    }

    // Phase 4: track sizing algorithm.
    let col_sizes = size_tracks(dom, ctx, &columns, &placed, content_width, column_gap, true);
    let available_row_space = match cb.height {
        AxisExtent::Definite(h) => (h - metrics.margin.vertical() - pad_border_v).max(0.0),
        AxisExtent::Indefinite => 0.0,
    };
    let row_sizes = size_row_tracks(dom, ctx, &explicit_rows, &placed, available_row_space, row_gap, style.align_content);

    let col_offsets = track_offsets(&col_sizes, column_gap);
    let row_offsets = track_offsets(&row_sizes, row_gap);

    let grid_width: f32 = col_sizes.iter().sum::<f32>() + column_gap * col_sizes.len().saturating_sub(1) as f32;
    let grid_height: f32 = row_sizes.iter().sum::<f32>() + row_gap * row_sizes.len().saturating_sub(1) as f32;

    // Phase 5+6: item placement + alignment (justify-self/align-self per
    // item, justify-content/align-content distribute leftover space across
    // the track set as a whole).
    let free_w = (content_width - grid_width).max(0.0);
    let free_h = (grid_height.max(available_row_space) - grid_height).max(0.0);
    let (grid_x0, col_extra_gap) = distribute_free(style.justify_content, free_w, col_sizes.len());
    let (grid_y0, row_extra_gap) = distribute_free_content(style.align_content, free_h, row_sizes.len());

    let view_id = view.alloc(ViewNode::new(ViewKind::Grid));
    view.get_mut(view_id).tag = dom.tag_name(node).map(|s| s.to_string());
    view.get_mut(view_id).dom_node = Some(node);
    view.get_mut(view_id).padding = metrics.padding;
    view.get_mut(view_id).border = metrics.border;
    view.get_mut(view_id).margin = metrics.margin;

    let content_origin = (
        root_offset.0 + metrics.padding.left + metrics.border.left,
        root_offset.1 + metrics.padding.top + metrics.border.top,
    );

    for item in &placed {
        let cstyle = dom.style(item.node);
        let col_track_x = grid_x0 + col_offsets.get(item.col_start).copied().unwrap_or(0.0) + col_extra_gap * item.col_start as f32;
        let row_track_y = grid_y0 + row_offsets.get(item.row_start).copied().unwrap_or(0.0) + row_extra_gap * item.row_start as f32;
        let cell_w: f32 = col_sizes[item.col_start..item.col_end.min(col_sizes.len())].iter().sum::<f32>()
            + column_gap * item.col_end.saturating_sub(item.col_start).saturating_sub(1) as f32;
        let cell_h: f32 = row_sizes[item.row_start..item.row_end.min(row_sizes.len())].iter().sum::<f32>()
            + row_gap * item.row_end.saturating_sub(item.row_start).saturating_sub(1) as f32;

        let justify_self = cstyle.justify_self.resolve(AlignItems::Stretch);
        let align_self = cstyle.align_self.resolve(style.align_items);

        let (item_w, item_x) = align_in_cell(justify_self, cell_w, col_track_x, dom, item.node, ctx, true);
        let (item_h, item_y) = align_in_cell(align_self, cell_h, row_track_y, dom, item.node, ctx, false);

        let child_cb = ContainingBlock::definite(item_w, item_h);
        let mut scratch = BfcContext::new(item_w);
        let result = crate::layout_in_flow(
            dom,
            item.node,
            view,
            ctx,
            child_cb,
            &mut scratch,
            (content_origin.0 + item_x, content_origin.1 + item_y),
            depth + 1,
        )?;
        view.get_mut(result.view_id).bounds.x = item_x;
        view.get_mut(result.view_id).bounds.y = item_y;

        // Block auto-height never fills a definite containing block (a
        // block's own height:auto is always content-driven, §4.6) — so
        // `align-self: stretch` on the row axis has to be applied here as a
        // post-hoc override rather than by handing the stretched size down
        // through `child_cb`, the way the column axis already gets it for
        // free from `resolve_width`'s auto-width-fills-container behaviour.
        if align_self == AlignItems::Stretch && cstyle.height.is_auto() {
            let stretched = view.get_mut(result.view_id);
            let pad_border_v = stretched.padding.vertical() + stretched.border.vertical();
            stretched.content_height = (item_h - pad_border_v).max(0.0);
            stretched.bounds.height = item_h;
        }

        view.append_child(view_id, result.view_id);
    }

    let final_width = content_width;
    let final_height = match resolve(&style.height, &lctx, Axis::Vertical) {
        Resolved::Px(h) => declared_to_content(h, style.box_sizing, pad_border_v),
        _ => grid_height,
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
    view.get_mut(view_id).meta = ViewMeta::Grid { column_tracks: col_sizes.clone(), row_tracks: row_sizes.clone() };

    trace!("grid {:?}: {}x{} ({} cols, {} rows)", node, final_width, final_height, col_sizes.len(), row_sizes.len());
    debug!("grid {:?} placed {} items", node, placed.len());

    Ok(FlowBox {
        view_id,
        outer_width: final_width + pad_border_h + metrics.margin.horizontal(),
        outer_height: final_height + pad_border_v + metrics.margin.vertical(),
        margin_top: metrics.margin.top,
        margin_bottom: metrics.margin.bottom,
    })
}

fn is_grid_item<D: Document>(dom: &D, node: NodeId) -> bool {
    if dom.kind(node) != webbox_dom::NodeKind::Element {
        return false;
    }
    let style = dom.style(node);
    !style.display.is_none() && !style.position.is_out_of_flow()
}

/// Finds the contiguous rectangle each named area letter occupies in the
/// `grid-template-areas` string matrix (§4.8 phase 2). Returns
/// `name -> (col_start, col_end, row_start, row_end)`.
fn resolve_named_areas(rows: &[Vec<String>]) -> std::collections::HashMap<String, (usize, usize, usize, usize)> {
    let mut map: std::collections::HashMap<String, (usize, usize, usize, usize)> = std::collections::HashMap::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, name) in row.iter().enumerate() {
            if name == "." || name.is_empty() {
                continue;
            }
            map.entry(name.clone())
                .and_modify(|(cs, ce, rs, re)| {
                    *cs = (*cs).min(c);
                    *ce = (*ce).max(c + 1);
                    *rs = (*rs).min(r);
                    *re = (*re).max(r + 1);
                })
                .or_insert((c, c + 1, r, r + 1));
        }
    }
    map
}

#[allow(clippy::too_many_arguments)]
fn auto_place(
    occupied: &mut Vec<(usize, usize)>,
    cursor_major: &mut usize,
    cursor_minor: &mut usize,
    minor_count: usize,
    flow_column: bool,
    dense: bool,
    span_major: usize,
    span_minor: usize,
) -> (usize, usize, usize, usize) {
    if dense {
        *cursor_major = 0;
        *cursor_minor = 0;
    }
    loop {
        let free = (*cursor_minor..*cursor_minor + span_minor).all(|m| {
            (*cursor_major..*cursor_major + span_major).all(|mj| !occupied.contains(&cell_coords(flow_column, mj, m)))
        }) && *cursor_minor + span_minor <= minor_count.max(span_minor);
        if free {
            break;
        }
        *cursor_minor += 1;
        if *cursor_minor + span_minor > minor_count.max(span_minor) {
            *cursor_minor = 0;
            *cursor_major += 1;
        }
    }
    let (col_start, col_end, row_start, row_end) = if flow_column {
        (*cursor_major, *cursor_major + span_major, *cursor_minor, *cursor_minor + span_minor)
    } else {
        (*cursor_minor, *cursor_minor + span_minor, *cursor_major, *cursor_major + span_major)
    };
    *cursor_minor += span_minor;
    (col_start, col_end, row_start, row_end)
}

fn cell_coords(flow_column: bool, major: usize, minor: usize) -> (usize, usize) {
    if flow_column {
        (major, minor)
    } else {
        (minor, major)
    }
}

fn collapse_empty_auto_fit_tracks(tracks: &mut [TrackSize], placed: &[PlacedItem], span: impl Fn(&PlacedItem) -> (usize, usize)) {
    for (idx, track) in tracks.iter_mut().enumerate() {
        let used = placed.iter().any(|p| {
            let (s, e) = span(p);
            idx >= s && idx < e
        });
        if !used {
            *track = TrackSize::Length(CssValue::px(0.0));
        }
    }
}

/// Content-based track sizing for the inline (column) axis: each track's
/// base size is the largest max-content contribution among items confined
/// to that single track; `fr` tracks share what remains after fixed and
/// content tracks are sized (§4.8 phase 4).
fn size_tracks<D: Document>(
    dom: &D,
    ctx: &LayoutContext,
    tracks: &[TrackSize],
    placed: &[PlacedItem],
    available: f32,
    gap: f32,
    is_column: bool,
) -> Vec<f32> {
    let n = tracks.len();
    let mut sizes = vec![0.0f32; n];
    let mut fr_shares = vec![0.0f32; n];

    let axis = if is_column { Axis::Horizontal } else { Axis::Vertical };
    let lctx = indefinite_lctx();
    for (idx, track) in tracks.iter().enumerate() {
        resolve_track_base(track, &lctx, axis, &mut sizes[idx], &mut fr_shares[idx]);
    }

    for item in placed {
        let (start, end) = if is_column { (item.col_start, item.col_end) } else { (item.row_start, item.row_end) };
        if end.saturating_sub(start) != 1 || start >= n {
            continue;
        }
        let (_, max_c) = crate::intrinsic::intrinsic_sizes(dom, item.node, ctx);
        if fr_shares[start] <= 0.0 {
            sizes[start] = sizes[start].max(max_c);
        }
    }

    let fixed_total: f32 = sizes.iter().enumerate().filter(|(i, _)| fr_shares[*i] <= 0.0).map(|(_, s)| *s).sum();
    let gaps = gap * n.saturating_sub(1) as f32;
    let leftover = (available - fixed_total - gaps).max(0.0);
    let total_fr: f32 = fr_shares.iter().sum();
    if total_fr > 0.0 {
        for i in 0..n {
            if fr_shares[i] > 0.0 {
                sizes[i] = leftover * (fr_shares[i] / total_fr);
            }
        }
    }
    sizes
}

#[allow(clippy::too_many_arguments)]
fn size_row_tracks<D: Document>(
    dom: &D,
    ctx: &LayoutContext,
    tracks: &[TrackSize],
    placed: &[PlacedItem],
    available: f32,
    gap: f32,
    align_content: AlignContent,
) -> Vec<f32> {
    let n = tracks.len().max(placed.iter().map(|p| p.row_end).max().unwrap_or(0));
    let mut sizes = vec![0.0f32; n];
    let mut fr_shares = vec![0.0f32; n];
    let lctx = indefinite_lctx();
    for (idx, track) in tracks.iter().enumerate() {
        resolve_track_base(track, &lctx, Axis::Vertical, &mut sizes[idx], &mut fr_shares[idx]);
    }
    for item in placed {
        if item.row_end.saturating_sub(item.row_start) != 1 || item.row_start >= n {
            continue;
        }
        let (_, max_c) = crate::intrinsic::intrinsic_sizes(dom, item.node, ctx);
        let approx_row_height = max_c.max(20.0).min(200.0);
        if fr_shares[item.row_start] <= 0.0 {
            sizes[item.row_start] = sizes[item.row_start].max(approx_row_height);
        }
    }
    let fixed_total: f32 = sizes.iter().enumerate().filter(|(i, _)| fr_shares[*i] <= 0.0).map(|(_, s)| *s).sum();
    let gaps = gap * n.saturating_sub(1) as f32;
    let leftover = (available - fixed_total - gaps).max(0.0);
    let total_fr: f32 = fr_shares.iter().sum();
    if total_fr > 0.0 {
        for i in 0..n {
            if fr_shares[i] > 0.0 {
                sizes[i] = leftover * (fr_shares[i] / total_fr);
            }
        }
    } else if align_content == AlignContent::Stretch && leftover > 0.0 {
        // CSS Grid's default `align-content: normal` behaves as `stretch`
        // for track sizing: any track whose max sizing function is `auto`
        // grows to absorb the container's remaining space, in equal shares
        // (CSS Grid §11.3 "stretch" track-size growth).
        let stretchable: Vec<usize> =
            (0..n).filter(|&i| tracks.get(i).map(|t| matches!(t, TrackSize::Auto)).unwrap_or(false)).collect();
        if !stretchable.is_empty() {
            let share = leftover / stretchable.len() as f32;
            for i in stretchable {
                sizes[i] += share;
            }
        }
    }
    sizes
}

fn indefinite_lctx() -> LengthResolutionContext {
    LengthResolutionContext {
        containing_block_width: AxisExtent::Indefinite,
        containing_block_height: AxisExtent::Indefinite,
        font_size_px: 16.0,
        root_font_size_px: 16.0,
        viewport_width_px: 800.0,
        viewport_height_px: 600.0,
    }
}

fn resolve_track_base(track: &TrackSize, lctx: &LengthResolutionContext, axis: Axis, size_out: &mut f32, fr_out: &mut f32) {
    match track {
        TrackSize::Length(v) => *size_out = resolve_or(v, lctx, axis, 0.0),
        TrackSize::Fr(f) => *fr_out = *f,
        TrackSize::MinContent | TrackSize::MaxContent | TrackSize::Auto => *size_out = 0.0,
        TrackSize::MinMax(min, _max) => resolve_track_base(min, lctx, axis, size_out, fr_out),
    }
}

fn track_offsets(sizes: &[f32], gap: f32) -> Vec<f32> {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut cursor = 0.0f32;
    for s in sizes {
        offsets.push(cursor);
        cursor += s + gap;
    }
    offsets
}

fn distribute_free(justify: JustifyContent, free: f32, n: usize) -> (f32, f32) {
    match justify {
        JustifyContent::FlexStart => (0.0, 0.0),
        JustifyContent::FlexEnd => (free, 0.0),
        JustifyContent::Center => (free / 2.0, 0.0),
        JustifyContent::SpaceBetween if n > 1 => (0.0, free / (n - 1) as f32),
        JustifyContent::SpaceBetween => (0.0, 0.0),
        JustifyContent::SpaceAround if n > 0 => (free / (2 * n) as f32, free / n as f32),
        JustifyContent::SpaceAround => (0.0, 0.0),
        JustifyContent::SpaceEvenly if n > 0 => (free / (n + 1) as f32, free / (n + 1) as f32),
        JustifyContent::SpaceEvenly => (0.0, 0.0),
    }
}

fn distribute_free_content(align: AlignContent, free: f32, n: usize) -> (f32, f32) {
    match align {
        AlignContent::Stretch | AlignContent::FlexStart => (0.0, 0.0),
        AlignContent::FlexEnd => (free, 0.0),
        AlignContent::Center => (free / 2.0, 0.0),
        AlignContent::SpaceBetween if n > 1 => (0.0, free / (n - 1) as f32),
        AlignContent::SpaceBetween => (0.0, 0.0),
        AlignContent::SpaceAround if n > 0 => (free / (2 * n) as f32, free / n as f32),
        AlignContent::SpaceAround => (0.0, 0.0),
    }
}

/// Resolves one axis of `justify-self`/`align-self` against a cell of size
/// `cell_size` starting at `cell_pos`: `stretch` fills the cell, everything
/// else shrinks to the item's own max-content contribution and positions it
/// within the cell (§4.8 phase 6).
fn align_in_cell<D: Document>(
    align: AlignItems,
    cell_size: f32,
    cell_pos: f32,
    dom: &D,
    node: NodeId,
    ctx: &LayoutContext,
    _horizontal: bool,
) -> (f32, f32) {
    match align {
        AlignItems::Stretch => (cell_size, cell_pos),
        _ => {
            let (_, max_c) = crate::intrinsic::intrinsic_sizes(dom, node, ctx);
            let size = max_c.min(cell_size);
            let free = (cell_size - size).max(0.0);
            let offset = match align {
                AlignItems::FlexStart | AlignItems::Baseline => 0.0,
                AlignItems::FlexEnd => free,
                AlignItems::Center => free / 2.0,
                AlignItems::Stretch => 0.0,
            };
            (size, cell_pos + offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webbox_css::style::{Display, DisplayInner, DisplayOuter};
    use webbox_dom::fixture::{FixtureDocument, FixtureNode};
    use webbox_text::SimpleTextShaper;

    fn ctx_for(shaper: &SimpleTextShaper) -> LayoutContext {
        LayoutContext::new(shaper, crate::context::Viewport::default(), crate::context::LayoutOptions::default())
    }

    #[test]
    fn two_equal_fr_columns_split_width() {
        let mut container = ComputedStyle::default();
        container.display = Display { outer: DisplayOuter::Block, inner: DisplayInner::Grid };
        container.grid_template_columns = vec![
            webbox_css::style::GridTemplateComponent::Track(TrackSize::Fr(1.0)),
            webbox_css::style::GridTemplateComponent::Track(TrackSize::Fr(1.0)),
        ];

        let doc = FixtureDocument::from_root(
            FixtureNode::element("div")
                .with_style(container)
                .with_child(FixtureNode::element("div"))
                .with_child(FixtureNode::element("div")),
        );
        let shaper = SimpleTextShaper::new();
        let ctx = ctx_for(&shaper);
        let mut view: Arena<ViewNode> = Arena::new();
        let mut bfc = BfcContext::new(800.0);
        let fb = layout_grid(
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
        let col_tracks = match &view.get(fb.view_id).meta {
            ViewMeta::Grid { column_tracks, .. } => column_tracks.clone(),
            _ => panic!("expected grid meta"),
        };
        assert_eq!(col_tracks.len(), 2);
        assert!((col_tracks[0] - 400.0).abs() < 1.0);
        assert!((col_tracks[1] - 400.0).abs() < 1.0);
    }
}
