//! Table layout (§4.9): anonymous box generation for bare rows/cells, the
//! automatic table column-width algorithm (min/max per column with
//! proportional spanning distribution), row heights from cell content, the
//! `border-collapse` priority resolution (CSS 2.1 §17.6.2), and caption
//! placement. Grounded on the teacher's two-pass content-measurement style
//! (`azul-layout`'s block width/height split, reused here per-column rather
//! than per-box) plus `anon.rs`'s anonymous-box convention for the rows
//! table cells need when authored bare.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use webbox_css::style::{BorderSide, BorderStyle, CaptionSide, ComputedStyle, DisplayInner, Edges, TableLayoutMode, VerticalAlign};
use webbox_css::values::{AxisExtent, Resolved};
use webbox_dom::{Arena, Document, NodeId, NodeKind, ViewKind, ViewMeta, ViewNode};

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

/// Every `.`-free Unicode whitespace code point CSS's "empty cell" test
/// considers (§4.9: includes U+00A0, U+1680, U+2000-200A, U+202F, U+205F,
/// U+3000 in addition to ASCII whitespace).
fn is_effectively_empty(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(
            c,
            ' ' | '\t' | '\n' | '\r' | '\u{0C}' | '\u{0B}' | '\u{00A0}' | '\u{1680}'
                | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
        )
    })
}

struct Cell {
    node: NodeId,
    col: usize,
    row_span: usize,
    col_span: usize,
    min_width: f32,
    max_width: f32,
}

struct Row {
    node: Option<NodeId>,
    cells: Vec<Cell>,
}

/// Walks the table's children, generating the anonymous row/cell boxes CSS
/// 2.1 §17.2.1 requires when a `<table>` contains bare cells, and flattens
/// `<tbody>`/`<thead>`/`<tfoot>` row-groups into a single row list (§4.9
/// phase 1 "anonymous box generation").
fn collect_rows<D: Document>(dom: &D, table: NodeId) -> (Vec<Row>, Vec<NodeId>) {
    let mut rows = Vec::new();
    let mut captions = Vec::new();
    let mut occupied: HashSet<(usize, usize)> = HashSet::new();

    fn visit<D: Document>(dom: &D, node: NodeId, rows: &mut Vec<Row>, captions: &mut Vec<NodeId>, occupied: &mut HashSet<(usize, usize)>) {
        for child in dom.children(node) {
            if dom.kind(child) != NodeKind::Element {
                continue;
            }
            let style = dom.style(child);
            if style.display.is_none() {
                continue;
            }
            match style.display.inner {
                DisplayInner::TableCaption => captions.push(child),
                DisplayInner::TableRowGroup => visit(dom, child, rows, captions, occupied),
                DisplayInner::TableRow => {
                    let row_idx = rows.len();
                    let mut cells = Vec::new();
                    let mut col = 0usize;
                    for cell_node in dom.children(child) {
                        if dom.kind(cell_node) != NodeKind::Element {
                            continue;
                        }
                        let cstyle = dom.style(cell_node);
                        if cstyle.display.is_none() {
                            continue;
                        }
                        while occupied.contains(&(col, row_idx)) {
                            col += 1;
                        }
                        let row_span = cstyle.row_span.max(1) as usize;
                        let col_span = cstyle.col_span.max(1) as usize;
                        for r in row_idx..row_idx + row_span {
                            for c in col..col + col_span {
                                occupied.insert((c, r));
                            }
                        }
                        cells.push(Cell { node: cell_node, col, row_span, col_span, min_width: 0.0, max_width: 0.0 });
                        col += col_span;
                    }
                    rows.push(Row { node: Some(child), cells });
                }
                // Bare cell authored directly under the table/row-group:
                // wrap it in an anonymous row (§17.2.1 generation rule 2).
                DisplayInner::TableCell => {
                    let row_idx = rows.len();
                    rows.push(Row {
                        node: None,
                        cells: vec![Cell {
                            node: child,
                            col: 0,
                            row_span: dom.style(child).row_span.max(1) as usize,
                            col_span: dom.style(child).col_span.max(1) as usize,
                            min_width: 0.0,
                            max_width: 0.0,
                        }],
                    });
                    let _ = row_idx;
                }
                _ => {}
            }
        }
    }

    visit(dom, table, &mut rows, &mut captions, &mut occupied);
    (rows, captions)
}

#[allow(clippy::too_many_arguments)]
pub fn layout_table<D: Document>(
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

    let (mut rows, captions) = collect_rows(dom, node);
    let collapse = style.border_collapse == webbox_css::style::BorderCollapse::Collapse;
    let (h_spacing, v_spacing) = if collapse { (0.0, 0.0) } else { style.border_spacing };

    let col_count = rows.iter().flat_map(|r| r.cells.iter()).map(|c| c.col + c.col_span).max().unwrap_or(0);

    // Maps every grid cell a spanning cell covers back to its owning
    // (row index, cell-within-row index), so border resolution can find the
    // cell adjoining any edge regardless of row/col-span.
    let mut owner: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    for (ri, row) in rows.iter().enumerate() {
        for (ci, cell) in row.cells.iter().enumerate() {
            for r in ri..ri + cell.row_span {
                for c in cell.col..cell.col + cell.col_span {
                    owner.insert((c, r), (ri, ci));
                }
            }
        }
    }

    let table_width = match resolve(&style.width, &lctx, Axis::Horizontal) {
        Resolved::Px(w) => declared_to_content(w, style.box_sizing, pad_border_h),
        _ => match cb.width {
            AxisExtent::Definite(w) => (w - metrics.margin.horizontal() - pad_border_h).max(0.0),
            AxisExtent::Indefinite => 0.0,
        },
    };

    // Phase: measure min/max content width per cell, then per column (§4.9
    // step "measure min/max per column with proportional spanning
    // distribution").
    let mut col_min = vec![0.0f32; col_count];
    let mut col_max = vec![0.0f32; col_count];
    for row in rows.iter_mut() {
        for cell in row.cells.iter_mut() {
            let (min_c, max_c) = crate::intrinsic::intrinsic_sizes(dom, cell.node, ctx);
            cell.min_width = min_c;
            cell.max_width = max_c;
            if cell.col_span == 1 {
                col_min[cell.col] = col_min[cell.col].max(min_c);
                col_max[cell.col] = col_max[cell.col].max(max_c);
            }
        }
    }
    // Spanning cells: distribute any shortfall across their spanned columns
    // proportionally to each column's existing share (§4.9 spanning rule).
    for row in &rows {
        for cell in &row.cells {
            if cell.col_span <= 1 {
                continue;
            }
            let span_cols = cell.col..(cell.col + cell.col_span).min(col_count);
            let current_min: f32 = span_cols.clone().map(|c| col_min[c]).sum();
            let current_max: f32 = span_cols.clone().map(|c| col_max[c]).sum();
            if cell.min_width > current_min {
                let extra = cell.min_width - current_min;
                let n = span_cols.len().max(1) as f32;
                for c in span_cols.clone() {
                    col_min[c] += extra / n;
                }
            }
            if cell.max_width > current_max {
                let extra = cell.max_width - current_max;
                let n = span_cols.len().max(1) as f32;
                for c in span_cols {
                    col_max[c] += extra / n;
                }
            }
        }
    }

    let spacing_total = if col_count > 0 { h_spacing * (col_count + 1) as f32 } else { 0.0 };
    let min_total: f32 = col_min.iter().sum::<f32>() + spacing_total;
    let max_total: f32 = col_max.iter().sum::<f32>() + spacing_total;

    // Grow/shrink columns to match a definite table width (§4.9 step 2).
    let mut col_widths = col_max.clone();
    let target_width = if matches!(style.table_layout, TableLayoutMode::Fixed) {
        table_width.max(min_total)
    } else {
        table_width
    };
    if target_width > max_total && max_total > 0.0 {
        let extra = target_width - max_total;
        for (i, w) in col_widths.iter_mut().enumerate() {
            *w += extra * (col_max[i] / max_total);
        }
    } else if target_width < max_total {
        let available_shrink = (max_total - min_total).max(1.0);
        let deficit = (max_total - target_width).min(max_total - min_total);
        for (i, w) in col_widths.iter_mut().enumerate() {
            let shrinkable = (col_max[i] - col_min[i]).max(0.0);
            *w = col_max[i] - deficit * (shrinkable / available_shrink);
        }
    }

    let total_col_width: f32 = col_widths.iter().sum();
    let final_table_width = (total_col_width + spacing_total).max(table_width);

    let mut col_offsets = Vec::with_capacity(col_count);
    let mut cursor = h_spacing;
    for w in &col_widths {
        col_offsets.push(cursor);
        cursor += w + h_spacing;
    }

    let view_id = view.alloc(ViewNode::new(ViewKind::Table));
    view.get_mut(view_id).tag = dom.tag_name(node).map(|s| s.to_string());
    view.get_mut(view_id).dom_node = Some(node);
    view.get_mut(view_id).padding = metrics.padding;
    view.get_mut(view_id).border = metrics.border;
    view.get_mut(view_id).margin = metrics.margin;

    let content_origin = (
        root_offset.0 + metrics.padding.left + metrics.border.left,
        root_offset.1 + metrics.padding.top + metrics.border.top,
    );

    let mut y = v_spacing;
    let caption_top = captions.iter().find(|c| dom.style(**c).caption_side == CaptionSide::Top);
    if let Some(&cap) = caption_top {
        let cap_cb = ContainingBlock::definite(final_table_width, cb.height.unwrap_or(0.0));
        let mut cap_bfc = BfcContext::new(final_table_width);
        let placed = crate::layout_in_flow(dom, cap, view, ctx, cap_cb, &mut cap_bfc, (content_origin.0, content_origin.1 + y), depth + 1)?;
        view.get_mut(placed.view_id).bounds.x = 0.0;
        view.get_mut(placed.view_id).bounds.y = y;
        view.append_child(view_id, placed.view_id);
        y += placed.outer_height;
    }

    let mut row_heights = vec![0.0f32; rows.len()];
    let mut row_offsets = vec![0.0f32; rows.len()];
    let mut row_y = y;

    for (r, row) in rows.iter().enumerate() {
        row_offsets[r] = row_y;
        let mut row_height = 0.0f32;
        for cell in &row.cells {
            if cell.row_span > 1 {
                continue; // sized after its own rows are known below
            }
            let cell_w: f32 = (cell.col..(cell.col + cell.col_span).min(col_count)).map(|c| col_widths[c]).sum::<f32>()
                + h_spacing * cell.col_span.saturating_sub(1) as f32;
            let cell_cb = ContainingBlock { width: AxisExtent::Definite(cell_w), height: AxisExtent::Indefinite };
            let mut scratch = BfcContext::new(cell_w);
            let placed = crate::layout_in_flow(dom, cell.node, view, ctx, cell_cb, &mut scratch, (0.0, 0.0), depth + 1)?;
            row_height = row_height.max(placed.outer_height);
        }
        row_heights[r] = row_height.max(1.0);
        row_y += row_height.max(1.0) + v_spacing;
    }

    // Row-span excess distributed proportionally across the spanned rows
    // (§4.9 "row-span excess distributed proportionally").
    for (r, row) in rows.iter().enumerate() {
        for cell in &row.cells {
            if cell.row_span <= 1 {
                continue;
            }
            let cell_w: f32 = (cell.col..(cell.col + cell.col_span).min(col_count)).map(|c| col_widths[c]).sum::<f32>()
                + h_spacing * cell.col_span.saturating_sub(1) as f32;
            let cell_cb = ContainingBlock { width: AxisExtent::Definite(cell_w), height: AxisExtent::Indefinite };
            let mut scratch = BfcContext::new(cell_w);
            let placed = crate::layout_in_flow(dom, cell.node, view, ctx, cell_cb, &mut scratch, (0.0, 0.0), depth + 1)?;
            let span_end = (r + cell.row_span).min(rows.len());
            let spanned_total: f32 = row_heights[r..span_end].iter().sum::<f32>() + v_spacing * (span_end - r).saturating_sub(1) as f32;
            if placed.outer_height > spanned_total {
                let extra = placed.outer_height - spanned_total;
                let current_sum: f32 = row_heights[r..span_end].iter().sum();
                for h in &mut row_heights[r..span_end] {
                    let share = if current_sum > 0.0 { *h / current_sum } else { 1.0 / (span_end - r) as f32 };
                    *h += extra * share;
                }
            }
        }
    }
    row_y = row_offsets.first().copied().unwrap_or(y);
    for (r, offset) in row_offsets.iter_mut().enumerate() {
        *offset = row_y;
        row_y += row_heights[r] + v_spacing;
    }

    let table_content_height = row_y;

    for (r, row) in rows.iter().enumerate() {
        for cell in &row.cells {
            let cell_w: f32 = (cell.col..(cell.col + cell.col_span).min(col_count)).map(|c| col_widths[c]).sum::<f32>()
                + h_spacing * cell.col_span.saturating_sub(1) as f32;
            let cell_h: f32 = (r..(r + cell.row_span).min(rows.len())).map(|ri| row_heights[ri]).sum::<f32>()
                + v_spacing * cell.row_span.saturating_sub(1) as f32;
            let cx = col_offsets.get(cell.col).copied().unwrap_or(0.0);
            let cy = row_offsets[r];

            let cstyle = dom.style(cell.node);
            let is_empty = dom.text_content(cell.node).map(is_effectively_empty).unwrap_or(true);
            if is_empty && cstyle.empty_cells == webbox_css::style::EmptyCells::Hide {
                continue;
            }

            let cell_cb = ContainingBlock::definite(cell_w, cell_h);
            let mut scratch = BfcContext::new(cell_w);
            let placed = crate::layout_in_flow(
                dom, cell.node, view, ctx, cell_cb, &mut scratch,
                (content_origin.0 + cx, content_origin.1 + cy), depth + 1,
            )?;
            let baseline_fallback = is_empty;
            let valign_offset = vertical_align_offset(cstyle.vertical_align, cell_h, placed.outer_height, baseline_fallback);
            let border = if collapse {
                resolve_cell_border(dom, cell, r, &rows, &owner, col_count, style.border)
            } else {
                cstyle.border
            };
            view.get_mut(placed.view_id).bounds.x = cx;
            view.get_mut(placed.view_id).bounds.y = cy + valign_offset;
            view.get_mut(placed.view_id).meta =
                ViewMeta::Cell { row: r, column: cell.col, row_span: cell.row_span as u32, col_span: cell.col_span as u32, border };
            view.append_child(view_id, placed.view_id);
        }
    }

    if let Some(&cap) = captions.iter().find(|c| dom.style(**c).caption_side == CaptionSide::Bottom) {
        let cap_cb = ContainingBlock::definite(final_table_width, 0.0);
        let mut cap_bfc = BfcContext::new(final_table_width);
        let placed = crate::layout_in_flow(dom, cap, view, ctx, cap_cb, &mut cap_bfc, (content_origin.0, content_origin.1 + table_content_height), depth + 1)?;
        view.get_mut(placed.view_id).bounds.x = 0.0;
        view.get_mut(placed.view_id).bounds.y = table_content_height;
        view.append_child(view_id, placed.view_id);
    }

    let final_height = match resolve(&style.height, &lctx, Axis::Vertical) {
        Resolved::Px(h) => declared_to_content(h, style.box_sizing, pad_border_v),
        _ => table_content_height,
    };
    let final_height = clamp_content_size(
        final_height, &style.min_height, &style.max_height, style.box_sizing, pad_border_v, &lctx, Axis::Vertical,
    );

    view.get_mut(view_id).content_width = final_table_width;
    view.get_mut(view_id).content_height = final_height;
    view.get_mut(view_id).bounds.width = final_table_width + pad_border_h;
    view.get_mut(view_id).bounds.height = final_height + pad_border_v;
    view.get_mut(view_id).meta = ViewMeta::Table { column_widths: col_widths.clone(), row_heights: row_heights.clone() };

    trace!("table {:?}: {}x{} ({} cols, {} rows)", node, final_table_width, final_height, col_count, rows.len());
    debug!("table {:?} placed {} rows", node, rows.len());

    Ok(FlowBox {
        view_id,
        outer_width: final_table_width + pad_border_h + metrics.margin.horizontal(),
        outer_height: final_height + pad_border_v + metrics.margin.vertical(),
        margin_top: metrics.margin.top,
        margin_bottom: metrics.margin.bottom,
    })
}

/// `vertical-align` within a cell (§4.9: baseline degrades to bottom when
/// the cell has no content to establish a baseline from).
fn vertical_align_offset(align: VerticalAlign, cell_h: f32, content_h: f32, empty: bool) -> f32 {
    let free = (cell_h - content_h).max(0.0);
    match align {
        VerticalAlign::Top | VerticalAlign::TextTop => 0.0,
        VerticalAlign::Bottom | VerticalAlign::TextBottom => free,
        VerticalAlign::Middle => free / 2.0,
        VerticalAlign::Baseline => {
            if empty {
                free
            } else {
                0.0
            }
        }
    }
}

/// Resolves the effective border for one collapsed edge shared by two
/// adjacent cell/table borders per CSS 2.1 §17.6.2: `hidden` always wins,
/// otherwise widest wins, ties broken by style priority
/// (`BorderStyle`'s declaration order), remaining ties won by the
/// top/left-owning edge.
fn resolve_collapsed_border(a: BorderSide, a_is_top_or_left: bool, b: BorderSide) -> BorderSide {
    if a.style == BorderStyle::Hidden {
        return a;
    }
    if b.style == BorderStyle::Hidden {
        return b;
    }
    if a.width != b.width {
        return if a.width > b.width { a } else { b };
    }
    if a.style != b.style {
        return if a.style > b.style { a } else { b };
    }
    if a_is_top_or_left {
        a
    } else {
        b
    }
}

/// Resolves all four edges of one cell under `border-collapse: collapse`,
/// walking `owner` to find the adjoining cell at each edge and falling back
/// to the table's own border at the table's outer edges (§4.9, §17.6.2).
#[allow(clippy::too_many_arguments)]
fn resolve_cell_border<D: Document>(
    dom: &D,
    cell: &Cell,
    row_idx: usize,
    rows: &[Row],
    owner: &HashMap<(usize, usize), (usize, usize)>,
    col_count: usize,
    table_border: Edges<BorderSide>,
) -> Edges<BorderSide> {
    let own = dom.style(cell.node).border;
    let neighbor_edge = |pos: (usize, usize)| owner.get(&pos).map(|&(r, c)| dom.style(rows[r].cells[c].node).border);

    let top = if row_idx > 0 {
        match neighbor_edge((cell.col, row_idx - 1)) {
            Some(n) => resolve_collapsed_border(own.top, true, n.bottom),
            None => resolve_collapsed_border(own.top, true, table_border.top),
        }
    } else {
        resolve_collapsed_border(own.top, true, table_border.top)
    };

    let left = if cell.col > 0 {
        match neighbor_edge((cell.col - 1, row_idx)) {
            Some(n) => resolve_collapsed_border(own.left, true, n.right),
            None => resolve_collapsed_border(own.left, true, table_border.left),
        }
    } else {
        resolve_collapsed_border(own.left, true, table_border.left)
    };

    let bottom_row = row_idx + cell.row_span;
    let bottom = if bottom_row < rows.len() {
        match neighbor_edge((cell.col, bottom_row)) {
            Some(n) => resolve_collapsed_border(own.bottom, false, n.top),
            None => resolve_collapsed_border(own.bottom, true, table_border.bottom),
        }
    } else {
        resolve_collapsed_border(own.bottom, true, table_border.bottom)
    };

    let right_col = cell.col + cell.col_span;
    let right = if right_col < col_count {
        match neighbor_edge((right_col, row_idx)) {
            Some(n) => resolve_collapsed_border(own.right, false, n.left),
            None => resolve_collapsed_border(own.right, true, table_border.right),
        }
    } else {
        resolve_collapsed_border(own.right, true, table_border.right)
    };

    Edges { top, right, bottom, left }
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

    fn cell() -> ComputedStyle {
        let mut s = ComputedStyle::default();
        s.display = Display { outer: DisplayOuter::Block, inner: DisplayInner::TableCell };
        s
    }

    fn row() -> ComputedStyle {
        let mut s = ComputedStyle::default();
        s.display = Display { outer: DisplayOuter::Block, inner: DisplayInner::TableRow };
        s
    }

    #[test]
    fn two_empty_cells_share_the_table_width() {
        let mut table = ComputedStyle::default();
        table.display = Display { outer: DisplayOuter::Block, inner: DisplayInner::Table };

        let doc = FixtureDocument::from_root(
            FixtureNode::element("table").with_style(table).with_child(
                FixtureNode::element("tr")
                    .with_style(row())
                    .with_child(FixtureNode::element("td").with_style(cell()))
                    .with_child(FixtureNode::element("td").with_style(cell())),
            ),
        );
        let shaper = SimpleTextShaper::new();
        let ctx = ctx_for(&shaper);
        let mut view: Arena<ViewNode> = Arena::new();
        let mut bfc = BfcContext::new(800.0);
        let fb = layout_table(
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
        let col_widths = match &view.get(fb.view_id).meta {
            ViewMeta::Table { column_widths, .. } => column_widths.clone(),
            _ => panic!("expected table meta"),
        };
        assert_eq!(col_widths.len(), 2);
        assert!((col_widths[0] - col_widths[1]).abs() < 1.0);
    }

    #[test]
    fn hidden_border_always_wins_the_collapse() {
        let hidden = BorderSide { width: 1.0, style: BorderStyle::Hidden };
        let thick_solid = BorderSide { width: 10.0, style: BorderStyle::Solid };
        assert_eq!(resolve_collapsed_border(hidden, true, thick_solid), hidden);
        assert_eq!(resolve_collapsed_border(thick_solid, false, hidden), hidden);
    }

    #[test]
    fn wider_border_wins_the_collapse_over_style_priority() {
        let thin_double = BorderSide { width: 1.0, style: BorderStyle::Double };
        let thick_dotted = BorderSide { width: 5.0, style: BorderStyle::Dotted };
        assert_eq!(resolve_collapsed_border(thin_double, true, thick_dotted), thick_dotted);
    }

    #[test]
    fn collapsed_cell_stores_the_winning_shared_border() {
        let mut table = ComputedStyle::default();
        table.display = Display { outer: DisplayOuter::Block, inner: DisplayInner::Table };
        table.border_collapse = webbox_css::style::BorderCollapse::Collapse;

        let thin = BorderSide { width: 1.0, style: BorderStyle::Solid };
        let thick = BorderSide { width: 5.0, style: BorderStyle::Solid };

        let mut left_cell = cell();
        left_cell.border.right = thin;
        let mut right_cell = cell();
        right_cell.border.left = thick;

        let doc = FixtureDocument::from_root(
            FixtureNode::element("table").with_style(table).with_child(
                FixtureNode::element("tr")
                    .with_style(row())
                    .with_child(FixtureNode::element("td").with_style(left_cell))
                    .with_child(FixtureNode::element("td").with_style(right_cell)),
            ),
        );
        let shaper = SimpleTextShaper::new();
        let ctx = ctx_for(&shaper);
        let mut view: Arena<ViewNode> = Arena::new();
        let mut bfc = BfcContext::new(800.0);
        let fb = layout_table(
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
        let cells: Vec<NodeId> = view.children(fb.view_id).collect();
        let left_border = match &view.get(cells[0]).meta {
            ViewMeta::Cell { border, .. } => border.clone(),
            _ => panic!("expected cell meta"),
        };
        let right_border = match &view.get(cells[1]).meta {
            ViewMeta::Cell { border, .. } => border.clone(),
            _ => panic!("expected cell meta"),
        };
        assert_eq!(left_border.right, thick);
        assert_eq!(right_border.left, thick);
    }
}
