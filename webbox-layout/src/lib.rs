//! `webbox-layout`: the layout solver for the webbox browser-class
//! rendering core. Walks a [`Document`] and produces a [`ViewTree`] (§2
//! overview, §4.1 orchestrator).
//!
//! The module layout mirrors the formatting contexts a browser layout
//! engine actually has: a shared box-model/length/intrinsic-size substrate
//! (`boxmodel`, `length`, `intrinsic`, `anon`), one module per formatting
//! context (`block`, `inline`, `flex`, `grid`, `table`, `positioned`), and
//! the dispatcher (this module) that ties them together.

mod anon;
mod block;
mod boxmodel;
mod context;
mod error;
mod flex;
mod grid;
mod inline;
mod intrinsic;
mod length;
mod positioned;
mod table;

#[cfg(feature = "json")]
pub mod json;

use webbox_css::style::DisplayInner;
use webbox_dom::{Arena, Document, NodeId, ViewNode, ViewTree};

pub use context::{BfcContext, ContainingBlock, DocumentScale, FlowBox, LayoutContext, LayoutOptions, Viewport};
pub use error::{LayoutError, LayoutResult};

/// The closed set of formatting contexts the orchestrator dispatches to
/// (§9 "closed `Formatter` enum" design note — matches the teacher's
/// dispatch-by-enum idiom rather than a trait-object formatter registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Formatter {
    Block,
    Flex,
    Grid,
    Table,
}

fn classify(inner: DisplayInner) -> Formatter {
    match inner {
        DisplayInner::Flex => Formatter::Flex,
        DisplayInner::Grid => Formatter::Grid,
        DisplayInner::Table => Formatter::Table,
        _ => Formatter::Block,
    }
}

/// Lays out one in-flow element, dispatching on its `(outer, inner)`
/// display pair's inner value to the matching formatting context. Every
/// formatting module (`block`, `flex`, `grid`, `table`, and `inline` for
/// its atomic-inline children) calls back into this function for each
/// in-flow child rather than calling a sibling module directly, so a
/// `display: grid` box nested inside a flex item (or vice versa) resolves
/// correctly without every module needing to know about every other one.
#[allow(clippy::too_many_arguments)]
pub fn layout_in_flow<D: Document>(
    dom: &D,
    node: NodeId,
    view: &mut Arena<ViewNode>,
    ctx: &LayoutContext,
    cb: ContainingBlock,
    bfc: &mut BfcContext,
    root_offset: (f32, f32),
    depth: u32,
) -> LayoutResult<FlowBox> {
    if depth > ctx.options.max_depth {
        return Err(LayoutError::DepthExceeded { limit: ctx.options.max_depth });
    }
    let style = dom.style(node);
    match classify(style.display.inner) {
        Formatter::Flex => flex::layout_flex(dom, node, view, ctx, cb, bfc, root_offset, depth),
        Formatter::Grid => grid::layout_grid(dom, node, view, ctx, cb, bfc, root_offset, depth),
        Formatter::Table => table::layout_table(dom, node, view, ctx, cb, bfc, root_offset, depth),
        Formatter::Block => block::layout_block(dom, node, view, ctx, cb, bfc, root_offset, depth),
    }
}

/// Top-level entry point (§2, §6). Initialises the root block-formatting
/// context, walks `dom` from its root, and returns the resulting view tree
/// or a `LayoutError` for a programmer-error contract violation (§7
/// addendum) — callers that only care about the "no partial layout for bad
/// input" policy should use [`layout_or_truncated`] instead.
pub fn layout<D: Document>(
    dom: &D,
    viewport: Viewport,
    scale: DocumentScale,
    text_shaper: &dyn webbox_text::TextShaper,
    options: LayoutOptions,
) -> LayoutResult<ViewTree> {
    if viewport.width_css_px <= 0.0 || viewport.height_css_px <= 0.0 {
        return Err(LayoutError::NoViewport);
    }
    let ctx = LayoutContext::new(text_shaper, viewport, options);
    let mut view: Arena<ViewNode> = Arena::new();
    let cb = ContainingBlock::definite(viewport.width_css_px, viewport.height_css_px);
    let mut bfc = BfcContext::new(viewport.width_css_px);
    let root_box = layout_in_flow(dom, dom.root(), &mut view, &ctx, cb, &mut bfc, (0.0, 0.0), 0)?;

    // The document root's auto height is ordinarily just its content height
    // (§4.6), but the root box doubles as the initial containing block's
    // canvas: an empty or short document still covers the full viewport
    // rather than collapsing to its content (Open Question resolution,
    // `DESIGN.md`).
    let root_view = view.get_mut(root_box.view_id);
    if root_view.bounds.height < viewport.height_css_px {
        let diff = viewport.height_css_px - root_view.bounds.height;
        root_view.bounds.height += diff;
        root_view.content_height += diff;
    }

    Ok(ViewTree::new(view, root_box.view_id, scale.combined()))
}

/// A `layout()` that never fails: a `DepthExceeded` violation degrades to
/// an empty viewport-sized root box rather than propagating, matching the
/// "no partial layout, no user-visible error channel" policy §7 applies to
/// malformed *input* — a pathologically deep tree is treated the same way
/// for callers that don't want to handle the `Result`.
pub fn layout_or_truncated<D: Document>(
    dom: &D,
    viewport: Viewport,
    scale: DocumentScale,
    text_shaper: &dyn webbox_text::TextShaper,
    options: LayoutOptions,
) -> ViewTree {
    match layout(dom, viewport, scale, text_shaper, options) {
        Ok(tree) => tree,
        Err(_) => {
            let mut view: Arena<ViewNode> = Arena::new();
            let root = view.alloc(ViewNode::new(webbox_dom::ViewKind::Block));
            {
                let node = view.get_mut(root);
                node.bounds = webbox_dom::Rect { x: 0.0, y: 0.0, width: viewport.width_css_px.max(0.0), height: viewport.height_css_px.max(0.0) };
                node.content_width = viewport.width_css_px.max(0.0);
                node.content_height = viewport.height_css_px.max(0.0);
            }
            ViewTree::new(view, root, scale.combined())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webbox_dom::fixture::{FixtureDocument, FixtureNode};
    use webbox_text::SimpleTextShaper;

    #[test]
    fn layout_root_covers_the_viewport() {
        let doc = FixtureDocument::from_root(FixtureNode::element("html"));
        let shaper = SimpleTextShaper::new();
        let tree = layout(&doc, Viewport::default(), DocumentScale::default(), &shaper, LayoutOptions::default()).unwrap();
        let root = tree.get(tree.root);
        assert_eq!(root.content_width, 800.0);
        assert_eq!(tree.scale, 1.0);
    }

    #[test]
    fn layout_rejects_a_zero_sized_viewport() {
        let doc = FixtureDocument::from_root(FixtureNode::element("html"));
        let shaper = SimpleTextShaper::new();
        let viewport = Viewport { width_css_px: 0.0, height_css_px: 0.0, root_font_size_px: 16.0 };
        let result = layout(&doc, viewport, DocumentScale::default(), &shaper, LayoutOptions::default());
        assert!(matches!(result, Err(LayoutError::NoViewport)));
    }
}
