//! Anonymous box generation for mixed block/inline content (§4.5/§4.6
//! addendum in `SPEC_FULL.md`; CSS 2.1 §9.2.1.1). Grounded on the teacher's
//! `AnonDom`/`AnonNode` construction (`azul-layout/anon.rs`): a block
//! container's children are partitioned into maximal runs of the same
//! "blockness", and inline runs are wrapped in a synthetic block box with
//! no DOM back-reference before line-breaking runs.

use webbox_css::style::{DisplayOuter, Float};
use webbox_dom::{Document, NodeId, NodeKind};

/// One maximal run of same-blockness children, in document order.
pub enum ChildRun {
    /// A single in-flow block-level child, laid out directly.
    Block(NodeId),
    /// A run of inline-level children (including text nodes), to be wrapped
    /// in an anonymous block box and handed to the inline line builder.
    InlineRun(Vec<NodeId>),
    /// An out-of-flow child (float or absolutely/fixed positioned):
    /// excluded from normal-flow placement, handled by §4.6.2 / §4.10.
    OutOfFlow(NodeId),
}

fn is_in_flow_block<D: Document>(dom: &D, node: NodeId) -> bool {
    if dom.kind(node) != NodeKind::Element {
        return false;
    }
    let style = dom.style(node);
    if style.display.is_none() || style.position.is_out_of_flow() || style.float != Float::None {
        return false;
    }
    style.display.outer == DisplayOuter::Block
}

fn is_out_of_flow<D: Document>(dom: &D, node: NodeId) -> bool {
    if dom.kind(node) != NodeKind::Element {
        return false;
    }
    let style = dom.style(node);
    !style.display.is_none() && (style.position.is_out_of_flow() || style.float != Float::None)
}

/// Partitions `node`'s children into block runs, inline runs, and
/// out-of-flow children, preserving document order within each category as
/// required by §5's DOM-order determinism guarantee.
pub fn partition_children<D: Document>(dom: &D, node: NodeId) -> Vec<ChildRun> {
    let mut runs = Vec::new();
    let mut current_inline: Vec<NodeId> = Vec::new();

    for child in dom.children(node) {
        if dom.kind(child) == NodeKind::Element && dom.style(child).display.is_none() {
            continue;
        }
        if is_out_of_flow(dom, child) {
            runs.push(ChildRun::OutOfFlow(child));
            continue;
        }
        if is_in_flow_block(dom, child) {
            if !current_inline.is_empty() {
                runs.push(ChildRun::InlineRun(std::mem::take(&mut current_inline)));
            }
            runs.push(ChildRun::Block(child));
        } else {
            current_inline.push(child);
        }
    }
    if !current_inline.is_empty() {
        runs.push(ChildRun::InlineRun(current_inline));
    }
    runs
}

/// True when `node`'s in-flow children are a mix of block-level and
/// inline-level (the case that needs anonymous wrapping at all).
pub fn has_mixed_content<D: Document>(dom: &D, node: NodeId) -> bool {
    let runs = partition_children(dom, node);
    let block_runs = runs.iter().filter(|r| matches!(r, ChildRun::Block(_))).count();
    let inline_runs = runs.iter().filter(|r| matches!(r, ChildRun::InlineRun(_))).count();
    block_runs > 0 && inline_runs > 0
}
