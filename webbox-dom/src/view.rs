//! The view tree: layout's output (§3 "View tree"). An arena of positioned,
//! sized boxes — mutable while one layout pass builds it, frozen once the
//! pass returns. Shaped after the teacher's `PositionedRectangle` /
//! `ResolvedOffsets` (`azul-core::ui_solver`), generalised from "one kind of
//! rectangle" to the seven node kinds §3 names.

use serde::{Deserialize, Serialize};

use webbox_css::style::{BorderSide, Edges as StyleEdges};

use crate::arena::{Arena, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn zero() -> Self {
        Rect::default()
    }
}

/// Resolved margin/padding/border on one box, in CSS pixels. Field order
/// matches the JSON schema's `[top, right, bottom, left]` convention (§6).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Offsets {
    pub const fn zero() -> Self {
        Offsets { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 }
    }
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
    pub fn as_array(&self) -> [f32; 4] {
        [self.top, self.right, self.bottom, self.left]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    Block,
    Inline,
    Text,
    Flex,
    Grid,
    Table,
    Cell,
}

impl ViewKind {
    pub fn as_json_type(&self) -> &'static str {
        match self {
            ViewKind::Block => "block",
            ViewKind::Inline => "inline",
            ViewKind::Text => "text",
            ViewKind::Flex => "flex",
            ViewKind::Grid => "grid",
            ViewKind::Table => "table",
            ViewKind::Cell => "cell",
        }
    }
}

/// Format-specific metadata carried by `ViewTable`/`ViewTableCell`/
/// `ViewFlex`/`ViewGrid` nodes (§3), kept as a side enum rather than four
/// separate node structs so the arena stays one homogeneous `Vec<ViewNode>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum ViewMeta {
    #[default]
    None,
    Flex {
        /// Number of items assigned to each flex line, in line order.
        line_item_counts: Vec<usize>,
    },
    Grid {
        /// Resolved track sizes in CSS pixels, column axis then row axis.
        column_tracks: Vec<f32>,
        row_tracks: Vec<f32>,
    },
    Table {
        column_widths: Vec<f32>,
        row_heights: Vec<f32>,
    },
    Cell {
        row: usize,
        column: usize,
        row_span: u32,
        col_span: u32,
        /// Per-edge border a renderer should paint at this cell under
        /// `border-collapse: collapse`; the cell's own border unchanged
        /// otherwise.
        border: StyleEdges<BorderSide>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewNode {
    pub kind: ViewKind,
    pub tag: Option<String>,
    /// Index of the originating DOM node, if any (anonymous boxes have
    /// none).
    pub dom_node: Option<NodeId>,
    /// Position relative to the parent's content-box origin, plus the
    /// outer (margin-box-exclusive, border-box-inclusive) size.
    pub bounds: Rect,
    pub content_width: f32,
    pub content_height: f32,
    pub padding: Offsets,
    pub border: Offsets,
    pub margin: Offsets,
    pub text: Option<String>,
    pub meta: ViewMeta,
}

impl ViewNode {
    pub fn new(kind: ViewKind) -> Self {
        ViewNode {
            kind,
            tag: None,
            dom_node: None,
            bounds: Rect::zero(),
            content_width: 0.0,
            content_height: 0.0,
            padding: Offsets::zero(),
            border: Offsets::zero(),
            margin: Offsets::zero(),
            text: None,
            meta: ViewMeta::None,
        }
    }
}

/// The frozen (after one pass) output tree. Built in an `Arena<ViewNode>` —
/// the same stable-index ownership strategy as the DOM fixture tree (§9).
pub struct ViewTree {
    pub arena: Arena<ViewNode>,
    pub root: NodeId,
    /// `given_scale * pixel_ratio` (§6 input #5), recorded for the renderer;
    /// layout itself never consults this value.
    pub scale: f32,
}

impl ViewTree {
    pub fn new(arena: Arena<ViewNode>, root: NodeId, scale: f32) -> Self {
        ViewTree { arena, root, scale }
    }

    pub fn get(&self, id: NodeId) -> &ViewNode {
        self.arena.get(id)
    }
}
