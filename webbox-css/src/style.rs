//! The frozen per-element computed style record (§3) and the enums its
//! fields draw from. Grounded on azul-layout's `style.rs` `Style` struct,
//! generalised from azul's flexbox-only fields to the full property set
//! this engine's formatting contexts need.

use crate::values::CssValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayOuter {
    Block,
    Inline,
    RunIn,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayInner {
    Flow,
    FlowRoot,
    Flex,
    Grid,
    Table,
    TableRowGroup,
    TableRow,
    TableCell,
    TableCaption,
    TableColumn,
    TableColumnGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    pub outer: DisplayOuter,
    pub inner: DisplayInner,
}

impl Display {
    pub const BLOCK: Display = Display { outer: DisplayOuter::Block, inner: DisplayInner::Flow };
    pub const INLINE: Display = Display { outer: DisplayOuter::Inline, inner: DisplayInner::Flow };
    pub const NONE: Display = Display { outer: DisplayOuter::None, inner: DisplayInner::Flow };

    pub fn is_none(&self) -> bool {
        self.outer == DisplayOuter::None
    }
}

impl Default for Display {
    fn default() -> Self {
        // CSS's literal initial value for `display` is `inline`, but this
        // fixture format already stands in for a cascade result (no UA
        // stylesheet step runs before `ComputedStyle` is constructed), and
        // a bare `FixtureNode::element("div")` is meant to behave like the
        // generic block-level tag it names. Default to block so "no style
        // given" reads as the common case, not the literal CSS edge case.
        Display::BLOCK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Default for Position {
    fn default() -> Self {
        Position::Static
    }
}

impl Position {
    pub fn is_positioned(&self) -> bool {
        !matches!(self, Position::Static)
    }
    pub fn is_out_of_flow(&self) -> bool {
        matches!(self, Position::Absolute | Position::Fixed)
    }
    pub fn establishes_containing_block(&self) -> bool {
        matches!(self, Position::Relative | Position::Absolute | Position::Fixed | Position::Sticky)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxSizing {
    ContentBox,
    BorderBox,
}

impl Default for BoxSizing {
    fn default() -> Self {
        BoxSizing::ContentBox
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Float {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Clear {
    #[default]
    None,
    Left,
    Right,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
    Auto,
}

impl Overflow {
    pub fn establishes_bfc(&self) -> bool {
        !matches!(self, Overflow::Visible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WhiteSpace {
    #[default]
    Normal,
    Pre,
    PreWrap,
    PreLine,
    NoWrap,
}

impl WhiteSpace {
    pub fn collapses_whitespace(&self) -> bool {
        matches!(self, WhiteSpace::Normal | WhiteSpace::NoWrap)
    }
    pub fn wraps(&self) -> bool {
        matches!(self, WhiteSpace::Normal | WhiteSpace::PreWrap | WhiteSpace::PreLine)
    }
    pub fn preserves_newlines(&self) -> bool {
        matches!(self, WhiteSpace::Pre | WhiteSpace::PreWrap | WhiteSpace::PreLine)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Right,
    Center,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VerticalAlign {
    #[default]
    Baseline,
    Top,
    Middle,
    Bottom,
    TextTop,
    TextBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    pub fn is_row(&self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }
    pub fn is_reversed(&self) -> bool {
        matches!(self, FlexDirection::RowReverse | FlexDirection::ColumnReverse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AlignItems {
    #[default]
    Stretch,
    FlexStart,
    FlexEnd,
    Center,
    Baseline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AlignContent {
    #[default]
    Stretch,
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
}

/// `align-self`/`justify-self` add `Auto`, which resolves against the
/// parent's `align-items`/`justify-items` (azul-layout `style.rs`
/// `align_self` method).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AlignSelf {
    #[default]
    Auto,
    Stretch,
    FlexStart,
    FlexEnd,
    Center,
    Baseline,
}

impl AlignSelf {
    pub fn resolve(self, parent_align_items: AlignItems) -> AlignItems {
        match self {
            AlignSelf::Auto => parent_align_items,
            AlignSelf::Stretch => AlignItems::Stretch,
            AlignSelf::FlexStart => AlignItems::FlexStart,
            AlignSelf::FlexEnd => AlignItems::FlexEnd,
            AlignSelf::Center => AlignItems::Center,
            AlignSelf::Baseline => AlignItems::Baseline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GridAutoFlow {
    #[default]
    Row,
    Column,
    RowDense,
    ColumnDense,
}

impl GridAutoFlow {
    pub fn is_dense(&self) -> bool {
        matches!(self, GridAutoFlow::RowDense | GridAutoFlow::ColumnDense)
    }
    pub fn is_column(&self) -> bool {
        matches!(self, GridAutoFlow::Column | GridAutoFlow::ColumnDense)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TableLayoutMode {
    #[default]
    Auto,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BorderCollapse {
    #[default]
    Separate,
    Collapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EmptyCells {
    #[default]
    Show,
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CaptionSide {
    #[default]
    Top,
    Bottom,
}

/// Border style priority order per CSS 2.1 §17.6.2, used by border-collapse
/// resolution (§4.9). Declaration order of this enum IS the tie-break
/// table: later variants win when widths are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Inset,
    Groove,
    Outset,
    Ridge,
    Dotted,
    Dashed,
    Solid,
    Double,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderSide {
    pub width: f32,
    pub style: BorderStyle,
}

impl Default for BorderSide {
    fn default() -> Self {
        BorderSide { width: 0.0, style: BorderStyle::None }
    }
}

/// Box-model edges expressed as unresolved CSS values (margin/padding) or
/// `CssValue` offsets (inset properties). Border widths are plain lengths —
/// CSS does not allow percentages there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Edges<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Clone> Edges<T> {
    pub fn new(top: T, right: T, bottom: T, left: T) -> Self {
        Edges { top, right, bottom, left }
    }
    pub fn all(v: T) -> Self {
        Edges { top: v.clone(), right: v.clone(), bottom: v.clone(), left: v }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontWeight(pub u16);

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight(400)
    }
}

/// `line-height` is a number (unitless multiplier), a length, or `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum LineHeight {
    #[default]
    Normal,
    Number(f32),
    Length(CssValue),
}

/// A grid line placement: either a fixed line number, a named line, `span
/// N`, or `auto`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum GridLine {
    #[default]
    Auto,
    Line(i32),
    Span(u32),
    Named(String),
}

/// One track sizing function: a fixed length, a percentage, an `fr` share,
/// an intrinsic keyword, or `minmax(min, max)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackSize {
    Length(CssValue),
    Fr(f32),
    MinContent,
    MaxContent,
    Auto,
    MinMax(Box<TrackSize>, Box<TrackSize>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridTemplateComponent {
    Track(TrackSize),
    /// `repeat(N, tracks)` or `repeat(auto-fill|auto-fit, tracks)`.
    Repeat { count: RepeatCount, tracks: Vec<TrackSize> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RepeatCount {
    Count(u32),
    AutoFill,
    AutoFit,
}

/// The per-element frozen computed-style record (§3). Every field has a
/// CSS initial value via `Default`, so "missing contract data" (§7) never
/// needs `Option` plumbing through the algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedStyle {
    pub display: Display,
    pub position: Position,
    pub inset: Edges<CssValue>,

    pub width: CssValue,
    pub height: CssValue,
    pub min_width: CssValue,
    pub max_width: CssValue,
    pub min_height: CssValue,
    pub max_height: CssValue,
    pub margin: Edges<CssValue>,
    pub padding: Edges<CssValue>,
    pub border: Edges<BorderSide>,
    pub box_sizing: BoxSizing,

    pub line_height: LineHeight,
    pub vertical_align: VerticalAlign,
    pub text_align: TextAlign,
    pub white_space: WhiteSpace,
    pub word_break_anywhere: bool,
    pub tab_size: f32,
    pub text_indent: CssValue,

    pub font_family: Vec<String>,
    pub font_size_px: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub font_stretch_percent: f32,

    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_content: AlignContent,
    pub row_gap: CssValue,
    pub column_gap: CssValue,
    pub order: i32,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub flex_basis: CssValue,
    pub align_self: AlignSelf,

    pub grid_template_rows: Vec<GridTemplateComponent>,
    pub grid_template_columns: Vec<GridTemplateComponent>,
    pub grid_template_areas: Vec<Vec<String>>,
    pub grid_auto_rows: Vec<TrackSize>,
    pub grid_auto_columns: Vec<TrackSize>,
    pub grid_auto_flow: GridAutoFlow,
    pub grid_row_start: GridLine,
    pub grid_row_end: GridLine,
    pub grid_column_start: GridLine,
    pub grid_column_end: GridLine,
    pub grid_area_name: Option<String>,
    pub justify_self: AlignSelf,

    pub table_layout: TableLayoutMode,
    pub border_collapse: BorderCollapse,
    pub border_spacing: (f32, f32),
    pub empty_cells: EmptyCells,
    pub caption_side: CaptionSide,
    pub row_span: u32,
    pub col_span: u32,

    pub float: Float,
    pub clear: Clear,

    pub overflow_x: Overflow,
    pub overflow_y: Overflow,

    pub z_index: Option<i32>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        ComputedStyle {
            display: Display::default(),
            position: Position::default(),
            inset: Edges::all(CssValue::Auto),

            width: CssValue::Auto,
            height: CssValue::Auto,
            min_width: CssValue::Auto,
            max_width: CssValue::Auto,
            min_height: CssValue::Auto,
            max_height: CssValue::Auto,
            margin: Edges::all(CssValue::px(0.0)),
            padding: Edges::all(CssValue::px(0.0)),
            border: Edges::default(),
            box_sizing: BoxSizing::default(),

            line_height: LineHeight::default(),
            vertical_align: VerticalAlign::default(),
            text_align: TextAlign::default(),
            white_space: WhiteSpace::default(),
            word_break_anywhere: false,
            tab_size: 8.0,
            text_indent: CssValue::px(0.0),

            font_family: vec!["serif".to_string()],
            font_size_px: 16.0,
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            font_stretch_percent: 100.0,

            flex_direction: FlexDirection::default(),
            flex_wrap: FlexWrap::default(),
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            align_content: AlignContent::default(),
            row_gap: CssValue::px(0.0),
            column_gap: CssValue::px(0.0),
            order: 0,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: CssValue::Auto,
            align_self: AlignSelf::default(),

            grid_template_rows: Vec::new(),
            grid_template_columns: Vec::new(),
            grid_template_areas: Vec::new(),
            grid_auto_rows: vec![TrackSize::Auto],
            grid_auto_columns: vec![TrackSize::Auto],
            grid_auto_flow: GridAutoFlow::default(),
            grid_row_start: GridLine::default(),
            grid_row_end: GridLine::default(),
            grid_column_start: GridLine::default(),
            grid_column_end: GridLine::default(),
            grid_area_name: None,
            justify_self: AlignSelf::default(),

            table_layout: TableLayoutMode::default(),
            border_collapse: BorderCollapse::default(),
            border_spacing: (0.0, 0.0),
            empty_cells: EmptyCells::default(),
            caption_side: CaptionSide::default(),
            row_span: 1,
            col_span: 1,

            float: Float::default(),
            clear: Clear::default(),

            overflow_x: Overflow::default(),
            overflow_y: Overflow::default(),

            z_index: None,
        }
    }
}

impl ComputedStyle {
    pub fn establishes_new_bfc(&self) -> bool {
        self.float != Float::None
            || self.position == Position::Absolute
            || self.position == Position::Fixed
            || self.overflow_x.establishes_bfc()
            || self.overflow_y.establishes_bfc()
            || self.display.inner == DisplayInner::FlowRoot
            || matches!(
                self.display.inner,
                DisplayInner::Flex | DisplayInner::Grid | DisplayInner::Table
            )
    }
}
