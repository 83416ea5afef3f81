//! Conformance fixtures for the six end-to-end scenarios the core layout
//! engine is required to reproduce. Each test builds the scenario's fixture
//! document directly (no HTML/CSS parsing in this workspace — see
//! `webbox_dom::fixture`) and checks the expected view-tree geometry.

use webbox_css::style::{
    ComputedStyle, Display, DisplayInner, DisplayOuter, GridTemplateComponent, Overflow, Position,
    TrackSize,
};
use webbox_css::values::CssValue;
use webbox_dom::fixture::{FixtureDocument, FixtureNode};
use webbox_layout::{layout, DocumentScale, LayoutOptions, Viewport};
use webbox_text::SimpleTextShaper;

fn run(doc: &FixtureDocument, viewport: Viewport) -> webbox_dom::ViewTree {
    let shaper = SimpleTextShaper::new();
    layout(doc, viewport, DocumentScale::default(), &shaper, LayoutOptions::default()).unwrap()
}

/// E1 — a single bare `<div>` inside an unstyled `<body>` inside `<html>`:
/// both inner boxes are auto sized and only the outermost root covers the
/// full viewport.
#[test]
fn e1_single_block_no_styles() {
    let doc = FixtureDocument::from_root(
        FixtureNode::element("html").with_child(FixtureNode::element("body").with_child(FixtureNode::element("div"))),
    );
    let tree = run(&doc, Viewport { width_css_px: 800.0, height_css_px: 600.0, root_font_size_px: 16.0 });
    let root = tree.get(tree.root);
    assert_eq!((root.bounds.x, root.bounds.y, root.bounds.width, root.bounds.height), (0.0, 0.0, 800.0, 600.0));

    let body_id = tree.arena.children(tree.root).next().unwrap();
    let body = tree.get(body_id);
    assert_eq!(body.bounds.x, 0.0);
    assert_eq!(body.bounds.y, 0.0);
    assert_eq!(body.content_width, 800.0);
    assert_eq!(body.content_height, 0.0);

    let div_id = tree.arena.children(body_id).next().unwrap();
    let div = tree.get(div_id);
    assert_eq!(div.content_width, 800.0);
    assert_eq!(div.content_height, 0.0);
}

/// E2 — a 300px-wide flex row, `gap: 10px`, three items sized `50px`,
/// `flex:1`, `flex:2`. Free space after the fixed item and two gaps is
/// distributed 1:2 between the grow items.
#[test]
fn e2_flex_row_distributes_free_space() {
    let mut container = ComputedStyle::default();
    container.display = Display { outer: DisplayOuter::Block, inner: DisplayInner::Flex };
    container.width = CssValue::px(300.0);
    container.column_gap = CssValue::px(10.0);

    let mut item1 = ComputedStyle::default();
    item1.width = CssValue::px(50.0);

    let mut item2 = ComputedStyle::default();
    item2.flex_grow = 1.0;
    item2.flex_basis = CssValue::px(0.0);
    item2.width = CssValue::Auto;

    let mut item3 = ComputedStyle::default();
    item3.flex_grow = 2.0;
    item3.flex_basis = CssValue::px(0.0);
    item3.width = CssValue::Auto;

    let doc = FixtureDocument::from_root(
        FixtureNode::element("div")
            .with_style(container)
            .with_child(FixtureNode::element("div").with_style(item1))
            .with_child(FixtureNode::element("div").with_style(item2))
            .with_child(FixtureNode::element("div").with_style(item3)),
    );
    let tree = run(&doc, Viewport::default());
    let flex_id = tree.root;
    let kids: Vec<_> = tree.arena.children(flex_id).collect();
    assert_eq!(kids.len(), 3);

    let w1 = tree.get(kids[0]).bounds.width;
    let w2 = tree.get(kids[1]).bounds.width;
    let w3 = tree.get(kids[2]).bounds.width;
    assert!((w1 - 50.0).abs() < 0.5);
    assert!((w2 - 76.667).abs() < 0.5);
    assert!((w3 - 153.333).abs() < 0.5);

    let x1 = tree.get(kids[0]).bounds.x;
    let x2 = tree.get(kids[1]).bounds.x;
    let x3 = tree.get(kids[2]).bounds.x;
    assert!((x1 - 0.0).abs() < 0.5);
    assert!((x2 - 60.0).abs() < 0.5);
    assert!((x3 - (60.0 + w2 + 10.0)).abs() < 0.5);
}

/// E3 — a 2x2 named-area grid: `head head` / `nav main`, columns
/// `100px 1fr`, rows `50px auto`, container 400x200.
#[test]
fn e3_grid_named_areas() {
    let mut container = ComputedStyle::default();
    container.display = Display { outer: DisplayOuter::Block, inner: DisplayInner::Grid };
    container.width = CssValue::px(400.0);
    container.height = CssValue::px(200.0);
    container.grid_template_columns =
        vec![GridTemplateComponent::Track(TrackSize::Length(CssValue::px(100.0))), GridTemplateComponent::Track(TrackSize::Fr(1.0))];
    container.grid_template_rows =
        vec![GridTemplateComponent::Track(TrackSize::Length(CssValue::px(50.0))), GridTemplateComponent::Track(TrackSize::Auto)];
    container.grid_template_areas = vec![
        vec!["head".to_string(), "head".to_string()],
        vec!["nav".to_string(), "main".to_string()],
    ];

    let mut head = ComputedStyle::default();
    head.grid_area_name = Some("head".to_string());
    let mut nav = ComputedStyle::default();
    nav.grid_area_name = Some("nav".to_string());
    let mut main = ComputedStyle::default();
    main.grid_area_name = Some("main".to_string());

    let doc = FixtureDocument::from_root(
        FixtureNode::element("div")
            .with_style(container)
            .with_child(FixtureNode::element("div").with_style(head))
            .with_child(FixtureNode::element("div").with_style(nav))
            .with_child(FixtureNode::element("div").with_style(main)),
    );
    let tree = run(&doc, Viewport::default());
    let grid_id = tree.root;

    let cols = match &tree.get(grid_id).meta {
        webbox_dom::ViewMeta::Grid { column_tracks, row_tracks } => {
            assert!((column_tracks[0] - 100.0).abs() < 0.5);
            assert!((column_tracks[1] - 300.0).abs() < 0.5);
            assert!((row_tracks[0] - 50.0).abs() < 0.5);
            assert!((row_tracks[1] - 150.0).abs() < 0.5);
            column_tracks.clone()
        }
        _ => panic!("expected grid meta"),
    };
    let _ = cols;

    let kids: Vec<_> = tree.arena.children(grid_id).collect();
    let head_v = tree.get(kids[0]);
    assert_eq!((head_v.bounds.x, head_v.bounds.y, head_v.bounds.width, head_v.bounds.height), (0.0, 0.0, 400.0, 50.0));
    let nav_v = tree.get(kids[1]);
    assert_eq!((nav_v.bounds.x, nav_v.bounds.y, nav_v.bounds.width, nav_v.bounds.height), (0.0, 50.0, 100.0, 150.0));
    let main_v = tree.get(kids[2]);
    assert_eq!((main_v.bounds.x, main_v.bounds.y, main_v.bounds.width, main_v.bounds.height), (100.0, 50.0, 300.0, 150.0));
}

/// E4 — normal flow margin collapsing: the first child's top margin
/// collapses through the parent's top edge, and the collapse between
/// siblings takes the larger of the two adjoining margins.
#[test]
fn e4_margin_collapsing() {
    let mut child1 = ComputedStyle::default();
    child1.margin.top = CssValue::px(20.0);
    child1.margin.bottom = CssValue::px(30.0);
    child1.height = CssValue::px(10.0);
    let mut child2 = ComputedStyle::default();
    child2.margin.top = CssValue::px(20.0);
    child2.height = CssValue::px(10.0);

    let doc = FixtureDocument::from_root(
        FixtureNode::element("div")
            .with_child(FixtureNode::element("div").with_style(child1))
            .with_child(FixtureNode::element("div").with_style(child2)),
    );
    let tree = run(&doc, Viewport::default());
    let parent_id = tree.root;
    let kids: Vec<_> = tree.arena.children(parent_id).collect();
    assert_eq!(tree.get(kids[0]).bounds.y, 0.0);
    assert_eq!(tree.get(kids[1]).bounds.y, 10.0 + 30.0);
}

/// E5 — an absolutely positioned child of a `position: relative` parent is
/// placed against the parent's padding box, not the viewport.
#[test]
fn e5_absolute_positioning_containing_block() {
    let mut outer = ComputedStyle::default();
    outer.position = Position::Relative;
    outer.width = CssValue::px(200.0);
    outer.height = CssValue::px(100.0);

    let mut inner = ComputedStyle::default();
    inner.position = Position::Absolute;
    inner.inset.top = CssValue::px(10.0);
    inner.inset.left = CssValue::px(20.0);
    inner.width = CssValue::px(50.0);
    inner.height = CssValue::px(30.0);

    let doc = FixtureDocument::from_root(
        FixtureNode::element("div").with_style(outer).with_child(FixtureNode::element("span").with_style(inner)),
    );
    let tree = run(&doc, Viewport::default());
    let outer_id = tree.root;
    let inner_id = tree.arena.children(outer_id).next().unwrap();
    let inner_view = tree.get(inner_id);
    assert_eq!(inner_view.bounds.x, 20.0);
    assert_eq!(inner_view.bounds.y, 10.0);
    assert_eq!(inner_view.bounds.width, 50.0);
    assert_eq!(inner_view.bounds.height, 30.0);
}

/// E6 — a left float inside a block that establishes a new BFC via
/// `overflow: hidden` expands the block's auto height to contain the float.
#[test]
fn e6_float_expands_bfc_height() {
    let mut outer = ComputedStyle::default();
    outer.overflow_x = Overflow::Hidden;
    outer.overflow_y = Overflow::Hidden;
    outer.width = CssValue::px(300.0);

    let mut floated = ComputedStyle::default();
    floated.float = webbox_css::style::Float::Left;
    floated.width = CssValue::px(100.0);
    floated.height = CssValue::px(50.0);

    // Nested one level under a plain wrapper so the viewport-covering
    // root-height adjustment (`layout()`'s own post-pass, see `DESIGN.md`)
    // lands on the wrapper rather than masking the BFC's own auto height.
    let doc = FixtureDocument::from_root(
        FixtureNode::element("body")
            .with_child(FixtureNode::element("div").with_style(outer).with_child(FixtureNode::element("div").with_style(floated))),
    );
    let tree = run(&doc, Viewport::default());
    let outer_id = tree.arena.children(tree.root).next().unwrap();
    let outer_view = tree.get(outer_id);
    assert_eq!(outer_view.content_height, 50.0);
}
