//! Inline line builder (§4.5): flattens a run of inline-level DOM children
//! into a token stream, greedily breaks it into line boxes against the
//! active BFC's float exclusions, and applies `text-align`/`vertical-align`.
//!
//! **Documented simplification.** The distilled spec describes inline
//! boxes as potentially producing multiple fragments when split across
//! lines, with their own padding/border contributing to each fragment's
//! box. This implementation flattens nested inline elements transparently
//! for line-breaking and renders only leaf text runs (`ViewText`) and
//! atomic inline boxes (inline-block/inline-flex/inline-grid subtrees) as
//! view nodes; a purely-inline element with no atomic descendants
//! contributes no view node of its own. Recorded as an open-question
//! resolution in `DESIGN.md`.

use webbox_css::style::{ComputedStyle, DisplayInner, DisplayOuter, Float, FontStyle, TextAlign, VerticalAlign, WhiteSpace};
use webbox_dom::{Arena, Document, NodeId, NodeKind, Rect, ViewKind, ViewNode};
use webbox_text::{BreakKind, FontSpec};

use crate::context::{BfcContext, ContainingBlock, LayoutContext};
use crate::error::LayoutResult;
use crate::length::{resolve_or, Axis, LengthResolutionContext};

enum Token {
    Word { text: String, advance: f32, ascent: f32, descent: f32, line_height: f32, vertical_align: VerticalAlign },
    Space { advance: f32 },
    MandatoryBreak,
    Atomic { view_id: NodeId, width: f32, height: f32, line_height: f32, vertical_align: VerticalAlign },
}

impl Token {
    fn is_breakable_space(&self) -> bool {
        matches!(self, Token::Space { .. })
    }
    fn advance(&self) -> f32 {
        match self {
            Token::Word { advance, .. } => *advance,
            Token::Space { advance } => *advance,
            Token::MandatoryBreak => 0.0,
            Token::Atomic { width, .. } => *width,
        }
    }
}

fn font_spec_of(style: &ComputedStyle) -> FontSpec {
    FontSpec {
        family: style.font_family.clone(),
        size_px: style.font_size_px,
        weight: style.font_weight.0,
        italic: matches!(style.font_style, FontStyle::Italic),
    }
}

fn resolve_line_height_px(style: &ComputedStyle, ctx: &LayoutContext) -> f32 {
    match style.line_height {
        webbox_css::style::LineHeight::Normal => {
            let metrics = ctx.text_shaper.font_metrics(&font_spec_of(style));
            webbox_text::normal_line_height(&metrics)
        }
        webbox_css::style::LineHeight::Number(n) => n * style.font_size_px,
        webbox_css::style::LineHeight::Length(ref v) => {
            let lctx = LengthResolutionContext {
                containing_block_width: webbox_css::values::AxisExtent::Indefinite,
                containing_block_height: webbox_css::values::AxisExtent::Indefinite,
                font_size_px: style.font_size_px,
                root_font_size_px: ctx.viewport.root_font_size_px,
                viewport_width_px: ctx.viewport.width_css_px,
                viewport_height_px: ctx.viewport.height_css_px,
            };
            resolve_or(v, &lctx, Axis::Vertical, style.font_size_px * 1.2)
        }
    }
}

fn is_atomic_inline(style: &ComputedStyle) -> bool {
    style.display.outer == DisplayOuter::Inline
        && matches!(
            style.display.inner,
            DisplayInner::FlowRoot | DisplayInner::Flex | DisplayInner::Grid | DisplayInner::Table
        )
}

#[allow(clippy::too_many_arguments)]
fn flatten<D: Document>(
    dom: &D,
    node: NodeId,
    view: &mut Arena<ViewNode>,
    ctx: &LayoutContext,
    available_width: f32,
    out: &mut Vec<Token>,
    depth: u32,
) -> LayoutResult<()> {
    match dom.kind(node) {
        NodeKind::Text => {
            let parent_style = dom.parent(node).map(|p| dom.style(p).clone()).unwrap_or_default();
            let text = dom.text_content(node).unwrap_or("");
            let white_space = parent_style.white_space;
            let line_height = resolve_line_height_px(&parent_style, ctx);
            let font = font_spec_of(&parent_style);
            let metrics = ctx.text_shaper.font_metrics(&font);

            let effective_text =
                if white_space.collapses_whitespace() { collapse_whitespace(text) } else { text.to_string() };
            if effective_text.is_empty() {
                return Ok(());
            }
            let run = ctx.text_shaper.shape(&effective_text, &font, None);
            let chars: Vec<char> = effective_text.chars().collect();

            let byte_to_char = |byte_off: usize| effective_text[..byte_off].chars().count();
            let mut last = 0usize;
            for br in &run.breaks {
                let end = byte_to_char(br.byte_offset).min(chars.len());
                push_piece(
                    out,
                    &chars[last..end],
                    &run.char_advances[last.min(run.char_advances.len())..end.min(run.char_advances.len())],
                    &parent_style,
                    metrics.ascent,
                    metrics.descent,
                    line_height,
                    white_space,
                );
                if br.kind == BreakKind::Mandatory && white_space.preserves_newlines() {
                    out.push(Token::MandatoryBreak);
                }
                last = end;
            }
            if last < chars.len() {
                push_piece(
                    out,
                    &chars[last..],
                    &run.char_advances[last.min(run.char_advances.len())..],
                    &parent_style,
                    metrics.ascent,
                    metrics.descent,
                    line_height,
                    white_space,
                );
            }
            Ok(())
        }
        NodeKind::Element => {
            let style = dom.style(node);
            if style.display.is_none() || style.position.is_out_of_flow() || style.float != Float::None {
                return Ok(());
            }
            if is_atomic_inline(style) {
                let (min_c, max_c) = crate::intrinsic::intrinsic_sizes(dom, node, ctx);
                let shrink_to_fit = min_c.max(available_width.min(max_c.max(min_c)));
                let cb = ContainingBlock {
                    width: webbox_css::values::AxisExtent::Definite(shrink_to_fit),
                    height: webbox_css::values::AxisExtent::Indefinite,
                };
                let mut scratch_bfc = BfcContext::new(shrink_to_fit);
                let flow = crate::layout_in_flow(dom, node, view, ctx, cb, &mut scratch_bfc, (0.0, 0.0), depth + 1)?;
                let line_height = resolve_line_height_px(style, ctx);
                out.push(Token::Atomic {
                    view_id: flow.view_id,
                    width: flow.outer_width,
                    height: flow.outer_height,
                    line_height,
                    vertical_align: style.vertical_align,
                });
                Ok(())
            } else {
                for child in dom.children(node) {
                    flatten(dom, child, view, ctx, available_width, out, depth + 1)?;
                }
                Ok(())
            }
        }
        NodeKind::Document => Ok(()),
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                result.push(' ');
            }
            last_was_space = true;
        } else {
            result.push(ch);
            last_was_space = false;
        }
    }
    result
}

fn push_piece(
    out: &mut Vec<Token>,
    chars: &[char],
    advances: &[f32],
    style: &ComputedStyle,
    ascent: f32,
    descent: f32,
    line_height: f32,
    white_space: WhiteSpace,
) {
    if chars.is_empty() {
        return;
    }
    let mut i = 0usize;
    while i < chars.len() {
        let is_space = chars[i].is_whitespace();
        let mut j = i;
        while j < chars.len() && chars[j].is_whitespace() == is_space {
            j += 1;
        }
        let advance: f32 = advances.get(i..j).map(|s| s.iter().sum()).unwrap_or(0.0);
        if is_space && white_space.collapses_whitespace() {
            out.push(Token::Space { advance });
        } else {
            out.push(Token::Word {
                text: chars[i..j].iter().collect(),
                advance,
                ascent,
                descent,
                line_height,
                vertical_align: style.vertical_align,
            });
        }
        i = j;
    }
}

pub struct InlineFormattingResult {
    pub line_view_ids: Vec<NodeId>,
    pub height: f32,
}

#[allow(clippy::too_many_arguments)]
pub fn layout_inline_formatting_context<D: Document>(
    dom: &D,
    items: &[NodeId],
    view: &mut Arena<ViewNode>,
    ctx: &LayoutContext,
    available_width: f32,
    bfc: &mut BfcContext,
    _band_origin: (f32, f32),
    start_y_local: f32,
    depth: u32,
) -> LayoutResult<InlineFormattingResult> {
    let mut tokens = Vec::new();
    for &item in items {
        flatten(dom, item, view, ctx, available_width, &mut tokens, depth)?;
    }
    while matches!(tokens.first(), Some(Token::Space { .. })) {
        tokens.remove(0);
    }
    while matches!(tokens.last(), Some(Token::Space { .. })) {
        tokens.pop();
    }

    if tokens.is_empty() {
        return Ok(InlineFormattingResult { line_view_ids: Vec::new(), height: 0.0 });
    }

    let text_align =
        items.first().and_then(|n| dom.parent(*n)).map(|p| dom.style(p).text_align).unwrap_or_default();

    let mut line_ids = Vec::new();
    let mut y = start_y_local;
    let mut cursor = 0usize;

    while cursor < tokens.len() {
        let probe_height = tokens[cursor..]
            .iter()
            .find_map(|t| match t {
                Token::Word { line_height, .. } | Token::Atomic { line_height, .. } => Some(*line_height),
                _ => None,
            })
            .unwrap_or(16.0);
        let (left, right) = bfc.band_at(y, probe_height);
        let band_width = (right - left).max(0.0);

        let mut end = cursor;
        let mut last_break: Option<usize> = None;
        let mut mandatory_break_at: Option<usize> = None;
        let mut width_sum = 0.0f32;

        while end < tokens.len() {
            match &tokens[end] {
                Token::MandatoryBreak => {
                    mandatory_break_at = Some(end);
                    break;
                }
                t => {
                    let adv = t.advance();
                    if width_sum + adv > band_width && end > cursor {
                        break;
                    }
                    width_sum += adv;
                    if t.is_breakable_space() {
                        last_break = Some(end + 1);
                    }
                    end += 1;
                }
            }
        }
        if end == cursor && end < tokens.len() {
            width_sum = tokens[end].advance();
            end += 1;
        } else if end < tokens.len() && mandatory_break_at.is_none() {
            if let Some(brk) = last_break {
                if brk > cursor && brk < end {
                    width_sum = tokens[cursor..brk].iter().map(|t| t.advance()).sum();
                    end = brk;
                }
            }
        }
        let _ = width_sum;

        let line_tokens = &tokens[cursor..end];
        let is_last_line = mandatory_break_at.map(|m| m + 1 >= tokens.len()).unwrap_or(end >= tokens.len());

        let line_height = line_tokens
            .iter()
            .filter_map(|t| match t {
                Token::Word { line_height, .. } | Token::Atomic { line_height, .. } => Some(*line_height),
                _ => None,
            })
            .fold(0.0f32, f32::max)
            .max(probe_height);
        let line_ascent = line_tokens
            .iter()
            .filter_map(|t| match t {
                Token::Word { ascent, .. } => Some(*ascent),
                Token::Atomic { height, .. } => Some(*height),
                _ => None,
            })
            .fold(0.0f32, f32::max);

        let content_width: f32 = line_tokens.iter().map(|t| t.advance()).sum();
        let free_space = (band_width - content_width).max(0.0);
        let space_count = line_tokens.iter().filter(|t| t.is_breakable_space()).count();

        let (start_x, extra_per_space) = match text_align {
            TextAlign::Start | TextAlign::Left => (left, 0.0),
            TextAlign::End | TextAlign::Right => (left + free_space, 0.0),
            TextAlign::Center => (left + free_space / 2.0, 0.0),
            TextAlign::Justify if !is_last_line && space_count > 0 => (left, free_space / space_count as f32),
            TextAlign::Justify => (left, 0.0),
        };

        let mut x = start_x;
        for tok in line_tokens {
            match tok {
                Token::Word { text, advance, ascent, descent, vertical_align, .. } => {
                    let id = view.alloc(ViewNode::new(ViewKind::Text));
                    let n = view.get_mut(id);
                    n.text = Some(text.clone());
                    let y_off = vertical_offset(*vertical_align, line_ascent, *ascent, *ascent + *descent, line_height);
                    n.bounds = Rect { x, y: y_off, width: *advance, height: *ascent + *descent };
                    n.content_width = *advance;
                    n.content_height = *ascent + *descent;
                    line_ids.push(id);
                    x += advance;
                }
                Token::Space { advance } => {
                    x += advance + extra_per_space;
                }
                Token::Atomic { view_id, width, height, vertical_align, .. } => {
                    let y_off = vertical_offset(*vertical_align, line_ascent, *height, *height, line_height);
                    view.get_mut(*view_id).bounds.x = x;
                    view.get_mut(*view_id).bounds.y = y_off;
                    line_ids.push(*view_id);
                    x += width;
                }
                Token::MandatoryBreak => {}
            }
        }

        y += line_height;
        cursor = match mandatory_break_at {
            Some(m) => m + 1,
            None => end,
        };
    }

    Ok(InlineFormattingResult { line_view_ids: line_ids, height: y - start_y_local })
}

fn vertical_offset(align: VerticalAlign, line_ascent: f32, item_ascent_or_height: f32, item_height: f32, line_height: f32) -> f32 {
    match align {
        VerticalAlign::Baseline => line_ascent - item_ascent_or_height,
        VerticalAlign::Top | VerticalAlign::TextTop => 0.0,
        VerticalAlign::Bottom | VerticalAlign::TextBottom => (line_height - item_height).max(0.0),
        VerticalAlign::Middle => ((line_height - item_height) / 2.0).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webbox_dom::fixture::{FixtureDocument, FixtureNode};
    use webbox_text::SimpleTextShaper;

    fn ctx_for(shaper: &SimpleTextShaper) -> LayoutContext {
        LayoutContext::new(shaper, crate::context::Viewport::default(), crate::context::LayoutOptions::default())
    }

    #[test]
    fn single_short_word_fits_on_one_line() {
        let doc = FixtureDocument::from_root(FixtureNode::element("p").with_child(FixtureNode::text("hi")));
        let shaper = SimpleTextShaper::new();
        let ctx = ctx_for(&shaper);
        let mut view: Arena<ViewNode> = Arena::new();
        let mut bfc = BfcContext::new(800.0);
        let items = vec![doc.first_child(doc.root()).unwrap()];
        let result =
            layout_inline_formatting_context(&doc, &items, &mut view, &ctx, 800.0, &mut bfc, (0.0, 0.0), 0.0, 0)
                .unwrap();
        assert_eq!(result.line_view_ids.len(), 1);
        assert!(result.height > 0.0);
    }

    #[test]
    fn narrow_container_wraps_two_words_onto_two_lines() {
        let doc = FixtureDocument::from_root(FixtureNode::element("p").with_child(FixtureNode::text("hello world")));
        let shaper = SimpleTextShaper::new();
        let ctx = ctx_for(&shaper);
        let mut view: Arena<ViewNode> = Arena::new();
        let mut bfc = BfcContext::new(40.0);
        let items = vec![doc.first_child(doc.root()).unwrap()];
        let result =
            layout_inline_formatting_context(&doc, &items, &mut view, &ctx, 40.0, &mut bfc, (0.0, 0.0), 0.0, 0)
                .unwrap();
        assert_eq!(result.line_view_ids.len(), 2);
    }
}
