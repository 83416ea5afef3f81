//! Length resolver (§4.2): converts a `CssValue` to logical CSS pixels
//! against a resolution context, or reports that it is `auto`, an
//! intrinsic keyword, or a percentage deferred for lack of a definite
//! basis.

use webbox_css::values::{clamp_len, AxisExtent, CalcNode, CssValue, LengthUnit, LengthValue, Resolved, PX_PER_CM, PX_PER_IN, PX_PER_MM, PX_PER_PC, PX_PER_PT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthResolutionContext {
    pub containing_block_width: AxisExtent,
    pub containing_block_height: AxisExtent,
    pub font_size_px: f32,
    pub root_font_size_px: f32,
    pub viewport_width_px: f32,
    pub viewport_height_px: f32,
}

impl LengthResolutionContext {
    fn containing_block(&self, axis: Axis) -> AxisExtent {
        match axis {
            Axis::Horizontal => self.containing_block_width,
            Axis::Vertical => self.containing_block_height,
        }
    }
}

fn resolve_length_value(v: LengthValue, ctx: &LengthResolutionContext, axis: Axis) -> Option<f32> {
    let px = match v.unit {
        LengthUnit::Px => v.number,
        LengthUnit::Em => v.number * ctx.font_size_px,
        LengthUnit::Rem => v.number * ctx.root_font_size_px,
        LengthUnit::Vw => v.number / 100.0 * ctx.viewport_width_px,
        LengthUnit::Vh => v.number / 100.0 * ctx.viewport_height_px,
        LengthUnit::VMin => v.number / 100.0 * ctx.viewport_width_px.min(ctx.viewport_height_px),
        LengthUnit::VMax => v.number / 100.0 * ctx.viewport_width_px.max(ctx.viewport_height_px),
        LengthUnit::In => v.number * PX_PER_IN,
        LengthUnit::Cm => v.number * PX_PER_CM,
        LengthUnit::Mm => v.number * PX_PER_MM,
        LengthUnit::Pt => v.number * PX_PER_PT,
        LengthUnit::Pc => v.number * PX_PER_PC,
        LengthUnit::Percent => {
            let basis = ctx.containing_block(axis);
            return match basis {
                AxisExtent::Definite(b) => Some(clamp_len(b * v.number / 100.0)),
                AxisExtent::Indefinite => None,
            };
        }
    };
    Some(clamp_len(px))
}

fn eval_calc(node: &CalcNode, ctx: &LengthResolutionContext, axis: Axis) -> Option<f32> {
    match node {
        CalcNode::Length(v) => resolve_length_value(*v, ctx, axis),
        CalcNode::Add(a, b) => Some(eval_calc(a, ctx, axis)? + eval_calc(b, ctx, axis)?),
        CalcNode::Sub(a, b) => Some(eval_calc(a, ctx, axis)? - eval_calc(b, ctx, axis)?),
        CalcNode::Mul(a, scalar) => Some(eval_calc(a, ctx, axis)? * scalar),
    }
}

/// `resolve(value, ctx) -> f32 | Auto | Intrinsic` (§4.2 contract).
/// Percentages remain unresolved (deferred) when the reference dimension
/// is indefinite; `auto` and the intrinsic keywords pass through unchanged.
pub fn resolve(value: &CssValue, ctx: &LengthResolutionContext, axis: Axis) -> Resolved {
    match value {
        CssValue::Auto => Resolved::Auto,
        CssValue::MinContent => Resolved::MinContent,
        CssValue::MaxContent => Resolved::MaxContent,
        CssValue::FitContent => Resolved::FitContent,
        CssValue::Fr(_) => Resolved::Auto, // resolved by flex/grid, never here
        CssValue::Length(v) => match resolve_length_value(*v, ctx, axis) {
            Some(px) => Resolved::Px(px),
            None => Resolved::DeferredPercent(v.number),
        },
        CssValue::Calc(node) => match eval_calc(node, ctx, axis) {
            Some(px) => Resolved::Px(clamp_len(px)),
            None => Resolved::Auto,
        },
    }
}

/// Convenience used throughout block/flex/grid/table code: resolve and
/// collapse `Auto`/intrinsic/deferred results to a fallback pixel value.
pub fn resolve_or(value: &CssValue, ctx: &LengthResolutionContext, axis: Axis, fallback: f32) -> f32 {
    match resolve(value, ctx, axis) {
        Resolved::Px(v) => v,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> LengthResolutionContext {
        LengthResolutionContext {
            containing_block_width: AxisExtent::Definite(400.0),
            containing_block_height: AxisExtent::Indefinite,
            font_size_px: 16.0,
            root_font_size_px: 16.0,
            viewport_width_px: 800.0,
            viewport_height_px: 600.0,
        }
    }

    #[test]
    fn percent_resolves_against_definite_basis() {
        let v = CssValue::percent(50.0);
        assert_eq!(resolve(&v, &ctx(), Axis::Horizontal), Resolved::Px(200.0));
    }

    #[test]
    fn percent_defers_against_indefinite_basis() {
        let v = CssValue::percent(50.0);
        assert_eq!(resolve(&v, &ctx(), Axis::Vertical), Resolved::DeferredPercent(50.0));
    }

    #[test]
    fn em_resolves_against_font_size() {
        let v = CssValue::Length(LengthValue::em(2.0));
        assert_eq!(resolve(&v, &ctx(), Axis::Horizontal), Resolved::Px(32.0));
    }

    #[test]
    fn calc_adds_length_and_percent() {
        let node = CalcNode::Add(
            Box::new(CalcNode::Length(LengthValue::px(10.0))),
            Box::new(CalcNode::Length(LengthValue::percent(50.0))),
        );
        let v = CssValue::Calc(node);
        assert_eq!(resolve(&v, &ctx(), Axis::Horizontal), Resolved::Px(210.0));
    }
}
