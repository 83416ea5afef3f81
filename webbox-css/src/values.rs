//! CSS value primitives: lengths, percentages and the small sum types the
//! layout engine resolves against a containing block.
//!
//! Mirrors the teacher's `PixelValue`/`FloatValue` split (azul-css
//! `css_properties.rs`): a value carries its unit until it is resolved
//! against a resolution context, at which point it collapses to a plain
//! `f32` of CSS logical pixels.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Absolute clamp applied to every resolved coordinate (§4.2).
pub const MAX_LEN: f32 = 16_777_216.0; // 2^24
pub const MIN_LEN: f32 = -16_777_216.0;

pub fn clamp_len(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(MIN_LEN, MAX_LEN)
    }
}

/// CSS DPI assumption: 96 logical pixels per inch.
pub const PX_PER_IN: f32 = 96.0;
pub const PX_PER_CM: f32 = PX_PER_IN / 2.54;
pub const PX_PER_MM: f32 = PX_PER_CM / 10.0;
pub const PX_PER_PT: f32 = PX_PER_IN / 72.0;
pub const PX_PER_PC: f32 = PX_PER_PT * 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Percent,
    Vw,
    Vh,
    VMin,
    VMax,
    In,
    Cm,
    Mm,
    Pt,
    Pc,
}

/// A length as written in a stylesheet: a number plus a unit, not yet
/// resolved against any context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthValue {
    pub number: f32,
    pub unit: LengthUnit,
}

impl LengthValue {
    pub const fn px(n: f32) -> Self {
        Self { number: n, unit: LengthUnit::Px }
    }
    pub const fn em(n: f32) -> Self {
        Self { number: n, unit: LengthUnit::Em }
    }
    pub const fn percent(n: f32) -> Self {
        Self { number: n, unit: LengthUnit::Percent }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self.unit, LengthUnit::Percent)
    }
}

impl Mul<f32> for LengthValue {
    type Output = LengthValue;
    fn mul(self, rhs: f32) -> LengthValue {
        LengthValue { number: self.number * rhs, unit: self.unit }
    }
}

/// One node of a `calc()` expression tree (§4.2: "`calc()` is evaluated as
/// a tree of operations on resolved operands with the same unit resolution
/// rules").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CalcNode {
    Length(LengthValue),
    Add(Box<CalcNode>, Box<CalcNode>),
    Sub(Box<CalcNode>, Box<CalcNode>),
    /// `calc(expr * scalar)`; the scalar side of a CSS `calc()` multiply is
    /// always a plain number, never another length.
    Mul(Box<CalcNode>, f32),
}

/// A CSS value that a property can take: a concrete length/percentage, a
/// `calc()` tree, the `auto` keyword, or one of the intrinsic-sizing
/// keywords. Mirrors the distilled spec's §3 "length representation"
/// paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CssValue {
    Length(LengthValue),
    Calc(CalcNode),
    Auto,
    MinContent,
    MaxContent,
    FitContent,
    /// Flexbox/grid fractional unit. Only meaningful on `flex-basis` and
    /// grid track sizing functions; resolved by those components, never by
    /// the generic length resolver.
    Fr(f32),
}

impl CssValue {
    pub const fn px(n: f32) -> Self {
        CssValue::Length(LengthValue::px(n))
    }
    pub const fn percent(n: f32) -> Self {
        CssValue::Length(LengthValue::percent(n))
    }
    pub fn is_auto(&self) -> bool {
        matches!(self, CssValue::Auto)
    }
    pub fn is_intrinsic_keyword(&self) -> bool {
        matches!(self, CssValue::MinContent | CssValue::MaxContent | CssValue::FitContent)
    }
}

impl Default for CssValue {
    fn default() -> Self {
        CssValue::Auto
    }
}

/// The outcome of resolving a `CssValue` against a `LengthResolutionContext`
/// (§4.2 contract: `resolve(value, ctx) -> f32 | Auto | Intrinsic`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved {
    Px(f32),
    Auto,
    MinContent,
    MaxContent,
    FitContent,
    /// A percentage that could not be resolved because its reference
    /// dimension was indefinite; carries the raw percentage for anyone
    /// further up the tree who does have a definite basis.
    DeferredPercent(f32),
}

impl Resolved {
    pub fn px_or(&self, fallback: f32) -> f32 {
        match self {
            Resolved::Px(v) => *v,
            _ => fallback,
        }
    }
    pub fn is_auto(&self) -> bool {
        matches!(self, Resolved::Auto)
    }
    pub fn is_definite(&self) -> bool {
        matches!(self, Resolved::Px(_))
    }
}

/// A possibly-indefinite axis extent, used throughout intrinsic sizing and
/// percentage resolution. Named `Number` in the teacher (`azul-layout`'s
/// `number.rs`); kept under a more descriptive name here since `webbox-css`
/// also exports numeric CSS values and the two should not be confused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisExtent {
    Definite(f32),
    Indefinite,
}

impl AxisExtent {
    pub fn unwrap_or(&self, fallback: f32) -> f32 {
        match self {
            AxisExtent::Definite(v) => *v,
            AxisExtent::Indefinite => fallback,
        }
    }
    pub fn is_definite(&self) -> bool {
        matches!(self, AxisExtent::Definite(_))
    }
}

impl Add<f32> for AxisExtent {
    type Output = AxisExtent;
    fn add(self, rhs: f32) -> AxisExtent {
        match self {
            AxisExtent::Definite(v) => AxisExtent::Definite(v + rhs),
            AxisExtent::Indefinite => AxisExtent::Indefinite,
        }
    }
}
