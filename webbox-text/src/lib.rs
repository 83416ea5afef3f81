//! The text-shaper capability (§4.4, §6 input #3): a narrow interface the
//! engine is injected with at `layout()` entry, wrapping whatever font
//! service the embedder has. Font file I/O and glyph rasterisation are out
//! of scope for this workspace; `webbox-layout` only ever calls through
//! this trait.
//!
//! Grounded on `azul-text-layout`'s word/line model (`text_layout.rs`,
//! `split_text_into_words`) for the break-opportunity vocabulary, and on
//! `azul-core::ui_solver`'s `ResolvedTextLayoutOptions` for the metrics
//! shape — generalised from "a concrete font backend" to a trait plus one
//! deterministic reference implementation with no font-file dependency.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: Vec<String>,
    pub size_px: f32,
    pub weight: u16,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec { family: vec!["serif".to_string()], size_px: 16.0, weight: 400, italic: false }
    }
}

/// Font metrics as returned by `font_metrics` (§6 input #3's exact field
/// list).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    pub typo_ascent: f32,
    pub typo_descent: f32,
    pub typo_line_gap: f32,
    pub use_typo_metrics: bool,
    pub hhea_height: f32,
}

/// Resolves a `line-height: normal` computation (§4.4, mandatory contract,
/// not an implementation detail).
pub fn normal_line_height(metrics: &FontMetrics) -> f32 {
    if metrics.use_typo_metrics {
        let gap = metrics.typo_line_gap.max(0.0);
        metrics.typo_ascent.round() + metrics.typo_descent.round() + gap.round()
    } else {
        metrics.hhea_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    Soft,
    Mandatory,
}

/// A break opportunity at a byte offset into the shaped text, plus whether
/// it is a soft (line-breaking-eligible) or mandatory (forced) break.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakOpportunity {
    pub byte_offset: usize,
    pub kind: BreakKind,
}

/// One shaped text run: total advance at the requested font size, the
/// per-break-opportunity stream needed for line breaking, and per-character
/// advances (§6: "sufficient for line breaking").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineRun {
    pub total_advance: f32,
    pub char_advances: Vec<f32>,
    pub breaks: Vec<BreakOpportunity>,
}

/// The capability the engine is injected with (§4.4, §6 input #3). The
/// engine never caches glyph data itself — the service is expected to.
pub trait TextShaper {
    fn shape(&self, text: &str, font: &FontSpec, max_width: Option<f32>) -> LineRun;
    fn font_metrics(&self, font: &FontSpec) -> FontMetrics;
}

/// A deterministic reference shaper with no font-file dependency: every
/// character advances by a fixed fraction of the font size, and break
/// opportunities are found at Unicode word boundaries (`unicode-
/// segmentation`, the same crate the teacher's `text_layout` feature pulls
/// in for boundary detection). Good enough for conformance tests and the
/// CLI's `--format json` path when no real font backend is wired in; any
/// real embedder supplies its own `TextShaper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTextShaper {
    pub advance_ratio: f32,
}

impl SimpleTextShaper {
    pub fn new() -> Self {
        SimpleTextShaper { advance_ratio: 0.6 }
    }
}

impl TextShaper for SimpleTextShaper {
    fn shape(&self, text: &str, font: &FontSpec, _max_width: Option<f32>) -> LineRun {
        let advance_ratio = if self.advance_ratio > 0.0 { self.advance_ratio } else { 0.6 };
        let per_char = font.size_px * advance_ratio;

        let mut char_advances = Vec::with_capacity(text.len());
        let mut total_advance = 0.0f32;
        for ch in text.chars() {
            let w = if ch == '\t' { per_char * 4.0 } else { per_char };
            char_advances.push(w);
            total_advance += w;
        }

        let mut breaks = Vec::new();
        for (offset, word) in text.split_word_bound_indices() {
            let end = offset + word.len();
            if word.contains('\n') {
                breaks.push(BreakOpportunity { byte_offset: end, kind: BreakKind::Mandatory });
            } else if word.chars().all(|c| c.is_whitespace()) {
                breaks.push(BreakOpportunity { byte_offset: end, kind: BreakKind::Soft });
            }
        }

        LineRun { total_advance, char_advances, breaks }
    }

    fn font_metrics(&self, font: &FontSpec) -> FontMetrics {
        // Proportions approximating common serif/sans metrics; deterministic
        // and independent of any font file.
        let ascent = font.size_px * 0.8;
        let descent = font.size_px * 0.2;
        FontMetrics {
            ascent,
            descent,
            line_gap: 0.0,
            typo_ascent: ascent,
            typo_descent: descent,
            typo_line_gap: font.size_px * 0.1,
            use_typo_metrics: true,
            hhea_height: font.size_px * 1.15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_line_height_uses_typo_metrics_when_flagged() {
        let metrics = FontMetrics {
            ascent: 0.0,
            descent: 0.0,
            line_gap: 0.0,
            typo_ascent: 14.4,
            typo_descent: 3.6,
            typo_line_gap: 1.6,
            use_typo_metrics: true,
            hhea_height: 999.0,
        };
        assert_eq!(normal_line_height(&metrics), 14.0 + 4.0 + 2.0);
    }

    #[test]
    fn normal_line_height_falls_back_to_hhea_height() {
        let metrics = FontMetrics {
            ascent: 0.0,
            descent: 0.0,
            line_gap: 0.0,
            typo_ascent: 14.4,
            typo_descent: 3.6,
            typo_line_gap: 1.6,
            use_typo_metrics: false,
            hhea_height: 18.4,
        };
        assert_eq!(normal_line_height(&metrics), 18.4);
    }

    #[test]
    fn shape_reports_word_boundary_breaks() {
        let shaper = SimpleTextShaper::new();
        let font = FontSpec::default();
        let run = shaper.shape("hello world", &font, None);
        assert!(run.total_advance > 0.0);
        assert!(run.breaks.iter().any(|b| b.kind == BreakKind::Soft));
    }
}
