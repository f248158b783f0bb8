//! Glyph metrics port.
//!
//! The run builder asks a `GlyphMetrics` backend for the width, height and
//! displacement of every character it places. Two backends ship with the
//! crate:
//! - `ZeroMetrics`, the placeholder policy: every query answers zero
//! - `WidthTableMetrics`, per-font advance widths in glyph space (1/1000 em)
//!
//! A backend that cannot answer returns `MetricsUnavailable`; the run builder
//! substitutes zero and keeps going.

use std::collections::HashMap;

use crate::error::{InterpError, Result};
use crate::model::state::{FontHandle, TextState};

/// Per-glyph metric lookups used by the run builder.
///
/// `width` and `height` are in text space scaled by font size.
/// `displacement` is unscaled (it is multiplied by font size when the
/// text matrix is advanced).
pub trait GlyphMetrics {
    fn width(&self, ch: char, state: &TextState) -> Result<f64>;

    fn height(&self, ch: char, state: &TextState) -> Result<f64>;

    fn displacement(&self, ch: char, state: &TextState) -> Result<(f64, f64)>;
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for &M {
    fn width(&self, ch: char, state: &TextState) -> Result<f64> {
        (**self).width(ch, state)
    }

    fn height(&self, ch: char, state: &TextState) -> Result<f64> {
        (**self).height(ch, state)
    }

    fn displacement(&self, ch: char, state: &TextState) -> Result<(f64, f64)> {
        (**self).displacement(ch, state)
    }
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for Box<M> {
    fn width(&self, ch: char, state: &TextState) -> Result<f64> {
        (**self).width(ch, state)
    }

    fn height(&self, ch: char, state: &TextState) -> Result<f64> {
        (**self).height(ch, state)
    }

    fn displacement(&self, ch: char, state: &TextState) -> Result<(f64, f64)> {
        (**self).displacement(ch, state)
    }
}

/// Placeholder metrics: every glyph has zero width, height and displacement.
///
/// This is the default until a real font backend is plugged in. With it,
/// glyphs advance only by character/word spacing and TJ adjustments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroMetrics;

impl GlyphMetrics for ZeroMetrics {
    fn width(&self, _ch: char, _state: &TextState) -> Result<f64> {
        Ok(0.0)
    }

    fn height(&self, _ch: char, _state: &TextState) -> Result<f64> {
        Ok(0.0)
    }

    fn displacement(&self, _ch: char, _state: &TextState) -> Result<(f64, f64)> {
        Ok((0.0, 0.0))
    }
}

/// Advance widths for one font, in glyph space (thousandths of an em).
#[derive(Debug, Clone, PartialEq)]
pub struct FontWidths {
    pub widths: HashMap<char, f64>,
    /// Width used for characters missing from `widths`. None reports them
    /// as unavailable.
    pub default_width: Option<f64>,
    /// Ascent in glyph space
    pub ascent: f64,
    /// Descent in glyph space (usually negative)
    pub descent: f64,
}

impl FontWidths {
    pub fn new(widths: impl IntoIterator<Item = (char, f64)>) -> Self {
        Self {
            widths: widths.into_iter().collect(),
            default_width: None,
            ascent: 1000.0,
            descent: 0.0,
        }
    }

    /// Every character gets the same advance.
    pub fn monospace(width: f64) -> Self {
        Self {
            default_width: Some(width),
            ..Self::new(std::iter::empty())
        }
    }

    #[must_use]
    pub const fn with_default_width(mut self, width: f64) -> Self {
        self.default_width = Some(width);
        self
    }

    #[must_use]
    pub const fn with_vertical_metrics(mut self, ascent: f64, descent: f64) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    fn glyph_width(&self, ch: char) -> Option<f64> {
        self.widths.get(&ch).copied().or(self.default_width)
    }
}

/// Width tables keyed by font handle.
///
/// Queries for a font that was never registered, or for a character with no
/// width and no default, fail with `MetricsUnavailable`.
#[derive(Debug, Clone, Default)]
pub struct WidthTableMetrics {
    fonts: HashMap<FontHandle, FontWidths>,
}

impl WidthTableMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, font: impl Into<FontHandle>, widths: FontWidths) {
        self.fonts.insert(font.into(), widths);
    }

    #[must_use]
    pub fn with_font(mut self, font: impl Into<FontHandle>, widths: FontWidths) -> Self {
        self.insert(font, widths);
        self
    }

    fn font_for(&self, ch: char, state: &TextState) -> Result<&FontWidths> {
        state
            .font
            .as_ref()
            .and_then(|name| self.fonts.get(name))
            .ok_or(InterpError::MetricsUnavailable { ch })
    }

    fn glyph_width(&self, ch: char, state: &TextState) -> Result<f64> {
        self.font_for(ch, state)?
            .glyph_width(ch)
            .ok_or(InterpError::MetricsUnavailable { ch })
    }
}

impl GlyphMetrics for WidthTableMetrics {
    fn width(&self, ch: char, state: &TextState) -> Result<f64> {
        Ok(self.glyph_width(ch, state)? * 0.001 * state.font_size)
    }

    fn height(&self, ch: char, state: &TextState) -> Result<f64> {
        let font = self.font_for(ch, state)?;
        Ok((font.ascent - font.descent) * 0.001 * state.font_size)
    }

    fn displacement(&self, ch: char, state: &TextState) -> Result<(f64, f64)> {
        Ok((self.glyph_width(ch, state)? * 0.001, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_font(font: &str, size: f64) -> TextState {
        TextState {
            font: Some(FontHandle::new(font)),
            font_size: size,
            ..TextState::new()
        }
    }

    #[test]
    fn test_zero_metrics() {
        let state = TextState::new();
        assert_eq!(ZeroMetrics.width('A', &state).unwrap(), 0.0);
        assert_eq!(ZeroMetrics.height('A', &state).unwrap(), 0.0);
        assert_eq!(ZeroMetrics.displacement('A', &state).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn test_width_table_scales_by_font_size() {
        let metrics = WidthTableMetrics::new().with_font("F1", FontWidths::new([('A', 500.0)]));
        let state = state_with_font("F1", 10.0);
        assert_eq!(metrics.width('A', &state).unwrap(), 5.0);
        assert_eq!(metrics.displacement('A', &state).unwrap(), (0.5, 0.0));
        assert_eq!(metrics.height('A', &state).unwrap(), 10.0);
    }

    #[test]
    fn test_width_table_unknown_glyph() {
        let metrics = WidthTableMetrics::new().with_font("F1", FontWidths::new([('A', 500.0)]));
        let state = state_with_font("F1", 10.0);
        assert_eq!(
            metrics.width('B', &state),
            Err(InterpError::MetricsUnavailable { ch: 'B' })
        );
        let unregistered = state_with_font("F2", 10.0);
        assert!(metrics.height('A', &unregistered).is_err());
    }
}
