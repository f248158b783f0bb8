//! Run builder - turns shown strings into positioned text runs.
//!
//! For every character of a shown string the builder computes the glyph's
//! rendering matrix from the current text state, asks the metrics backend for
//! its size and displacement, emits one `SpatialObject`, and advances the text
//! matrix. The advance happens on a scratch frame pushed for the duration of
//! the string, so the caller's frame is left as it was.

use tracing::debug;

use crate::error::{InterpError, Result};
use crate::font::metrics::GlyphMetrics;
use crate::model::run::SpatialObject;
use crate::model::state::{TextState, TextStateStack};
use crate::utils::Matrix3;

/// Default word separator: the space character (CID 32).
pub const WORD_SEPARATOR: char = ' ';

/// Walks shown strings and emits one run per character.
pub struct RunBuilder<'m, M: GlyphMetrics + ?Sized> {
    metrics: &'m M,
    word_separator: char,
}

impl<'m, M: GlyphMetrics + ?Sized> RunBuilder<'m, M> {
    pub const fn new(metrics: &'m M) -> Self {
        Self {
            metrics,
            word_separator: WORD_SEPARATOR,
        }
    }

    #[must_use]
    pub const fn with_word_separator(mut self, word_separator: char) -> Self {
        self.word_separator = word_separator;
        self
    }

    /// Renders `text` against the current top frame.
    ///
    /// Fails only when there is no frame to render against; in that case the
    /// stack is untouched. Calling twice with the same stack and input yields
    /// the same runs.
    pub fn show(&self, stack: &mut TextStateStack, text: &str) -> Result<Vec<SpatialObject>> {
        stack.push_copy()?;
        let mut runs = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let state = stack.top()?;
            let (run, tx) = self.place_char(ch, state);
            runs.push(run);
            let cursor = stack.top_mut()?;
            cursor.text_matrix = Matrix3::translation(tx, 0.0).compose(&cursor.text_matrix);
        }
        stack.pop()?;
        Ok(runs)
    }

    /// Computes the run for `ch` and the horizontal advance that follows it.
    fn place_char(&self, ch: char, s: &TextState) -> (SpatialObject, f64) {
        let trm = Matrix3::text_rendering_matrix(s.font_size, s.horizontal_scale, s.rise);
        let rendering = trm.compose(&s.text_matrix);

        let width = or_zero(self.metrics.width(ch, s), 0.0);
        let height = or_zero(self.metrics.height(ch, s), 0.0);
        let (disp_x, _disp_y) = or_zero(self.metrics.displacement(ch, s), (0.0, 0.0));

        let run = SpatialObject::new(
            rendering.translation_part(),
            width * (1.0 + s.horizontal_scale / 100.0),
            height,
            ch,
        );

        // Writing mode is always horizontal; disp_y is never used for advance.
        let spacing = if ch == self.word_separator {
            s.word_spacing
        } else {
            s.character_spacing
        };
        let tx = ((disp_x - s.tj / 1000.0) * s.font_size + spacing) * s.horizontal_scale;
        (run, tx)
    }
}

/// Substitutes `fallback` for a metric the backend cannot answer.
fn or_zero<T>(lookup: Result<T>, fallback: T) -> T {
    match lookup {
        Ok(value) => value,
        Err(InterpError::MetricsUnavailable { ch }) => {
            debug!(?ch, "glyph metrics unavailable, using zero");
            fallback
        }
        Err(err) => {
            debug!(%err, "glyph metrics lookup failed, using zero");
            fallback
        }
    }
}
