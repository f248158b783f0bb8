//! Text operators.
//!
//! Handles: begin/end page, BT, ET, Tc, Tw, Tz, TL, Tf, Ts, Td, TD, Tm, T*, Tj, TJ, ', "
//!
//! Page scope:
//! - begin_page/end_page: Create and discard the page floor frame
//!
//! Text object:
//! - BT/ET: Push a copy of the current frame / pop it
//!
//! Text state:
//! - Tc: Character spacing
//! - Tw: Word spacing
//! - Tz: Horizontal scaling
//! - TL: Leading
//! - Tf: Font and size
//! - Ts: Rise (baseline offset)
//!
//! Text positioning:
//! - Td/TD: Translate the text matrix (TD also sets leading)
//! - Tm: Set text matrix directly
//! - T*: Move to next line using current leading
//!
//! Text showing:
//! - Tj: Show string
//! - TJ: Show strings with positioning adjustments
//! - ': Move to next line and show
//! - ": Set spacing, move to next line, and show

use tracing::debug;

use crate::error::Result;
use crate::font::metrics::GlyphMetrics;
use crate::interp::event::{TextSeq, TextSeqItem};
use crate::interp::interpreter::TextRunInterpreter;
use crate::model::run::SpatialObject;
use crate::model::state::FontHandle;
use crate::utils::Matrix3;

#[allow(non_snake_case)]
impl<M: GlyphMetrics> TextRunInterpreter<M> {
    // ========================================================================
    // Page Scope
    // ========================================================================

    /// Starts a page: a fresh initial frame becomes the page floor.
    ///
    /// Frames left open by a previous page are discarded.
    pub fn do_begin_page(&mut self, page: Option<u32>) {
        if self.stack.depth() > 1 {
            debug!(
                previous = ?self.page,
                unclosed = self.stack.depth() - 1,
                "begin_page with open text objects"
            );
        }
        self.stack.begin_page();
        self.page = page;
        self.runs.clear();
        self.diagnostics.clear();
    }

    /// Ends the page, popping the floor frame.
    pub fn do_end_page(&mut self) -> Result<()> {
        self.stack.top()?;
        let unclosed = self.stack.end_page();
        if unclosed > 0 {
            debug!(page = ?self.page, unclosed, "end_page with open text objects");
        }
        Ok(())
    }

    // ========================================================================
    // Text Object Operators
    // ========================================================================

    /// BT - Begin text object.
    ///
    /// Pushes a duplicate of the current frame; changes inside the text
    /// object are discarded by the matching ET.
    pub fn do_BT(&mut self) -> Result<()> {
        self.stack.push_copy()
    }

    /// ET - End text object.
    ///
    /// Pops exactly one frame. An ET with no open text object underflows
    /// and leaves the stack unchanged.
    pub fn do_ET(&mut self) -> Result<()> {
        self.stack.pop()
    }

    // ========================================================================
    // Text State Operators
    // ========================================================================

    /// Tc - Set character spacing.
    pub fn do_Tc(&mut self, charspace: f64) -> Result<()> {
        self.stack.top_mut()?.character_spacing = charspace;
        Ok(())
    }

    /// Tw - Set word spacing.
    ///
    /// Applied in place of character spacing after the word separator.
    pub fn do_Tw(&mut self, wordspace: f64) -> Result<()> {
        self.stack.top_mut()?.word_spacing = wordspace;
        Ok(())
    }

    /// Tz - Set horizontal scaling (percentage).
    pub fn do_Tz(&mut self, scaling: f64) -> Result<()> {
        self.stack.top_mut()?.horizontal_scale = scaling;
        Ok(())
    }

    /// TL - Set text leading.
    ///
    /// Stored as given; T* translates by it directly, the same step TD
    /// records.
    pub fn do_TL(&mut self, leading: f64) -> Result<()> {
        self.stack.top_mut()?.leading = leading;
        Ok(())
    }

    /// Tf - Set text font and size.
    ///
    /// The font handle is stored as-is; the metrics backend resolves it.
    pub fn do_Tf(&mut self, font: &FontHandle, fontsize: f64) -> Result<()> {
        let state = self.stack.top_mut()?;
        state.font = Some(font.clone());
        state.font_size = fontsize;
        Ok(())
    }

    /// Ts - Set text rise (superscript/subscript offset).
    pub fn do_Ts(&mut self, rise: f64) -> Result<()> {
        self.stack.top_mut()?.rise = rise;
        Ok(())
    }

    // ========================================================================
    // Text Positioning Operators
    // ========================================================================

    /// Td - Move text position by (tx, ty) in text space.
    pub fn do_Td(&mut self, tx: f64, ty: f64) -> Result<()> {
        let state = self.stack.top_mut()?;
        state.text_matrix = Matrix3::translation(tx, ty).compose(&state.text_matrix);
        Ok(())
    }

    /// TD - Move text position and set leading.
    ///
    /// Same as Td but also records ty as the line step for T*.
    pub fn do_TD(&mut self, tx: f64, ty: f64) -> Result<()> {
        self.do_Td(tx, ty)?;
        self.stack.top_mut()?.leading = ty;
        Ok(())
    }

    /// Tm - Set text matrix and text line matrix.
    ///
    /// Replaces the text matrix; nothing is composed.
    pub fn do_Tm(&mut self, matrix: Matrix3) -> Result<()> {
        self.stack.top_mut()?.text_matrix = matrix;
        Ok(())
    }

    /// T* - Move to start of next text line.
    ///
    /// Equivalent to Td(0, leading) with the stored (already signed) leading.
    pub fn do_T_star(&mut self) -> Result<()> {
        let state = self.stack.top_mut()?;
        state.text_matrix = Matrix3::translation(0.0, state.leading).compose(&state.text_matrix);
        Ok(())
    }

    // ========================================================================
    // Text Showing Operators
    // ========================================================================

    /// Tj - Show text string.
    pub fn do_Tj(&mut self, s: &str) -> Result<Vec<SpatialObject>> {
        self.show(s)
    }

    /// TJ - Show text, allowing individual glyph positioning.
    ///
    /// Runs inside a frame of its own: a number sets `tj` for the strings
    /// that follow it, and the adjustment is gone once the array ends.
    pub fn do_TJ(&mut self, seq: &TextSeq) -> Result<Vec<SpatialObject>> {
        self.stack.push_copy()?;
        let shown = self.show_seq(seq);
        self.stack.pop()?;
        shown
    }

    fn show_seq(&mut self, seq: &TextSeq) -> Result<Vec<SpatialObject>> {
        let mut runs = Vec::new();
        for item in seq {
            match item {
                TextSeqItem::Number(n) => self.stack.top_mut()?.tj = *n,
                TextSeqItem::Text(s) => runs.extend(self.show(s)?),
            }
        }
        Ok(runs)
    }

    /// ' (quote) - Move to next line and show text.
    ///
    /// Equivalent to: T* (string) Tj
    pub fn do_quote(&mut self, s: &str) -> Result<Vec<SpatialObject>> {
        self.do_T_star()?;
        self.do_Tj(s)
    }

    /// " (doublequote) - Set word and character spacing, move to next line, and show text.
    ///
    /// Equivalent to: aw Tw ac Tc (string) '
    pub fn do_doublequote(&mut self, aw: f64, ac: f64, s: &str) -> Result<Vec<SpatialObject>> {
        self.do_Tw(aw)?;
        self.do_Tc(ac)?;
        self.do_quote(s)
    }
}
