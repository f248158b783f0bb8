//! Text graphics state and its frame stack.
//!
//! One `TextState` captures every mutable text-rendering parameter. Frames are
//! pushed and popped by `TextStateStack` to model the nested scopes of a page:
//! the page itself, a BT/ET text object, and the sandbox around a TJ array.

use smol_str::SmolStr;

use crate::error::{InterpError, Result};
use crate::utils::{MATRIX_IDENTITY, Matrix3};

/// Opaque font resource handle (e.g. `"F1"`), resolved by the metrics backend.
pub type FontHandle = SmolStr;

/// One frame of text state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// Text matrix (Tm)
    pub text_matrix: Matrix3,
    /// Horizontal scaling percentage (100 = normal)
    pub horizontal_scale: f64,
    /// Character spacing (Tc)
    pub character_spacing: f64,
    /// Word spacing (Tw), applied to the word separator character
    pub word_spacing: f64,
    /// Signed vertical step applied by T*, in unscaled text space units.
    pub leading: f64,
    /// Text rise (superscript/subscript offset)
    pub rise: f64,
    /// Font size in user units
    pub font_size: f64,
    /// Current font resource, None until Tf
    pub font: Option<FontHandle>,
    /// Positioning adjustment from the enclosing TJ array, in thousandths of
    /// text space. Zero outside a TJ scope.
    pub tj: f64,
}

impl TextState {
    /// The frame pushed at the start of every page.
    pub fn new() -> Self {
        Self {
            text_matrix: MATRIX_IDENTITY,
            horizontal_scale: 100.0,
            character_spacing: 0.0,
            word_spacing: 0.0,
            leading: 0.0,
            rise: 0.0,
            font_size: 0.0,
            font: None,
            tj: 0.0,
        }
    }
}

impl Default for TextState {
    fn default() -> Self {
        Self::new()
    }
}

/// Stack of text state frames for one interpretation pass.
///
/// The bottom frame is the page floor: it exists from `begin_page` until
/// `end_page`, and `pop` never removes it.
#[derive(Debug, Clone, Default)]
pub struct TextStateStack {
    frames: Vec<TextState>,
}

impl TextStateStack {
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Drops any frames left from a previous page and pushes the initial frame.
    pub fn begin_page(&mut self) {
        self.frames.clear();
        self.frames.push(TextState::new());
    }

    /// Removes every frame, including the page floor.
    ///
    /// Returns the number of frames that were still open above the floor.
    pub fn end_page(&mut self) -> usize {
        let unclosed = self.frames.len().saturating_sub(1);
        self.frames.clear();
        unclosed
    }

    pub fn is_in_page(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Number of frames, including the page floor.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Duplicates the top frame and pushes the copy.
    ///
    /// Fails with `StateUnderflow` when no page has been begun. The returned
    /// error carries no position; the interpreter fills that in.
    pub fn push_copy(&mut self) -> Result<()> {
        let top = self.frames.last().cloned().ok_or(underflow())?;
        self.frames.push(top);
        Ok(())
    }

    /// Removes and discards the top frame. The page floor cannot be popped.
    pub fn pop(&mut self) -> Result<()> {
        if self.frames.len() <= 1 {
            return Err(underflow());
        }
        self.frames.pop();
        Ok(())
    }

    pub fn top(&self) -> Result<&TextState> {
        self.frames.last().ok_or(underflow())
    }

    pub fn top_mut(&mut self) -> Result<&mut TextState> {
        self.frames.last_mut().ok_or(underflow())
    }
}

const fn underflow() -> InterpError {
    InterpError::StateUnderflow {
        page: None,
        operator_index: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_cannot_be_popped() {
        let mut stack = TextStateStack::new();
        stack.begin_page();
        assert!(stack.pop().is_err());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_no_frame_outside_page() {
        let mut stack = TextStateStack::new();
        assert!(stack.top().is_err());
        assert!(stack.push_copy().is_err());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_end_page_reports_unclosed_frames() {
        let mut stack = TextStateStack::new();
        stack.begin_page();
        stack.push_copy().unwrap();
        stack.push_copy().unwrap();
        assert_eq!(stack.end_page(), 2);
        assert!(!stack.is_in_page());
    }
}
