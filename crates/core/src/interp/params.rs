//! Interpretation parameters.
//!
//! Contains InterpretOptions for controlling how runs are produced.

use crate::interp::device::WORD_SEPARATOR;
use crate::utils::Rect;

/// Parameters for one interpretation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretOptions {
    /// Character that receives word spacing (Tw) instead of character
    /// spacing (Tc) when advancing.
    pub word_separator: char,

    /// If set, runs whose origin falls outside this rectangle are dropped.
    /// None keeps every run, leaving clipping to the consumer.
    pub media_box: Option<Rect>,
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            word_separator: WORD_SEPARATOR,
            media_box: None,
        }
    }
}

impl InterpretOptions {
    #[must_use]
    pub const fn with_word_separator(mut self, word_separator: char) -> Self {
        self.word_separator = word_separator;
        self
    }

    #[must_use]
    pub const fn with_media_box(mut self, media_box: Rect) -> Self {
        self.media_box = Some(media_box);
        self
    }
}
