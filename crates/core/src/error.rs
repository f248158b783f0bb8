//! Error types for the textrun interpreter.

use smol_str::SmolStr;
use thiserror::Error;

/// Primary error type for content-stream text interpretation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpError {
    /// A pop or end event arrived with no open frame above the page floor,
    /// or a text event arrived before any page was begun.
    #[error("text state underflow on page {page:?} at operator {operator_index}")]
    StateUnderflow {
        page: Option<u32>,
        operator_index: usize,
    },

    #[error("malformed {kind} operator: {reason}")]
    MalformedOperator { kind: SmolStr, reason: String },

    #[error("no glyph metrics for {ch:?}")]
    MetricsUnavailable { ch: char },

    #[error("invalid token at position {pos}: {msg}")]
    TokenError { pos: usize, msg: String },

    #[error("unexpected end of input")]
    UnexpectedEof,
}

impl InterpError {
    pub(crate) fn malformed(kind: &str, reason: impl Into<String>) -> Self {
        Self::MalformedOperator {
            kind: SmolStr::new(kind),
            reason: reason.into(),
        }
    }

    /// Whether this error ends interpretation of the current page.
    pub const fn is_page_fatal(&self) -> bool {
        matches!(self, Self::StateUnderflow { .. })
    }
}

/// Convenience Result type alias for InterpError.
pub type Result<T> = std::result::Result<T, InterpError>;
